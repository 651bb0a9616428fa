//! commit graph model for GitGraph
//!
//! this module holds the simulated history and every operation that
//! changes it. Nothing in here draws anything; renderers read the store (or
//! a [`GraphSnapshot`](crate::sim::GraphSnapshot)) and listen for
//! [`GraphEvent`]s.
//!
//!  # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GitGraph                             │
//! │  (commit, branch, checkout, merge, rebase, amend, gc ...)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │   layout    │       │reachability │       │   events    │
//!  │ (swimlanes) │       │ (lost, gc)  │       │ (re-render) │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//!         │                     │
//!         └──────────┬──────────┘
//!                    ▼
//!             ┌─────────────┐
//!             │ GraphStore  │
//!             │ commits+refs│
//!             └─────────────┘
//!  ```
//!
//! # Usage
//!
//! ```
//! use gitgraph::graph::{GitGraph, MergeOutcome};
//!
//! let mut graph = GitGraph::default();
//! graph.init_graph()?;
//! graph.add_branch("feature")?;
//! graph.add_commit()?;
//! graph.checkout("master", true)?;
//!
//! let outcome = graph.merge(false, "feature")?;
//! assert!(matches!(outcome, MergeOutcome::FastForward { .. }));
//! # Ok::<(), gitgraph::graph::GraphError>(())
//! ```

mod colors;
mod commit;
mod config;
mod error;
mod events;
mod layout;
mod ops;
mod reachability;
mod refs;
mod store;
mod types;

pub use colors::ColorAllocator;
pub use commit::Commit;
pub use config::{GraphConfig, LayoutConfig};
pub use error::{GraphError, GraphResult};
pub use events::GraphEvent;
pub use layout::{commit_position, label_position, label_slots, Point};
pub use ops::{CheckoutTarget, CommitOptions, GitGraph, MergeOutcome, RebaseOutcome};
pub use reachability::reachable_commits;
pub use refs::{Branch, Head, Label, RefId, RefView, Tag};
pub use store::GraphStore;
pub use types::{BranchName, Color, CommitKey, InvalidNameError, Swimlane, TagName, HEAD};
