//! GitGraph - an interactive simulator of Git's commit graph
//!
//! This crate models commits, branches, tags and HEAD the way Git does and
//! implements the operations people learn Git with: commit, branch,
//! checkout, merge, rebase, amend, tag, cherry-pick and garbage collection.
//! Commits that nothing references anymore are flagged as lost until `gc`
//! removes them.
//!
//! # Example
//!
//! ```
//! use gitgraph::sim::{Simulator, SimulatorConfig};
//!
//! let mut sim = Simulator::new(SimulatorConfig::default()).unwrap();
//! sim.execute_batch("branch feature; commit; checkout master; merge --no-ff feature").unwrap();
//! assert!(sim.does_commit_exist("m1f1"));
//! ```

pub mod graph;
pub mod sim;
