//! The simulator front: command surface, text commands and the REPL.
//!
//! [`Simulator`] wraps a [`GitGraph`](crate::graph::GitGraph), forwards the
//! change events of every command to a [`NotificationSink`] and accepts
//! git-like text commands. [`GraphSnapshot`] is the serializable render
//! model and [`render_graph`] a plain-text drawing of it.

mod api;
mod command;
mod notify;
mod render;
mod repl;
mod snapshot;

pub use api::{CommandResult, Simulator, SimulatorConfig, SimulatorError, SimulatorResult};
pub use command::{Command, ParseError, ParseResult};
pub use notify::{LogSink, NotificationSink, NullSink, RecordingSink};
pub use render::{decorations, render_graph};
pub use repl::{Repl, ReplConfig};
pub use snapshot::{BranchSnapshot, CommitSnapshot, GraphSnapshot, HeadSnapshot, LabelSnapshot, TagSnapshot};
