//! Structural change events.
//!
//! Graph operations record what they changed; the simulator drains the
//! events after each command and hands them to its notification sink so a
//! renderer knows what to redraw.

use serde::Serialize;

use crate::graph::refs::RefId;
use crate::graph::types::{CommitKey, Swimlane};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphEvent {
    /// the root commit and default branch exist
    Initialized { root: CommitKey },
    CommitAdded { commit: CommitKey },
    RefAdded { reference: RefId, commit: CommitKey },
    RefMoved {
        reference: RefId,
        from: CommitKey,
        to: CommitKey,
    },
    RefRemoved { reference: RefId, commit: CommitKey },
    /// HEAD changed its target branch or became detached
    HeadChanged { target: Option<String>, commit: CommitKey },
    /// every commit and reference at or right of `from` moved one lane right
    LanesShifted { from: Swimlane },
    /// empty lanes were removed after garbage collection
    LanesCompacted { removed: Vec<Swimlane> },
    /// label stack of a commit needs redrawing
    LabelsRepositioned { commit: CommitKey },
    /// the set of lost commits differs from the previous sweep
    LostCommitsChanged { lost: Vec<CommitKey> },
    CommitsCollected { removed: Vec<CommitKey> },
    LostVisibilityChanged { visible: bool },
}

impl GraphEvent {
    /// commits whose drawing is affected, if the event is commit-local
    pub fn touched_commits(&self) -> Vec<CommitKey> {
        match self {
            GraphEvent::Initialized { root } => vec![*root],
            GraphEvent::CommitAdded { commit }
            | GraphEvent::RefAdded { commit, .. }
            | GraphEvent::RefRemoved { commit, .. }
            | GraphEvent::HeadChanged { commit, .. }
            | GraphEvent::LabelsRepositioned { commit } => vec![*commit],
            GraphEvent::RefMoved { from, to, .. } => vec![*from, *to],
            GraphEvent::LostCommitsChanged { lost } => lost.clone(),
            GraphEvent::CommitsCollected { removed } => removed.clone(),
            GraphEvent::LanesShifted { .. }
            | GraphEvent::LanesCompacted { .. }
            | GraphEvent::LostVisibilityChanged { .. } => Vec::new(),
        }
    }
}
