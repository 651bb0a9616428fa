//! Commits: the nodes of the simulated history.
//!
//! A commit's identity is its [`CommitKey`]. The human-facing `id` is only a
//! label: a lost commit and its amended copy can share a prefix, and ids of
//! collected commits may come back. The swimlane may shift and the set of
//! references pointing at it changes as refs move. Everything else is fixed
//! at creation.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::graph::refs::RefId;
use crate::graph::types::{Color, CommitKey, Swimlane};

/// A node in the commit DAG.
#[derive(Debug, Clone)]
pub struct Commit {
    pub(crate) key: CommitKey,
    pub(crate) id: String,
    pub(crate) sequence: u32,
    pub(crate) swimlane: Swimlane,
    pub(crate) parent: Option<CommitKey>,
    pub(crate) merged_parent: Option<CommitKey>,
    pub(crate) color: Color,
    pub(crate) child: Option<CommitKey>,
    pub(crate) refs: BTreeSet<RefId>,
    pub(crate) lost: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl Commit {
    pub fn key(&self) -> CommitKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// creation order; the layout row
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// the layout column
    pub fn swimlane(&self) -> Swimlane {
        self.swimlane
    }

    pub fn parent(&self) -> Option<CommitKey> {
        self.parent
    }

    /// the second parent, only set on merge commits
    pub fn merged_parent(&self) -> Option<CommitKey> {
        self.merged_parent
    }

    /// most recently created direct descendant, kept for layout repair
    pub fn child(&self) -> Option<CommitKey> {
        self.child
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    /// references currently pointing here
    pub fn refs(&self) -> &BTreeSet<RefId> {
        &self.refs
    }

    /// unreachable from every branch, tag and HEAD
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_merge(&self) -> bool {
        self.merged_parent.is_some()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// parent edges, first parent first
    pub fn parents(&self) -> impl Iterator<Item = CommitKey> {
        self.parent.into_iter().chain(self.merged_parent)
    }
}

/// builder for new commits
///
/// The store assigns the handle; everything else is decided by the graph
/// operation creating the commit.
#[derive(Debug, Clone)]
pub(crate) struct CommitBuilder {
    id: String,
    sequence: u32,
    swimlane: Swimlane,
    parent: Option<CommitKey>,
    merged_parent: Option<CommitKey>,
    color: Color,
}

impl CommitBuilder {
    pub(crate) fn new(id: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            sequence: 0,
            swimlane: 0,
            parent: None,
            merged_parent: None,
            color,
        }
    }

    pub(crate) fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub(crate) fn swimlane(mut self, swimlane: Swimlane) -> Self {
        self.swimlane = swimlane;
        self
    }

    pub(crate) fn parent(mut self, parent: Option<CommitKey>) -> Self {
        self.parent = parent;
        self
    }

    pub(crate) fn merged_parent(mut self, merged_parent: Option<CommitKey>) -> Self {
        self.merged_parent = merged_parent;
        self
    }

    pub(crate) fn build(self, key: CommitKey) -> Commit {
        Commit {
            key,
            id: self.id,
            sequence: self.sequence,
            swimlane: self.swimlane,
            parent: self.parent,
            merged_parent: self.merged_parent,
            color: self.color,
            child: None,
            refs: BTreeSet::new(),
            lost: false,
            created_at: Utc::now(),
        }
    }
}
