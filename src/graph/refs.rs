//!  Branches, tags and HEAD.
//!
//!  References are named pointers into the commit graph. This module holds
//!  their data; moving them around is the job of [`GitGraph`](crate::graph::GitGraph).
//!
//! - branches own a swimlane and a counter for auto-generated commit ids
//! - tags are fixed once created
//! - HEAD is either attached to a branch or detached on a commit

use std::fmt;

use serde::Serialize;

use crate::graph::types::{BranchName, Color, CommitKey, Swimlane, TagName, HEAD};

/// Identifies any reference that can point at a commit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum RefId {
    Head,
    Branch(BranchName),
    Tag(TagName),
}

impl RefId {
    /// text shown on the reference's label
    pub fn name(&self) -> &str {
        match self {
            RefId::Head => HEAD,
            RefId::Branch(name) => name.as_str(),
            RefId::Tag(name) => name.as_str(),
        }
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefId::Head => write!(f, "{}", HEAD),
            RefId::Branch(name) => write!(f, "branch {}", name),
            RefId::Tag(name) => write!(f, "tag {}", name),
        }
    }
}

/// What every reference label exposes to the renderer.
pub trait Label {
    fn ref_id(&self) -> RefId;

    /// the commit the label is drawn next to
    fn commit(&self) -> CommitKey;

    /// highlighted labels: the checked-out branch, or HEAD itself
    fn is_active(&self) -> bool;
}

/// A movable, named lineage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub(crate) name: BranchName,
    pub(crate) commit: CommitKey,
    pub(crate) swimlane: Swimlane,
    pub(crate) counter: u32,
    pub(crate) color: Color,
    pub(crate) checked_out: bool,
}

impl Branch {
    pub(crate) fn new(
        name: BranchName,
        commit: CommitKey,
        swimlane: Swimlane,
        counter: u32,
        color: Color,
    ) -> Self {
        Self {
            name,
            commit,
            swimlane,
            counter,
            color,
            checked_out: false,
        }
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn tip(&self) -> CommitKey {
        self.commit
    }

    pub fn swimlane(&self) -> Swimlane {
        self.swimlane
    }

    /// next numeric suffix for auto-generated commit ids
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn is_checked_out(&self) -> bool {
        self.checked_out
    }
}

impl Label for Branch {
    fn ref_id(&self) -> RefId {
        RefId::Branch(self.name.clone())
    }

    fn commit(&self) -> CommitKey {
        self.commit
    }

    fn is_active(&self) -> bool {
        self.checked_out
    }
}

/// An immutable name for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub(crate) name: TagName,
    pub(crate) commit: CommitKey,
}

impl Tag {
    pub(crate) fn new(name: TagName, commit: CommitKey) -> Self {
        Self { name, commit }
    }

    pub fn name(&self) -> &TagName {
        &self.name
    }

    pub fn target(&self) -> CommitKey {
        self.commit
    }
}

impl Label for Tag {
    fn ref_id(&self) -> RefId {
        RefId::Tag(self.name.clone())
    }

    fn commit(&self) -> CommitKey {
        self.commit
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// The single "current position" pointer.
///
/// When attached, `commit` mirrors the target branch's tip. When detached,
/// HEAD carries its own lane (allocated lazily on the first detached commit)
/// and its own id counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    pub(crate) commit: CommitKey,
    pub(crate) target: Option<BranchName>,
    pub(crate) swimlane: Option<Swimlane>,
    pub(crate) counter: u32,
    pub(crate) color: Color,
}

impl Head {
    /// letter used for commits made on a detached HEAD
    pub const INITIAL: char = 'H';

    pub(crate) fn attached(commit: CommitKey, target: BranchName, color: Color) -> Self {
        Self {
            commit,
            target: Some(target),
            swimlane: None,
            counter: 1,
            color,
        }
    }

    pub fn commit(&self) -> CommitKey {
        self.commit
    }

    pub fn target(&self) -> Option<&BranchName> {
        self.target.as_ref()
    }

    pub fn is_detached(&self) -> bool {
        self.target.is_none()
    }

    pub fn swimlane(&self) -> Option<Swimlane> {
        self.swimlane
    }

    pub fn color(&self) -> &Color {
        &self.color
    }
}

impl Label for Head {
    fn ref_id(&self) -> RefId {
        RefId::Head
    }

    fn commit(&self) -> CommitKey {
        self.commit
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// Borrowed view over any reference, for code that treats them uniformly.
#[derive(Debug, Clone, Copy)]
pub enum RefView<'a> {
    Head(&'a Head),
    Branch(&'a Branch),
    Tag(&'a Tag),
}

impl RefView<'_> {
    fn label(&self) -> &dyn Label {
        match self {
            RefView::Head(head) => *head,
            RefView::Branch(branch) => *branch,
            RefView::Tag(tag) => *tag,
        }
    }
}

impl Label for RefView<'_> {
    fn ref_id(&self) -> RefId {
        self.label().ref_id()
    }

    fn commit(&self) -> CommitKey {
        self.label().commit()
    }

    fn is_active(&self) -> bool {
        self.label().is_active()
    }
}
