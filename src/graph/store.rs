//! The commit graph store.
//!
//! `GraphStore` owns every commit, branch and tag plus HEAD, and hands out
//! the monotonic counters (commit handles, sequence rows, swimlanes). It
//! has no opinion about Git semantics; [`GitGraph`](crate::graph::GitGraph)
//! drives it.
//!
//! Lookups are linear scans. Graphs are built by hand, one click at a time,
//! so they stay small.

use std::collections::{BTreeMap, HashSet};

use crate::graph::commit::{Commit, CommitBuilder};
use crate::graph::refs::{Branch, Head, RefId, RefView, Tag};
use crate::graph::types::{CommitKey, Swimlane};

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    commits: BTreeMap<CommitKey, Commit>,
    branches: Vec<Branch>,
    tags: Vec<Tag>,
    head: Option<Head>,
    next_key: u64,
    next_sequence: u32,
    next_swimlane: Swimlane,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- counters ----

    /// allocate a fresh layout row
    pub(crate) fn allocate_sequence(&mut self) -> u32 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// allocate a fresh swimlane
    pub(crate) fn allocate_swimlane(&mut self) -> Swimlane {
        let lane = self.next_swimlane;
        self.next_swimlane += 1;
        lane
    }

    /// number of swimlanes handed out so far (lane shifts count as one)
    pub fn swimlane_count(&self) -> Swimlane {
        self.next_swimlane
    }

    /// number of sequence rows handed out so far
    pub fn sequence_count(&self) -> u32 {
        self.next_sequence
    }

    // ---- commits ----

    /// Insert a commit. Its parent's child pointer is updated to the new
    /// commit.
    pub(crate) fn add_commit(&mut self, builder: CommitBuilder) -> CommitKey {
        let key = CommitKey::new(self.next_key);
        self.next_key += 1;

        let commit = builder.build(key);
        if let Some(parent) = commit.parent.and_then(|p| self.commits.get_mut(&p)) {
            parent.child = Some(key);
        }
        self.commits.insert(key, commit);
        key
    }

    /// Remove a commit. Only garbage collection calls this.
    pub(crate) fn remove_commit(&mut self, key: CommitKey) -> Option<Commit> {
        self.commits.remove(&key)
    }

    pub fn commit(&self, key: CommitKey) -> Option<&Commit> {
        self.commits.get(&key)
    }

    /// commits in creation order
    pub fn commits(&self) -> impl Iterator<Item = &Commit> {
        self.commits.values()
    }

    pub(crate) fn commits_mut(&mut self) -> impl Iterator<Item = &mut Commit> {
        self.commits.values_mut()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Find a commit by its id label.
    ///
    /// Ids are only unique among reachable commits, so reachable commits win,
    /// newest first. Lost commits are considered only with `include_lost`.
    pub fn find_commit(&self, id: &str, include_lost: bool) -> Option<&Commit> {
        let mut fallback = None;
        for commit in self.commits.values().rev().filter(|c| c.id == id) {
            if !commit.lost {
                return Some(commit);
            }
            if include_lost && fallback.is_none() {
                fallback = Some(commit);
            }
        }
        fallback
    }

    pub fn lost_commits(&self) -> Vec<CommitKey> {
        self.commits.values().filter(|c| c.lost).map(|c| c.key).collect()
    }

    /// Is `ancestor` reachable from `descendant` through parent or merge
    /// parent edges? A commit is not its own ancestor.
    pub fn is_ancestor(&self, ancestor: CommitKey, descendant: CommitKey) -> bool {
        let mut visited = HashSet::new();
        let mut stack: Vec<CommitKey> = self
            .commits
            .get(&descendant)
            .map(|c| c.parents().collect())
            .unwrap_or_default();

        while let Some(key) = stack.pop() {
            if key == ancestor {
                return true;
            }
            if !visited.insert(key) {
                continue;
            }
            if let Some(commit) = self.commits.get(&key) {
                stack.extend(commit.parents());
            }
        }
        false
    }

    /// `start` followed by its first-parent ancestors, newest first.
    pub fn first_parent_chain(&self, start: CommitKey) -> Vec<CommitKey> {
        let mut chain = Vec::new();
        let mut current = self.commits.get(&start);
        while let Some(commit) = current {
            chain.push(commit.key);
            current = commit.parent.and_then(|p| self.commits.get(&p));
        }
        chain
    }

    /// Record that `reference` points at `commit`.
    pub(crate) fn attach_ref(&mut self, commit: CommitKey, reference: RefId) {
        if let Some(commit) = self.commits.get_mut(&commit) {
            commit.refs.insert(reference);
        }
    }

    pub(crate) fn detach_ref(&mut self, commit: CommitKey, reference: &RefId) {
        if let Some(commit) = self.commits.get_mut(&commit) {
            commit.refs.remove(reference);
        }
    }

    // ---- references ----

    pub fn head(&self) -> Option<&Head> {
        self.head.as_ref()
    }

    pub(crate) fn head_mut(&mut self) -> Option<&mut Head> {
        self.head.as_mut()
    }

    pub(crate) fn set_head(&mut self, head: Head) {
        self.head = Some(head);
    }

    pub(crate) fn add_branch(&mut self, branch: Branch) {
        self.attach_ref(branch.commit, RefId::Branch(branch.name.clone()));
        self.branches.push(branch);
    }

    pub(crate) fn remove_branch(&mut self, name: &str) -> Option<Branch> {
        let pos = self.branches.iter().position(|b| b.name == *name)?;
        let branch = self.branches.remove(pos);
        self.detach_ref(branch.commit, &RefId::Branch(branch.name.clone()));
        Some(branch)
    }

    pub fn find_branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == *name)
    }

    pub(crate) fn find_branch_mut(&mut self, name: &str) -> Option<&mut Branch> {
        self.branches.iter_mut().find(|b| b.name == *name)
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub(crate) fn branches_mut(&mut self) -> impl Iterator<Item = &mut Branch> {
        self.branches.iter_mut()
    }

    pub(crate) fn add_tag(&mut self, tag: Tag) {
        self.attach_ref(tag.commit, RefId::Tag(tag.name.clone()));
        self.tags.push(tag);
    }

    pub(crate) fn remove_tag(&mut self, name: &str) -> Option<Tag> {
        let pos = self.tags.iter().position(|t| t.name == *name)?;
        let tag = self.tags.remove(pos);
        self.detach_ref(tag.commit, &RefId::Tag(tag.name.clone()));
        Some(tag)
    }

    pub fn find_tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == *name)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Every reference, HEAD first.
    pub fn references(&self) -> Vec<RefView<'_>> {
        let mut refs = Vec::with_capacity(self.branches.len() + self.tags.len() + 1);
        if let Some(head) = &self.head {
            refs.push(RefView::Head(head));
        }
        refs.extend(self.branches.iter().map(RefView::Branch));
        refs.extend(self.tags.iter().map(RefView::Tag));
        refs
    }
}
