//! Swimlane bookkeeping and canvas geometry.
//!
//! A commit is drawn at column `swimlane` and row `sequence`. Rebase and
//! amend make room for rewritten history by shifting every lane at or right
//! of some column one step right; lost commits shift along with everything
//! else so they keep their position relative to their live neighbours.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::graph::commit::Commit;
use crate::graph::config::LayoutConfig;
use crate::graph::refs::RefId;
use crate::graph::store::GraphStore;
use crate::graph::types::Swimlane;

/// A canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Move every commit and reference lineage at or right of `from` one lane
/// to the right. The lane counter grows by one so the opened column is never
/// handed out twice.
pub(crate) fn shift_lanes_right(store: &mut GraphStore, from: Swimlane) {
    for commit in store.commits_mut() {
        if commit.swimlane >= from {
            commit.swimlane += 1;
        }
    }
    for branch in store.branches_mut() {
        if branch.swimlane >= from {
            branch.swimlane += 1;
        }
    }
    if let Some(head) = store.head_mut() {
        if let Some(lane) = head.swimlane.as_mut() {
            if *lane >= from {
                *lane += 1;
            }
        }
    }
    store.allocate_swimlane();
    log::debug!("shifted swimlanes >= {} one to the right", from);
}

/// Remove lanes no commit or reference occupies anymore; lanes to their
/// right move left. Returns the removed lane numbers (pre-compaction).
///
/// The lane counter is left alone: it never decreases.
pub(crate) fn compact_lanes(store: &mut GraphStore) -> Vec<Swimlane> {
    let mut occupied: BTreeSet<Swimlane> = store.commits().map(|c| c.swimlane).collect();
    occupied.extend(store.branches().iter().map(|b| b.swimlane));
    if let Some(lane) = store.head().and_then(|h| h.swimlane) {
        occupied.insert(lane);
    }

    let Some(&max) = occupied.iter().next_back() else {
        return Vec::new();
    };
    let removed: Vec<Swimlane> = (0..max).filter(|lane| !occupied.contains(lane)).collect();
    if removed.is_empty() {
        return removed;
    }

    let remap = |lane: Swimlane| lane - removed.iter().filter(|r| **r < lane).count() as Swimlane;
    for commit in store.commits_mut() {
        commit.swimlane = remap(commit.swimlane);
    }
    for branch in store.branches_mut() {
        branch.swimlane = remap(branch.swimlane);
    }
    if let Some(head) = store.head_mut() {
        head.swimlane = head.swimlane.map(remap);
    }
    log::debug!("compacted empty swimlanes {:?}", removed);
    removed
}

/// Labels stacked next to a commit, top slot first.
///
/// Slot order is derived from the reference set, so repositioning after a
/// ref moves is just recomputing this list.
pub fn label_slots(commit: &Commit) -> Vec<(RefId, usize)> {
    commit
        .refs
        .iter()
        .enumerate()
        .map(|(slot, reference)| (reference.clone(), slot))
        .collect()
}

/// Center of a commit's circle.
pub fn commit_position(commit: &Commit, layout: &LayoutConfig) -> Point {
    Point::new(
        layout.left_offset + commit.swimlane as i32 * layout.swimlane_distance,
        layout.bottom_offset - commit.sequence as i32 * layout.commit_distance,
    )
}

/// Top-left corner of the label in `slot` next to a commit.
pub fn label_position(commit: &Commit, slot: usize, layout: &LayoutConfig) -> Point {
    let center = commit_position(commit, layout);
    let (dx, dy) = layout.label_offset();
    Point::new(
        center.x + layout.commit_radius + dx,
        center.y + dy + slot as i32 * layout.label_step(),
    )
}
