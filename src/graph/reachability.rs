//! Reachability sweep and garbage collection.
//!
//! A commit is lost when no branch, tag or HEAD can reach it through parent
//! or merge-parent edges. Marking and collecting are separate passes: the
//! sweep only flags, collection deletes what is flagged.

use std::collections::HashSet;

use crate::graph::store::GraphStore;
use crate::graph::types::CommitKey;

/// Every commit reachable from a branch tip, a tag or HEAD.
pub fn reachable_commits(store: &GraphStore) -> HashSet<CommitKey> {
    let mut stack: Vec<CommitKey> = store.branches().iter().map(|b| b.tip()).collect();
    stack.extend(store.tags().iter().map(|t| t.target()));
    stack.extend(store.head().map(|h| h.commit()));

    let mut reachable = HashSet::new();
    while let Some(key) = stack.pop() {
        if !reachable.insert(key) {
            continue;
        }
        if let Some(commit) = store.commit(key) {
            stack.extend(commit.parents());
        }
    }
    reachable
}

/// Flag every unreachable commit as lost and clear the flag on the rest.
///
/// Returns the lost commits in creation order.
pub(crate) fn mark_lost_commits(store: &mut GraphStore) -> Vec<CommitKey> {
    let reachable = reachable_commits(store);
    let mut lost = Vec::new();
    for commit in store.commits_mut() {
        commit.lost = !reachable.contains(&commit.key);
        if commit.lost {
            lost.push(commit.key);
        }
    }
    log::debug!("reachability sweep: {} reachable, {} lost", reachable.len(), lost.len());
    lost
}

/// Delete every commit currently flagged lost.
///
/// Survivors whose child pointer named a deleted commit lose that pointer.
/// Parent edges never name a deleted commit: a lost commit's descendants are
/// lost too.
pub(crate) fn collect_lost_commits(store: &mut GraphStore) -> Vec<CommitKey> {
    let doomed: HashSet<CommitKey> = store.lost_commits().into_iter().collect();
    if doomed.is_empty() {
        return Vec::new();
    }

    let mut removed: Vec<CommitKey> = doomed.iter().copied().collect();
    removed.sort();
    for key in &removed {
        store.remove_commit(*key);
    }

    for commit in store.commits_mut() {
        if commit.child.is_some_and(|c| doomed.contains(&c)) {
            commit.child = None;
        }
        debug_assert!(
            commit.parents().all(|p| !doomed.contains(&p)),
            "collected an ancestor of surviving commit {}",
            commit.id
        );
    }
    removed
}
