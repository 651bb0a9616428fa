//! Serializable render model.
//!
//! A [`GraphSnapshot`] is everything a drawing front end needs: commits with
//! canvas coordinates, the label stack next to each commit, and the state of
//! every reference. Hidden lost commits are left out.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ulid::Ulid;

use crate::graph::{
    commit_position, label_position, label_slots, Commit, CommitKey, GitGraph, Point, RefId, Swimlane,
};

#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub graph_id: String,
    pub taken_at: DateTime<Utc>,
    pub lost_commits_visible: bool,
    /// in creation order
    pub commits: Vec<CommitSnapshot>,
    pub branches: Vec<BranchSnapshot>,
    pub tags: Vec<TagSnapshot>,
    pub head: Option<HeadSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitSnapshot {
    pub key: CommitKey,
    pub id: String,
    pub sequence: u32,
    pub swimlane: Swimlane,
    pub position: Point,
    pub color: String,
    pub parent: Option<String>,
    pub merged_parent: Option<String>,
    pub lost: bool,
    pub created_at: DateTime<Utc>,
    pub labels: Vec<LabelSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelSnapshot {
    pub reference: RefId,
    pub slot: usize,
    pub position: Point,
    /// checked-out branch, or a detached HEAD
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchSnapshot {
    pub name: String,
    pub commit: String,
    pub swimlane: Swimlane,
    pub color: String,
    pub checked_out: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagSnapshot {
    pub name: String,
    pub commit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadSnapshot {
    pub commit: String,
    /// attached branch, `None` when detached
    pub target: Option<String>,
    pub detached: bool,
}

impl GraphSnapshot {
    /// Capture the current state of `graph`.
    pub fn capture(graph: &GitGraph, graph_id: Ulid) -> Self {
        let store = graph.store();
        let layout = &graph.config().layout;
        let visible = graph.lost_commits_visible();
        let id_of = |key: CommitKey| store.commit(key).map(|c| c.id().to_string()).unwrap_or_default();

        let commits = store
            .commits()
            .filter(|c| visible || !c.is_lost())
            .map(|commit| CommitSnapshot {
                key: commit.key(),
                id: commit.id().to_string(),
                sequence: commit.sequence(),
                swimlane: commit.swimlane(),
                position: commit_position(commit, layout),
                color: commit.color().to_string(),
                parent: commit.parent().map(id_of),
                merged_parent: commit.merged_parent().map(id_of),
                lost: commit.is_lost(),
                created_at: commit.created_at(),
                labels: labels(graph, commit),
            })
            .collect();

        let branches = store
            .branches()
            .iter()
            .map(|b| BranchSnapshot {
                name: b.name().to_string(),
                commit: id_of(b.tip()),
                swimlane: b.swimlane(),
                color: b.color().to_string(),
                checked_out: b.is_checked_out(),
            })
            .collect();

        let tags = store
            .tags()
            .iter()
            .map(|t| TagSnapshot {
                name: t.name().to_string(),
                commit: id_of(t.target()),
            })
            .collect();

        let head = store.head().map(|h| HeadSnapshot {
            commit: id_of(h.commit()),
            target: h.target().map(|t| t.to_string()),
            detached: h.is_detached(),
        });

        Self {
            graph_id: graph_id.to_string().to_lowercase(),
            taken_at: Utc::now(),
            lost_commits_visible: visible,
            commits,
            branches,
            tags,
            head,
        }
    }

    pub fn commit(&self, id: &str) -> Option<&CommitSnapshot> {
        self.commits.iter().rev().find(|c| c.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn labels(graph: &GitGraph, commit: &Commit) -> Vec<LabelSnapshot> {
    let layout = &graph.config().layout;
    label_slots(commit)
        .into_iter()
        .map(|(reference, slot)| {
            let active = match &reference {
                RefId::Head => true,
                RefId::Branch(name) => graph.is_branch_checked_out(name.as_str()),
                RefId::Tag(_) => false,
            };
            LabelSnapshot {
                position: label_position(commit, slot, layout),
                reference,
                slot,
                active,
            }
        })
        .collect()
}
