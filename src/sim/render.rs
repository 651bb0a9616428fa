//! Plain-text drawing of the graph, newest row first, in the spirit of
//! `git log --graph --oneline --all`.

use crate::graph::{Commit, GitGraph, RefId, Swimlane};

/// Render every visible commit, one line per commit.
///
/// Each line shows one column per swimlane (`*` for the commit, `x` for a
/// lost commit, `|` where a lane continues past the row), the commit id and
/// its decorations.
pub fn render_graph(graph: &GitGraph) -> String {
    let visible = graph.lost_commits_visible();
    let mut commits: Vec<&Commit> = graph
        .store()
        .commits()
        .filter(|c| visible || !c.is_lost())
        .collect();
    if commits.is_empty() {
        return "(empty graph)\n".to_string();
    }
    commits.sort_by(|a, b| b.sequence().cmp(&a.sequence()).then(b.key().cmp(&a.key())));

    let lanes = commits.iter().map(|c| c.swimlane()).max().unwrap_or(0) + 1;
    let spans: Vec<Option<(u32, u32)>> = (0..lanes).map(|lane| lane_span(&commits, lane)).collect();
    let id_width = commits.iter().map(|c| c.id().len()).max().unwrap_or(0);

    let mut out = String::new();
    for commit in &commits {
        let mut row = String::with_capacity(lanes as usize * 2);
        for (lane, span) in spans.iter().enumerate() {
            let symbol = if lane as Swimlane == commit.swimlane() {
                if commit.is_lost() { 'x' } else { '*' }
            } else if span.is_some_and(|(low, high)| low < commit.sequence() && commit.sequence() < high) {
                '|'
            } else {
                ' '
            };
            row.push(symbol);
            row.push(' ');
        }

        let decorations = decorations(graph, commit);
        let line = format!("{}{:width$} {}", row, commit.id(), decorations, width = id_width);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `(HEAD -> master, tag: v1)` style label list, plus notes for merge and
/// lost commits. Empty when there is nothing to show.
pub fn decorations(graph: &GitGraph, commit: &Commit) -> String {
    let mut labels = Vec::new();
    for reference in commit.refs() {
        match reference {
            RefId::Head => labels.push("HEAD".to_string()),
            RefId::Branch(name) if graph.is_branch_checked_out(name.as_str()) => {
                labels.push(format!("HEAD -> {}", name))
            }
            RefId::Branch(name) => labels.push(name.to_string()),
            RefId::Tag(name) => labels.push(format!("tag: {}", name)),
        }
    }

    let mut parts = Vec::new();
    if !labels.is_empty() {
        parts.push(format!("({})", labels.join(", ")));
    }
    if let Some(merged) = commit.merged_parent().and_then(|key| graph.commit(key)) {
        parts.push(format!("merge of {}", merged.id()));
    }
    if commit.is_lost() {
        parts.push("[lost]".to_string());
    }
    parts.join(" ")
}

/// lowest and highest row a lane is used in
fn lane_span(commits: &[&Commit], lane: Swimlane) -> Option<(u32, u32)> {
    let rows = commits.iter().filter(|c| c.swimlane() == lane).map(|c| c.sequence());
    rows.fold(None, |span, row| match span {
        None => Some((row, row)),
        Some((low, high)) => Some((low.min(row), high.max(row))),
    })
}
