//! Graph configuration: canvas geometry and branch colors.

use serde::{Deserialize, Serialize};

/// Canvas geometry handed to renderers through snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// x of swimlane 0
    pub left_offset: i32,
    /// y of sequence row 0; rows grow upwards
    pub bottom_offset: i32,
    /// vertical distance between rows
    pub commit_distance: i32,
    /// horizontal distance between swimlanes
    pub swimlane_distance: i32,
    pub commit_radius: i32,
    pub label_height: i32,
    /// vertical gap between stacked labels
    pub label_gap: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_offset: 150,
            bottom_offset: 440,
            commit_distance: 70,
            swimlane_distance: 80,
            commit_radius: 25,
            label_height: 24,
            label_gap: 5,
        }
    }
}

impl LayoutConfig {
    /// offset of the first label from its commit's right dock point
    pub fn label_offset(&self) -> (i32, i32) {
        (20, -self.commit_radius + self.label_height / 2)
    }

    /// distance between two stacked labels
    pub fn label_step(&self) -> i32 {
        self.label_height + self.label_gap
    }
}

/// Configuration for a single graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub layout: LayoutConfig,
    /// branch colors, handed out round-robin
    pub palette: Vec<String>,
    /// color of commits made on a detached HEAD
    pub head_color: String,
    /// drop empty swimlanes after garbage collection
    pub compact_lanes_after_gc: bool,
}

impl GraphConfig {
    pub const DEFAULT_PALETTE: [&'static str; 17] = [
        "#A081EF", "#E39695", "#C1AE7C", "#067BC2", "#ecc30b", "#f37748", "#FF9FE5", "#861657",
        "#2B50AA", "#B3679B", "#84BCDA", "#F7B538", "#53A548", "#EEE82C", "#5DA271", "#2EC4B6",
        "#19381F",
    ];

    pub const DEFAULT_HEAD_COLOR: &'static str = "#FF0F17";

    /// Set compact_lanes_after_gc flag.
    pub fn compact_lanes_after_gc(mut self, value: bool) -> Self {
        self.compact_lanes_after_gc = value;
        self
    }

    /// Replace the palette.
    pub fn palette<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = colors.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            palette: Self::DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            head_color: Self::DEFAULT_HEAD_COLOR.to_string(),
            compact_lanes_after_gc: false,
        }
    }
}
