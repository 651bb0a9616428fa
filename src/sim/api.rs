//! Simulator API - the command surface a front end drives.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

use super::command::{Command, ParseError};
use super::notify::{LogSink, NotificationSink};
use super::snapshot::GraphSnapshot;
use crate::graph::{
    Branch, CheckoutTarget, Commit, CommitKey, CommitOptions, GitGraph, GraphConfig, GraphError, GraphResult,
    MergeOutcome, RebaseOutcome, Tag,
};

/// Result type for simulator operations.
pub type SimulatorResult<T> = Result<T, SimulatorError>;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimulatorError {
    /// The graph error behind this one, if any.
    pub fn graph_error(&self) -> Option<&GraphError> {
        match self {
            SimulatorError::Graph(e) => Some(e),
            _ => None,
        }
    }
}

/// Simulator configuration options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub graph: GraphConfig,
    /// Draw lost commits (and let `checkout` find them by id).
    pub show_lost_commits: bool,
    /// Create the root commit and `master` right away.
    pub auto_init: bool,
    /// Log every command at info level.
    pub verbose: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            show_lost_commits: true,
            auto_init: true,
            verbose: false,
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> SimulatorResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the graph configuration.
    pub fn graph(mut self, graph: GraphConfig) -> Self {
        self.graph = graph;
        self
    }

    /// Set show_lost_commits flag.
    pub fn show_lost_commits(mut self, value: bool) -> Self {
        self.show_lost_commits = value;
        self
    }

    /// Set auto_init flag.
    pub fn auto_init(mut self, value: bool) -> Self {
        self.auto_init = value;
        self
    }

    /// Set verbose flag.
    pub fn verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    pub fn validate(&self) -> SimulatorResult<()> {
        let layout = &self.graph.layout;
        if layout.commit_distance <= 0 || layout.swimlane_distance <= 0 {
            return Err(SimulatorError::InvalidConfig(
                "commit_distance and swimlane_distance must be positive".into(),
            ));
        }
        if layout.commit_radius < 0 || layout.label_height < 0 || layout.label_gap < 0 {
            return Err(SimulatorError::InvalidConfig("layout sizes must not be negative".into()));
        }
        if self.graph.head_color.trim().is_empty() {
            return Err(SimulatorError::InvalidConfig("head_color must not be empty".into()));
        }
        Ok(())
    }
}

/// What a text command did, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// new commits were created, ids oldest first
    Created { ids: Vec<String>, message: String },
    /// references moved or changed, no commit was created
    Success { message: String },
}

impl CommandResult {
    fn created(ids: Vec<String>, message: impl Into<String>) -> Self {
        CommandResult::Created {
            ids,
            message: message.into(),
        }
    }

    fn success(message: impl Into<String>) -> Self {
        CommandResult::Success {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CommandResult::Created { message, .. } | CommandResult::Success { message } => message,
        }
    }

    /// ids of the commits the command created
    pub fn created_ids(&self) -> &[String] {
        match self {
            CommandResult::Created { ids, .. } => ids,
            CommandResult::Success { .. } => &[],
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// An interactive Git graph.
///
/// Owns one [`GitGraph`] and forwards every change to its notification
/// sink. The graph sits behind a lock so a renderer on another thread can
/// hold a [`Simulator::shared_graph`] handle and read it between commands.
pub struct Simulator {
    config: SimulatorConfig,
    graph: Arc<RwLock<GitGraph>>,
    sink: Box<dyn NotificationSink>,
    graph_id: Ulid,
    history: Vec<String>,
}

impl Simulator {
    /// Create a simulator that reports changes to the log.
    pub fn new(config: SimulatorConfig) -> SimulatorResult<Self> {
        Self::with_sink(config, Box::new(LogSink))
    }

    pub fn with_sink(config: SimulatorConfig, sink: Box<dyn NotificationSink>) -> SimulatorResult<Self> {
        config.validate()?;
        let graph = Arc::new(RwLock::new(GitGraph::new(config.graph.clone())));
        let mut simulator = Self {
            config,
            graph,
            sink,
            graph_id: Ulid::new(),
            history: Vec::new(),
        };
        let show_lost = simulator.config.show_lost_commits;
        simulator.start(show_lost)?;
        Ok(simulator)
    }

    fn start(&mut self, show_lost: bool) -> SimulatorResult<()> {
        let auto_init = self.config.auto_init;
        self.mutate(|graph| {
            graph.show_lost_commits(show_lost);
            if auto_init {
                graph.init_graph()?;
            }
            Ok(())
        })
    }

    /// Discard the whole history and start over with a fresh graph. The
    /// lost-commit visibility toggle survives.
    pub fn reset(&mut self) -> SimulatorResult<()> {
        log::info!("resetting graph {}", self.graph_id);
        let show_lost = self.lost_commits_visible();
        *self.graph.write() = GitGraph::new(self.config.graph.clone());
        self.graph_id = Ulid::new();
        self.history.clear();
        self.start(show_lost)
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Identifier of the current graph; changes on reset.
    pub fn graph_id(&self) -> Ulid {
        self.graph_id
    }

    /// Handle for readers that outlive a single call.
    pub fn shared_graph(&self) -> Arc<RwLock<GitGraph>> {
        Arc::clone(&self.graph)
    }

    /// Run `f` against the current graph.
    pub fn with_graph<R>(&self, f: impl FnOnce(&GitGraph) -> R) -> R {
        f(&*self.graph.read())
    }

    /// Successfully executed text commands, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Run one mutation, then hand its events to the sink.
    fn mutate<T>(&mut self, op: impl FnOnce(&mut GitGraph) -> GraphResult<T>) -> SimulatorResult<T> {
        let (result, events) = {
            let mut graph = self.graph.write();
            let result = op(&mut *graph);
            (result, graph.take_events())
        };
        if !events.is_empty() {
            self.sink.graph_changed(&events);
        }
        result.map_err(|e| {
            log::warn!("{}", e);
            e.into()
        })
    }

    // ---- commands ----

    pub fn init_graph(&mut self) -> SimulatorResult<CommitKey> {
        self.mutate(|g| g.init_graph())
    }

    pub fn add_commit(&mut self, options: CommitOptions) -> SimulatorResult<CommitKey> {
        self.mutate(|g| g.add_commit_with(options))
    }

    pub fn amend_commit(&mut self) -> SimulatorResult<CommitKey> {
        self.mutate(|g| g.amend_commit())
    }

    pub fn cherry_pick(&mut self, commit_id: &str) -> SimulatorResult<CommitKey> {
        self.mutate(|g| g.cherry_pick(commit_id))
    }

    pub fn add_branch(&mut self, name: &str) -> SimulatorResult<Branch> {
        self.mutate(|g| g.add_branch(name))
    }

    pub fn add_tag(&mut self, name: &str) -> SimulatorResult<Tag> {
        self.mutate(|g| g.add_tag(name))
    }

    pub fn delete_branch(&mut self, name: &str) -> SimulatorResult<()> {
        self.mutate(|g| g.delete_branch(name))
    }

    pub fn delete_tag(&mut self, name: &str) -> SimulatorResult<()> {
        self.mutate(|g| g.delete_tag(name))
    }

    pub fn checkout(&mut self, id: &str, reveal_lost_commits: bool) -> SimulatorResult<CheckoutTarget> {
        self.mutate(|g| g.checkout(id, reveal_lost_commits))
    }

    pub fn merge(&mut self, no_fast_forward: bool, target_branch: &str) -> SimulatorResult<MergeOutcome> {
        self.mutate(|g| g.merge(no_fast_forward, target_branch))
    }

    pub fn rebase(&mut self, target_branch: &str) -> SimulatorResult<RebaseOutcome> {
        self.mutate(|g| g.rebase(target_branch))
    }

    pub fn run_garbage_collection(&mut self) -> SimulatorResult<Vec<CommitKey>> {
        self.mutate(|g| Ok(g.run_garbage_collection()))
    }

    pub fn calculate_lost_commits(&mut self) -> SimulatorResult<Vec<CommitKey>> {
        self.mutate(|g| Ok(g.calculate_lost_commits()))
    }

    pub fn show_lost_commits(&mut self, visible: bool) {
        // infallible; the Result only carries graph errors
        let _ = self.mutate(|g| {
            g.show_lost_commits(visible);
            Ok(())
        });
    }

    // ---- queries ----

    pub fn branches(&self) -> Vec<Branch> {
        self.graph.read().branches().to_vec()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.graph.read().tags().to_vec()
    }

    pub fn does_commit_exist(&self, id: &str) -> bool {
        self.graph.read().does_commit_exist(id)
    }

    pub fn does_tag_exist(&self, name: &str) -> bool {
        self.graph.read().does_tag_exist(name)
    }

    pub fn is_branch_checked_out(&self, name: &str) -> bool {
        self.graph.read().is_branch_checked_out(name)
    }

    pub fn is_branch_name_valid(&self, name: &str) -> bool {
        self.graph.read().is_branch_name_valid(name)
    }

    pub fn find_commit_for(&self, id: &str) -> Option<Commit> {
        self.graph.read().find_commit_for(id).cloned()
    }

    pub fn lost_commits_visible(&self) -> bool {
        self.graph.read().lost_commits_visible()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(&*self.graph.read(), self.graph_id)
    }

    // ---- text commands ----

    /// Parse and run one git-like command.
    pub fn execute(&mut self, input: &str) -> SimulatorResult<CommandResult> {
        let command = Command::parse(input)?;
        if self.config.verbose {
            log::info!("[cmd] {}", command);
        } else {
            log::debug!("[cmd] {}", command);
        }

        let result = self.run(&command)?;
        self.history.push(command.to_string());
        Ok(result)
    }

    /// Execute multiple commands separated by semicolons or newlines.
    /// Stops at the first failure.
    pub fn execute_batch(&mut self, input: &str) -> SimulatorResult<Vec<CommandResult>> {
        let mut results = Vec::new();

        for line in input.split([';', '\n']) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            results.push(self.execute(line)?);
        }

        Ok(results)
    }

    fn run(&mut self, command: &Command) -> SimulatorResult<CommandResult> {
        match command {
            Command::Init => self.mutate(|g| {
                g.init_graph()?;
                Ok(CommandResult::created(
                    vec![GitGraph::ROOT_ID.to_string()],
                    "Initialized empty graph",
                ))
            }),
            Command::Commit => self.mutate(|g| {
                let key = g.add_commit()?;
                let id = id_of(g, key);
                Ok(CommandResult::created(vec![id.clone()], format!("[{}] {}", actor_label(g), id)))
            }),
            Command::Amend => self.mutate(|g| {
                let key = g.amend_commit()?;
                let id = id_of(g, key);
                Ok(CommandResult::created(
                    vec![id.clone()],
                    format!("[{}] {} (amended)", actor_label(g), id),
                ))
            }),
            Command::Branch(name) => self.mutate(|g| {
                g.add_branch(name)?;
                Ok(CommandResult::success(format!("Switched to a new branch '{}'", name)))
            }),
            Command::DeleteBranch(name) => self.mutate(|g| {
                g.delete_branch(name)?;
                Ok(CommandResult::success(format!("Deleted branch {}", name)))
            }),
            Command::Checkout(target) => self.mutate(|g| {
                let reveal = g.lost_commits_visible();
                let message = match g.checkout(target, reveal)? {
                    CheckoutTarget::Branch(name) => format!("Switched to branch '{}'", name),
                    CheckoutTarget::Detached(key) => format!("HEAD is now at {}", id_of(g, key)),
                };
                Ok(CommandResult::success(message))
            }),
            Command::Merge { no_fast_forward, branch } => self.mutate(|g| {
                Ok(match g.merge(*no_fast_forward, branch)? {
                    MergeOutcome::FastForward { to } => {
                        CommandResult::success(format!("Fast-forward to {}", id_of(g, to)))
                    }
                    MergeOutcome::MergeCommit { commit } => {
                        let id = id_of(g, commit);
                        CommandResult::created(vec![id.clone()], format!("Merge made: {}", id))
                    }
                })
            }),
            Command::Rebase(branch) => self.mutate(|g| {
                Ok(match g.rebase(branch)? {
                    RebaseOutcome::FastForward { to } => {
                        CommandResult::success(format!("Fast-forwarded {} to {}", actor_label(g), id_of(g, to)))
                    }
                    RebaseOutcome::Rebased { replayed } => {
                        let ids: Vec<String> = replayed.iter().map(|key| id_of(g, *key)).collect();
                        let message = format!(
                            "Successfully rebased and updated {}: {}",
                            actor_label(g),
                            ids.join(" ")
                        );
                        CommandResult::created(ids, message)
                    }
                })
            }),
            Command::Tag(name) => self.mutate(|g| {
                let tag = g.add_tag(name)?;
                Ok(CommandResult::success(format!("Tagged {} as {}", id_of(g, tag.target()), name)))
            }),
            Command::DeleteTag(name) => self.mutate(|g| {
                g.delete_tag(name)?;
                Ok(CommandResult::success(format!("Deleted tag '{}'", name)))
            }),
            Command::CherryPick(commit) => self.mutate(|g| {
                let key = g.cherry_pick(commit)?;
                let id = id_of(g, key);
                Ok(CommandResult::created(vec![id.clone()], format!("[{}] {}", actor_label(g), id)))
            }),
            Command::Gc => self.mutate(|g| {
                let removed = g.run_garbage_collection();
                Ok(CommandResult::success(format!("Removed {} lost commit(s)", removed.len())))
            }),
        }
    }
}

fn id_of(graph: &GitGraph, key: CommitKey) -> String {
    graph.commit(key).map(|c| c.id().to_string()).unwrap_or_else(|| key.to_string())
}

/// `master`, or `HEAD` when detached
fn actor_label(graph: &GitGraph) -> String {
    match graph.head().ok().and_then(|h| h.target()) {
        Some(branch) => branch.to_string(),
        None => "detached HEAD".to_string(),
    }
}
