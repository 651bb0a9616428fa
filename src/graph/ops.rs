//! Graph operations: the Git semantics on top of [`GraphStore`].
//!
//! Every public operation validates its preconditions first and only then
//! mutates the store, so a returned error leaves the graph untouched.
//! Operations that can orphan commits finish with a reachability sweep.

use std::collections::HashSet;

use crate::graph::colors::ColorAllocator;
use crate::graph::commit::{Commit, CommitBuilder};
use crate::graph::config::GraphConfig;
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::events::GraphEvent;
use crate::graph::layout;
use crate::graph::reachability;
use crate::graph::refs::{Branch, Head, RefId, Tag};
use crate::graph::store::GraphStore;
use crate::graph::types::{validate_commit_id, BranchName, Color, CommitKey, Swimlane, TagName};

/// Optional inputs for [`GitGraph::add_commit_with`].
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    merged_parent: Option<CommitKey>,
    id: Option<String>,
    id_suffix: Option<String>,
    color: Option<Color>,
}

impl CommitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// make this a merge commit with the given second parent
    pub fn merged_parent(mut self, parent: CommitKey) -> Self {
        self.merged_parent = Some(parent);
        self
    }

    /// use an explicit id instead of the acting reference's counter
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// appended to the (explicit or generated) id
    pub fn id_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.id_suffix = Some(suffix.into());
        self
    }

    /// override the color inherited from the acting reference
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// What `checkout` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    Branch(BranchName),
    Detached(CommitKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    FastForward { to: CommitKey },
    MergeCommit { commit: CommitKey },
}

impl MergeOutcome {
    pub fn created_commit(&self) -> Option<CommitKey> {
        match self {
            MergeOutcome::MergeCommit { commit } => Some(*commit),
            MergeOutcome::FastForward { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseOutcome {
    FastForward { to: CommitKey },
    /// the replayed copies, oldest first
    Rebased { replayed: Vec<CommitKey> },
}

impl RebaseOutcome {
    pub fn replayed(&self) -> &[CommitKey] {
        match self {
            RebaseOutcome::Rebased { replayed } => replayed,
            RebaseOutcome::FastForward { .. } => &[],
        }
    }
}

/// The reference new commits are added to: the checked-out branch, or HEAD
/// itself when detached.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Actor {
    Head,
    Branch(BranchName),
}

/// A simulated Git history.
#[derive(Debug, Clone)]
pub struct GitGraph {
    config: GraphConfig,
    store: GraphStore,
    colors: ColorAllocator,
    lost_visible: bool,
    events: Vec<GraphEvent>,
}

impl Default for GitGraph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl GitGraph {
    /// root commit id of every graph
    pub const ROOT_ID: &'static str = "m1";

    /// Create an empty, uninitialized graph.
    pub fn new(config: GraphConfig) -> Self {
        let colors = ColorAllocator::new(&config.palette);
        Self {
            config,
            store: GraphStore::new(),
            colors,
            lost_visible: true,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn is_initialized(&self) -> bool {
        self.store.head().is_some()
    }

    pub fn head(&self) -> GraphResult<&Head> {
        self.store.head().ok_or(GraphError::NotInitialized)
    }

    /// drain the change events recorded since the last call
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- initialization ----

    /// Create the root commit and the default branch, and attach HEAD to it.
    pub fn init_graph(&mut self) -> GraphResult<CommitKey> {
        if self.is_initialized() {
            return Err(GraphError::AlreadyInitialized);
        }

        log::info!("initializing a new git graph");
        let lane = self.store.allocate_swimlane();
        let color = self.colors.next_color();
        let sequence = self.store.allocate_sequence();
        let root = self.store.add_commit(
            CommitBuilder::new(Self::ROOT_ID, color.clone())
                .sequence(sequence)
                .swimlane(lane),
        );

        let name = BranchName::default_branch();
        let counter = self.next_counter_for(name.initial());
        let mut master = Branch::new(name.clone(), root, lane, counter, color);
        master.checked_out = true;
        self.store.add_branch(master);
        self.store.set_head(Head::attached(
            root,
            name.clone(),
            Color::new(self.config.head_color.clone()),
        ));

        self.events.push(GraphEvent::Initialized { root });
        self.events.push(GraphEvent::RefAdded {
            reference: RefId::Branch(name.clone()),
            commit: root,
        });
        self.events.push(GraphEvent::HeadChanged {
            target: Some(name.to_string()),
            commit: root,
        });
        Ok(root)
    }

    // ---- commits ----

    /// Add a commit on top of the acting reference with a generated id.
    pub fn add_commit(&mut self) -> GraphResult<CommitKey> {
        self.add_commit_with(CommitOptions::default())
    }

    /// Add a commit on top of the acting reference.
    ///
    /// The acting reference (checked-out branch, or detached HEAD) moves to
    /// the new commit. Does not run the reachability sweep: extending a tip
    /// cannot orphan anything.
    ///
    /// An explicit id already used by a reachable commit gets the last
    /// character of its suffix (or `'`) appended until it is free.
    pub fn add_commit_with(&mut self, options: CommitOptions) -> GraphResult<CommitKey> {
        self.actor()?;
        if let Some(id) = &options.id {
            let full = format!("{}{}", id, options.id_suffix.as_deref().unwrap_or(""));
            validate_commit_id(&full).map_err(|e| GraphError::invalid_commit_id(&full, e))?;
        }
        if let Some(suffix) = options.id_suffix.as_deref().filter(|s| !s.is_empty()) {
            validate_commit_id(suffix).map_err(|e| GraphError::invalid_commit_id(suffix, e))?;
        }
        self.create_commit(options)
    }

    /// Commit creation shared by commit, merge and cherry-pick. Ids built
    /// from existing ids are not validated again, so merge ids may grow
    /// past the limit for caller-supplied ids.
    fn create_commit(&mut self, options: CommitOptions) -> GraphResult<CommitKey> {
        let actor = self.actor()?;

        if let Some(merged) = options.merged_parent {
            if self.store.commit(merged).is_none() {
                return Err(GraphError::CommitNotFound(merged.to_string()));
            }
        }

        if actor == Actor::Head {
            let needs_lane = self.head()?.swimlane.is_none();
            if needs_lane {
                let lane = self.store.allocate_swimlane();
                if let Some(head) = self.store.head_mut() {
                    head.swimlane = Some(lane);
                }
            }
        }

        let (lane, inherited_color) = self.actor_lane_and_color(&actor)?;
        let base = match options.id {
            Some(id) => id,
            None => self.generate_commit_id(&actor)?,
        };
        let suffix = options.id_suffix.unwrap_or_default();
        let mark = suffix.chars().last().unwrap_or('\'');
        let id = self.unused_commit_id(format!("{}{}", base, suffix), mark);
        let color = options.color.unwrap_or(inherited_color);

        let old_tip = self.actor_tip(&actor)?;
        let sequence = self.store.allocate_sequence();
        let key = self.store.add_commit(
            CommitBuilder::new(id.clone(), color)
                .sequence(sequence)
                .swimlane(lane)
                .parent(Some(old_tip))
                .merged_parent(options.merged_parent),
        );
        self.events.push(GraphEvent::CommitAdded { commit: key });
        log::debug!("added commit {} ({}) in lane {}", id, key, lane);

        self.move_actor(&actor, key)?;
        self.reposition(old_tip);
        Ok(key)
    }

    /// Replace the acting reference's tip with a rewritten copy.
    ///
    /// The copy gets the original's parents, color and row, the id suffix
    /// `*`, and the lane right of the original; lanes from there on shift
    /// right to make room. The original becomes lost unless something else
    /// still references it.
    pub fn amend_commit(&mut self) -> GraphResult<CommitKey> {
        let actor = self.actor()?;
        let tip = self.actor_tip(&actor)?;
        let original = self.commit_or_err(tip)?.clone();

        let id = self.unused_commit_id(format!("{}*", original.id), '*');
        let lane = original.swimlane + 1;
        layout::shift_lanes_right(&mut self.store, lane);
        self.events.push(GraphEvent::LanesShifted { from: lane });
        self.set_actor_lane(&actor, lane)?;

        let key = self.store.add_commit(
            CommitBuilder::new(id.clone(), original.color.clone())
                .sequence(original.sequence)
                .swimlane(lane)
                .parent(original.parent)
                .merged_parent(original.merged_parent),
        );
        self.events.push(GraphEvent::CommitAdded { commit: key });
        log::info!("amended commit {} into {}", original.id, id);

        self.move_actor(&actor, key)?;
        self.reposition(original.key);
        self.calculate_lost_commits();
        Ok(key)
    }

    /// Copy an existing commit onto the acting reference.
    ///
    /// The copy keeps the original id with a `'` suffix and the original's
    /// color.
    pub fn cherry_pick(&mut self, commit_id: &str) -> GraphResult<CommitKey> {
        let actor = self.actor()?;
        let current = self.actor_tip(&actor)?;
        let source = self
            .store
            .find_commit(commit_id, self.lost_visible)
            .ok_or_else(|| GraphError::CommitNotFound(commit_id.to_string()))?;

        if source.key == current || self.store.is_ancestor(source.key, current) {
            return Err(GraphError::AlreadyApplied(commit_id.to_string()));
        }

        let options = CommitOptions::new()
            .id(source.id.clone())
            .id_suffix("'")
            .color(source.color.clone());
        log::info!("cherry-picking {}", commit_id);
        self.create_commit(options)
    }

    // ---- references ----

    /// Create a branch at HEAD's commit and check it out.
    pub fn add_branch(&mut self, name: &str) -> GraphResult<Branch> {
        let head_commit = self.head()?.commit;
        let name = self.validate_new_branch(name)?;

        log::info!("adding branch {}", name);
        let lane = self.store.allocate_swimlane();
        let color = self.colors.next_color();
        let counter = self.next_counter_for(name.initial());
        self.store
            .add_branch(Branch::new(name.clone(), head_commit, lane, counter, color));
        self.events.push(GraphEvent::RefAdded {
            reference: RefId::Branch(name.clone()),
            commit: head_commit,
        });

        self.checkout_resolved(CheckoutTarget::Branch(name.clone()))?;
        self.store
            .find_branch(name.as_str())
            .cloned()
            .ok_or_else(|| GraphError::BranchNotFound(name.to_string()))
    }

    /// Tag HEAD's commit.
    pub fn add_tag(&mut self, name: &str) -> GraphResult<Tag> {
        let head_commit = self.head()?.commit;
        let tag_name = TagName::new(name).map_err(|e| GraphError::invalid_tag(name, e))?;
        if self.store.find_tag(name).is_some() {
            return Err(GraphError::TagAlreadyExists(name.to_string()));
        }

        log::info!("adding tag {}", tag_name);
        let tag = Tag::new(tag_name.clone(), head_commit);
        self.store.add_tag(tag.clone());
        self.events.push(GraphEvent::RefAdded {
            reference: RefId::Tag(tag_name),
            commit: head_commit,
        });
        self.reposition(head_commit);
        Ok(tag)
    }

    pub fn delete_branch(&mut self, name: &str) -> GraphResult<()> {
        let head = self.head()?;
        let branch = self
            .store
            .find_branch(name)
            .ok_or_else(|| GraphError::BranchNotFound(name.to_string()))?;
        if head.target.as_ref() == Some(&branch.name) {
            return Err(GraphError::CannotDeleteCheckedOutBranch(name.to_string()));
        }

        log::info!("deleting branch {}", name);
        if let Some(branch) = self.store.remove_branch(name) {
            self.events.push(GraphEvent::RefRemoved {
                reference: RefId::Branch(branch.name),
                commit: branch.commit,
            });
            self.reposition(branch.commit);
        }
        self.calculate_lost_commits();
        Ok(())
    }

    pub fn delete_tag(&mut self, name: &str) -> GraphResult<()> {
        self.head()?;
        if self.store.find_tag(name).is_none() {
            return Err(GraphError::TagNotFound(name.to_string()));
        }

        log::info!("deleting tag {}", name);
        if let Some(tag) = self.store.remove_tag(name) {
            self.events.push(GraphEvent::RefRemoved {
                reference: RefId::Tag(tag.name),
                commit: tag.commit,
            });
            self.reposition(tag.commit);
        }
        self.calculate_lost_commits();
        Ok(())
    }

    /// Check out a branch, a tag, or a commit id, in that order of precedence.
    ///
    /// Branches attach HEAD; tags and commit ids detach it. Lost commits are
    /// only found when `reveal_lost_commits` is set.
    pub fn checkout(&mut self, id: &str, reveal_lost_commits: bool) -> GraphResult<CheckoutTarget> {
        self.head()?;
        let target = if let Some(branch) = self.store.find_branch(id) {
            CheckoutTarget::Branch(branch.name.clone())
        } else if let Some(tag) = self.store.find_tag(id) {
            CheckoutTarget::Detached(tag.commit)
        } else if let Some(commit) = self.store.find_commit(id, reveal_lost_commits) {
            CheckoutTarget::Detached(commit.key)
        } else {
            log::warn!("nothing to check out for {}", id);
            return Err(GraphError::RefNotFound(id.to_string()));
        };

        log::info!("checking out {}", id);
        self.checkout_resolved(target.clone())?;
        Ok(target)
    }

    /// Merge a branch into the acting reference.
    ///
    /// Fast-forwards when possible unless `no_fast_forward` is set; otherwise
    /// creates a merge commit whose id is both tip ids concatenated.
    pub fn merge(&mut self, no_fast_forward: bool, target_branch: &str) -> GraphResult<MergeOutcome> {
        let actor = self.actor()?;
        let current = self.actor_tip(&actor)?;
        let target = self
            .store
            .find_branch(target_branch)
            .ok_or_else(|| GraphError::BranchNotFound(target_branch.to_string()))?
            .commit;

        if target == current || self.store.is_ancestor(target, current) {
            return Err(GraphError::NothingToMerge {
                current: self.actor_name(&actor),
                target: target_branch.to_string(),
            });
        }

        if no_fast_forward || !self.store.is_ancestor(current, target) {
            let id = format!("{}{}", self.commit_or_err(current)?.id, self.commit_or_err(target)?.id);
            log::info!("merging {} into {} with merge commit {}", target_branch, self.actor_name(&actor), id);
            let commit = self.create_commit(CommitOptions::new().merged_parent(target).id(id))?;
            self.calculate_lost_commits();
            Ok(MergeOutcome::MergeCommit { commit })
        } else {
            log::info!("fast-forwarding {} to {}", self.actor_name(&actor), target_branch);
            self.move_actor(&actor, target)?;
            self.reposition(current);
            self.calculate_lost_commits();
            Ok(MergeOutcome::FastForward { to: target })
        }
    }

    /// Replay the acting reference's own commits on top of a branch.
    ///
    /// Only first parents are followed, so replay is linear: merge commits
    /// are copied as ordinary commits. Copies get the suffix `*` and keep
    /// their original colors. The target's lane and everything right of it
    /// shift right; the rebased lineage takes over the target's old lane.
    pub fn rebase(&mut self, target_branch: &str) -> GraphResult<RebaseOutcome> {
        let actor = self.actor()?;
        let current = self.actor_tip(&actor)?;
        let (target, target_lane) = {
            let branch = self
                .store
                .find_branch(target_branch)
                .ok_or_else(|| GraphError::BranchNotFound(target_branch.to_string()))?;
            (branch.commit, branch.swimlane)
        };

        if target == current || self.store.is_ancestor(target, current) {
            return Err(GraphError::NothingToRebase {
                current: self.actor_name(&actor),
                target: target_branch.to_string(),
            });
        }

        if self.store.is_ancestor(current, target) {
            log::info!("fast-forwarding {} to {}", self.actor_name(&actor), target_branch);
            self.move_actor(&actor, target)?;
            self.reposition(current);
            self.calculate_lost_commits();
            return Ok(RebaseOutcome::FastForward { to: target });
        }

        let plan = self.replay_plan(current, target);
        log::info!(
            "rebasing {} commit(s) of {} onto {}",
            plan.len(),
            self.actor_name(&actor),
            target_branch
        );

        layout::shift_lanes_right(&mut self.store, target_lane);
        self.events.push(GraphEvent::LanesShifted { from: target_lane });
        self.set_actor_lane(&actor, target_lane)?;

        let mut parent = target;
        let mut replayed = Vec::with_capacity(plan.len());
        for (id, color) in plan {
            let id = self.unused_commit_id(format!("{}*", id), '*');
            let sequence = self.store.allocate_sequence();
            let key = self.store.add_commit(
                CommitBuilder::new(id, color)
                    .sequence(sequence)
                    .swimlane(target_lane)
                    .parent(Some(parent)),
            );
            self.events.push(GraphEvent::CommitAdded { commit: key });
            replayed.push(key);
            parent = key;
        }

        self.move_actor(&actor, parent)?;
        self.reposition(current);
        self.reposition(target);
        self.calculate_lost_commits();
        Ok(RebaseOutcome::Rebased { replayed })
    }

    // ---- reachability ----

    /// Flag every commit unreachable from branches, tags and HEAD as lost.
    pub fn calculate_lost_commits(&mut self) -> Vec<CommitKey> {
        let before = self.store.lost_commits();
        let lost = reachability::mark_lost_commits(&mut self.store);
        if lost != before {
            self.events.push(GraphEvent::LostCommitsChanged { lost: lost.clone() });
        }
        lost
    }

    /// Permanently delete all lost commits. Returns what was deleted.
    pub fn run_garbage_collection(&mut self) -> Vec<CommitKey> {
        self.calculate_lost_commits();
        let removed = reachability::collect_lost_commits(&mut self.store);
        if removed.is_empty() {
            return removed;
        }

        log::info!("garbage collection removed {} commit(s)", removed.len());
        self.events.push(GraphEvent::CommitsCollected { removed: removed.clone() });
        if self.config.compact_lanes_after_gc {
            let lanes = layout::compact_lanes(&mut self.store);
            if !lanes.is_empty() {
                self.events.push(GraphEvent::LanesCompacted { removed: lanes });
            }
        }
        removed
    }

    /// Toggle whether lost commits are shown (and resolvable by id).
    pub fn show_lost_commits(&mut self, visible: bool) {
        if self.lost_visible != visible {
            self.lost_visible = visible;
            self.events.push(GraphEvent::LostVisibilityChanged { visible });
        }
    }

    pub fn lost_commits_visible(&self) -> bool {
        self.lost_visible
    }

    // ---- queries ----

    pub fn branches(&self) -> &[Branch] {
        self.store.branches()
    }

    pub fn tags(&self) -> &[Tag] {
        self.store.tags()
    }

    pub fn commit(&self, key: CommitKey) -> Option<&Commit> {
        self.store.commit(key)
    }

    pub fn does_commit_exist(&self, id: &str) -> bool {
        self.store.find_commit(id, self.lost_visible).is_some()
    }

    pub fn does_tag_exist(&self, name: &str) -> bool {
        self.store.find_tag(name).is_some()
    }

    pub fn is_branch_checked_out(&self, name: &str) -> bool {
        self.store
            .head()
            .and_then(|h| h.target.as_ref())
            .is_some_and(|target| target == name)
    }

    pub fn is_branch_name_valid(&self, name: &str) -> bool {
        self.validate_new_branch(name).is_ok()
    }

    /// Resolve a branch name, tag name or commit id to a commit.
    pub fn find_commit_for(&self, id: &str) -> Option<&Commit> {
        if let Some(branch) = self.store.find_branch(id) {
            return self.store.commit(branch.commit);
        }
        if let Some(tag) = self.store.find_tag(id) {
            return self.store.commit(tag.commit);
        }
        self.store.find_commit(id, self.lost_visible)
    }

    /// The commit HEAD currently points at.
    pub fn head_commit(&self) -> Option<&Commit> {
        self.store.head().and_then(|h| self.store.commit(h.commit))
    }

    // ---- internals ----

    fn validate_new_branch(&self, name: &str) -> GraphResult<BranchName> {
        let branch = BranchName::new(name).map_err(|e| GraphError::invalid_branch(name, e))?;
        if self.store.find_branch(name).is_some() {
            return Err(GraphError::invalid_branch(name, "a branch with this name already exists"));
        }
        let initial = branch.initial();
        if initial == Head::INITIAL {
            return Err(GraphError::invalid_branch(
                name,
                format!("first letter '{}' is reserved for HEAD", initial),
            ));
        }
        if let Some(other) = self.store.branches().iter().find(|b| b.name.initial() == initial) {
            return Err(GraphError::invalid_branch(
                name,
                format!("first letter '{}' is already used by branch '{}'", initial, other.name),
            ));
        }
        Ok(branch)
    }

    /// One past the largest numeric suffix among live commit ids of the form
    /// `<initial><digits>`.
    fn next_counter_for(&self, initial: char) -> u32 {
        self.store
            .commits()
            .filter(|c| !c.lost)
            .filter_map(|c| c.id.strip_prefix(initial))
            .filter_map(|digits| digits.parse::<u32>().ok())
            .max()
            .map_or(1, |n| n + 1)
    }

    fn generate_commit_id(&mut self, actor: &Actor) -> GraphResult<String> {
        let initial = match actor {
            Actor::Head => Head::INITIAL,
            Actor::Branch(name) => name.initial(),
        };
        loop {
            let counter = match actor {
                Actor::Head => {
                    let head = self.store.head_mut().ok_or(GraphError::NotInitialized)?;
                    head.counter += 1;
                    head.counter - 1
                }
                Actor::Branch(name) => {
                    let branch = self
                        .store
                        .find_branch_mut(name.as_str())
                        .ok_or_else(|| GraphError::BranchNotFound(name.to_string()))?;
                    branch.counter += 1;
                    branch.counter - 1
                }
            };
            let id = format!("{}{}", initial, counter);
            if self.store.find_commit(&id, false).is_none() {
                return Ok(id);
            }
        }
    }

    /// `id`, with `mark` appended until no reachable commit uses it.
    fn unused_commit_id(&self, mut id: String, mark: char) -> String {
        while self.store.find_commit(&id, false).is_some() {
            id.push(mark);
        }
        id
    }

    fn actor(&self) -> GraphResult<Actor> {
        let head = self.head()?;
        Ok(match &head.target {
            Some(name) => Actor::Branch(name.clone()),
            None => Actor::Head,
        })
    }

    fn actor_name(&self, actor: &Actor) -> String {
        match actor {
            Actor::Head => RefId::Head.name().to_string(),
            Actor::Branch(name) => name.to_string(),
        }
    }

    fn actor_tip(&self, actor: &Actor) -> GraphResult<CommitKey> {
        match actor {
            Actor::Head => Ok(self.head()?.commit),
            Actor::Branch(name) => self
                .store
                .find_branch(name.as_str())
                .map(|b| b.commit)
                .ok_or_else(|| GraphError::BranchNotFound(name.to_string())),
        }
    }

    fn actor_lane_and_color(&self, actor: &Actor) -> GraphResult<(Swimlane, Color)> {
        match actor {
            Actor::Head => {
                let head = self.head()?;
                Ok((head.swimlane.unwrap_or_default(), head.color.clone()))
            }
            Actor::Branch(name) => self
                .store
                .find_branch(name.as_str())
                .map(|b| (b.swimlane, b.color.clone()))
                .ok_or_else(|| GraphError::BranchNotFound(name.to_string())),
        }
    }

    fn set_actor_lane(&mut self, actor: &Actor, lane: Swimlane) -> GraphResult<()> {
        match actor {
            Actor::Head => {
                let head = self.store.head_mut().ok_or(GraphError::NotInitialized)?;
                head.swimlane = Some(lane);
            }
            Actor::Branch(name) => {
                let branch = self
                    .store
                    .find_branch_mut(name.as_str())
                    .ok_or_else(|| GraphError::BranchNotFound(name.to_string()))?;
                branch.swimlane = lane;
            }
        }
        Ok(())
    }

    /// Point the acting reference at `to`. An attached HEAD follows its
    /// branch.
    fn move_actor(&mut self, actor: &Actor, to: CommitKey) -> GraphResult<()> {
        let (reference, from) = match actor {
            Actor::Head => {
                let head = self.store.head_mut().ok_or(GraphError::NotInitialized)?;
                let from = head.commit;
                head.commit = to;
                (RefId::Head, from)
            }
            Actor::Branch(name) => {
                let branch = self
                    .store
                    .find_branch_mut(name.as_str())
                    .ok_or_else(|| GraphError::BranchNotFound(name.to_string()))?;
                let from = branch.commit;
                branch.commit = to;
                if let Some(head) = self.store.head_mut() {
                    head.commit = to;
                }
                (RefId::Branch(name.clone()), from)
            }
        };
        self.store.detach_ref(from, &reference);
        self.store.attach_ref(to, reference.clone());
        self.events.push(GraphEvent::RefMoved { reference, from, to });
        Ok(())
    }

    fn checkout_resolved(&mut self, target: CheckoutTarget) -> GraphResult<()> {
        let (old_commit, old_target) = {
            let head = self.head()?;
            (head.commit, head.target.clone())
        };

        if let Some(old) = &old_target {
            if let Some(branch) = self.store.find_branch_mut(old.as_str()) {
                branch.checked_out = false;
            }
        } else {
            self.store.detach_ref(old_commit, &RefId::Head);
        }

        let (new_target, new_commit) = match target {
            CheckoutTarget::Branch(name) => {
                let branch = self
                    .store
                    .find_branch_mut(name.as_str())
                    .ok_or_else(|| GraphError::BranchNotFound(name.to_string()))?;
                branch.checked_out = true;
                (Some(name), branch.commit)
            }
            CheckoutTarget::Detached(key) => {
                self.store.attach_ref(key, RefId::Head);
                (None, key)
            }
        };

        if let Some(head) = self.store.head_mut() {
            // a fresh lane is allocated on the first detached commit
            head.swimlane = None;
            head.target = new_target.clone();
            head.commit = new_commit;
        }
        self.events.push(GraphEvent::HeadChanged {
            target: new_target.map(|n| n.to_string()),
            commit: new_commit,
        });

        self.reposition(old_commit);
        self.calculate_lost_commits();
        Ok(())
    }

    /// Ids and colors of the commits to replay, oldest first: the first-parent
    /// history of `current` down to (excluding) the first commit on the
    /// first-parent history of `onto`.
    fn replay_plan(&self, current: CommitKey, onto: CommitKey) -> Vec<(String, Color)> {
        let onto_history: HashSet<CommitKey> = self.store.first_parent_chain(onto).into_iter().collect();
        let mut plan: Vec<(String, Color)> = self
            .store
            .first_parent_chain(current)
            .into_iter()
            .take_while(|key| !onto_history.contains(key))
            .filter_map(|key| self.store.commit(key))
            .map(|c| (c.id.clone(), c.color.clone()))
            .collect();
        plan.reverse();
        plan
    }

    fn commit_or_err(&self, key: CommitKey) -> GraphResult<&Commit> {
        self.store
            .commit(key)
            .ok_or_else(|| GraphError::CommitNotFound(key.to_string()))
    }

    fn reposition(&mut self, key: CommitKey) {
        if self.store.commit(key).is_some() {
            self.events.push(GraphEvent::LabelsRepositioned { commit: key });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> GitGraph {
        let mut graph = GitGraph::default();
        graph.init_graph().unwrap();
        graph
    }

    fn id_of(graph: &GitGraph, key: CommitKey) -> String {
        graph.commit(key).unwrap().id().to_string()
    }

    fn tip(graph: &GitGraph, branch: &str) -> CommitKey {
        graph.store().find_branch(branch).unwrap().tip()
    }

    #[test]
    fn test_init_graph() {
        let graph = graph();
        let head = graph.head().unwrap();
        assert!(!head.is_detached());
        assert_eq!(head.target().unwrap().as_str(), "master");
        assert_eq!(graph.head_commit().unwrap().id(), "m1");
        assert!(graph.is_branch_checked_out("master"));
        assert_eq!(graph.branches().len(), 1);
        assert_eq!(graph.branches()[0].counter(), 2);
    }

    #[test]
    fn test_init_twice_fails() {
        let mut graph = graph();
        assert_eq!(graph.init_graph(), Err(GraphError::AlreadyInitialized));
        assert_eq!(graph.store().commit_count(), 1);
    }

    #[test]
    fn test_operations_require_init() {
        let mut graph = GitGraph::default();
        assert_eq!(graph.add_commit(), Err(GraphError::NotInitialized));
        assert_eq!(graph.checkout("m1", true), Err(GraphError::NotInitialized));
        assert!(matches!(graph.add_branch("feature"), Err(GraphError::NotInitialized)));
        assert!(graph.run_garbage_collection().is_empty());
    }

    #[test]
    fn test_add_commit_ids_and_lanes() {
        let mut graph = graph();
        let m2 = graph.add_commit().unwrap();
        let m3 = graph.add_commit().unwrap();
        assert_eq!(id_of(&graph, m2), "m2");
        assert_eq!(id_of(&graph, m3), "m3");

        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();
        let commit = graph.commit(f1).unwrap();
        assert_eq!(commit.id(), "f1");
        assert_eq!(commit.swimlane(), 1);
        assert_eq!(commit.parent(), Some(m3));
        assert_eq!(commit.sequence(), 3);
        assert_eq!(commit.color(), graph.store().find_branch("feature").unwrap().color());
        assert_eq!(graph.commit(m3).unwrap().child(), Some(f1));
        assert_eq!(tip(&graph, "feature"), f1);
        assert_eq!(tip(&graph, "master"), m3);
        assert_eq!(graph.head().unwrap().commit(), f1);
    }

    #[test]
    fn test_add_commit_with_options() {
        let mut graph = graph();
        let key = graph
            .add_commit_with(CommitOptions::new().id("x").id_suffix("'").color(Color::new("#000")))
            .unwrap();
        let commit = graph.commit(key).unwrap();
        assert_eq!(commit.id(), "x'");
        assert_eq!(commit.color().as_str(), "#000");

        let err = graph.add_commit_with(CommitOptions::new().id("a b")).unwrap_err();
        assert!(matches!(err, GraphError::InvalidCommitId { .. }));
        let err = graph
            .add_commit_with(CommitOptions::new().merged_parent(CommitKey::new(99)))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(graph.store().commit_count(), 2);
    }

    #[test]
    fn test_generated_id_skips_taken_ids() {
        let mut graph = graph();
        graph.add_commit_with(CommitOptions::new().id("m2")).unwrap();
        let key = graph.add_commit().unwrap();
        assert_eq!(id_of(&graph, key), "m3");
    }

    #[test]
    fn test_branch_name_rules() {
        let mut graph = graph();
        graph.add_branch("bugfix").unwrap();

        let duplicate = graph.add_branch("bugfix").unwrap_err();
        assert!(matches!(duplicate, GraphError::InvalidBranchName { .. }));
        assert!(!graph.is_branch_name_valid("main"));
        assert!(!graph.is_branch_name_valid("Hotfix"));
        assert!(!graph.is_branch_name_valid("has space"));
        assert!(!graph.is_branch_name_valid("HEAD"));
        assert!(graph.is_branch_name_valid("hotfix"));
        assert!(graph.is_branch_name_valid("feature"));
        assert_eq!(graph.branches().len(), 2);
    }

    #[test]
    fn test_add_branch_checks_it_out() {
        let mut graph = graph();
        let branch = graph.add_branch("feature").unwrap();
        assert!(branch.is_checked_out());
        assert_eq!(branch.swimlane(), 1);
        assert!(graph.is_branch_checked_out("feature"));
        assert!(!graph.is_branch_checked_out("master"));
        assert!(!graph.store().find_branch("master").unwrap().is_checked_out());
    }

    #[test]
    fn test_checkout_commit_detaches_head() {
        let mut graph = graph();
        graph.add_commit().unwrap();
        let target = graph.checkout("m1", true).unwrap();
        let root = graph.find_commit_for("m1").unwrap().key();
        assert_eq!(target, CheckoutTarget::Detached(root));

        let head = graph.head().unwrap();
        assert!(head.is_detached());
        assert_eq!(head.swimlane(), None);
        assert!(graph.commit(root).unwrap().refs().contains(&RefId::Head));
        assert!(!graph.is_branch_checked_out("master"));

        let h1 = graph.add_commit().unwrap();
        let commit = graph.commit(h1).unwrap();
        assert_eq!(commit.id(), "H1");
        assert_eq!(commit.swimlane(), 1);
        assert_eq!(commit.color().as_str(), GraphConfig::DEFAULT_HEAD_COLOR);
        assert!(!graph.commit(root).unwrap().refs().contains(&RefId::Head));
        assert!(graph.commit(h1).unwrap().refs().contains(&RefId::Head));
    }

    #[test]
    fn test_checkout_unknown_ref_changes_nothing() {
        let mut graph = graph();
        graph.take_events();
        let before = graph.head().unwrap().clone();
        assert_eq!(graph.checkout("nope", true), Err(GraphError::RefNotFound("nope".into())));
        assert_eq!(graph.head().unwrap(), &before);
        assert!(graph.take_events().is_empty());
    }

    #[test]
    fn test_checkout_tag_detaches_on_its_commit() {
        let mut graph = graph();
        graph.add_tag("v1").unwrap();
        graph.add_commit().unwrap();
        let target = graph.checkout("v1", true).unwrap();
        let root = graph.find_commit_for("m1").unwrap().key();
        assert_eq!(target, CheckoutTarget::Detached(root));
    }

    #[test]
    fn test_detached_commit_is_lost_and_collected() {
        let mut graph = graph();
        graph.checkout("m1", true).unwrap();
        let h1 = graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();

        assert_eq!(graph.calculate_lost_commits(), vec![h1]);
        assert!(graph.commit(h1).unwrap().is_lost());
        assert!(graph.does_commit_exist("H1"));

        assert_eq!(graph.run_garbage_collection(), vec![h1]);
        assert!(graph.commit(h1).is_none());
        assert!(!graph.does_commit_exist("H1"));
        assert_eq!(graph.store().commit_count(), 1);
    }

    #[test]
    fn test_lost_commits_hidden_from_lookup() {
        let mut graph = graph();
        graph.checkout("m1", true).unwrap();
        graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();

        graph.show_lost_commits(false);
        assert!(!graph.does_commit_exist("H1"));
        assert!(graph.find_commit_for("H1").is_none());
        assert_eq!(graph.checkout("H1", false), Err(GraphError::RefNotFound("H1".into())));
        assert!(graph.checkout("H1", true).is_ok());
        // checked out again, so no longer lost
        assert!(graph.store().lost_commits().is_empty());
    }

    #[test]
    fn test_merge_creates_merge_commit_when_diverged() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        let m2 = graph.add_commit().unwrap();

        let outcome = graph.merge(false, "feature").unwrap();
        let merge = outcome.created_commit().unwrap();
        let commit = graph.commit(merge).unwrap();
        assert_eq!(commit.id(), "m2f1");
        assert_eq!(commit.parent(), Some(m2));
        assert_eq!(commit.merged_parent(), Some(f1));
        assert_eq!(commit.swimlane(), 0);
        assert_eq!(tip(&graph, "master"), merge);
        assert_eq!(tip(&graph, "feature"), f1);
    }

    #[test]
    fn test_merge_fast_forward() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();
        let f2 = graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        let count = graph.store().commit_count();

        let outcome = graph.merge(false, "feature").unwrap();
        assert_eq!(outcome, MergeOutcome::FastForward { to: f2 });
        assert_eq!(graph.store().commit_count(), count);
        assert_eq!(tip(&graph, "master"), f2);
        assert_eq!(graph.head().unwrap().commit(), f2);
        assert!(graph.is_branch_checked_out("master"));
    }

    #[test]
    fn test_merge_no_fast_forward() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();
        let f2 = graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        let root = tip(&graph, "master");

        let merge = graph.merge(true, "feature").unwrap().created_commit().unwrap();
        let commit = graph.commit(merge).unwrap();
        assert_eq!(commit.parent(), Some(root));
        assert_eq!(commit.merged_parent(), Some(f2));
        assert_eq!(commit.id(), "m1f2");
    }

    #[test]
    fn test_merge_nothing_to_merge_is_idempotent() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        graph.add_commit().unwrap();

        graph.merge(false, "feature").unwrap();
        let count = graph.store().commit_count();
        let err = graph.merge(false, "feature").unwrap_err();
        assert!(matches!(err, GraphError::NothingToMerge { .. }));
        assert_eq!(graph.store().commit_count(), count);

        assert!(matches!(graph.merge(false, "master"), Err(GraphError::NothingToMerge { .. })));
        assert_eq!(graph.merge(false, "nope"), Err(GraphError::BranchNotFound("nope".into())));
    }

    #[test]
    fn test_rebase_fast_forward() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.checkout("master", true).unwrap();
        let m2 = graph.add_commit().unwrap();
        graph.checkout("feature", true).unwrap();
        let count = graph.store().commit_count();

        let outcome = graph.rebase("master").unwrap();
        assert_eq!(outcome, RebaseOutcome::FastForward { to: m2 });
        assert!(outcome.replayed().is_empty());
        assert_eq!(graph.store().commit_count(), count);
        assert_eq!(tip(&graph, "feature"), m2);
    }

    #[test]
    fn test_rebase_replays_commits() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();
        let f2 = graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        let m2 = graph.add_commit().unwrap();
        graph.checkout("feature", true).unwrap();

        let outcome = graph.rebase("master").unwrap();
        let replayed = outcome.replayed().to_vec();
        assert_eq!(replayed.len(), 2);

        let first = graph.commit(replayed[0]).unwrap();
        assert_eq!(first.id(), "f1*");
        assert_eq!(first.parent(), Some(m2));
        assert_eq!(first.swimlane(), 0);
        assert_eq!(first.color(), graph.commit(f1).unwrap().color());
        let second = graph.commit(replayed[1]).unwrap();
        assert_eq!(second.id(), "f2*");
        assert_eq!(second.parent(), Some(replayed[0]));

        // master made room: its lane moved right
        assert_eq!(graph.store().find_branch("master").unwrap().swimlane(), 1);
        assert_eq!(graph.commit(m2).unwrap().swimlane(), 1);
        assert_eq!(graph.store().find_branch("feature").unwrap().swimlane(), 0);

        assert_eq!(tip(&graph, "feature"), replayed[1]);
        assert_eq!(graph.head().unwrap().commit(), replayed[1]);
        assert_eq!(graph.store().lost_commits(), vec![f1, f2]);
    }

    #[test]
    fn test_rebase_nothing_to_rebase() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();
        let err = graph.rebase("master").unwrap_err();
        assert!(matches!(err, GraphError::NothingToRebase { .. }));
    }

    #[test]
    fn test_amend_commit() {
        let mut graph = graph();
        let m2 = graph.add_commit().unwrap();
        let root = graph.commit(m2).unwrap().parent();

        let amended = graph.amend_commit().unwrap();
        let commit = graph.commit(amended).unwrap();
        assert_eq!(commit.id(), "m2*");
        assert_eq!(commit.parent(), root);
        assert_eq!(commit.sequence(), graph.commit(m2).unwrap().sequence());
        assert_eq!(commit.swimlane(), 1);
        assert_eq!(tip(&graph, "master"), amended);
        assert_eq!(graph.store().find_branch("master").unwrap().swimlane(), 1);
        assert!(graph.commit(m2).unwrap().is_lost());
    }

    #[test]
    fn test_amend_keeps_original_when_tagged() {
        let mut graph = graph();
        let m2 = graph.add_commit().unwrap();
        graph.add_tag("v1").unwrap();
        graph.amend_commit().unwrap();
        assert!(!graph.commit(m2).unwrap().is_lost());
    }

    #[test]
    fn test_amend_shifts_lanes_to_the_right() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        graph.add_commit().unwrap();

        let amended = graph.amend_commit().unwrap();
        assert_eq!(graph.commit(amended).unwrap().swimlane(), 1);
        assert_eq!(graph.commit(f1).unwrap().swimlane(), 2);
        assert_eq!(graph.store().find_branch("feature").unwrap().swimlane(), 2);
    }

    #[test]
    fn test_delete_branch() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();

        assert_eq!(
            graph.delete_branch("feature"),
            Err(GraphError::CannotDeleteCheckedOutBranch("feature".into()))
        );
        graph.checkout("master", true).unwrap();
        graph.delete_branch("feature").unwrap();
        assert!(graph.store().find_branch("feature").is_none());
        assert!(graph.commit(f1).unwrap().is_lost());
        assert!(graph.commit(f1).unwrap().refs().is_empty());
        assert_eq!(graph.delete_branch("feature"), Err(GraphError::BranchNotFound("feature".into())));
    }

    #[test]
    fn test_tags() {
        let mut graph = graph();
        let tag = graph.add_tag("v1").unwrap();
        assert_eq!(tag.target(), graph.head().unwrap().commit());
        assert!(graph.does_tag_exist("v1"));
        assert_eq!(graph.add_tag("v1"), Err(GraphError::TagAlreadyExists("v1".into())));
        assert!(matches!(graph.add_tag("bad tag"), Err(GraphError::InvalidTagName { .. })));

        graph.delete_tag("v1").unwrap();
        assert!(!graph.does_tag_exist("v1"));
        assert_eq!(graph.delete_tag("v1"), Err(GraphError::TagNotFound("v1".into())));
    }

    #[test]
    fn test_tag_keeps_deleted_branch_history() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();
        graph.add_tag("keep").unwrap();
        graph.checkout("master", true).unwrap();
        graph.delete_branch("feature").unwrap();
        assert!(!graph.commit(f1).unwrap().is_lost());
        assert!(graph.run_garbage_collection().is_empty());
    }

    #[test]
    fn test_cherry_pick() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        graph.add_commit().unwrap();

        let copy = graph.cherry_pick("f1").unwrap();
        let commit = graph.commit(copy).unwrap();
        assert_eq!(commit.id(), "f1'");
        assert_eq!(commit.color(), graph.commit(f1).unwrap().color());
        assert_eq!(commit.swimlane(), 0);
        assert!(!commit.is_merge());

        assert_eq!(graph.cherry_pick("m1"), Err(GraphError::AlreadyApplied("m1".into())));
        assert_eq!(graph.cherry_pick("zz"), Err(GraphError::CommitNotFound("zz".into())));
    }

    #[test]
    fn test_repeated_cherry_pick_gets_fresh_id() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();

        let first = graph.cherry_pick("f1").unwrap();
        let second = graph.cherry_pick("f1").unwrap();
        assert_eq!(id_of(&graph, first), "f1'");
        assert_eq!(id_of(&graph, second), "f1''");
        assert_eq!(graph.find_commit_for("f1''").unwrap().key(), second);
    }

    #[test]
    fn test_detached_merge_does_not_reuse_reachable_id() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        graph.add_commit().unwrap();
        let on_master = graph.merge(false, "feature").unwrap().created_commit().unwrap();

        graph.checkout("m2", true).unwrap();
        let detached = graph.merge(false, "feature").unwrap().created_commit().unwrap();
        assert_eq!(id_of(&graph, on_master), "m2f1");
        assert_eq!(id_of(&graph, detached), "m2f1'");
        assert!(!graph.commit(on_master).unwrap().is_lost());
        assert_eq!(graph.find_commit_for("m2f1").unwrap().key(), on_master);
    }

    #[test]
    fn test_second_amend_of_tagged_commit_gets_fresh_id() {
        let mut graph = graph();
        graph.add_commit().unwrap();
        graph.add_tag("v1").unwrap();
        let first = graph.amend_commit().unwrap();

        graph.checkout("v1", true).unwrap();
        let second = graph.amend_commit().unwrap();
        assert_eq!(id_of(&graph, first), "m2*");
        assert_eq!(id_of(&graph, second), "m2**");
        assert_eq!(tip(&graph, "master"), first);
    }

    #[test]
    fn test_alternating_merges_grow_ids_without_limit() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();

        let (mut current, mut other) = ("master", "feature");
        let mut last = None;
        for _ in 0..12 {
            graph.checkout(current, true).unwrap();
            let outcome = graph.merge(true, other).unwrap();
            last = outcome.created_commit();
            std::mem::swap(&mut current, &mut other);
        }
        assert_eq!(graph.store().commit_count(), 14);
        assert!(id_of(&graph, last.unwrap()).len() > 128);
    }

    #[test]
    fn test_caller_supplied_id_length_is_limited() {
        let mut graph = graph();
        let err = graph.add_commit_with(CommitOptions::new().id("x".repeat(200))).unwrap_err();
        assert!(matches!(err, GraphError::InvalidCommitId { .. }));
        assert_eq!(graph.store().commit_count(), 1);
    }

    #[test]
    fn test_counter_continues_after_branch_letter_reuse() {
        let mut graph = graph();
        graph.add_branch("feature").unwrap();
        graph.add_commit().unwrap();
        graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        graph.merge(true, "feature").unwrap();
        graph.delete_branch("feature").unwrap();

        let fix = graph.add_branch("fix").unwrap();
        assert_eq!(fix.counter(), 3);
        let key = graph.add_commit().unwrap();
        assert_eq!(id_of(&graph, key), "f3");
    }

    #[test]
    fn test_gc_compacts_lanes_when_configured() {
        let mut graph = GitGraph::new(GraphConfig::default().compact_lanes_after_gc(true));
        graph.init_graph().unwrap();
        graph.checkout("m1", true).unwrap();
        graph.add_commit().unwrap();
        graph.checkout("master", true).unwrap();
        graph.add_branch("feature").unwrap();
        let f1 = graph.add_commit().unwrap();
        assert_eq!(graph.commit(f1).unwrap().swimlane(), 2);

        graph.take_events();
        graph.run_garbage_collection();
        assert_eq!(graph.commit(f1).unwrap().swimlane(), 1);
        assert_eq!(graph.store().find_branch("feature").unwrap().swimlane(), 1);
        let events = graph.take_events();
        assert!(events.contains(&GraphEvent::LanesCompacted { removed: vec![1] }));
    }

    #[test]
    fn test_events_are_recorded() {
        let mut graph = graph();
        let events = graph.take_events();
        assert!(matches!(events[0], GraphEvent::Initialized { .. }));

        let key = graph.add_commit().unwrap();
        let events = graph.take_events();
        assert!(events.contains(&GraphEvent::CommitAdded { commit: key }));
        assert!(events.iter().any(|e| matches!(e, GraphEvent::RefMoved { to, .. } if *to == key)));

        graph.show_lost_commits(false);
        graph.show_lost_commits(false);
        assert_eq!(graph.take_events(), vec![GraphEvent::LostVisibilityChanged { visible: false }]);
    }
}
