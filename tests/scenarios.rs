//! End-to-end scenarios driven through the simulator surface.

use std::sync::Arc;

use gitgraph::graph::{CheckoutTarget, CommitOptions, GraphError, GraphEvent, MergeOutcome, RebaseOutcome};
use gitgraph::sim::{RecordingSink, Simulator, SimulatorConfig, SimulatorError};

fn simulator() -> Simulator {
    Simulator::new(SimulatorConfig::default()).unwrap()
}

fn graph_error(err: SimulatorError) -> GraphError {
    match err {
        SimulatorError::Graph(e) => e,
        other => panic!("expected a graph error, got {other}"),
    }
}

fn tip_id(sim: &Simulator, branch: &str) -> String {
    sim.find_commit_for(branch).unwrap().id().to_string()
}

/// Without divergence a plain merge fast-forwards, so the merge commit
/// for this history needs `--no-ff`.
#[test]
fn no_ff_merge_of_linear_feature_creates_merge_commit() {
    let mut sim = simulator();
    sim.add_branch("feature").unwrap();
    sim.add_commit(CommitOptions::new()).unwrap();
    let feature_tip = sim.add_commit(CommitOptions::new()).unwrap();
    sim.checkout("master", true).unwrap();
    let master_tip = sim.find_commit_for("master").unwrap().key();

    let outcome = sim.merge(true, "feature").unwrap();
    let merge = sim
        .with_graph(|g| g.commit(outcome.created_commit().unwrap()).cloned())
        .unwrap();
    assert_eq!(merge.parent(), Some(master_tip));
    assert_eq!(merge.merged_parent(), Some(feature_tip));
    assert_eq!(merge.id(), "m1f2");
    assert_eq!(tip_id(&sim, "master"), "m1f2");
}

#[test]
fn merge_without_divergence_fast_forwards() {
    let mut sim = simulator();
    sim.execute_batch("branch feature; commit; commit; checkout master").unwrap();
    let count = sim.with_graph(|g| g.store().commit_count());

    let outcome = sim.merge(false, "feature").unwrap();
    assert!(matches!(outcome, MergeOutcome::FastForward { .. }));
    assert_eq!(sim.with_graph(|g| g.store().commit_count()), count);
    assert_eq!(tip_id(&sim, "master"), "f2");
}

#[test]
fn deleting_checked_out_branch_fails() {
    let mut sim = simulator();
    let before = sim.snapshot();

    let err = graph_error(sim.delete_branch("master").unwrap_err());
    assert_eq!(err, GraphError::CannotDeleteCheckedOutBranch("master".into()));

    let after = sim.snapshot();
    assert_eq!(after.commits.len(), before.commits.len());
    assert_eq!(after.branches.len(), 1);
    assert!(sim.is_branch_checked_out("master"));
}

#[test]
fn detached_commit_is_lost_then_collected() {
    let mut sim = simulator();
    let target = sim.checkout("m1", true).unwrap();
    assert!(matches!(target, CheckoutTarget::Detached(_)));
    let detached = sim.add_commit(CommitOptions::new()).unwrap();
    sim.checkout("master", true).unwrap();

    assert_eq!(sim.calculate_lost_commits().unwrap(), vec![detached]);
    assert!(sim.snapshot().commit("H1").unwrap().lost);

    assert_eq!(sim.run_garbage_collection().unwrap(), vec![detached]);
    assert!(!sim.does_commit_exist("H1"));
    assert_eq!(sim.snapshot().commits.len(), 1);
}

#[test]
fn duplicate_branch_is_rejected() {
    let mut sim = simulator();
    sim.add_branch("bugfix").unwrap();
    let err = graph_error(sim.add_branch("bugfix").unwrap_err());
    assert!(matches!(err, GraphError::InvalidBranchName { .. }));
    assert_eq!(sim.branches().len(), 2);
}

#[test]
fn rebase_without_unique_commits_fast_forwards() {
    let mut sim = simulator();
    sim.execute_batch("branch feature; checkout master; commit; commit; checkout feature").unwrap();
    let count = sim.with_graph(|g| g.store().commit_count());

    let outcome = sim.rebase("master").unwrap();
    assert!(matches!(outcome, RebaseOutcome::FastForward { .. }));
    assert_eq!(sim.with_graph(|g| g.store().commit_count()), count);
    assert_eq!(tip_id(&sim, "feature"), "m3");
}

#[test]
fn second_merge_has_nothing_to_merge() {
    let mut sim = simulator();
    sim.execute_batch("branch feature; commit; checkout master; commit").unwrap();
    sim.merge(false, "feature").unwrap();

    let err = graph_error(sim.merge(false, "feature").unwrap_err());
    assert!(matches!(err, GraphError::NothingToMerge { .. }));
}

#[test]
fn rebase_replays_commits_onto_target() {
    let mut sim = simulator();
    sim.execute_batch("branch feature; commit; commit; checkout master; commit; checkout feature; rebase master")
        .unwrap();

    assert_eq!(tip_id(&sim, "feature"), "f2*");
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.commit("f1*").unwrap().parent.as_deref(), Some("m2"));
    assert!(snapshot.commit("f1").unwrap().lost);
    assert!(snapshot.commit("f2").unwrap().lost);

    sim.execute("gc").unwrap();
    assert!(!sim.does_commit_exist("f1"));
    assert!(sim.does_commit_exist("f1*"));
}

#[test]
fn amend_tag_and_cherry_pick() {
    let mut sim = simulator();
    sim.execute_batch("commit; tag v1; commit --amend").unwrap();
    assert_eq!(tip_id(&sim, "master"), "m2*");
    // the tag still holds the original
    assert!(!sim.snapshot().commit("m2").unwrap().lost);
    assert_eq!(tip_id(&sim, "v1"), "m2");

    sim.execute_batch("branch feature; commit; checkout master; cherry-pick f1").unwrap();
    assert_eq!(tip_id(&sim, "master"), "f1'");

    let err = graph_error(sim.cherry_pick("f1'").unwrap_err());
    assert!(matches!(err, GraphError::AlreadyApplied(_)));
}

#[test]
fn every_command_notifies_the_sink() {
    let sink = Arc::new(RecordingSink::new());
    let mut sim = Simulator::with_sink(SimulatorConfig::default(), Box::new(Arc::clone(&sink))).unwrap();
    sink.drain();

    sim.execute_batch("branch feature; commit; checkout master; merge --no-ff feature; gc").unwrap();
    let batches = sink.drain();
    // gc found nothing to collect, so it changed nothing
    assert_eq!(batches.len(), 4);
    assert!(batches[3]
        .iter()
        .any(|e| matches!(e, GraphEvent::CommitAdded { .. })));
}
