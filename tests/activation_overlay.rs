// tests/activation_overlay.rs

//! Activation overlay semantics: branch-selection mode, exclusion precedence
//! and strict branch isolation.

mod common;
use crate::common::init_tracing;

use flowdag::dag::{ActivationState, RunnableState, VertexId};
use flowdag_test_utils::builders::{activation, GraphBuilder};

fn ids(names: &[&str]) -> Vec<VertexId> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn activated_vertex_bypasses_run_scope() {
    init_tracing();
    // X was never declared in the run scope at all.
    let state = RunnableState::new();

    assert!(!state.is_runnable("X", &ActivationState::default()));
    assert!(state.is_runnable("X", &activation(&["X"], &[])));
}

#[test]
fn inactivated_wins_over_activated() {
    init_tracing();
    let state = GraphBuilder::new().vertex("X").build_state();

    assert!(!state.is_runnable("X", &activation(&["X"], &["X"])));
}

#[test]
fn inactivated_vertex_is_never_runnable() {
    init_tracing();
    let state = GraphBuilder::new().vertex("X").build_state();

    assert!(state.is_runnable("X", &ActivationState::default()));
    assert!(!state.is_runnable("X", &activation(&[], &["X"])));
}

#[test]
fn any_activation_hides_unactivated_scope_members() {
    init_tracing();
    // Y is in the run scope with no outstanding predecessors, but the moment
    // any vertex is activated the scope test switches to the activated set.
    let state = GraphBuilder::new().vertex("Y").build_state();

    assert!(state.is_runnable("Y", &ActivationState::default()));
    assert!(!state.is_runnable("Y", &activation(&["X"], &[])));
}

#[test]
fn router_narrows_batch_to_selected_branch() {
    init_tracing();
    let mut state = GraphBuilder::new()
        .edge("A", "B")
        .edge("A", "C")
        .build_state();

    state.add_to_being_run("A".to_string());
    assert_eq!(
        state.next_runnable("A", &activation(&["B"], &[])),
        ids(&["B"])
    );
}

#[test]
fn pruned_branch_is_skipped_in_default_mode() {
    init_tracing();
    let mut state = GraphBuilder::new()
        .edge("A", "B")
        .edge("A", "C")
        .build_state();

    state.add_to_being_run("A".to_string());
    assert_eq!(
        state.next_runnable("A", &activation(&[], &["C"])),
        ids(&["B"])
    );

    // The pruned branch does not count against a clean finish.
    let overlay = activation(&[], &["C"]);
    assert_eq!(state.next_runnable("B", &overlay), Vec::<VertexId>::new());
    assert_eq!(state.remaining(&overlay), 0);
}
