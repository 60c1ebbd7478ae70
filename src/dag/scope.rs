// src/dag/scope.rs

//! Run-scope sets and the externally-owned activation overlay.

use std::collections::{BTreeSet, HashSet};

use crate::dag::VertexId;

/// Which vertices are in scope for the current run, and which of those are
/// currently reserved for execution.
///
/// A vertex id appears in at most one of {not started, to-run, being-run,
/// done}; "done" is represented by absence from both sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunScope {
    to_run: BTreeSet<VertexId>,
    being_run: BTreeSet<VertexId>,
}

impl RunScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices to the set eligible for this run.
    pub fn extend_to_run(&mut self, vertex_ids: impl IntoIterator<Item = VertexId>) {
        self.to_run.extend(vertex_ids);
    }

    /// Put a single vertex back into scope (external run-state correction).
    pub fn add_to_run(&mut self, vertex_id: VertexId) {
        self.to_run.insert(vertex_id);
    }

    /// Drop a vertex from both sets; used when it completes or leaves the run.
    pub fn remove(&mut self, vertex_id: &str) {
        self.to_run.remove(vertex_id);
        self.being_run.remove(vertex_id);
    }

    /// Reserve a vertex the caller is about to dispatch.
    pub fn reserve(&mut self, vertex_id: VertexId) {
        self.being_run.insert(vertex_id);
    }

    pub fn contains_to_run(&self, vertex_id: &str) -> bool {
        self.to_run.contains(vertex_id)
    }

    pub fn is_being_run(&self, vertex_id: &str) -> bool {
        self.being_run.contains(vertex_id)
    }

    /// Vertices still eligible for this run.
    pub fn to_run(&self) -> &BTreeSet<VertexId> {
        &self.to_run
    }

    /// Number of vertices currently reserved/executing.
    pub fn in_flight(&self) -> usize {
        self.being_run.len()
    }

    pub(crate) fn from_to_run(to_run: BTreeSet<VertexId>) -> Self {
        Self {
            to_run,
            // Nothing is assumed mid-flight on restore; runnability is
            // re-evaluated from the predecessor state.
            being_run: BTreeSet::new(),
        }
    }
}

/// Activation overlay owned by the graph collaborator.
///
/// Router/conditional vertices mutate these sets as a side effect of their
/// own execution; the scheduler only reads them, on every runnability check.
///
/// - A vertex in `inactivated` is never runnable, regardless of other state.
/// - A non-empty `activated` set replaces the run scope as the membership
///   test (branch-selection mode); when empty, the run scope is
///   authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationState {
    pub activated: HashSet<VertexId>,
    pub inactivated: HashSet<VertexId>,
}

impl ActivationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a vertex into scope for branch-selection mode.
    pub fn activate(&mut self, vertex_id: VertexId) {
        self.activated.insert(vertex_id);
    }

    /// Exclude a vertex from the run entirely.
    pub fn inactivate(&mut self, vertex_id: VertexId) {
        self.inactivated.insert(vertex_id);
    }
}
