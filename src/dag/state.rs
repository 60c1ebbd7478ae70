// src/dag/state.rs

//! Runnability predicate and the next-runnable computation.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::dag::index::DependencyIndex;
use crate::dag::scope::{ActivationState, RunScope};
use crate::dag::VertexId;

/// Pure scheduling state for one run: the dependency index plus the
/// run-scope sets.
///
/// This owns every piece of mutable scheduler state; callers never touch the
/// sets directly. It has no locks and performs no IO — the shell in
/// [`crate::engine`] serialises access and handles snapshotting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnableState {
    index: DependencyIndex,
    scope: RunScope,
}

impl RunnableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge newly declared dependencies and scope into the run.
    ///
    /// `predecessor_map` maps each vertex to the set of vertices that must
    /// complete before it; `scope` lists the vertices eligible for this run.
    /// Idempotent with respect to already-recorded edges, so a run can be
    /// extended incrementally (e.g. sub-flow expansion).
    pub fn record_dependencies(
        &mut self,
        predecessor_map: &BTreeMap<VertexId, BTreeSet<VertexId>>,
        scope: impl IntoIterator<Item = VertexId>,
    ) {
        self.index.record_dependencies(predecessor_map);
        self.scope.extend_to_run(scope);
    }

    /// Whether a vertex is eligible to begin execution right now.
    ///
    /// True iff the vertex is not already reserved, has no outstanding
    /// predecessors, is not inactivated, and passes the scope test: with an
    /// empty `activated` set the run scope is authoritative; with a non-empty
    /// one, membership in `activated` is required instead. The latter lets a
    /// router narrow the runnable universe to exactly the branch it selected.
    pub fn is_runnable(&self, vertex_id: &str, activation: &ActivationState) -> bool {
        let in_scope = if activation.activated.is_empty() {
            self.scope.contains_to_run(vertex_id)
        } else {
            activation.activated.contains(vertex_id)
        };

        !self.scope.is_being_run(vertex_id)
            && !self.index.has_outstanding_predecessors(vertex_id)
            && !activation.inactivated.contains(vertex_id)
            && in_scope
    }

    /// Compute the batch of vertices that became runnable now that
    /// `finished` has completed, and reserve them.
    ///
    /// Release, then probe the direct successors in edge order; only when
    /// none of them is runnable, fall back to the transitive back-walk over
    /// the successors' predecessor chains. The returned batch is
    /// de-duplicated and never contains `finished` itself (self-referential
    /// edges are tolerated, not rescheduled).
    ///
    /// An empty batch for a successor-less vertex means that path of the
    /// graph is exhausted; it is a normal terminal condition, not a stall.
    pub fn next_runnable(
        &mut self,
        finished: &str,
        activation: &ActivationState,
    ) -> Vec<VertexId> {
        self.remove_from_runnables(finished);

        let direct: Vec<VertexId> = self
            .index
            .successors_of(finished)
            .iter()
            .filter(|successor| self.is_runnable(successor.as_str(), activation))
            .cloned()
            .collect();

        let candidates = if direct.is_empty() {
            self.runnable_predecessors_of_successors(finished, activation)
        } else {
            direct
        };

        let mut batch = Vec::new();
        let mut seen: HashSet<VertexId> = HashSet::new();
        for vertex_id in candidates {
            if vertex_id == finished {
                continue;
            }
            if seen.insert(vertex_id.clone()) {
                self.scope.reserve(vertex_id.clone());
                batch.push(vertex_id);
            }
        }

        debug!(finished = %finished, batch = ?batch, "computed next runnable batch");
        batch
    }

    /// Frontier search for when no direct successor is runnable yet: for each
    /// successor of `vertex_id`, walk its predecessor chains depth-first and
    /// collect every currently-runnable ancestor.
    ///
    /// This finds the part of the graph that already became free while a
    /// direct successor still waits on a different predecessor (diamond
    /// shapes), so the scheduler never reports "nothing runnable" while
    /// forward progress is possible upstream of a blocked successor.
    ///
    /// Implemented as an explicit worklist with an owned visited set; the
    /// same ancestor may be reachable via multiple paths and is inspected
    /// once per call.
    fn runnable_predecessors_of_successors(
        &self,
        vertex_id: &str,
        activation: &ActivationState,
    ) -> Vec<VertexId> {
        let mut runnable = Vec::new();
        let mut visited: HashSet<VertexId> = HashSet::new();
        let mut stack: Vec<VertexId> = Vec::new();

        // Seed in reverse so the stack pops successors' predecessors in edge
        // order.
        for successor in self.index.successors_of(vertex_id).iter().rev() {
            if let Some(predecessors) = self.index.predecessors_of(successor) {
                stack.extend(predecessors.iter().rev().cloned());
            }
        }

        while let Some(predecessor) = stack.pop() {
            if !visited.insert(predecessor.clone()) {
                continue;
            }

            if self.is_runnable(&predecessor, activation) {
                runnable.push(predecessor);
            } else if let Some(grand_predecessors) = self.index.predecessors_of(&predecessor) {
                stack.extend(grand_predecessors.iter().rev().cloned());
            }
        }

        runnable
    }

    /// Vertices runnable before any completion has been reported, reserved
    /// for dispatch. Used to seed a fresh run, or a run restored from a
    /// snapshot (where nothing is assumed mid-flight).
    pub fn initial_batch(&mut self, activation: &ActivationState) -> Vec<VertexId> {
        let ready: Vec<VertexId> = self
            .scope
            .to_run()
            .iter()
            .filter(|vertex_id| self.is_runnable(vertex_id.as_str(), activation))
            .cloned()
            .collect();

        for vertex_id in &ready {
            self.scope.reserve(vertex_id.clone());
        }

        debug!(batch = ?ready, "computed initial runnable batch");
        ready
    }

    /// Drop a vertex from the runnable sets and clear it from its successors'
    /// outstanding-predecessor sets. Idempotent: a duplicate completion
    /// report finds nothing left to remove.
    pub fn remove_from_runnables(&mut self, vertex_id: &str) {
        self.update_vertex_run_state(vertex_id, false);
        self.index.remove_completed(vertex_id);
    }

    /// External run-state correction: force a vertex into or out of the run
    /// scope.
    pub fn update_vertex_run_state(&mut self, vertex_id: &str, is_runnable: bool) {
        if is_runnable {
            self.scope.add_to_run(vertex_id.to_string());
        } else {
            self.scope.remove(vertex_id);
        }
    }

    /// Reserve a vertex the caller is about to dispatch through a path other
    /// than [`RunnableState::next_runnable`] (e.g. a pre-computed first
    /// layer).
    pub fn add_to_being_run(&mut self, vertex_id: VertexId) {
        self.scope.reserve(vertex_id);
    }

    /// Number of vertices currently reserved/executing.
    pub fn in_flight(&self) -> usize {
        self.scope.in_flight()
    }

    /// Vertices still in scope that are not deliberately excluded by the
    /// overlay. Zero means the run finished cleanly.
    pub fn remaining(&self, activation: &ActivationState) -> usize {
        self.scope
            .to_run()
            .iter()
            .filter(|vertex_id| !activation.inactivated.contains(*vertex_id))
            .count()
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn scope(&self) -> &RunScope {
        &self.scope
    }

    pub(crate) fn from_parts(index: DependencyIndex, scope: RunScope) -> Self {
        Self { index, scope }
    }
}
