// src/dag/index.rs

//! Bidirectional dependency bookkeeping for a single run.

use std::collections::{BTreeMap, BTreeSet};

use crate::dag::VertexId;

/// Tracks, per vertex, which predecessors are still outstanding and which
/// successors depend on it.
///
/// Invariant: for every recorded edge (p → s), while p has not completed,
/// `run_predecessors[s]` contains p. Completion removes p from its
/// successors' predecessor sets but keeps p's successor list for traversal.
///
/// Ordered maps keep the rebuilt successor lists deterministic across
/// repeated [`DependencyIndex::record_dependencies`] calls and stable through
/// snapshot round-trips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    /// Successors of each vertex.
    run_map: BTreeMap<VertexId, Vec<VertexId>>,
    /// Outstanding predecessors of each vertex; drained as vertices complete.
    run_predecessors: BTreeMap<VertexId, BTreeSet<VertexId>>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge newly declared dependencies into the index and rebuild the
    /// successor map from the merged predecessor map.
    ///
    /// Idempotent for already-recorded edges; safe to call repeatedly as a
    /// run is extended (e.g. sub-flow expansion).
    pub fn record_dependencies(
        &mut self,
        predecessor_map: &BTreeMap<VertexId, BTreeSet<VertexId>>,
    ) {
        for (vertex_id, predecessors) in predecessor_map {
            self.run_predecessors
                .entry(vertex_id.clone())
                .or_default()
                .extend(predecessors.iter().cloned());
        }
        self.rebuild_run_map();
    }

    /// Remove a completed vertex from the outstanding-predecessor set of each
    /// of its successors.
    ///
    /// The vertex's own successor list is retained for traversal. Calling
    /// this twice for the same vertex is a no-op the second time.
    pub fn remove_completed(&mut self, vertex_id: &str) {
        let successors = self
            .run_map
            .get(vertex_id)
            .cloned()
            .unwrap_or_default();

        for successor in successors {
            if let Some(predecessors) = self.run_predecessors.get_mut(&successor) {
                predecessors.remove(vertex_id);
            }
        }
    }

    /// True if the vertex still has at least one unresolved predecessor.
    pub fn has_outstanding_predecessors(&self, vertex_id: &str) -> bool {
        self.run_predecessors
            .get(vertex_id)
            .is_some_and(|predecessors| !predecessors.is_empty())
    }

    /// Successors of a vertex, in stable edge order.
    pub fn successors_of(&self, vertex_id: &str) -> &[VertexId] {
        self.run_map
            .get(vertex_id)
            .map(|successors| successors.as_slice())
            .unwrap_or(&[])
    }

    /// Outstanding predecessors of a vertex, if any were recorded.
    pub fn predecessors_of(&self, vertex_id: &str) -> Option<&BTreeSet<VertexId>> {
        self.run_predecessors.get(vertex_id)
    }

    /// Invert the predecessor map: each vertex is appended to the successor
    /// list of every one of its outstanding predecessors.
    fn rebuild_run_map(&mut self) {
        let mut run_map: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();

        for (vertex_id, predecessors) in &self.run_predecessors {
            for predecessor in predecessors {
                run_map
                    .entry(predecessor.clone())
                    .or_default()
                    .push(vertex_id.clone());
            }
        }

        self.run_map = run_map;
    }

    pub(crate) fn from_parts(
        run_map: BTreeMap<VertexId, Vec<VertexId>>,
        run_predecessors: BTreeMap<VertexId, BTreeSet<VertexId>>,
    ) -> Self {
        Self {
            run_map,
            run_predecessors,
        }
    }

    pub(crate) fn run_map(&self) -> &BTreeMap<VertexId, Vec<VertexId>> {
        &self.run_map
    }

    pub(crate) fn run_predecessors(&self) -> &BTreeMap<VertexId, BTreeSet<VertexId>> {
        &self.run_predecessors
    }
}
