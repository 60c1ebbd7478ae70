// src/dag/toplevel.rs

//! Sub-graph id resolution for external reporting.
//!
//! Collapsed sub-graphs are reported to callers as their container vertex.
//! The scheduler itself knows nothing about sub-graph structure; it receives
//! a lookup collaborator and applies the substitution mechanically.

use crate::dag::VertexId;

/// Collaborator that knows which vertices are top-level members of an
/// enclosing sub-graph, and who that container is.
pub trait SubgraphLookup {
    /// Whether `vertex_id` is a top-level member of a parent sub-graph.
    fn is_top_level(&self, vertex_id: &str) -> bool;

    /// Id of the enclosing container, if the vertex has one.
    fn parent_of(&self, vertex_id: &str) -> Option<VertexId>;
}

/// Map each id to its enclosing container id where the lookup reports the
/// vertex as a top-level sub-graph member; all other ids pass through
/// unchanged.
pub fn resolve_top_level<L: SubgraphLookup>(lookup: &L, vertex_ids: &[VertexId]) -> Vec<VertexId> {
    vertex_ids
        .iter()
        .map(|vertex_id| {
            if lookup.is_top_level(vertex_id) {
                lookup
                    .parent_of(vertex_id)
                    .unwrap_or_else(|| vertex_id.clone())
            } else {
                vertex_id.clone()
            }
        })
        .collect()
}
