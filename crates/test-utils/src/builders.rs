#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use flowdag::dag::{ActivationState, RunnableState, VertexId};

/// Builder for predecessor maps and run scopes to simplify test setup.
///
/// `edge(p, s)` declares "s waits on p" and puts both vertices in scope;
/// `vertex(v)` puts a dependency-free vertex in scope.
pub struct GraphBuilder {
    predecessors: BTreeMap<VertexId, BTreeSet<VertexId>>,
    scope: BTreeSet<VertexId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            predecessors: BTreeMap::new(),
            scope: BTreeSet::new(),
        }
    }

    pub fn vertex(mut self, id: &str) -> Self {
        self.scope.insert(id.to_string());
        self
    }

    pub fn edge(mut self, from: &str, to: &str) -> Self {
        self.scope.insert(from.to_string());
        self.scope.insert(to.to_string());
        self.predecessors
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        self
    }

    /// The raw (predecessor map, scope) pair, for feeding the async API.
    pub fn parts(self) -> (BTreeMap<VertexId, BTreeSet<VertexId>>, BTreeSet<VertexId>) {
        (self.predecessors, self.scope)
    }

    /// A ready-made pure scheduling state.
    pub fn build_state(self) -> RunnableState {
        let (predecessors, scope) = self.parts();
        let mut state = RunnableState::new();
        state.record_dependencies(&predecessors, scope);
        state
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for an activation overlay from id slices.
pub fn activation(activated: &[&str], inactivated: &[&str]) -> ActivationState {
    let mut state = ActivationState::new();
    for id in activated {
        state.activate(id.to_string());
    }
    for id in inactivated {
        state.inactivate(id.to_string());
    }
    state
}
