// src/snapshot/mod.rs

//! Snapshot codec and persistence seams for resumable runs.
//!
//! - [`RunSnapshot`] is the plain structural form of the scheduler state.
//! - [`SnapshotSink`] is the injected save operation, called by the engine
//!   while the scheduling lock is held.
//! - [`store`] provides a JSON file-backed sink for callers that do not bring
//!   their own persistence.

pub mod store;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dag::scope::RunScope;
use crate::dag::{DependencyIndex, RunnableState, VertexId};
use crate::errors::Result;

pub use store::JsonSnapshotStore;

/// Plain structural form of the scheduler state.
///
/// `being_run` is intentionally absent: a restored run assumes nothing is
/// mid-flight and re-evaluates runnability from the persisted predecessor
/// state. Ordered collections make the serialized form stable across
/// round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_map: BTreeMap<VertexId, Vec<VertexId>>,
    pub run_predecessors: BTreeMap<VertexId, BTreeSet<VertexId>>,
    pub vertices_to_run: BTreeSet<VertexId>,
}

impl RunSnapshot {
    /// Capture the current scheduler state.
    pub fn capture(state: &RunnableState) -> Self {
        Self {
            run_map: state.index().run_map().clone(),
            run_predecessors: state.index().run_predecessors().clone(),
            vertices_to_run: state.scope().to_run().clone(),
        }
    }

    /// Reconstruct scheduler state from the structural form, verbatim.
    ///
    /// Ids unknown to the live graph are carried as opaque entries; they
    /// simply never become runnable from the caller's perspective. Nothing
    /// here validates against graph structure, so a restore cannot fail on a
    /// stale snapshot.
    pub fn restore(self) -> RunnableState {
        let index = DependencyIndex::from_parts(self.run_map, self.run_predecessors);
        let scope = RunScope::from_to_run(self.vertices_to_run);
        RunnableState::from_parts(index, scope)
    }
}

/// Injected save operation for scheduler state.
///
/// Called while the scheduling lock is held, so that a crash between
/// reserving a batch and dispatching it cannot lose or duplicate the
/// reservation. Implementations must be fast; slow persistence backends
/// should buffer or fire-and-forget on their side, not here.
pub trait SnapshotSink: Send + Sync {
    fn save(&self, snapshot: &RunSnapshot) -> Result<()>;
}

// Shared sinks keep working behind the boxed seam.
impl<S: SnapshotSink> SnapshotSink for std::sync::Arc<S> {
    fn save(&self, snapshot: &RunSnapshot) -> Result<()> {
        self.as_ref().save(snapshot)
    }
}

/// Sink that drops every snapshot; for runs that do not need resumption.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSnapshotSink;

impl SnapshotSink for NullSnapshotSink {
    fn save(&self, _snapshot: &RunSnapshot) -> Result<()> {
        Ok(())
    }
}
