// src/engine/scheduler.rs

//! Lock-guarded scheduling shell.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tokio::sync::Mutex;
use tracing::warn;

use crate::dag::{ActivationState, RunnableState, VertexId};
use crate::errors::FlowdagError;
use crate::snapshot::{RunSnapshot, SnapshotSink};

/// Result of a single completion report.
#[derive(Debug)]
pub struct ScheduleStep {
    /// Vertices reserved for dispatch by this step.
    pub runnable: Vec<VertexId>,
    /// Error returned by the snapshot sink, if any. The in-memory state
    /// stays authoritative and scheduling has already continued past the
    /// failure.
    pub snapshot_error: Option<FlowdagError>,
}

/// Owns the mutable scheduler state and serialises every
/// release + compute + reserve + snapshot sequence behind one lock.
///
/// Completions may be reported concurrently from independent workers; each
/// report acquires the lock, so two reports can neither both observe a
/// successor as blocked and skip it, nor reserve the same successor twice.
/// The snapshot sink is invoked while the lock is still held, so a restart
/// between reserving a batch and dispatching it cannot lose or duplicate the
/// reservation.
pub struct Scheduler {
    state: Mutex<RunnableState>,
    sink: Box<dyn SnapshotSink>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler").finish_non_exhaustive()
    }
}

impl Scheduler {
    pub fn new(sink: Box<dyn SnapshotSink>) -> Self {
        Self {
            state: Mutex::new(RunnableState::new()),
            sink,
        }
    }

    /// Resume from a previously captured snapshot. Nothing is assumed
    /// mid-flight; runnability is re-evaluated from the persisted
    /// predecessor state.
    pub fn restore(snapshot: RunSnapshot, sink: Box<dyn SnapshotSink>) -> Self {
        Self {
            state: Mutex::new(snapshot.restore()),
            sink,
        }
    }

    /// Merge newly declared dependencies and scope into the run.
    pub async fn record_dependencies(
        &self,
        predecessor_map: &BTreeMap<VertexId, BTreeSet<VertexId>>,
        scope: impl IntoIterator<Item = VertexId>,
    ) {
        let mut state = self.state.lock().await;
        state.record_dependencies(predecessor_map, scope);
    }

    /// Report a vertex completion and receive the next runnable batch.
    ///
    /// Snapshot failures are logged and swallowed; use
    /// [`Scheduler::step_completion`] to observe them.
    pub async fn report_completion(
        &self,
        vertex_id: &str,
        activation: &ActivationState,
    ) -> Vec<VertexId> {
        self.step_completion(vertex_id, activation).await.runnable
    }

    /// Rich variant of [`Scheduler::report_completion`] that also surfaces
    /// the snapshot outcome.
    pub async fn step_completion(
        &self,
        vertex_id: &str,
        activation: &ActivationState,
    ) -> ScheduleStep {
        let mut state = self.state.lock().await;
        let runnable = state.next_runnable(vertex_id, activation);
        let snapshot_error = self.save_snapshot(&state);
        ScheduleStep {
            runnable,
            snapshot_error,
        }
    }

    /// Vertices runnable before any completion has been reported, reserved
    /// for dispatch. Seeds a fresh or restored run.
    pub async fn initial_batch(&self, activation: &ActivationState) -> Vec<VertexId> {
        let mut state = self.state.lock().await;
        let batch = state.initial_batch(activation);
        self.save_snapshot(&state);
        batch
    }

    /// Read-only runnability probe for diagnostics.
    pub async fn is_runnable(&self, vertex_id: &str, activation: &ActivationState) -> bool {
        self.state.lock().await.is_runnable(vertex_id, activation)
    }

    /// Number of vertices currently reserved/executing.
    pub async fn in_flight(&self) -> usize {
        self.state.lock().await.in_flight()
    }

    /// Vertices still in scope, minus branches the overlay excluded.
    pub async fn remaining(&self, activation: &ActivationState) -> usize {
        self.state.lock().await.remaining(activation)
    }

    /// Current structural snapshot (the same form the sink receives).
    pub async fn snapshot(&self) -> RunSnapshot {
        RunSnapshot::capture(&*self.state.lock().await)
    }

    fn save_snapshot(&self, state: &RunnableState) -> Option<FlowdagError> {
        let snapshot = RunSnapshot::capture(state);
        match self.sink.save(&snapshot) {
            Ok(()) => None,
            Err(err) => {
                warn!(error = %err, "snapshot sink failed; in-memory state remains authoritative");
                Some(err)
            }
        }
    }
}
