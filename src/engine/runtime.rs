// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::dag::{ActivationState, VertexId};
use crate::errors::Result;

use super::scheduler::Scheduler;
use super::{RunEvent, RunTermination, VertexOutcome};

/// Trait abstracting how runnable vertices are executed.
///
/// The runtime talks to a `VertexExecutor` instead of a raw mpsc sender, so
/// tests can swap in a fake that records batches and immediately emits
/// `VertexCompleted` events. The implementation is free to:
/// - hand the batch to real workers (production)
/// - simulate completion and emit [`RunEvent`]s (tests)
pub trait VertexExecutor: Send {
    fn dispatch(
        &mut self,
        batch: Vec<VertexId>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Event-loop shell that drives a run to a terminal state.
///
/// The runtime owns the activation overlay on behalf of the graph
/// collaborator: router vertices publish overlay changes as
/// [`RunEvent::ActivationChanged`] before reporting their own completion, and
/// every subsequent runnability check reads the updated sets.
///
/// A vertex failure ends the run: nothing downstream is scheduled and no
/// retry happens at this layer.
pub struct Runtime<E: VertexExecutor> {
    scheduler: Arc<Scheduler>,
    activation: ActivationState,
    event_rx: mpsc::Receiver<RunEvent>,
    executor: E,
}

impl<E: VertexExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("activation", &self.activation)
            .finish_non_exhaustive()
    }
}

impl<E: VertexExecutor> Runtime<E> {
    pub fn new(scheduler: Arc<Scheduler>, event_rx: mpsc::Receiver<RunEvent>, executor: E) -> Self {
        Self {
            scheduler,
            activation: ActivationState::default(),
            event_rx,
            executor,
        }
    }

    /// Main event loop.
    ///
    /// Seeds the run with the initially runnable frontier, then consumes
    /// [`RunEvent`]s until the run reaches a terminal state.
    pub async fn run(mut self) -> Result<RunTermination> {
        info!("flowdag runtime started");

        let seed = self.scheduler.initial_batch(&self.activation).await;
        if seed.is_empty() {
            let termination = self.terminal_state().await;
            info!(?termination, "nothing runnable at start");
            return Ok(termination);
        }
        self.dispatch(seed).await?;

        loop {
            let event = match self.event_rx.recv().await {
                Some(event) => event,
                None => {
                    info!("runtime event channel closed; exiting");
                    return Ok(RunTermination::Shutdown);
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RunEvent::ActivationChanged {
                    activated,
                    inactivated,
                } => {
                    debug!(?activated, ?inactivated, "activation overlay replaced");
                    self.activation.activated = activated;
                    self.activation.inactivated = inactivated;
                }
                RunEvent::VertexCompleted {
                    vertex,
                    outcome: VertexOutcome::Failed(reason),
                } => {
                    warn!(vertex = %vertex, reason = %reason, "vertex failed; stopping run");
                    return Ok(RunTermination::Failed { vertex });
                }
                RunEvent::VertexCompleted {
                    vertex,
                    outcome: VertexOutcome::Success,
                } => {
                    let batch = self
                        .scheduler
                        .report_completion(&vertex, &self.activation)
                        .await;

                    if !batch.is_empty() {
                        self.dispatch(batch).await?;
                    } else if self.scheduler.in_flight().await == 0 {
                        let termination = self.terminal_state().await;
                        info!(?termination, "run reached terminal state");
                        return Ok(termination);
                    }
                    // Otherwise other vertices are still in flight; their
                    // completions will keep the run moving.
                }
                RunEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping run");
                    return Ok(RunTermination::Shutdown);
                }
            }
        }
    }

    /// Distinguish "all work done" from "vertices remain but nothing can
    /// move" (e.g. a dangling predecessor that never completes).
    async fn terminal_state(&self) -> RunTermination {
        if self.scheduler.remaining(&self.activation).await == 0 {
            RunTermination::Completed
        } else {
            RunTermination::Stalled
        }
    }

    async fn dispatch(&mut self, batch: Vec<VertexId>) -> Result<()> {
        debug!(?batch, "dispatching runnable vertices");
        self.executor.dispatch(batch).await
    }
}
