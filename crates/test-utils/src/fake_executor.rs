use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use flowdag::dag::VertexId;
use flowdag::engine::{RunEvent, VertexExecutor, VertexOutcome};
use flowdag::errors::{FlowdagError, Result};

/// Side effect a fake vertex performs before reporting completion.
#[derive(Debug, Clone)]
pub enum FakeBehaviour {
    /// Complete successfully (default for unlisted vertices).
    Succeed,
    /// Report failure with the given reason.
    Fail(String),
    /// Act as a router: publish the given activation overlay, then succeed.
    Route {
        activated: Vec<VertexId>,
        inactivated: Vec<VertexId>,
    },
}

/// A fake executor that:
/// - records which vertices were "run", in dispatch order
/// - immediately reports a completion event for each dispatched vertex,
///   applying any configured [`FakeBehaviour`] first.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RunEvent>,
    executed: Arc<Mutex<Vec<VertexId>>>,
    behaviours: HashMap<VertexId, FakeBehaviour>,
}

impl FakeExecutor {
    pub fn new(runtime_tx: mpsc::Sender<RunEvent>, executed: Arc<Mutex<Vec<VertexId>>>) -> Self {
        Self {
            runtime_tx,
            executed,
            behaviours: HashMap::new(),
        }
    }

    pub fn with_behaviour(mut self, vertex: &str, behaviour: FakeBehaviour) -> Self {
        self.behaviours.insert(vertex.to_string(), behaviour);
        self
    }
}

impl VertexExecutor for FakeExecutor {
    fn dispatch(
        &mut self,
        batch: Vec<VertexId>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let behaviours: Vec<(VertexId, FakeBehaviour)> = batch
            .iter()
            .map(|v| {
                (
                    v.clone(),
                    self.behaviours
                        .get(v)
                        .cloned()
                        .unwrap_or(FakeBehaviour::Succeed),
                )
            })
            .collect();

        Box::pin(async move {
            for (vertex, behaviour) in behaviours {
                {
                    let mut guard = executed.lock().unwrap();
                    guard.push(vertex.clone());
                }

                let outcome = match behaviour {
                    FakeBehaviour::Succeed => VertexOutcome::Success,
                    FakeBehaviour::Fail(reason) => VertexOutcome::Failed(reason),
                    FakeBehaviour::Route {
                        activated,
                        inactivated,
                    } => {
                        tx.send(RunEvent::ActivationChanged {
                            activated: activated.into_iter().collect(),
                            inactivated: inactivated.into_iter().collect(),
                        })
                        .await
                        .map_err(|_| FlowdagError::ExecutorClosed)?;
                        VertexOutcome::Success
                    }
                };

                tx.send(RunEvent::VertexCompleted { vertex, outcome })
                    .await
                    .map_err(|_| FlowdagError::ExecutorClosed)?;
            }
            Ok(())
        })
    }
}
