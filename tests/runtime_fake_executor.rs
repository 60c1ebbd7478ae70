// tests/runtime_fake_executor.rs

//! Full runs through the `Runtime` event loop with a fake executor.

mod common;
use crate::common::init_tracing;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use flowdag::dag::VertexId;
use flowdag::engine::{RunEvent, RunTermination, Runtime, Scheduler};
use flowdag::snapshot::NullSnapshotSink;
use flowdag_test_utils::builders::GraphBuilder;
use flowdag_test_utils::fake_executor::{FakeBehaviour, FakeExecutor};

async fn drive(
    builder: GraphBuilder,
    configure: impl FnOnce(FakeExecutor) -> FakeExecutor,
) -> (RunTermination, Vec<VertexId>) {
    let scheduler = Arc::new(Scheduler::new(Box::new(NullSnapshotSink)));
    let (predecessors, scope) = builder.parts();
    scheduler.record_dependencies(&predecessors, scope).await;

    let (rt_tx, rt_rx) = mpsc::channel::<RunEvent>(64);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = configure(FakeExecutor::new(rt_tx.clone(), executed.clone()));

    let runtime = Runtime::new(scheduler, rt_rx, executor);
    let termination = timeout(Duration::from_secs(3), runtime.run())
        .await
        .expect("runtime did not finish within 3 seconds")
        .expect("runtime returned an error");

    let order = executed.lock().unwrap().clone();
    (termination, order)
}

#[tokio::test]
async fn chain_runs_to_completion_in_order() {
    init_tracing();
    let builder = GraphBuilder::new().edge("A", "B").edge("B", "C");
    let (termination, executed) = drive(builder, |e| e).await;

    assert_eq!(termination, RunTermination::Completed);
    assert_eq!(executed, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
}

#[tokio::test]
async fn dangling_predecessor_stalls_the_run() {
    init_tracing();
    // C waits on D, which is never declared in scope and never completes.
    let scheduler = Arc::new(Scheduler::new(Box::new(NullSnapshotSink)));
    let mut predecessors: BTreeMap<VertexId, BTreeSet<VertexId>> = BTreeMap::new();
    predecessors.insert("C".to_string(), ["D".to_string()].into_iter().collect());
    let scope: BTreeSet<VertexId> = ["A".to_string(), "C".to_string()].into_iter().collect();
    scheduler.record_dependencies(&predecessors, scope).await;

    let (rt_tx, rt_rx) = mpsc::channel::<RunEvent>(64);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(rt_tx, executed.clone());

    let runtime = Runtime::new(scheduler, rt_rx, executor);
    let termination = timeout(Duration::from_secs(3), runtime.run())
        .await
        .expect("runtime did not finish within 3 seconds")
        .expect("runtime returned an error");

    assert_eq!(termination, RunTermination::Stalled);
    assert_eq!(executed.lock().unwrap().clone(), vec!["A".to_string()]);
}

#[tokio::test]
async fn vertex_failure_ends_the_run() {
    init_tracing();
    let builder = GraphBuilder::new().edge("A", "B").edge("B", "C");
    let (termination, executed) = drive(builder, |e| {
        e.with_behaviour("B", FakeBehaviour::Fail("boom".to_string()))
    })
    .await;

    assert_eq!(
        termination,
        RunTermination::Failed {
            vertex: "B".to_string()
        }
    );
    assert_eq!(executed, vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
async fn router_prunes_rejected_branch_and_completes() {
    init_tracing();
    let builder = GraphBuilder::new().edge("A", "B").edge("A", "C");
    let (termination, executed) = drive(builder, |e| {
        e.with_behaviour(
            "A",
            FakeBehaviour::Route {
                activated: vec!["B".to_string()],
                inactivated: vec!["C".to_string()],
            },
        )
    })
    .await;

    assert_eq!(termination, RunTermination::Completed);
    assert_eq!(executed, vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
async fn shutdown_request_stops_the_run() {
    init_tracing();
    let scheduler = Arc::new(Scheduler::new(Box::new(NullSnapshotSink)));
    let (predecessors, scope) = GraphBuilder::new().edge("A", "B").parts();
    scheduler.record_dependencies(&predecessors, scope).await;

    let (rt_tx, rt_rx) = mpsc::channel::<RunEvent>(64);

    // Queue the shutdown before the runtime even starts; it must win over
    // any completion the executor reports afterwards.
    rt_tx.send(RunEvent::ShutdownRequested).await.unwrap();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(rt_tx, executed.clone());

    let runtime = Runtime::new(scheduler, rt_rx, executor);
    let termination = timeout(Duration::from_secs(3), runtime.run())
        .await
        .expect("runtime did not finish within 3 seconds")
        .expect("runtime returned an error");

    assert_eq!(termination, RunTermination::Shutdown);
}
