// src/engine/mod.rs

//! Async orchestration around the pure scheduling core.
//!
//! - [`scheduler`] wraps [`crate::dag::RunnableState`] behind one lock and
//!   snapshots under it, so concurrent completion reports stay consistent.
//! - [`runtime`] is the event loop that drives a whole run to a terminal
//!   state through a pluggable [`VertexExecutor`].

pub mod runtime;
pub mod scheduler;

use std::collections::HashSet;

use crate::dag::VertexId;

/// Outcome of a vertex's work, reported by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexOutcome {
    Success,
    /// The vertex's work failed. Surfaced as a result; never retried here.
    Failed(String),
}

/// Events flowing into the runtime from executors and external controls.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// A vertex finished executing with a concrete outcome.
    VertexCompleted {
        vertex: VertexId,
        outcome: VertexOutcome,
    },
    /// Replace the activation overlay (a router vertex selected or pruned
    /// branches as a side effect of its own execution).
    ActivationChanged {
        activated: HashSet<VertexId>,
        inactivated: HashSet<VertexId>,
    },
    /// Graceful stop requested by the embedding application.
    ShutdownRequested,
}

/// Terminal state of a driven run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTermination {
    /// Every vertex in scope completed (inactivated branches excluded).
    Completed,
    /// Vertices remain in scope but nothing is runnable and nothing is in
    /// flight.
    Stalled,
    /// A vertex reported failure; the run was not continued.
    Failed { vertex: VertexId },
    /// The run was stopped from outside before reaching an end state.
    Shutdown,
}

pub use runtime::{Runtime, VertexExecutor};
pub use scheduler::{ScheduleStep, Scheduler};
