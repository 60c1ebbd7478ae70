// src/lib.rs

//! flowdag: dependency-driven execution scheduling for flow graphs.
//!
//! Given a directed acyclic graph of computation vertices, the scheduler
//! decides, incrementally and concurrently-safely, which vertices become
//! runnable as others complete. It supports partial graph activation
//! (router vertices selecting or pruning branches at run time) and resumable
//! execution via structural state snapshots.
//!
//! Layering:
//! - [`dag`] is the pure scheduling core: dependency index, run-scope sets,
//!   the runnability predicate and the next-runnable computation. No IO, no
//!   locks, no async.
//! - [`snapshot`] is the codec between the core state and its persistable
//!   structural form, plus the injected save seam.
//! - [`engine`] is the async shell: a lock-guarded [`engine::Scheduler`] that
//!   serialises completion handling and snapshotting, and a [`engine::Runtime`]
//!   event loop that drives a whole run through a pluggable executor.
//!
//! What a vertex actually computes is opaque to this crate; callers execute
//! the work and report completions.

pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod snapshot;

pub use dag::{
    resolve_top_level, ActivationState, DependencyIndex, RunScope, RunnableState, SubgraphLookup,
    VertexId,
};
pub use engine::{
    RunEvent, RunTermination, Runtime, ScheduleStep, Scheduler, VertexExecutor, VertexOutcome,
};
pub use errors::{FlowdagError, Result};
pub use snapshot::{JsonSnapshotStore, NullSnapshotSink, RunSnapshot, SnapshotSink};
