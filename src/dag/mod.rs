// src/dag/mod.rs

//! Pure scheduling core.
//!
//! - [`index`] holds the bidirectional dependency bookkeeping for a run.
//! - [`scope`] holds the run-scope sets and the activation overlay.
//! - [`state`] combines both into the runnability predicate and the
//!   next-runnable computation.
//! - [`toplevel`] maps sub-graph member ids to their container id for
//!   external reporting.
//!
//! Nothing in this module performs IO, takes locks, or knows about async;
//! the shell in [`crate::engine`] serialises access.

pub mod index;
pub mod scope;
pub mod state;
pub mod toplevel;

/// Canonical vertex identifier type used throughout the crate.
pub type VertexId = String;

pub use index::DependencyIndex;
pub use scope::{ActivationState, RunScope};
pub use state::RunnableState;
pub use toplevel::{resolve_top_level, SubgraphLookup};
