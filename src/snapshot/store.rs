// src/snapshot/store.rs

//! JSON file-backed snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;

use super::{RunSnapshot, SnapshotSink};

/// Persists the latest snapshot as JSON at a fixed path.
///
/// Each save replaces the previous snapshot via write-to-temp-then-rename,
/// so a crash mid-write leaves the old snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the most recently saved snapshot.
    pub fn load(&self) -> Result<RunSnapshot> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl SnapshotSink for JsonSnapshotStore {
    fn save(&self, snapshot: &RunSnapshot) -> Result<()> {
        let bytes = serde_json::to_vec(snapshot)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}
