use std::sync::Mutex;

use anyhow::anyhow;

use flowdag::snapshot::{RunSnapshot, SnapshotSink};
use flowdag::errors::Result;

/// Snapshot sink that records every save in memory, optionally failing each
/// one, so tests can assert both the snapshot cadence and the
/// failure-tolerance contract.
#[derive(Debug, Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<RunSnapshot>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn saved(&self) -> Vec<RunSnapshot> {
        self.saved.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<RunSnapshot> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl SnapshotSink for RecordingSink {
    fn save(&self, snapshot: &RunSnapshot) -> Result<()> {
        self.saved.lock().unwrap().push(snapshot.clone());
        if self.fail {
            return Err(anyhow!("recording sink configured to fail").into());
        }
        Ok(())
    }
}
