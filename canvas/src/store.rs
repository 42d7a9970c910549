//! Snapshot store: the latest drawable state, replaced wholesale.
//!
//! The store keeps at most one [`Snapshot`]. A message that classifies as a
//! render snapshot replaces it; anything else (non-render command, malformed
//! JSON, inconsistent counts) clears it, so the radar falls back to the
//! "waiting for data" state instead of drawing stale geometry. Replacement is
//! a single assignment between frames, so the compositor never observes a
//! half-updated snapshot.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use wire::{Message, Snapshot, WireError};

/// What happened to the current state after an ingest.
#[derive(Debug)]
pub enum Ingest {
    /// A render snapshot replaced the current state.
    Replaced,
    /// A well-formed, non-drawable command cleared the current state.
    Cleared(String),
    /// The message was rejected and the current state cleared.
    Rejected(WireError),
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<Snapshot>,
    accepted: u64,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `raw` and replace or clear the current snapshot.
    pub fn ingest(&mut self, raw: &str) -> Ingest {
        match wire::classify(raw) {
            Ok(Message::Render(snapshot)) => {
                self.replace(snapshot);
                Ingest::Replaced
            }
            Ok(Message::Other(command)) => {
                self.current = None;
                Ingest::Cleared(command)
            }
            Err(e) => {
                self.current = None;
                Ingest::Rejected(e)
            }
        }
    }

    /// Install an already-parsed snapshot. Non-render snapshots clear.
    pub fn replace(&mut self, snapshot: Snapshot) {
        if snapshot.validate().is_err() {
            self.current = None;
            return;
        }
        self.accepted += 1;
        self.current = Some(snapshot);
    }

    /// The current drawable snapshot, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Count of render snapshots accepted since creation.
    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}
