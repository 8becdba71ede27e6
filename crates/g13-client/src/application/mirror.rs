//! The state mirror: authoritative local copy of the device state.
//!
//! [`StateMirror`] owns the current [`DeviceState`] snapshot and is the only
//! writer.  Each inbound event is folded through the pure reducer in
//! `g13-core` and the *new* snapshot replaces the old one inside a
//! `tokio::sync::watch` channel.  Readers hold `Arc`s to complete snapshots:
//! whoever looked a moment ago still has a consistent value, whoever looks
//! now gets the latest — no locks, no torn reads.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use g13_core::{apply, DeviceEvent, DeviceState};

/// Owns and publishes the mirrored device state.
pub struct StateMirror {
    tx: watch::Sender<Arc<DeviceState>>,
}

impl StateMirror {
    /// Creates a mirror holding the default (disconnected, M1) snapshot.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(DeviceState::default()));
        Self { tx }
    }

    /// Subscribes to snapshot updates.
    ///
    /// The receiver always yields the full current snapshot; intermediate
    /// versions may be skipped if the reader is slow, which is exactly the
    /// last-write-wins contract of the protocol.
    pub fn watch(&self) -> watch::Receiver<Arc<DeviceState>> {
        self.tx.subscribe()
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Arc<DeviceState> {
        self.tx.borrow().clone()
    }

    /// Folds one inbound event into the next snapshot and publishes it.
    pub fn apply_event(&self, event: &DeviceEvent) {
        let next = Arc::new(apply(&self.current(), event));
        trace!(?event, "snapshot updated");
        self.tx.send_replace(next);
    }
}

impl Default for StateMirror {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
