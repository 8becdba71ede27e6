//! Channel-backed key source fed by the embedding UI shell.
//!
//! The control surface core is headless; whatever hosts it (a window shell, a
//! web view bridge) already receives process-scope keyboard input and pushes
//! it through a [`KeyEventHandle`].  The handle stamps each transition with
//! the push instant and forwards it only while the capture capability is
//! held, so a recording sees exactly the events that fired between its
//! `start()` and `stop()`.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::{CaptureError, KeyEventKind, KeySource, RawKeyEvent};

/// Shared slot holding the sender of the current acquisition, if any.
type SenderSlot = Arc<Mutex<Option<Sender<RawKeyEvent>>>>;

/// Production [`KeySource`] fed through [`KeyEventHandle`]s.
pub struct ChannelKeySource {
    slot: SenderSlot,
}

impl ChannelKeySource {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns a handle for pushing key events into this source.
    ///
    /// Handles are cheap to clone and remain valid across acquisitions;
    /// pushes made while no capture is active are discarded.
    pub fn handle(&self) -> KeyEventHandle {
        KeyEventHandle {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl Default for ChannelKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for ChannelKeySource {
    fn start(&self) -> Result<mpsc::Receiver<RawKeyEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel();
        // Replacing the slot drops any previous sender, which closes the
        // previous acquisition's channel.
        *self.slot.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        *self.slot.lock().expect("lock poisoned") = None;
    }
}

/// Push side of a [`ChannelKeySource`], held by the embedding shell.
#[derive(Clone)]
pub struct KeyEventHandle {
    slot: SenderSlot,
}

impl KeyEventHandle {
    /// Reports a key-down transition, stamped now.
    pub fn key_down(&self, code: impl Into<String>) {
        self.push(KeyEventKind::Down, code.into());
    }

    /// Reports a key-up transition, stamped now.
    pub fn key_up(&self, code: impl Into<String>) {
        self.push(KeyEventKind::Up, code.into());
    }

    fn push(&self, kind: KeyEventKind, code: String) {
        let guard = self.slot.lock().expect("lock poisoned");
        if let Some(tx) = guard.as_ref() {
            // A send error means the receiver was dropped mid-stop; the
            // event is moot either way.
            let _ = tx.send(RawKeyEvent {
                kind,
                code,
                at: Instant::now(),
            });
        }
        // No capture active: the event is discarded, not buffered.
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
