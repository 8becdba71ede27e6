//! The macro recorder: timed key sequences into portable steps.
//!
//! A recording session runs between `start()` and `stop()`.  On `start()`
//! the recorder acquires the process-scope capture capability from its
//! [`KeySource`]; on `stop()` (and on every other exit path, including drop)
//! it releases the capability, so no listener outlives the recorder.
//!
//! Raw events are stamped by the source *at capture time*; the recorder
//! computes `offset_ms` from those stamps when it drains the channel, so a
//! busy dispatch loop cannot distort step timing.
//!
//! Semantics, deliberately:
//!
//! - Pure modifier transitions produce no step at all.
//! - Every other transition produces exactly one step — no de-duplication.
//! - `stop()` does not synthesise releases: a recording stopped mid-press
//!   ends with an unmatched `Press`, which is valid data.
//! - `start()` during an active recording discards the in-progress steps
//!   wholesale: last `start()` wins.
//! - No length or duration limit.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use tracing::debug;

use g13_core::domain::keys::is_pure_modifier;
use g13_core::{MacroStep, StepKind};

use crate::infrastructure::key_capture::{CaptureError, KeyEventKind, KeySource, RawKeyEvent};

/// The in-progress recording owned by the recorder while active.
struct ActiveRecording {
    started_at: Instant,
    steps: Vec<MacroStep>,
    raw_rx: Receiver<RawKeyEvent>,
}

/// Records timed press/release sequences from a [`KeySource`].
pub struct MacroRecorder<S: KeySource> {
    source: S,
    active: Option<ActiveRecording>,
}

impl<S: KeySource> MacroRecorder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            active: None,
        }
    }

    /// Begins a recording session.
    ///
    /// Clears any prior steps and captures the start instant.  If a session
    /// is already active it is discarded — its capture is released and its
    /// steps never surface anywhere.
    ///
    /// # Errors
    ///
    /// Propagates [`CaptureError`] when the source cannot attach its
    /// listener; the recorder stays idle in that case.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.active.take().is_some() {
            debug!("recording restarted; discarding in-progress steps");
            self.source.stop();
        }
        let raw_rx = self.source.start()?;
        self.active = Some(ActiveRecording {
            started_at: Instant::now(),
            steps: Vec::new(),
            raw_rx,
        });
        Ok(())
    }

    /// Whether a recording session is active.
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// The start instant of the active session, if any.
    pub fn started_at(&self) -> Option<Instant> {
        self.active.as_ref().map(|rec| rec.started_at)
    }

    /// Number of steps captured so far in the active session.
    pub fn steps_captured(&mut self) -> usize {
        self.drain();
        self.active.as_ref().map_or(0, |rec| rec.steps.len())
    }

    /// Ends the session and returns the ordered step list.
    ///
    /// Releases the capture capability.  Returns an empty list when nothing
    /// was captured or when no session was active.
    pub fn stop(&mut self) -> Vec<MacroStep> {
        self.drain();
        match self.active.take() {
            Some(recording) => {
                self.source.stop();
                recording.steps
            }
            None => Vec::new(),
        }
    }

    /// Converts pending raw events into steps, in capture order.
    fn drain(&mut self) {
        let Some(recording) = self.active.as_mut() else {
            return;
        };
        while let Ok(raw) = recording.raw_rx.try_recv() {
            if is_pure_modifier(&raw.code) {
                continue;
            }
            let offset_ms = raw
                .at
                .saturating_duration_since(recording.started_at)
                .as_millis() as u64;
            let kind = match raw.kind {
                KeyEventKind::Down => StepKind::Press,
                KeyEventKind::Up => StepKind::Release,
            };
            recording.steps.push(MacroStep {
                kind,
                code: raw.code,
                offset_ms,
            });
        }
    }
}

impl<S: KeySource> Drop for MacroRecorder<S> {
    fn drop(&mut self) {
        // Guaranteed release: abnormal teardown must not leak the listener.
        if self.active.is_some() {
            self.source.stop();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
