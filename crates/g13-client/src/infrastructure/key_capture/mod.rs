//! Process-scope key capture for macro recording.
//!
//! Recording has to see key transitions no matter which widget has focus, so
//! capture is modelled as a *capability*: a [`KeySource`] hands out a fresh
//! event receiver on `start()` and releases the underlying listener on
//! `stop()`.  The recorder acquires the capability when a recording starts
//! and releases it on every exit path, so no listener outlives its owner.
//!
//! Two sources ship:
//!
//! - [`channel::ChannelKeySource`] — production adapter.  The UI shell that
//!   embeds this crate forwards its process-scope key events through a
//!   cloneable [`channel::KeyEventHandle`]; pushes made while the capability
//!   is not held are discarded.
//! - [`mock::MockKeySource`] — test adapter with explicit-timestamp
//!   injection.
//!
//! Events carry the [`Instant`] at which the source saw the transition, so
//! step offsets are computed from capture time, not from whenever the
//! recorder gets around to draining the channel.

use std::sync::mpsc;
use std::time::Instant;

pub mod channel;
pub mod mock;

/// Which transition a raw event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Down,
    Up,
}

/// A raw key transition as produced by a key source.
#[derive(Debug, Clone)]
pub struct RawKeyEvent {
    pub kind: KeyEventKind,
    /// Hardware-level position code (`"KeyA"`, `"ShiftLeft"`, …), never the
    /// printable character.
    pub code: String,
    /// When the source saw the transition.
    pub at: Instant,
}

/// Error type for capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The platform listener could not be attached.
    #[error("failed to attach key listener: {0}")]
    AttachFailed(String),
}

/// Trait abstracting where raw key events come from.
///
/// `start()` acquires the capture capability and returns the receiver for
/// this acquisition; `stop()` releases it.  Starting again after a stop (or
/// over a live capture) yields a fresh channel — events from a previous
/// acquisition are never replayed into a new one.
pub trait KeySource: Send {
    /// Acquires capture and returns the receiver for captured events.
    fn start(&self) -> Result<mpsc::Receiver<RawKeyEvent>, CaptureError>;

    /// Releases capture.  Idempotent; a no-op when capture is not held.
    fn stop(&self);
}
