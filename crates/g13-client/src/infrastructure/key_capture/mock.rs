//! Mock key source for unit testing.
//!
//! Lets tests inject synthetic [`RawKeyEvent`]s with *explicit* capture
//! timestamps, so offset arithmetic can be asserted exactly instead of
//! within a scheduler-jitter tolerance.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::{CaptureError, KeyEventKind, KeySource, RawKeyEvent};

/// A mock [`KeySource`] that tests drive by hand.
pub struct MockKeySource {
    sender: Arc<Mutex<Option<Sender<RawKeyEvent>>>>,
}

impl MockKeySource {
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns an injector bound to this source.  The injector can outlive
    /// individual acquisitions, like a real listener handle.
    pub fn injector(&self) -> MockKeyInjector {
        MockKeyInjector {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl Default for MockKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for MockKeySource {
    fn start(&self) -> Result<mpsc::Receiver<RawKeyEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

/// Injection handle for a [`MockKeySource`].
#[derive(Clone)]
pub struct MockKeyInjector {
    sender: Arc<Mutex<Option<Sender<RawKeyEvent>>>>,
}

impl MockKeyInjector {
    /// Injects a key-down stamped at `at`.
    ///
    /// Panics if capture is not currently held — a test injecting into a
    /// stopped source is a test bug.
    pub fn key_down_at(&self, code: &str, at: Instant) {
        self.inject(KeyEventKind::Down, code, at);
    }

    /// Injects a key-up stamped at `at`.
    pub fn key_up_at(&self, code: &str, at: Instant) {
        self.inject(KeyEventKind::Up, code, at);
    }

    fn inject(&self, kind: KeyEventKind, code: &str, at: Instant) {
        let guard = self.sender.lock().expect("lock poisoned");
        let sender = guard
            .as_ref()
            .expect("MockKeyInjector used while capture is not held");
        sender
            .send(RawKeyEvent {
                kind,
                code: code.to_string(),
                at,
            })
            .expect("receiver dropped while capture still held");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_events_arrive_in_order_with_their_timestamps() {
        let source = MockKeySource::new();
        let injector = source.injector();
        let rx = source.start().unwrap();

        let t0 = Instant::now();
        injector.key_down_at("KeyA", t0);
        injector.key_up_at("KeyA", t0 + std::time::Duration::from_millis(40));

        let down = rx.recv().unwrap();
        assert_eq!(down.kind, KeyEventKind::Down);
        assert_eq!(down.at, t0);
        let up = rx.recv().unwrap();
        assert_eq!(up.kind, KeyEventKind::Up);
        assert!(up.at > down.at);
    }

    #[test]
    fn test_stop_closes_the_channel() {
        let source = MockKeySource::new();
        let rx = source.start().unwrap();
        source.stop();
        assert!(rx.recv().is_err());
    }

    #[test]
    #[should_panic(expected = "capture is not held")]
    fn test_injecting_without_capture_panics() {
        let source = MockKeySource::new();
        source.injector().key_down_at("KeyA", Instant::now());
    }
}
