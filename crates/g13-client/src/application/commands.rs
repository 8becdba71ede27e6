//! The command emitter: user intents become protocol commands.
//!
//! Each intent method builds exactly one [`ClientCommand`] and hands it to
//! [`DeviceSession::send`].  There is no acknowledgement, no failure return,
//! and no retry: while the transport is down the command evaporates, and the
//! caller's only signals are the transport-connected flag and whatever state
//! echo the daemon later pushes.

use std::sync::Arc;

use g13_core::{ClientCommand, Mode};

use crate::infrastructure::session::DeviceSession;

/// Fire-and-forget intent surface over a [`DeviceSession`].
#[derive(Clone)]
pub struct CommandEmitter {
    session: Arc<DeviceSession>,
}

impl CommandEmitter {
    pub fn new(session: Arc<DeviceSession>) -> Self {
        Self { session }
    }

    /// Requests a full state snapshot.
    pub async fn request_state(&self) {
        self.session.send(&ClientCommand::GetState).await;
    }

    /// Switches the active button layer.
    pub async fn set_mode(&self, mode: Mode) {
        self.session.send(&ClientCommand::SetMode { mode }).await;
    }

    /// Binds `button` to `key` on the device side.  Locally held mapping
    /// edits are a persistence concern and never travel this channel.
    pub async fn set_mapping(&self, button: &str, key: &str) {
        self.session
            .send(&ClientCommand::SetMapping {
                button: button.to_string(),
                key: key.to_string(),
            })
            .await;
    }

    /// Simulates a physical press of `button`.
    pub async fn simulate_press(&self, button: &str) {
        self.session
            .send(&ClientCommand::SimulatePress {
                button: button.to_string(),
            })
            .await;
    }

    /// Simulates a physical release of `button`.
    pub async fn simulate_release(&self, button: &str) {
        self.session
            .send(&ClientCommand::SimulateRelease {
                button: button.to_string(),
            })
            .await;
    }

    /// Changes the backlight colour, and optionally the brightness.
    ///
    /// `brightness: None` is transmitted as an absent field — "leave it as
    /// it is" — because a defaulted number would overwrite the remote value.
    pub async fn set_backlight(&self, color: &str, brightness: Option<u8>) {
        self.session
            .send(&ClientCommand::SetBacklight {
                color: color.to_string(),
                brightness,
            })
            .await;
    }
}
