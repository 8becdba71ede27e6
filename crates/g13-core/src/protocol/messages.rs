//! All messages exchanged with the device-owning daemon.
//!
//! The channel is duplex but the two directions carry different vocabularies:
//!
//! - The daemon *pushes* state changes ([`DeviceEvent`]).
//! - The client *sends* user intents ([`ClientCommand`]).
//!
//! Using two distinct enums makes it a compile-time error to feed a command
//! to the reducer or to transmit an event.
//!
//! # JSON discriminant
//!
//! Every frame is one JSON object with a snake_case `"type"` field naming the
//! variant; all other fields are flattened into the same object:
//!
//! ```json
//! {"type":"button_pressed","button":"G1"}
//! {"type":"set_backlight","color":"#2080ff","brightness":60}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles this automatically.

use serde::{Deserialize, Serialize};

use crate::domain::state::{Backlight, DeviceState, Mode};

// ── Daemon → client events ────────────────────────────────────────────────────

/// All state-change events the daemon pushes to the client.
///
/// Events carry no sequence numbers and no timestamps: the contract is
/// last-message-wins in delivery order, and the single ordered channel is
/// what preserves that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// Full snapshot replacement.  Sent in reply to `get_state`; the daemon
    /// never pushes it unprompted.
    State { data: DeviceState },

    /// A physical (or simulated) button went down.
    ButtonPressed { button: String },

    /// A physical (or simulated) button came up.
    ButtonReleased { button: String },

    /// The active button layer changed.
    ModeChanged { mode: Mode },

    /// A mapping profile became active.
    ProfileActivated { name: String },

    /// Backlight colour and/or brightness changed; the event always carries
    /// the complete resulting backlight value.
    BacklightChanged { backlight: Backlight },

    /// The daemon attached a physical device.
    DeviceConnected,

    /// The daemon lost the physical device.  The transport to the daemon is
    /// typically still up when this arrives.
    DeviceDisconnected,
}

/// The snake_case `type` tags of every known [`DeviceEvent`] variant.
///
/// The codec consults this to tell an *unknown* event type (accepted and
/// ignored, forward compatible) apart from a *malformed* frame (dropped with
/// a diagnostic).
pub const DEVICE_EVENT_TYPES: [&str; 8] = [
    "state",
    "button_pressed",
    "button_released",
    "mode_changed",
    "profile_activated",
    "backlight_changed",
    "device_connected",
    "device_disconnected",
];

// ── Client → daemon commands ──────────────────────────────────────────────────

/// All intents the client can send to the daemon.
///
/// Commands are fire-and-forget: no acknowledgement exists, no response is
/// correlated, and a command sent while the transport is down is silently
/// dropped.  Callers observe success only through subsequent state echoes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Ask for a full `state` snapshot.  Sent automatically on every
    /// connection open, because the daemon pushes nothing unprompted.
    GetState,

    /// Switch the active button layer.
    SetMode { mode: Mode },

    /// Bind a device button to a key, device-side.
    SetMapping { button: String, key: String },

    /// Act as if `button` was physically pressed.
    SimulatePress { button: String },

    /// Act as if `button` was physically released.
    SimulateRelease { button: String },

    /// Change the backlight.  `brightness: None` serializes as an *absent*
    /// field, which the daemon reads as "leave brightness unchanged" — a
    /// defaulted number here would overwrite remote state.
    SetBacklight {
        color: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        brightness: Option<u8>,
    },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
