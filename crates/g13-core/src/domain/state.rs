//! The authoritative device-state snapshot and its field types.
//!
//! [`DeviceState`] mirrors what the device-owning daemon reports over the
//! duplex channel.  The client never patches a snapshot in place: the reducer
//! (see [`crate::protocol::reducer`]) produces a *new* value for every inbound
//! event and the old one is replaced by reference.  Consumers holding the old
//! reference keep seeing a complete, internally consistent snapshot — there is
//! no window in which a reader can observe a half-applied update.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Button-layer selector.  The physical M1/M2/M3 keys switch which mapping
/// set is logically active on the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Layer 1 — the power-on default.
    #[default]
    M1,
    /// Layer 2.
    M2,
    /// Layer 3.
    M3,
}

/// Analog thumb-stick position as reported by the daemon.
///
/// Raw axis values, centred on `(0, 0)`.  The client only mirrors them; any
/// dead-zone handling happens daemon-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoystickPosition {
    pub x: i16,
    pub y: i16,
}

/// LCD backlight colour and brightness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlight {
    /// Hex RGB colour string, e.g. `"#ff6b00"`.
    pub color: String,
    /// Brightness percentage.  Senders clamp to 0..=100; the reducer stores
    /// whatever the daemon reports without validating (the daemon is the
    /// authority on what the hardware accepted).
    pub brightness: u8,
}

impl Default for Backlight {
    fn default() -> Self {
        // The device's stock amber backlight at full brightness.
        Self {
            color: "#ff6b00".to_string(),
            brightness: 100,
        }
    }
}

/// Complete mirrored state of the remote device.
///
/// One snapshot is the unit of publication: the reducer replaces the whole
/// value on every event, and readers hold a reference to the version that was
/// current when they last looked.
///
/// # Serde representation
///
/// Field names match the daemon's JSON exactly:
///
/// ```json
/// {
///   "connected": true,
///   "active_profile": "fps",
///   "active_mode": "M1",
///   "pressed_keys": ["G1", "G5"],
///   "joystick": {"x": 0, "y": 0},
///   "backlight": {"color": "#ff6b00", "brightness": 100}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Whether the daemon currently has a live device attached.  Independent
    /// of whether *our* transport to the daemon is up.
    pub connected: bool,

    /// Name of the active mapping profile, if any.
    pub active_profile: Option<String>,

    /// Currently selected button layer.
    pub active_mode: Mode,

    /// Button identifiers currently held down.  Membership only — no press
    /// counts, no ordering.  `BTreeSet` makes the no-duplicates invariant
    /// structural and keeps serialization order stable.
    pub pressed_keys: BTreeSet<String>,

    /// Thumb-stick position.  Defaulted when absent so snapshots from older
    /// daemons without joystick reporting still parse.
    #[serde(default)]
    pub joystick: JoystickPosition,

    /// LCD backlight colour and brightness.
    pub backlight: Backlight,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            connected: false,
            active_profile: None,
            active_mode: Mode::M1,
            pressed_keys: BTreeSet::new(),
            joystick: JoystickPosition::default(),
            backlight: Backlight::default(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
