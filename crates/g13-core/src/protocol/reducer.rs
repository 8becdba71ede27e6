//! The pure device-state reducer.
//!
//! [`apply`] is a function of `(previous snapshot, event) → next snapshot`.
//! It never mutates the previous snapshot: the caller publishes the returned
//! value by replacing its reference, so a reader holding the old snapshot can
//! never observe a half-applied update.
//!
//! Events carry no ordering metadata; the contract is last-message-wins in
//! delivery order, which the single ordered transport preserves.  Unknown
//! event types never reach this function — the codec filters them.

use crate::domain::state::DeviceState;
use crate::protocol::messages::DeviceEvent;

/// Folds one inbound event into the next snapshot.
///
/// | event | effect |
/// |---|---|
/// | `state` | replace the entire snapshot with the payload |
/// | `button_pressed` | insert the button id into `pressed_keys` |
/// | `button_released` | remove the button id from `pressed_keys` |
/// | `mode_changed` | set `active_mode` |
/// | `profile_activated` | set `active_profile` |
/// | `backlight_changed` | replace `backlight` wholesale |
/// | `device_connected` | `connected = true` |
/// | `device_disconnected` | `connected = false` |
pub fn apply(prev: &DeviceState, event: &DeviceEvent) -> DeviceState {
    match event {
        DeviceEvent::State { data } => data.clone(),

        DeviceEvent::ButtonPressed { button } => {
            let mut next = prev.clone();
            // BTreeSet insertion is a no-op on repeats, so a daemon that
            // re-announces a held button cannot create duplicates.
            next.pressed_keys.insert(button.clone());
            next
        }

        DeviceEvent::ButtonReleased { button } => {
            let mut next = prev.clone();
            next.pressed_keys.remove(button);
            next
        }

        DeviceEvent::ModeChanged { mode } => {
            let mut next = prev.clone();
            next.active_mode = *mode;
            next
        }

        DeviceEvent::ProfileActivated { name } => {
            let mut next = prev.clone();
            next.active_profile = Some(name.clone());
            next
        }

        DeviceEvent::BacklightChanged { backlight } => {
            let mut next = prev.clone();
            next.backlight = backlight.clone();
            next
        }

        DeviceEvent::DeviceConnected => {
            let mut next = prev.clone();
            next.connected = true;
            next
        }

        DeviceEvent::DeviceDisconnected => {
            let mut next = prev.clone();
            next.connected = false;
            next
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
