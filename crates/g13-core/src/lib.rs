//! # g13-core
//!
//! Shared library for the G13 control surface containing the wire protocol
//! types, the JSON frame codec, the pure device-state reducer, and the macro
//! step domain types.
//!
//! This crate is used by the control-surface client and by any future tool
//! that needs to speak the daemon protocol.  It has zero dependencies on OS
//! APIs, async runtimes, or network sockets.
//!
//! # Module map
//!
//! - **`protocol`** – What travels over the duplex channel to the
//!   device-owning daemon.  Every frame is one JSON object with a mandatory
//!   `type` discriminator; [`protocol::codec`] decodes inbound frames into
//!   [`DeviceEvent`]s and encodes [`ClientCommand`]s, and
//!   [`protocol::reducer`] folds inbound events into the next
//!   [`DeviceState`] snapshot.
//!
//! - **`domain`** – Pure entities with no protocol knowledge: the
//!   [`DeviceState`] snapshot itself, the recorded [`MacroStep`] format, and
//!   the pure-modifier key table used by the recording filter.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `g13_core::DeviceState` instead of `g13_core::domain::state::DeviceState`.
pub use domain::macros::{Macro, MacroStep, StepKind};
pub use domain::state::{Backlight, DeviceState, JoystickPosition, Mode};
pub use protocol::codec::{decode_event, encode_command, ProtocolError};
pub use protocol::messages::{ClientCommand, DeviceEvent};
pub use protocol::reducer::apply;
