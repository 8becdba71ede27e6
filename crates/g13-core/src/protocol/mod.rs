//! Protocol module: message types, the JSON frame codec, and the reducer.

pub mod codec;
pub mod messages;
pub mod reducer;

pub use codec::{decode_event, encode_command, ProtocolError};
pub use messages::{ClientCommand, DeviceEvent};
pub use reducer::apply;
