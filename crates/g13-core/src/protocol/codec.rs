//! JSON frame codec for the daemon channel.
//!
//! Wire format: one JSON object per frame with a mandatory snake_case
//! `"type"` field.  There is no length prefix and no binary envelope — the
//! WebSocket layer already delivers whole frames.
//!
//! Decoding distinguishes two failure classes because the session treats
//! them differently:
//!
//! - [`ProtocolError::UnknownType`] — a well-formed object whose `type` is
//!   not in [`DEVICE_EVENT_TYPES`].  Forward compatible: logged at debug and
//!   ignored.
//! - [`ProtocolError::MalformedFrame`] — anything else that fails to parse,
//!   including a known `type` with a broken payload.  Logged at warn and
//!   dropped; never interrupts the connection.

use thiserror::Error;

use crate::protocol::messages::{ClientCommand, DeviceEvent, DEVICE_EVENT_TYPES};

/// Errors produced while decoding inbound frames or encoding commands.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The frame is not a JSON object with the expected shape.  Carries the
    /// underlying parse diagnostic for the log line.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The frame is a valid object whose `type` tag this client does not
    /// recognise.  Newer daemons may emit these; they are safe to ignore.
    #[error("unknown event type `{0}`")]
    UnknownType(String),

    /// A command could not be serialized.  Does not occur for any command
    /// this crate defines; kept so the session has one error channel.
    #[error("failed to encode command: {0}")]
    Encode(String),
}

/// Decodes one inbound text frame into a [`DeviceEvent`].
///
/// # Errors
///
/// [`ProtocolError::UnknownType`] for forward-compatible unknown tags,
/// [`ProtocolError::MalformedFrame`] for everything else that fails to parse.
///
/// # Examples
///
/// ```rust
/// use g13_core::protocol::{decode_event, DeviceEvent};
///
/// let ev = decode_event(r#"{"type":"device_connected"}"#).unwrap();
/// assert_eq!(ev, DeviceEvent::DeviceConnected);
/// ```
pub fn decode_event(frame: &str) -> Result<DeviceEvent, ProtocolError> {
    match serde_json::from_str::<DeviceEvent>(frame) {
        Ok(event) => Ok(event),
        Err(parse_err) => {
            // Typed parse failed.  Re-read the frame loosely to find out
            // whether this is a foreign event type or genuine garbage.
            let value: serde_json::Value = serde_json::from_str(frame)
                .map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;

            match value.get("type").and_then(|t| t.as_str()) {
                Some(tag) if !DEVICE_EVENT_TYPES.contains(&tag) => {
                    Err(ProtocolError::UnknownType(tag.to_string()))
                }
                Some(_) => Err(ProtocolError::MalformedFrame(parse_err.to_string())),
                None => Err(ProtocolError::MalformedFrame(
                    "missing `type` discriminator".to_string(),
                )),
            }
        }
    }
}

/// Encodes a [`ClientCommand`] as one JSON text frame.
///
/// # Errors
///
/// [`ProtocolError::Encode`] if serialization fails — unreachable for the
/// commands defined in this crate, but propagated rather than panicking.
pub fn encode_command(command: &ClientCommand) -> Result<String, ProtocolError> {
    serde_json::to_string(command).map_err(|e| ProtocolError::Encode(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::Mode;

    #[test]
    fn test_decode_known_event() {
        let ev = decode_event(r#"{"type":"mode_changed","mode":"M2"}"#).unwrap();
        assert_eq!(ev, DeviceEvent::ModeChanged { mode: Mode::M2 });
    }

    #[test]
    fn test_decode_unknown_type_is_classified_as_unknown() {
        let err = decode_event(r#"{"type":"lcd_refreshed","rows":4}"#).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownType("lcd_refreshed".to_string()));
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode_event("not json at all").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame(_)));
    }

    #[test]
    fn test_decode_object_without_type_is_malformed() {
        let err = decode_event(r#"{"button":"G1"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame(_)));
    }

    #[test]
    fn test_decode_known_type_with_broken_payload_is_malformed() {
        // `mode_changed` with a mode outside M1/M2/M3 is a bad payload, not
        // a foreign event.
        let err = decode_event(r#"{"type":"mode_changed","mode":"M9"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame(_)));
    }

    #[test]
    fn test_decode_non_string_type_is_malformed() {
        let err = decode_event(r#"{"type":42}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame(_)));
    }

    #[test]
    fn test_encode_decode_is_stable_for_commands() {
        let cmd = ClientCommand::SimulatePress {
            button: "G13".to_string(),
        };
        let frame = encode_command(&cmd).unwrap();
        let back: ClientCommand = serde_json::from_str(&frame).unwrap();
        assert_eq!(back, cmd);
    }
}
