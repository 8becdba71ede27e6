//! Domain entities for the G13 control surface.
//!
//! This module contains pure business types with no infrastructure
//! dependencies: no sockets, no async runtime, no OS APIs.  Everything here
//! can be constructed and tested on any platform without external setup.
//!
//! The three concerns:
//!
//! - [`state`] – the authoritative [`state::DeviceState`] snapshot mirrored
//!   from the device-owning daemon.
//! - [`macros`] – the portable timed step format produced by macro recording
//!   and consumed by the persistence service.
//! - [`keys`] – classification of hardware key codes (currently only the
//!   pure-modifier table used by the recording filter).

pub mod keys;
pub mod macros;
pub mod state;
