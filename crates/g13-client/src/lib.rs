//! g13-client library crate.
//!
//! The control-surface client for a G13-class multi-button peripheral.  The
//! physical device is owned by a separate daemon process; this crate keeps a
//! live mirror of its state, turns user intents into protocol commands, and
//! records timed macro sequences from raw keyboard input.
//!
//! # Architecture
//!
//! ```text
//! device-owning daemon  (JSON over WebSocket, ws://…/ws  +  REST, http://…/api)
//!         ↕
//! [g13-client]
//!   ├── domain/           ClientConfig (pure settings, TOML-loadable)
//!   ├── application/      StateMirror, CommandEmitter, MacroRecorder,
//!   │                     save_recording
//!   └── infrastructure/
//!         ├── session/     DeviceSession — connect/reconnect loop, frame I/O
//!         ├── key_capture/ KeySource trait + channel/mock adapters
//!         └── api/         G13ApiClient — profile/macro persistence (REST)
//! ```
//!
//! # Layer rules
//!
//! - `domain` holds pure types: no I/O, no async, no sockets.
//! - `application` holds the use cases; it depends on `domain`, `g13-core`,
//!   and the infrastructure *traits and handles* it is driven through.
//! - `infrastructure` owns every socket, timer, and OS resource.
//!
//! # Dataflow
//!
//! The session task is the only owner of the WebSocket.  Decoded inbound
//! events flow through one ordered channel to the dispatch loop, which folds
//! them into the mirror; the mirror publishes each new snapshot by
//! replacement, so readers never see a torn state.  Commands travel the other
//! way, fire-and-forget.  Macro recording is independent of the transport
//! entirely: it taps process-scope key input through a capability acquired on
//! `start()` and released on `stop()`.

/// Domain layer: pure configuration types.
pub mod domain;

/// Application layer: the sync, command, and recording use cases.
pub mod application;

/// Infrastructure layer: WebSocket session, key capture, REST persistence.
pub mod infrastructure;
