//! The duplex WebSocket session to the device-owning daemon.
//!
//! [`DeviceSession`] owns the one live connection and drives the lifecycle
//! `Disconnected → Connecting → Open → Disconnected (reconnect scheduled) → …`
//! inside a single spawned task.  Consumers observe it through two signals:
//!
//! - a `watch::Receiver<bool>` transport-connected flag, and
//! - an ordered stream of [`SessionEvent`]s carrying decoded inbound frames.
//!
//! # Delivery contract
//!
//! Inbound frames are decoded and forwarded on one channel by one task, so
//! application order equals delivery order — the reducer's last-write-wins
//! contract depends on this.  Outbound [`ClientCommand`]s are best-effort,
//! at-most-once: [`DeviceSession::send`] writes to the open socket or drops
//! the command silently when there is none.  Nothing is queued and nothing is
//! retried; callers infer success from subsequent state echoes.
//!
//! # Reconnect
//!
//! A fixed delay, forever, no backoff.  The `sleep` inside the run loop *is*
//! the single pending reconnect timer: there is never more than one, and
//! [`DeviceSession::disconnect`] wakes it so a manual disconnect prevents the
//! scheduled attempt from ever running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Mutex, Notify};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use g13_core::protocol::codec::{decode_event, encode_command, ProtocolError};
use g13_core::protocol::messages::ClientCommand;
use g13_core::DeviceEvent;

use crate::domain::config::{ClientConfig, DEFAULT_DAEMON_URL, DEFAULT_RECONNECT_DELAY};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Connection settings for a [`DeviceSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket URL of the daemon, e.g. `ws://127.0.0.1:8765/ws`.
    pub daemon_url: String,
    /// Delay between reconnect attempts.  Fixed — no backoff by design.
    pub reconnect_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            daemon_url: DEFAULT_DAEMON_URL.to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl From<&ClientConfig> for SessionConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            daemon_url: config.daemon_url.clone(),
            reconnect_delay: config.reconnect_delay,
        }
    }
}

/// Events emitted by the session to the application layer.
#[derive(Debug)]
pub enum SessionEvent {
    /// The WebSocket opened.  A `get_state` request has already been queued —
    /// the daemon pushes nothing unprompted.
    Connected,
    /// The WebSocket closed or errored.  A reconnect attempt is scheduled
    /// unless [`DeviceSession::disconnect`] was called.
    Disconnected,
    /// A decoded inbound frame, in delivery order.
    EventReceived(DeviceEvent),
}

/// Owns the duplex channel to the daemon.
///
/// Exactly one underlying WebSocket is live at a time; a superseded
/// connection is discarded on close.  Nothing outside this type ever holds
/// the socket.
pub struct DeviceSession {
    config: SessionConfig,
    /// Write half of the open socket, `None` while not `Open`.
    sink: Mutex<Option<WsSink>>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    connected_tx: watch::Sender<bool>,
    /// Wakes the reconnect wait and the read loop on manual disconnect.
    shutdown: Notify,
    /// `true` while the run loop owns the lifecycle (connecting, open, or
    /// waiting to reconnect).
    running: AtomicBool,
}

impl DeviceSession {
    /// Creates a session and the receiving end of its event stream.
    ///
    /// The session starts `Disconnected`; call [`connect`](Self::connect) to
    /// begin the lifecycle.
    pub fn new(config: SessionConfig) -> (Arc<Self>, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (connected_tx, _) = watch::channel(false);
        let session = Arc::new(Self {
            config,
            sink: Mutex::new(None),
            events_tx,
            connected_tx,
            shutdown: Notify::new(),
            running: AtomicBool::new(false),
        });
        (session, events_rx)
    }

    /// Observable transport-connected flag.
    ///
    /// `true` exactly while the WebSocket is `Open`.  Independent of the
    /// device-attached flag inside the mirrored state.
    pub fn transport_connected(&self) -> watch::Receiver<bool> {
        self.connected_tx.subscribe()
    }

    /// Starts the connect/reconnect loop if it is not already running.
    ///
    /// Idempotent: while the session is connecting, open, or waiting to
    /// reconnect, further calls do nothing.  After a
    /// [`disconnect`](Self::disconnect) the loop may be started again.
    /// Call as `session.clone().connect()` — the loop task keeps the clone.
    pub fn connect(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("connect() ignored; session loop already running");
            return;
        }
        tokio::spawn(async move {
            self.run().await;
        });
    }

    /// Tears the channel down and cancels any pending reconnect.
    ///
    /// Safe to call at any point in the lifecycle, including before the
    /// first [`connect`](Self::connect).
    pub async fn disconnect(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.shutdown.notify_waiters();
        let mut guard = self.sink.lock().await;
        if let Some(mut sink) = guard.take() {
            let _ = sink.close().await;
        }
        self.connected_tx.send_replace(false);
        info!("session disconnected by request");
    }

    /// Sends one command, best-effort.
    ///
    /// While the session is not `Open` the command is dropped silently — a
    /// deliberate at-most-once policy, not an error.  No delivery feedback
    /// exists beyond the transport-connected flag and later state echoes.
    pub async fn send(&self, command: &ClientCommand) {
        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            debug!(?command, "transport not open; command dropped");
            return;
        };
        match encode_command(command) {
            Ok(frame) => {
                if let Err(e) = sink.send(WsMessage::Text(frame)).await {
                    // The read loop will observe the same failure and drive
                    // the state machine to Disconnected.
                    warn!("write to daemon failed: {e}");
                }
            }
            Err(e) => warn!("command not sent: {e}"),
        }
    }

    // ── Run loop ──────────────────────────────────────────────────────────────

    /// The connect/reconnect lifecycle.  Runs until [`disconnect`] clears
    /// `running`.
    ///
    /// [`disconnect`]: Self::disconnect
    async fn run(self: Arc<Self>) {
        while self.running.load(Ordering::SeqCst) {
            // Connecting.
            match connect_async(self.config.daemon_url.as_str()).await {
                Ok((ws, _response)) => {
                    if !self.running.load(Ordering::SeqCst) {
                        // disconnect() raced the handshake; discard the socket.
                        let (mut sink, _) = ws.split();
                        let _ = sink.close().await;
                        break;
                    }

                    info!("connected to daemon at {}", self.config.daemon_url);
                    let (sink, mut stream) = ws.split();
                    *self.sink.lock().await = Some(sink);
                    self.connected_tx.send_replace(true);
                    let _ = self.events_tx.send(SessionEvent::Connected);

                    // No implicit state push on open: ask for the snapshot.
                    self.send(&ClientCommand::GetState).await;

                    // Open — until the peer closes, the socket errors, or
                    // disconnect() intervenes.
                    self.read_frames(&mut stream).await;

                    *self.sink.lock().await = None;
                    self.connected_tx.send_replace(false);
                    let _ = self.events_tx.send(SessionEvent::Disconnected);
                }
                Err(e) => {
                    debug!(
                        "could not connect to daemon at {}: {e}",
                        self.config.daemon_url
                    );
                }
            }

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            // Disconnected, reconnect scheduled.  This await is the only
            // pending timer; disconnect() wakes it and the loop exits above.
            tokio::select! {
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
                _ = self.shutdown.notified() => {}
            }
        }
        debug!("session run loop stopped");
    }

    /// Reads frames until the connection ends.
    ///
    /// Malformed frames and unknown event types are logged and dropped; they
    /// never terminate the connection.
    async fn read_frames(&self, stream: &mut WsStream) {
        loop {
            let message = tokio::select! {
                m = stream.next() => m,
                _ = self.shutdown.notified() => return,
            };

            match message {
                Some(Ok(WsMessage::Text(frame))) => match decode_event(&frame) {
                    Ok(event) => {
                        if self
                            .events_tx
                            .send(SessionEvent::EventReceived(event))
                            .is_err()
                        {
                            // Receiver gone; the session has no audience.
                            return;
                        }
                    }
                    Err(ProtocolError::UnknownType(tag)) => {
                        debug!("ignoring unknown event type `{tag}`");
                    }
                    Err(e) => {
                        warn!("dropping malformed frame: {e}");
                    }
                },
                Some(Ok(WsMessage::Close(_))) => {
                    info!("daemon closed the channel");
                    return;
                }
                // Binary frames are not part of this protocol; ping/pong is
                // handled by tungstenite itself.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("read error on daemon channel: {e}");
                    return;
                }
                None => {
                    info!("daemon channel ended");
                    return;
                }
            }
        }
    }
}
