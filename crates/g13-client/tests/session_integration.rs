//! Integration tests for the daemon session against a real local WebSocket
//! peer.
//!
//! Each test binds an ephemeral listener and plays the daemon's side of the
//! protocol by hand, so the full path — TCP connect, WebSocket handshake,
//! frame codec, session state machine — is exercised exactly as in
//! production, minus only the real daemon.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use g13_client::application::{CommandEmitter, StateMirror};
use g13_client::infrastructure::session::{DeviceSession, SessionConfig, SessionEvent};
use g13_core::{DeviceEvent, Mode};

/// Generous bound for any single await in these tests.
const WAIT: Duration = Duration::from_secs(5);

async fn bind_daemon() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("ws://{}/ws", listener.local_addr().expect("addr"));
    (listener, url)
}

fn session_with(
    url: String,
    reconnect: Duration,
) -> (
    Arc<DeviceSession>,
    tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
) {
    DeviceSession::new(SessionConfig {
        daemon_url: url,
        reconnect_delay: reconnect,
    })
}

/// Accepts one connection and completes the WebSocket handshake.
async fn accept_ws(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(WAIT, listener.accept())
        .await
        .expect("no connection attempt")
        .expect("accept");
    accept_async(stream).await.expect("ws handshake")
}

/// Reads the next text frame from the daemon side.
async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> String {
    let msg = timeout(WAIT, ws.next())
        .await
        .expect("no frame")
        .expect("stream ended")
        .expect("ws error");
    msg.into_text().expect("text frame")
}

async fn next_event(
    events: &mut tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
) -> SessionEvent {
    timeout(WAIT, events.recv())
        .await
        .expect("no session event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_open_requests_state_then_streams_events_in_order() {
    let (listener, url) = bind_daemon().await;
    let (session, mut events) = session_with(url, Duration::from_millis(100));
    session.clone().connect();

    let mut ws = accept_ws(&listener).await;

    // The session must ask for the snapshot before anything else — the
    // daemon pushes nothing unprompted.
    assert_eq!(next_text(&mut ws).await, r#"{"type":"get_state"}"#);

    assert!(matches!(next_event(&mut events).await, SessionEvent::Connected));
    assert!(*session.transport_connected().borrow());

    // Deliver good, malformed, unknown, and good frames, in that order.
    ws.send(Message::Text(r#"{"type":"mode_changed","mode":"M2"}"#.into()))
        .await
        .unwrap();
    ws.send(Message::Text("definitely not json".into()))
        .await
        .unwrap();
    ws.send(Message::Text(r#"{"type":"battery_level","percent":70}"#.into()))
        .await
        .unwrap();
    ws.send(Message::Text(r#"{"type":"button_pressed","button":"G1"}"#.into()))
        .await
        .unwrap();

    // Only the two decodable frames surface, in delivery order, and the
    // rejects did not disturb the connection.
    match next_event(&mut events).await {
        SessionEvent::EventReceived(DeviceEvent::ModeChanged { mode }) => {
            assert_eq!(mode, Mode::M2)
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match next_event(&mut events).await {
        SessionEvent::EventReceived(DeviceEvent::ButtonPressed { button }) => {
            assert_eq!(button, "G1")
        }
        other => panic!("unexpected event: {other:?}"),
    }

    session.disconnect().await;
    assert!(!*session.transport_connected().borrow());
}

#[tokio::test]
async fn test_reconnects_once_after_drop_with_fresh_state_request() {
    let (listener, url) = bind_daemon().await;
    let (session, mut events) = session_with(url, Duration::from_millis(100));
    session.clone().connect();

    {
        let mut ws = accept_ws(&listener).await;
        assert_eq!(next_text(&mut ws).await, r#"{"type":"get_state"}"#);
        assert!(matches!(next_event(&mut events).await, SessionEvent::Connected));
        // Daemon dies: drop without a close handshake.
    }

    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::Disconnected
    ));

    // Exactly one attempt is scheduled; it arrives and re-requests state.
    let mut ws2 = accept_ws(&listener).await;
    assert_eq!(next_text(&mut ws2).await, r#"{"type":"get_state"}"#);
    assert!(matches!(next_event(&mut events).await, SessionEvent::Connected));

    // While this connection stays up no further attempt is made.
    assert!(
        timeout(Duration::from_millis(400), listener.accept())
            .await
            .is_err(),
        "session opened a second connection while one was live"
    );

    session.disconnect().await;
}

#[tokio::test]
async fn test_disconnect_cancels_the_pending_reconnect() {
    let (listener, url) = bind_daemon().await;
    let (session, mut events) = session_with(url, Duration::from_millis(300));
    session.clone().connect();

    {
        let mut ws = accept_ws(&listener).await;
        assert_eq!(next_text(&mut ws).await, r#"{"type":"get_state"}"#);
        assert!(matches!(next_event(&mut events).await, SessionEvent::Connected));
    }

    // The drop schedules a reconnect 300 ms out; cancel it first.
    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::Disconnected
    ));
    session.disconnect().await;

    // Well past the reconnect delay: the cancelled attempt must never run.
    assert!(
        timeout(Duration::from_millis(900), listener.accept())
            .await
            .is_err(),
        "reconnect attempt ran after disconnect()"
    );
}

#[tokio::test]
async fn test_connect_is_idempotent_while_running() {
    let (listener, url) = bind_daemon().await;
    let (session, mut events) = session_with(url, Duration::from_millis(100));
    session.clone().connect();
    session.clone().connect();
    session.clone().connect();

    let mut ws = accept_ws(&listener).await;
    assert_eq!(next_text(&mut ws).await, r#"{"type":"get_state"}"#);
    assert!(matches!(next_event(&mut events).await, SessionEvent::Connected));

    // Redundant connect() calls spawned no extra connections.
    assert!(
        timeout(Duration::from_millis(400), listener.accept())
            .await
            .is_err(),
        "duplicate connect() opened another connection"
    );

    session.disconnect().await;
}

#[tokio::test]
async fn test_commands_reach_the_wire_with_exact_shapes() {
    let (listener, url) = bind_daemon().await;
    let (session, mut events) = session_with(url, Duration::from_millis(100));
    session.clone().connect();

    let mut ws = accept_ws(&listener).await;
    assert_eq!(next_text(&mut ws).await, r#"{"type":"get_state"}"#);
    assert!(matches!(next_event(&mut events).await, SessionEvent::Connected));

    let emitter = CommandEmitter::new(Arc::clone(&session));
    emitter.set_mode(Mode::M3).await;
    emitter.set_backlight("#0a0b0c", None).await;
    emitter.set_backlight("#0a0b0c", Some(40)).await;
    emitter.simulate_press("G9").await;

    assert_eq!(next_text(&mut ws).await, r#"{"type":"set_mode","mode":"M3"}"#);
    // Omitted brightness must be an absent field, not a defaulted number.
    assert_eq!(
        next_text(&mut ws).await,
        r##"{"type":"set_backlight","color":"#0a0b0c"}"##
    );
    assert_eq!(
        next_text(&mut ws).await,
        r##"{"type":"set_backlight","color":"#0a0b0c","brightness":40}"##
    );
    assert_eq!(
        next_text(&mut ws).await,
        r#"{"type":"simulate_press","button":"G9"}"#
    );

    session.disconnect().await;
}

#[tokio::test]
async fn test_commands_while_disconnected_are_silent_noops() {
    // Port 9 (discard) on localhost: nothing is listening in the test
    // environment, and the session is never connected anyway.
    let (session, _events) = session_with(
        "ws://127.0.0.1:9/ws".to_string(),
        Duration::from_millis(100),
    );

    let emitter = CommandEmitter::new(Arc::clone(&session));
    let mirror = StateMirror::new();
    let before = mirror.current();

    // None of these may panic, error, or touch the mirrored state.
    emitter.request_state().await;
    emitter.set_mode(Mode::M2).await;
    emitter.set_mapping("G1", "KEY_A").await;
    emitter.simulate_press("G1").await;
    emitter.simulate_release("G1").await;
    emitter.set_backlight("#ffffff", Some(10)).await;

    assert_eq!(*mirror.current(), *before);
    assert!(!*session.transport_connected().borrow());

    session.disconnect().await;
}

#[tokio::test]
async fn test_mirror_follows_a_full_session_transcript() {
    let (listener, url) = bind_daemon().await;
    let (session, mut events) = session_with(url, Duration::from_millis(100));
    let mirror = StateMirror::new();
    session.clone().connect();

    let mut ws = accept_ws(&listener).await;
    assert_eq!(next_text(&mut ws).await, r#"{"type":"get_state"}"#);

    // Answer get_state, then push incremental updates.
    for frame in [
        r##"{"type":"state","data":{"connected":true,"active_profile":"mmo","active_mode":"M1","pressed_keys":[],"joystick":{"x":0,"y":0},"backlight":{"color":"#ff6b00","brightness":100}}}"##,
        r#"{"type":"button_pressed","button":"G3"}"#,
        r#"{"type":"mode_changed","mode":"M2"}"#,
        r#"{"type":"device_disconnected"}"#,
    ] {
        ws.send(Message::Text(frame.into())).await.unwrap();
    }

    let mut received = 0;
    while received < 4 {
        match next_event(&mut events).await {
            SessionEvent::EventReceived(ev) => {
                mirror.apply_event(&ev);
                received += 1;
            }
            SessionEvent::Connected | SessionEvent::Disconnected => {}
        }
    }

    let snapshot = mirror.current();
    assert!(!snapshot.connected, "device_disconnected must win last");
    assert_eq!(snapshot.active_profile.as_deref(), Some("mmo"));
    assert_eq!(snapshot.active_mode, Mode::M2);
    assert!(snapshot.pressed_keys.contains("G3"));

    session.disconnect().await;
}
