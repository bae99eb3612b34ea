//! End-to-end tests for persistent connections.
//!
//! Each test binds the full application to an ephemeral port and talks to it
//! with a real WebSocket client (tokio-tungstenite).

use std::net::SocketAddr;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use duplex_dispatch::adapters::http::{app, serve};
use duplex_dispatch::config::AppConfig;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Config with periodic timers pushed far enough out not to interleave.
fn quiet_config() -> AppConfig {
    let mut config = AppConfig::new("127.0.0.1", 0);
    config.websocket.autoping_secs = 600;
    config.websocket.keepalive_secs = 600;
    config
}

async fn start(config: AppConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(&config).unwrap();
    tokio::spawn(serve(listener, router, std::future::pending::<()>()));
    addr
}

async fn connect(
    addr: SocketAddr,
    path: &str,
    headers: &[(&'static str, String)],
) -> Result<Client, WsError> {
    let mut request = format!("ws://{addr}{path}").into_client_request().unwrap();
    for (name, value) in headers {
        request
            .headers_mut()
            .insert(*name, value.parse().unwrap());
    }
    connect_async(request).await.map(|(ws, _)| ws)
}

fn quux_headers() -> Vec<(&'static str, String)> {
    vec![
        (
            "Authorization",
            format!("Basic {}", STANDARD.encode("foo:bar")),
        ),
        ("Sec-WebSocket-Protocol", "quux/1.0".to_string()),
    ]
}

/// Next non-control message, parsed as JSON.
async fn next_json(ws: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        match message {
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            Message::Binary(bytes) => return serde_json::from_slice(&bytes).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected message: {:?}", other),
        }
    }
}

async fn send_json(ws: &mut Client, value: Value) {
    ws.send(Message::Text(value.to_string())).await.unwrap();
}

fn rejected_status(result: Result<Client, WsError>) -> u16 {
    match result {
        Err(WsError::Http(response)) => response.status().as_u16(),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("handshake unexpectedly accepted"),
    }
}

// =============================================================================
// Command route (/quux)
// =============================================================================

#[tokio::test]
async fn quux_greets_then_answers_ping() {
    let addr = start(quiet_config()).await;
    let mut ws = connect(addr, "/quux", &quux_headers()).await.unwrap();

    assert_eq!(next_json(&mut ws).await, json!({"cmd": "HELLO", "arg": "foo"}));

    send_json(&mut ws, json!({"cmd": "PING"})).await;
    assert_eq!(next_json(&mut ws).await, json!({"result": "PONG"}));
}

#[tokio::test]
async fn quux_reports_bad_commands_and_stays_open() {
    let addr = start(quiet_config()).await;
    let mut ws = connect(addr, "/quux", &quux_headers()).await.unwrap();
    next_json(&mut ws).await;

    send_json(&mut ws, json!({"nope": true})).await;
    let error = next_json(&mut ws).await;
    assert_eq!(error["errorCode"], "INVALID_PAYLOAD");
    assert_eq!(error["message"], "invalid request");

    send_json(&mut ws, json!({"cmd": "DANCE"})).await;
    assert_eq!(next_json(&mut ws).await["message"], "unknown command");

    ws.send(Message::Text("{broken".to_string())).await.unwrap();
    assert_eq!(next_json(&mut ws).await["message"], "invalid JSON payload");

    send_json(&mut ws, json!({"cmd": "PING"})).await;
    assert_eq!(next_json(&mut ws).await, json!({"result": "PONG"}));
}

#[tokio::test]
async fn awake_all_reaches_peers_but_not_sender() {
    let addr = start(quiet_config()).await;
    let mut sender = connect(addr, "/quux", &quux_headers()).await.unwrap();
    let mut peer = connect(addr, "/quux", &quux_headers()).await.unwrap();
    next_json(&mut sender).await;
    next_json(&mut peer).await;

    send_json(&mut sender, json!({"cmd": "AWAKE-ALL"})).await;
    assert_eq!(next_json(&mut peer).await, json!({"cmd": "AWAKE"}));

    // Frames are ordered per connection, so a PONG arriving first proves the
    // sender was not woken.
    send_json(&mut sender, json!({"cmd": "PING"})).await;
    assert_eq!(next_json(&mut sender).await, json!({"result": "PONG"}));
}

#[tokio::test]
async fn quux_keepalive_pushes_ping_commands() {
    let mut config = quiet_config();
    config.websocket.keepalive_secs = 1;
    let addr = start(config).await;
    let mut ws = connect(addr, "/quux", &quux_headers()).await.unwrap();

    assert_eq!(next_json(&mut ws).await["cmd"], "HELLO");
    assert_eq!(next_json(&mut ws).await, json!({"cmd": "PING"}));
}

#[tokio::test]
async fn quux_rejects_missing_credentials() {
    let addr = start(quiet_config()).await;
    let headers = vec![("Sec-WebSocket-Protocol", "quux/1.0".to_string())];
    assert_eq!(rejected_status(connect(addr, "/quux", &headers).await), 401);
}

#[tokio::test]
async fn quux_rejects_wrong_subprotocol() {
    let addr = start(quiet_config()).await;
    let headers = vec![
        (
            "Authorization",
            format!("Basic {}", STANDARD.encode("foo:bar")),
        ),
        ("Sec-WebSocket-Protocol", "other/2.0".to_string()),
    ];
    assert_eq!(rejected_status(connect(addr, "/quux", &headers).await), 400);
}

// =============================================================================
// Other routes
// =============================================================================

#[tokio::test]
async fn foo_refuses_upgrade() {
    let addr = start(quiet_config()).await;
    assert_eq!(rejected_status(connect(addr, "/foo", &[]).await), 400);
}

#[tokio::test]
async fn unknown_path_refuses_upgrade() {
    let addr = start(quiet_config()).await;
    assert_eq!(rejected_status(connect(addr, "/missing", &[]).await), 404);
}

#[tokio::test]
async fn bar_reports_websocket_mode() {
    let addr = start(quiet_config()).await;
    let mut ws = connect(addr, "/bar", &[]).await.unwrap();

    send_json(&mut ws, json!({"a": 1})).await;
    assert_eq!(
        next_json(&mut ws).await,
        json!({"at": "bar", "mode": "websocket", "seen": {"a": 1}})
    );
}

#[tokio::test]
async fn baz_greets_and_closes() {
    let addr = start(quiet_config()).await;
    let mut ws = connect(addr, "/baz", &[]).await.unwrap();

    assert_eq!(next_json(&mut ws).await, json!({"cmd": "HANDLING INIT"}));

    let closed = tokio::time::timeout(RECV_TIMEOUT, async {
        while let Some(message) = ws.next().await {
            match message {
                Ok(Message::Close(_)) | Err(_) => return true,
                Ok(_) => continue,
            }
        }
        true
    })
    .await
    .unwrap();
    assert!(closed);
}

#[tokio::test]
async fn framed_wraps_replies_in_envelopes() {
    let addr = start(quiet_config()).await;
    let mut ws = connect(addr, "/framed", &[]).await.unwrap();

    send_json(&mut ws, json!({"tag": "REQUEST", "payload": {"x": 1}})).await;
    assert_eq!(
        next_json(&mut ws).await,
        json!({"tag": "RESPONSE", "payload": {"at": "framed", "seen": {"x": 1}}})
    );
}

#[tokio::test]
async fn framed_reports_tag_mismatch_as_error_frame() {
    let addr = start(quiet_config()).await;
    let mut ws = connect(addr, "/framed", &[]).await.unwrap();

    send_json(&mut ws, json!({"tag": "RESPONSE", "payload": 1})).await;
    let error = next_json(&mut ws).await;
    assert_eq!(error["tag"], "ERROR");
    assert_eq!(error["payload"]["errorCode"], "FRAME_REJECTED");

    send_json(&mut ws, json!({"tag": "REQUEST", "payload": 2})).await;
    assert_eq!(next_json(&mut ws).await["payload"]["seen"], 2);
}

#[tokio::test]
async fn non_utf8_binary_frames_get_an_error_reply() {
    let addr = start(quiet_config()).await;

    let mut bar = connect(addr, "/bar", &[]).await.unwrap();
    bar.send(Message::Binary(vec![0xff, 0xfe, 0x00])).await.unwrap();
    let error = next_json(&mut bar).await;
    assert_eq!(error["errorCode"], "INVALID_PAYLOAD");
    assert_eq!(error["message"], "invalid JSON payload");

    let mut framed = connect(addr, "/framed", &[]).await.unwrap();
    framed
        .send(Message::Binary(vec![0xff, 0xfe, 0x00]))
        .await
        .unwrap();
    let error = next_json(&mut framed).await;
    assert_eq!(error["tag"], "ERROR");
    assert_eq!(error["payload"]["errorCode"], "FRAME_REJECTED");

    // Both connections survive the bad frame.
    send_json(&mut bar, json!(1)).await;
    assert_eq!(next_json(&mut bar).await["seen"], 1);
}

#[tokio::test]
async fn utf8_binary_frames_are_handled_like_text() {
    let addr = start(quiet_config()).await;
    let mut ws = connect(addr, "/bar", &[]).await.unwrap();

    ws.send(Message::Binary(br#"{"b":2}"#.to_vec())).await.unwrap();
    assert_eq!(next_json(&mut ws).await["seen"], json!({"b": 2}));
}

#[tokio::test]
async fn framed_route_autopings() {
    let mut config = quiet_config();
    config.websocket.autoping_secs = 1;
    let addr = start(config).await;
    let mut ws = connect(addr, "/framed", &[]).await.unwrap();

    let pinged = tokio::time::timeout(RECV_TIMEOUT, async {
        while let Some(message) = ws.next().await {
            if let Ok(Message::Ping(_)) = message {
                return true;
            }
        }
        false
    })
    .await
    .unwrap();
    assert!(pinged);
}
