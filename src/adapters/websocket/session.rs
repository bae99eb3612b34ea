//! WebSocket session lifecycle - runs one upgraded connection from handshake
//! through teardown.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument};

use crate::application::{ConnectionLifecycle, Dispatcher, Route};
use crate::domain::connection::{Connection, OutboundFrame};
use crate::domain::foundation::Principal;
use crate::domain::protocol::UpgradePlan;

use super::autoping::{spawn_autoping, AUTOPING_TIMER};

/// How long teardown waits for queued frames to flush.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Everything a session needs besides the socket.
pub struct SessionSetup {
    pub dispatcher: Arc<Dispatcher>,
    pub route: Arc<Route>,
    pub plan: UpgradePlan,
    pub principal: Option<Principal>,
    pub outbound_capacity: usize,
}

/// Run a WebSocket session for an accepted upgrade.
///
/// 1. Marks the connection open and registers it with the route's peers
/// 2. Runs the connect hook, then starts autoping if configured
/// 3. Delivers the initial event if the route asked for one
/// 4. Feeds inbound text/binary frames to the handler in arrival order
/// 5. On close: unregisters, runs the disconnect hook, flushes the writer
pub async fn run_session(socket: WebSocket, setup: SessionSetup) {
    let (tx, rx) = mpsc::channel(setup.outbound_capacity.max(1));
    let connection = Arc::new(Connection::new(
        setup.route.key().clone(),
        setup.plan.subprotocol.clone(),
        tx,
    ));

    let span = info_span!(
        "ws_session",
        connection_id = %connection.id(),
        path = %setup.route.path(),
    );
    drive(socket, connection, rx, setup).instrument(span).await;
}

async fn drive(
    socket: WebSocket,
    connection: Arc<Connection>,
    outbound: mpsc::Receiver<OutboundFrame>,
    setup: SessionSetup,
) {
    let SessionSetup {
        dispatcher,
        route,
        plan,
        principal,
        ..
    } = setup;

    let (sink, mut stream) = socket.split();
    let mut writer = tokio::spawn(write_frames(sink, outbound));
    let mut writer_done = false;

    connection.mark_open();
    dispatcher.registry().join(connection.clone()).await;
    info!(subprotocol = ?connection.subprotocol(), "connection opened");

    let lifecycle = ConnectionLifecycle::new(route.hooks().cloned());
    lifecycle.connect(&connection).await;

    if let Some(period) = plan.autoping {
        lifecycle
            .insert_timer(AUTOPING_TIMER, spawn_autoping(&connection, period))
            .await;
    }

    let invoker = dispatcher.bind(route.clone(), connection.clone(), principal);
    if plan.initially {
        invoker.initial().await;
    }

    loop {
        tokio::select! {
            _ = &mut writer => {
                writer_done = true;
                break;
            }
            msg = stream.next() => {
                let frame = match msg {
                    Some(Ok(Message::Text(text))) => text.into_bytes(),
                    // Non-UTF-8 bytes fail decoding and are answered with an error frame.
                    Some(Ok(Message::Binary(data))) => data,
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(_))) => {
                        debug!("client sent close frame");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "receive error");
                        break;
                    }
                    None => break,
                };

                if !connection.is_open() {
                    debug!("dropping frame received while closing");
                    continue;
                }
                invoker.message(&frame).await;
            }
        }
    }

    // Teardown
    dispatcher.registry().leave(&connection).await;
    connection.close();
    lifecycle.disconnect(&connection).await;

    if !writer_done {
        finish_writer(writer).await;
    }

    info!(
        duration_ms = connection.connected_at().elapsed_millis(),
        "connection closed"
    );
}

/// Forwards queued frames to the socket until a close frame or a send error.
async fn write_frames(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<OutboundFrame>,
) {
    while let Some(frame) = outbound.recv().await {
        let (message, last) = match frame {
            OutboundFrame::Text(text) => (Message::Text(text), false),
            OutboundFrame::Ping => (Message::Ping(Vec::new()), false),
            OutboundFrame::Close => (Message::Close(None), true),
        };
        if let Err(e) = sink.send(message).await {
            debug!(error = %e, "send error, stopping writer");
            break;
        }
        if last {
            break;
        }
    }
}

async fn finish_writer(mut writer: JoinHandle<()>) {
    if tokio::time::timeout(CLOSE_GRACE, &mut writer).await.is_err() {
        debug!("writer did not flush in time, aborting");
        writer.abort();
    }
}
