//! Read loop and transport adapter for one WebSocket connection.
//!
//! Frames are handled strictly in arrival order by the task that owns
//! the socket, which is what lets the session itself stay lock-free.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};

use crate::error::SessionError;
use crate::protocol::messages::ServerMessage;
use crate::protocol::transport::Transport;
use crate::protocol::{AllowAll, ConnectionSession, SessionConfig};
use crate::sink::LogSink;

/// [`Transport`] backed by the write half of an axum WebSocket.
pub struct WsTransport {
    tx: SplitSink<WebSocket, Message>,
}

impl WsTransport {
    /// Wraps the write half of a split socket.
    #[must_use]
    pub fn new(tx: SplitSink<WebSocket, Message>) -> Self {
        Self { tx }
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, message: &ServerMessage) -> Result<(), SessionError> {
        let json =
            serde_json::to_string(message).map_err(|e| SessionError::Transport(e.to_string()))?;
        self.tx
            .send(Message::text(json))
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))
    }

    async fn close(&mut self, code: u16) {
        let frame = CloseFrame {
            code,
            reason: "".into(),
        };
        if self.tx.send(Message::Close(Some(frame))).await.is_err() {
            tracing::debug!(code, "peer gone before close frame");
        }
    }
}

/// Runs the read loop for a single connection until the peer leaves or
/// the session closes itself.
pub async fn run_connection<S>(socket: WebSocket, sink: S, config: Arc<SessionConfig>)
where
    S: LogSink,
{
    let connection_id = uuid::Uuid::new_v4();
    let (ws_tx, mut ws_rx) = socket.split();
    let mut session =
        ConnectionSession::new(WsTransport::new(ws_tx), sink, AllowAll, Arc::clone(&config));
    tracing::debug!(%connection_id, "logger client connected");

    let handshake_deadline = config
        .handshake_timeout
        .map(|timeout| tokio::time::Instant::now() + timeout);

    loop {
        // The deadline only gates the pre-handshake phase.
        let frame = match handshake_deadline {
            Some(deadline) if !session.is_authenticated() => {
                match tokio::time::timeout_at(deadline, ws_rx.next()).await {
                    Ok(frame) => frame,
                    Err(_) => {
                        session.expire_handshake().await;
                        break;
                    }
                }
            }
            _ => ws_rx.next().await,
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                if let Err(err) = session.handle_frame(text.as_str()).await {
                    if err.is_fatal() {
                        tracing::warn!(%connection_id, error = %err, "session terminated");
                        break;
                    }
                    tracing::warn!(%connection_id, error = %err, "dropping frame");
                }
                if session.is_closed() {
                    break;
                }
            }
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                tracing::debug!(%connection_id, error = %err, "socket error");
                break;
            }
        }
    }

    session.handle_disconnect().await;
    tracing::debug!(%connection_id, "logger client disconnected");
}
