use super::{PayloadSink, RefreshService};
use crate::error::{PluginListError, Result};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{accept_async, WebSocketStream};

/// A WebSocket connection used as a payload destination.
pub struct WebSocketSink<S> {
    stream: WebSocketStream<S>,
}

impl<S> WebSocketSink<S> {
    pub fn new(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl<S> PayloadSink for WebSocketSink<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, payload: String) -> Result<()> {
        self.stream
            .send(Message::text(payload))
            .await
            .map_err(connection_error)
    }

    async fn closed(&mut self) {
        // Incoming messages are not part of the protocol; reading them keeps
        // pings answered and surfaces the close frame.
        while let Some(message) = self.stream.next().await {
            match message {
                Ok(Message::Close(_)) => return,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!("WebSocket read error: {}", err);
                    return;
                }
            }
        }
    }
}

fn connection_error(err: WsError) -> PluginListError {
    let disconnected = matches!(
        err,
        WsError::ConnectionClosed | WsError::AlreadyClosed | WsError::Io(_) | WsError::Protocol(_)
    );
    PluginListError::Connection {
        message: err.to_string(),
        disconnected,
    }
}

/// Accepts WebSocket clients on `listener`, serving one at a time.
///
/// Only returns if the listener itself can't report its address.
pub async fn serve(listener: TcpListener, service: RefreshService) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Serving at ws://{}", addr);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!("failed to accept connection: {}", err);
                continue;
            }
        };

        let ws = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(err) => {
                tracing::warn!(%peer, "WebSocket handshake failed: {}", err);
                continue;
            }
        };

        tracing::info!(%peer, "client connected");
        let mut sink = WebSocketSink::new(ws);
        let sent = service.serve_client(&mut sink).await;
        tracing::info!(%peer, sent, "client disconnected");
    }
}
