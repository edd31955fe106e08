//! WebSocket connector backed by `tokio-tungstenite`.

use futures::stream::SplitSink;
use futures::{future, SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::{BoxFuture, Connection, Connector, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Opens WebSocket connections to a fixed URL.
///
/// Text frames pass through unchanged. Binary frames are forwarded when they
/// hold valid UTF-8; control frames are consumed by the WebSocket layer.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: String,
}

impl WebSocketConnector {
    /// Create a connector for the given `ws://` or `wss://` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for WebSocketConnector {
    fn connect(&self) -> BoxFuture<'_, Result<Connection, TransportError>> {
        Box::pin(async move {
            let (ws, response) =
                connect_async(self.url.as_str())
                    .await
                    .map_err(|e| TransportError::Connect {
                        url: self.url.clone(),
                        reason: e.to_string(),
                    })?;
            debug!(url = %self.url, status = %response.status(), "WebSocket handshake complete");

            let (write, read): (SplitSink<WsStream, Message>, _) = ws.split();

            let sink = write
                .sink_map_err(TransportError::from)
                .with(|text: String| future::ready(Ok::<_, TransportError>(Message::Text(text))));

            let stream = read.filter_map(|message| {
                future::ready(match message {
                    Ok(Message::Text(text)) => Some(Ok(text)),
                    Ok(Message::Binary(bytes)) => String::from_utf8(bytes).ok().map(Ok),
                    Ok(_) => None,
                    Err(e) => Some(Err(TransportError::from(e))),
                })
            });

            Ok(Connection::new(Box::pin(sink), Box::pin(stream)))
        })
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}
