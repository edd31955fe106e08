//! In-process connector for tests and offline use.
//!
//! [`MemoryConnector`] hands out connections whose far ends appear on the
//! paired [`MemoryServer`] as [`MemoryPeer`]s. A peer can push frames to the
//! client, read what the client sent, and drop the connection.
//!
//! # Example
//!
//! ```ignore
//! let (connector, mut server) = MemoryConnector::new("memory://relay");
//! let client = RelayClient::new(Arc::new(connector), RelayConfig::default());
//! client.connect();
//! let mut peer = server.accept().await.unwrap();
//! peer.push(r#"{"event":"game:goal","data":{}}"#);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::{sink, stream};
use tokio::sync::mpsc::{self, error::TryRecvError};

use super::{BoxFuture, Connection, Connector, TransportError};

/// Connector whose connections terminate in a [`MemoryServer`].
pub struct MemoryConnector {
    name: String,
    peers: mpsc::UnboundedSender<MemoryPeer>,
    refusals: Arc<AtomicUsize>,
    attempts: Arc<AtomicUsize>,
}

/// Accepting side of a [`MemoryConnector`].
pub struct MemoryServer {
    peers: mpsc::UnboundedReceiver<MemoryPeer>,
    refusals: Arc<AtomicUsize>,
    attempts: Arc<AtomicUsize>,
}

/// Server-side end of one accepted connection.
pub struct MemoryPeer {
    to_client: Option<mpsc::UnboundedSender<Result<String, TransportError>>>,
    from_client: mpsc::UnboundedReceiver<String>,
}

impl MemoryConnector {
    /// Create a connector and its server.
    pub fn new(name: impl Into<String>) -> (Self, MemoryServer) {
        let (tx, rx) = mpsc::unbounded_channel();
        let refusals = Arc::new(AtomicUsize::new(0));
        let attempts = Arc::new(AtomicUsize::new(0));
        let connector = Self {
            name: name.into(),
            peers: tx,
            refusals: Arc::clone(&refusals),
            attempts: Arc::clone(&attempts),
        };
        let server = MemoryServer {
            peers: rx,
            refusals,
            attempts,
        };
        (connector, server)
    }
}

impl Connector for MemoryConnector {
    fn connect(&self) -> BoxFuture<'_, Result<Connection, TransportError>> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);

            let refused = self
                .refusals
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if refused {
                return Err(TransportError::Connect {
                    url: self.name.clone(),
                    reason: "connection refused".to_string(),
                });
            }

            let (to_server, from_client) = mpsc::unbounded_channel::<String>();
            let (to_client, from_server) =
                mpsc::unbounded_channel::<Result<String, TransportError>>();

            self.peers
                .send(MemoryPeer {
                    to_client: Some(to_client),
                    from_client,
                })
                .map_err(|_| TransportError::Connect {
                    url: self.name.clone(),
                    reason: "server gone".to_string(),
                })?;

            let frame_sink = sink::unfold(to_server, |tx, frame: String| async move {
                tx.send(frame).map_err(|_| TransportError::Closed)?;
                Ok::<_, TransportError>(tx)
            });
            let frame_stream = stream::unfold(from_server, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            });

            Ok(Connection::new(Box::pin(frame_sink), Box::pin(frame_stream)))
        })
    }

    fn endpoint(&self) -> String {
        self.name.clone()
    }
}

impl MemoryServer {
    /// Wait for the next client connection.
    pub async fn accept(&mut self) -> Option<MemoryPeer> {
        self.peers.recv().await
    }

    /// Take an already-established connection, if any.
    pub fn try_accept(&mut self) -> Option<MemoryPeer> {
        self.peers.try_recv().ok()
    }

    /// Make the next `count` connection attempts fail.
    pub fn refuse_next(&self, count: usize) {
        self.refusals.store(count, Ordering::SeqCst);
    }

    /// Total connection attempts seen so far, including refused ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl MemoryPeer {
    /// Deliver a text frame to the client.
    pub fn push(&self, frame: impl Into<String>) {
        if let Some(tx) = &self.to_client {
            let _ = tx.send(Ok(frame.into()));
        }
    }

    /// Deliver a transport error to the client, ending its session.
    pub fn fail(&self, error: TransportError) {
        if let Some(tx) = &self.to_client {
            let _ = tx.send(Err(error));
        }
    }

    /// Close the connection from the server side.
    pub fn close(&mut self) {
        self.to_client = None;
    }

    /// Wait for the next frame the client sent.
    ///
    /// Returns `None` once the client has dropped the connection.
    pub async fn recv(&mut self) -> Option<String> {
        self.from_client.recv().await
    }

    /// Take a frame the client already sent, without waiting.
    pub fn try_recv(&mut self) -> Option<String> {
        match self.from_client.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every frame the client has sent so far.
    pub fn drain(&mut self) -> Vec<String> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt, StreamExt};

    #[tokio::test]
    async fn test_frames_flow_both_ways() {
        let (connector, mut server) = MemoryConnector::new("memory://test");
        let mut conn = connector.connect().await.unwrap();
        let mut peer = server.try_accept().expect("peer should be queued");

        conn.sink.send("hello".to_string()).await.unwrap();
        assert_eq!(peer.recv().await.as_deref(), Some("hello"));

        peer.push("world");
        assert_eq!(conn.stream.next().await.unwrap().unwrap(), "world");

        peer.close();
        assert!(conn.stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_refused_attempts_are_counted() {
        let (connector, server) = MemoryConnector::new("memory://test");
        server.refuse_next(2);

        assert!(connector.connect().await.is_err());
        assert!(connector.connect().await.is_err());
        assert!(connector.connect().await.is_ok());
        assert_eq!(server.attempts(), 3);
    }
}
