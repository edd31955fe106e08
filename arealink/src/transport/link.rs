//! Reconnecting link supervisor.
//!
//! A link owns one [`Connector`] and keeps a connection open for as long as
//! its [`ReconnectPolicy`] allows. Lifecycle transitions and inbound frames
//! are reported to a [`LinkHandler`]; the handler sends frames through the
//! [`Outbound`] it receives on open.
//!
//! ```text
//! Disconnected ──► Connecting ──► Connected
//!      ▲               │              │
//!      └── delay ◄─────┴──── close ◄──┘
//! ```
//!
//! Every connection attempt ends with exactly one `on_close`, preceded by
//! `on_error` when the attempt or session failed.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Connection, Connector, ReconnectPolicy, TransportError};

/// Sender for frames on the currently open connection.
///
/// Becomes inert once the session it belongs to has ended.
#[derive(Debug, Clone)]
pub struct Outbound(mpsc::UnboundedSender<String>);

impl Outbound {
    /// Queue a frame for transmission.
    pub fn send(&self, frame: String) -> Result<(), TransportError> {
        self.0.send(frame).map_err(|_| TransportError::Closed)
    }
}

/// Callbacks driven by the link supervisor.
pub(crate) trait LinkHandler: Send + Sync + 'static {
    /// A connection attempt is starting.
    fn on_connecting(&self) {}

    /// A connection is open; frames may be sent through `outbound`.
    fn on_open(&self, outbound: Outbound);

    /// A text frame arrived.
    fn on_frame(&self, frame: String);

    /// The attempt or session failed.
    fn on_error(&self, error: &TransportError);

    /// The attempt or session is over.
    fn on_close(&self);
}

enum SessionEnd {
    Closed,
    Failed(TransportError),
    Cancelled,
}

/// Spawn the supervisor task for a link.
pub(crate) fn spawn_link<H: LinkHandler>(
    connector: Arc<dyn Connector>,
    policy: ReconnectPolicy,
    handler: Arc<H>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run_link(connector, policy, handler, cancel))
}

async fn run_link<H: LinkHandler>(
    connector: Arc<dyn Connector>,
    policy: ReconnectPolicy,
    handler: Arc<H>,
    cancel: CancellationToken,
) {
    let endpoint = connector.endpoint();
    let mut disconnects: u32 = 0;

    loop {
        handler.on_connecting();
        debug!(endpoint = %endpoint, "Connecting");

        let attempt = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                handler.on_close();
                break;
            }
            result = connector.connect() => result,
        };

        match attempt {
            Ok(connection) => {
                info!(endpoint = %endpoint, "Connected");
                disconnects = 0;
                match drive(connection, handler.as_ref(), &cancel).await {
                    SessionEnd::Cancelled => {
                        handler.on_close();
                        break;
                    }
                    SessionEnd::Closed => {
                        info!(endpoint = %endpoint, "Connection closed");
                    }
                    SessionEnd::Failed(e) => {
                        warn!(endpoint = %endpoint, error = %e, "Connection error");
                        handler.on_error(&e);
                    }
                }
            }
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "Connection attempt failed");
                handler.on_error(&e);
            }
        }

        handler.on_close();
        disconnects = disconnects.saturating_add(1);

        let Some(delay) = policy.delay_for_attempt(disconnects) else {
            info!(endpoint = %endpoint, "Reconnect policy exhausted, link stopped");
            break;
        };
        debug!(endpoint = %endpoint, delay_ms = delay.as_millis() as u64, "Reconnect scheduled");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!(endpoint = %endpoint, "Link supervisor exited");
}

async fn drive<H: LinkHandler>(
    connection: Connection,
    handler: &H,
    cancel: &CancellationToken,
) -> SessionEnd {
    let Connection {
        mut sink,
        mut stream,
    } = connection;
    let (tx, mut rx) = mpsc::unbounded_channel();

    handler.on_open(Outbound(tx));

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                // Frames queued before cancellation still go out.
                while let Ok(frame) = rx.try_recv() {
                    if sink.send(frame).await.is_err() {
                        break;
                    }
                }
                let _ = sink.close().await;
                return SessionEnd::Cancelled;
            }
            Some(frame) = rx.recv() => {
                if let Err(e) = sink.send(frame).await {
                    warn!(error = %e, "Failed to send frame, message dropped");
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(frame)) => handler.on_frame(frame),
                Some(Err(e)) => return SessionEnd::Failed(e),
                None => return SessionEnd::Closed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::transport::MemoryConnector;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
        outbound: Mutex<Option<Outbound>>,
    }

    impl LinkHandler for Recorder {
        fn on_connecting(&self) {
            self.events.lock().push("connecting".into());
        }
        fn on_open(&self, outbound: Outbound) {
            self.events.lock().push("open".into());
            *self.outbound.lock() = Some(outbound);
        }
        fn on_frame(&self, frame: String) {
            self.events.lock().push(format!("frame:{}", frame));
        }
        fn on_error(&self, _error: &TransportError) {
            self.events.lock().push("error".into());
        }
        fn on_close(&self) {
            self.events.lock().push("close".into());
            *self.outbound.lock() = None;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_lifecycle_and_reconnect() {
        let (connector, mut server) = MemoryConnector::new("memory://link");
        let handler = Arc::new(Recorder::default());
        let cancel = CancellationToken::new();
        let task = spawn_link(
            Arc::new(connector),
            ReconnectPolicy::fixed(Duration::from_secs(3)),
            Arc::clone(&handler),
            cancel.clone(),
        );

        let mut peer = server.accept().await.unwrap();
        peer.push("hi");
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        let outbound = handler.outbound.lock().clone().unwrap();
        outbound.send("out".into()).unwrap();
        assert_eq!(peer.recv().await.as_deref(), Some("out"));

        peer.close();
        let _second = server.accept().await.unwrap();
        assert_eq!(server.attempts(), 2);

        cancel.cancel();
        task.await.unwrap();

        let events = handler.events.lock().clone();
        assert_eq!(
            events,
            vec![
                "connecting",
                "open",
                "frame:hi",
                "close",
                "connecting",
                "open",
                "close"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_frames_flushed_on_cancel() {
        let (connector, mut server) = MemoryConnector::new("memory://link");
        let handler = Arc::new(Recorder::default());
        let cancel = CancellationToken::new();
        let task = spawn_link(
            Arc::new(connector),
            ReconnectPolicy::Never,
            Arc::clone(&handler),
            cancel.clone(),
        );

        let mut peer = server.accept().await.unwrap();
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        let outbound = handler.outbound.lock().clone().unwrap();
        outbound.send("last".into()).unwrap();
        cancel.cancel();
        task.await.unwrap();

        assert_eq!(peer.recv().await.as_deref(), Some("last"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_attempt_reports_error_then_close() {
        let (connector, server) = MemoryConnector::new("memory://link");
        server.refuse_next(1);
        let handler = Arc::new(Recorder::default());
        let task = spawn_link(
            Arc::new(connector),
            ReconnectPolicy::Never,
            Arc::clone(&handler),
            CancellationToken::new(),
        );

        task.await.unwrap();
        assert_eq!(
            handler.events.lock().clone(),
            vec!["connecting", "error", "close"]
        );
    }
}
