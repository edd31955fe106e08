//! Reconnecting polygon export socket.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ExportConfig, ExportError, PolygonMessage};
use crate::transport::link::{spawn_link, LinkHandler};
use crate::transport::{Connector, Outbound, ReconnectPolicy, TransportError, WebSocketConnector};

struct ExportLink {
    outbound: Mutex<Option<Outbound>>,
    connected: watch::Sender<bool>,
}

impl LinkHandler for ExportLink {
    fn on_open(&self, outbound: Outbound) {
        *self.outbound.lock() = Some(outbound);
        self.connected.send_replace(true);
    }

    fn on_frame(&self, frame: String) {
        debug!(len = frame.len(), "Ignoring inbound frame on export socket");
    }

    fn on_error(&self, error: &TransportError) {
        debug!(error = %error, "Export socket error");
    }

    fn on_close(&self) {
        *self.outbound.lock() = None;
        self.connected.send_replace(false);
    }
}

/// Streams [`PolygonMessage`]s over its own reconnecting socket.
///
/// Messages are sent only while the socket is open. There is no outbox: a
/// message exported while disconnected is logged and lost.
pub struct PolygonExporter {
    link: Arc<ExportLink>,
    endpoint: String,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PolygonExporter {
    /// Start exporting through `connector`. Must be called inside a Tokio runtime.
    pub fn start(connector: Arc<dyn Connector>, policy: ReconnectPolicy) -> Self {
        let (connected, _) = watch::channel(false);
        let link = Arc::new(ExportLink {
            outbound: Mutex::new(None),
            connected,
        });
        let endpoint = connector.endpoint();
        let cancel = CancellationToken::new();

        info!(endpoint = %endpoint, "Starting polygon exporter");
        let task = spawn_link(connector, policy, Arc::clone(&link), cancel.clone());

        Self {
            link,
            endpoint,
            cancel,
            task: Mutex::new(Some(task)),
        }
    }

    /// Start a WebSocket exporter for `config.url`.
    pub fn websocket(config: &ExportConfig) -> Self {
        let connector = Arc::new(WebSocketConnector::new(config.url.clone()));
        Self::start(connector, config.reconnect_policy())
    }

    /// Whether the export socket is open.
    pub fn is_connected(&self) -> bool {
        *self.link.connected.borrow()
    }

    /// Wait up to `timeout` for the socket to open.
    ///
    /// Returns whether it is connected.
    pub async fn wait_connected(&self, timeout: Duration) -> bool {
        let mut rx = self.link.connected.subscribe();
        tokio::time::timeout(timeout, rx.wait_for(|connected| *connected))
            .await
            .is_ok_and(|result| result.is_ok())
    }

    /// Send one message if the socket is open.
    pub fn export(&self, message: &PolygonMessage) -> Result<(), ExportError> {
        let id = message.polygon_id();
        let outbound = self.link.outbound.lock().clone();
        let Some(outbound) = outbound else {
            let err = ExportError::NotConnected { id };
            warn!(endpoint = %self.endpoint, id, kind = message.kind(), "Export socket not connected, polygon data not sent");
            return Err(err);
        };

        let frame = message.encode().inspect_err(|e| {
            warn!(id, error = %e, "Failed to encode polygon message");
        })?;
        outbound.send(frame).inspect_err(|e| {
            warn!(id, error = %e, "Failed to send polygon data");
        })?;

        info!(id, kind = message.kind(), "Polygon data sent");
        Ok(())
    }

    /// Stop the socket task and wait for it to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Export task ended abnormally");
            }
        }
    }
}

impl Drop for PolygonExporter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    use super::*;
    use crate::drawing::DrawingSession;
    use crate::geometry::GeoPoint;
    use crate::transport::MemoryConnector;

    fn finalized() -> PolygonMessage {
        let mut session = DrawingSession::new();
        session.add_point(GeoPoint::new(0.0, 0.0));
        session.add_point(GeoPoint::new(0.0, 1.0));
        session.add_point(GeoPoint::new(1.0, 1.0));
        session
            .finalize(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_when_connected() {
        let (connector, mut server) = MemoryConnector::new("memory://export");
        let exporter = PolygonExporter::start(Arc::new(connector), ReconnectPolicy::default());
        let mut peer = server.accept().await.unwrap();
        assert!(exporter.wait_connected(Duration::from_secs(1)).await);

        exporter.export(&finalized()).unwrap();
        let frame: Value = serde_json::from_str(&peer.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "polygon_finalized");
        assert_eq!(frame["data"]["area"]["unit"], "km²");

        exporter.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_when_disconnected_is_dropped() {
        let (connector, server) = MemoryConnector::new("memory://export");
        server.refuse_next(usize::MAX);
        let exporter = PolygonExporter::start(Arc::new(connector), ReconnectPolicy::default());

        assert!(!exporter.wait_connected(Duration::from_secs(1)).await);
        assert!(matches!(
            exporter.export(&finalized()),
            Err(ExportError::NotConnected { id: 1 })
        ));

        exporter.shutdown().await;
    }
}
