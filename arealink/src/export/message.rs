//! Polygon export messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::drawing::record::iso8601;
use crate::drawing::PolygonRecord;

/// Notice that a completed polygon was removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonDeletion {
    pub id: u64,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub original_data: PolygonRecord,
}

/// A message on the polygon export socket.
///
/// Encoded as `{"type": "polygon_finalized" | "polygon_deleted", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PolygonMessage {
    PolygonFinalized(PolygonRecord),
    PolygonDeleted(PolygonDeletion),
}

impl PolygonMessage {
    /// The polygon this message is about.
    pub fn polygon_id(&self) -> u64 {
        match self {
            Self::PolygonFinalized(record) => record.id,
            Self::PolygonDeleted(deletion) => deletion.id,
        }
    }

    /// The wire `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PolygonFinalized(_) => "polygon_finalized",
            Self::PolygonDeleted(_) => "polygon_deleted",
        }
    }

    /// Serialize to a text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
