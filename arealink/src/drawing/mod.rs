//! Polygon drawing model.
//!
//! Holds the state a map front-end mutates on clicks: the corners of the
//! polygon in progress and the list of completed polygons. Finalizing and
//! deleting produce [`crate::export::PolygonMessage`]s ready to be streamed
//! by a [`crate::export::PolygonExporter`].
//!
//! Map rendering (markers, dashed outlines, popups) stays with the front-end.

mod error;
pub(crate) mod record;
mod session;

pub use error::DrawingError;
pub use record::{format_timestamp, AreaMeasurement, PolygonRecord};
pub use session::{ContextAction, DrawingSession, MARKER_HIT_THRESHOLD};
