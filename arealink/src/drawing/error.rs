//! Drawing session error types.

use thiserror::Error;

/// Errors from [`super::DrawingSession`] operations.
#[derive(Debug, Error, PartialEq)]
pub enum DrawingError {
    /// Not enough corners to enclose an area.
    #[error("Need at least {min} points to create a polygon, have {count}")]
    TooFewPoints { count: usize, min: usize },

    /// No corner at that index in the polygon being drawn.
    #[error("No point at index {index} (have {len})")]
    PointOutOfRange { index: usize, len: usize },

    /// No completed polygon with that id.
    #[error("Unknown polygon id {0}")]
    UnknownPolygon(u64),
}
