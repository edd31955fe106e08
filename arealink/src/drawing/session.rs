//! Interactive polygon drawing state.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::export::{PolygonDeletion, PolygonMessage};
use crate::geometry::{GeoPoint, MIN_POLYGON_POINTS};

use super::{DrawingError, PolygonRecord};

/// Distance in degrees within which a click counts as hitting a corner.
pub const MARKER_HIT_THRESHOLD: f64 = 0.0001;

/// Outcome of a secondary (right) click.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextAction {
    /// The click hit a corner, which was removed.
    RemovedPoint { index: usize, point: GeoPoint },
    /// The click finalized the polygon being drawn.
    Finalized(PolygonMessage),
    /// Nothing to do: no corner hit and too few points to finalize.
    Ignored,
}

/// The polygon being drawn plus every polygon completed so far.
///
/// Ids are assigned from a counter starting at 1 and are never reused,
/// even after deletions.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    current: Vec<GeoPoint>,
    completed: Vec<PolygonRecord>,
    next_id: u64,
    hit_threshold: f64,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self {
            current: Vec::new(),
            completed: Vec::new(),
            next_id: 1,
            hit_threshold: MARKER_HIT_THRESHOLD,
        }
    }
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different corner hit radius.
    pub fn with_hit_threshold(mut self, threshold: f64) -> Self {
        self.hit_threshold = threshold;
        self
    }

    /// Corners of the polygon being drawn, in click order.
    pub fn current_points(&self) -> &[GeoPoint] {
        &self.current
    }

    /// Completed polygons, oldest first.
    pub fn completed(&self) -> &[PolygonRecord] {
        &self.completed
    }

    /// Whether there is a corner to undo.
    pub fn can_undo(&self) -> bool {
        !self.current.is_empty()
    }

    /// Whether the polygon being drawn has enough corners to finalize.
    pub fn can_finalize(&self) -> bool {
        self.current.len() >= MIN_POLYGON_POINTS
    }

    /// Append a corner. Returns its index.
    pub fn add_point(&mut self, point: GeoPoint) -> usize {
        self.current.push(point);
        self.current.len() - 1
    }

    /// Remove the corner at `index`; later corners shift down by one.
    pub fn remove_point(&mut self, index: usize) -> Result<GeoPoint, DrawingError> {
        if index >= self.current.len() {
            return Err(DrawingError::PointOutOfRange {
                index,
                len: self.current.len(),
            });
        }
        Ok(self.current.remove(index))
    }

    /// Remove the most recent corner.
    pub fn undo_last(&mut self) -> Option<GeoPoint> {
        self.current.pop()
    }

    /// Index of the first corner within `threshold` degrees of `position`.
    pub fn point_near(&self, position: &GeoPoint, threshold: f64) -> Option<usize> {
        self.current
            .iter()
            .position(|p| p.degree_distance(position) < threshold)
    }

    /// Handle a secondary click at `position`.
    ///
    /// A hit corner is removed; otherwise the polygon is finalized when it
    /// has enough corners.
    pub fn context_click(&mut self, position: GeoPoint, now: DateTime<Utc>) -> ContextAction {
        if let Some(index) = self.point_near(&position, self.hit_threshold) {
            let point = self.current.remove(index);
            return ContextAction::RemovedPoint { index, point };
        }

        if self.can_finalize() {
            match self.finalize(now) {
                Ok(message) => ContextAction::Finalized(message),
                Err(_) => ContextAction::Ignored,
            }
        } else {
            ContextAction::Ignored
        }
    }

    /// Close the polygon being drawn.
    ///
    /// On success the record joins the completed list, the current corners
    /// are cleared, and the `polygon_finalized` message is returned.
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<PolygonMessage, DrawingError> {
        let record = PolygonRecord::from_points(self.next_id, now, self.current.clone())?;
        self.next_id += 1;
        self.current.clear();

        debug!(
            id = record.id,
            points = record.point_count,
            area_km2 = record.area.value,
            "Polygon finalized"
        );

        self.completed.push(record.clone());
        Ok(PolygonMessage::PolygonFinalized(record))
    }

    /// Discard the corners of the polygon being drawn.
    pub fn clear_current(&mut self) {
        self.current.clear();
    }

    /// Remove a completed polygon and return the `polygon_deleted` message.
    pub fn delete(&mut self, id: u64, now: DateTime<Utc>) -> Result<PolygonMessage, DrawingError> {
        let pos = self
            .completed
            .iter()
            .position(|r| r.id == id)
            .ok_or(DrawingError::UnknownPolygon(id))?;
        let original = self.completed.remove(pos);

        debug!(id, "Polygon deleted");

        Ok(PolygonMessage::PolygonDeleted(PolygonDeletion {
            id,
            timestamp: now,
            original_data: original,
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn session_with_triangle() -> DrawingSession {
        let mut session = DrawingSession::new();
        session.add_point(GeoPoint::new(39.95, 32.68));
        session.add_point(GeoPoint::new(39.96, 32.69));
        session.add_point(GeoPoint::new(39.95, 32.70));
        session
    }

    #[test]
    fn test_add_and_undo() {
        let mut session = DrawingSession::new();
        assert!(!session.can_undo());
        assert_eq!(session.add_point(GeoPoint::new(1.0, 2.0)), 0);
        assert_eq!(session.add_point(GeoPoint::new(3.0, 4.0)), 1);
        assert!(session.can_undo());

        assert_eq!(session.undo_last(), Some(GeoPoint::new(3.0, 4.0)));
        assert_eq!(session.current_points(), &[GeoPoint::new(1.0, 2.0)]);
        session.undo_last();
        assert_eq!(session.undo_last(), None);
    }

    #[test]
    fn test_remove_point_shifts_indices() {
        let mut session = session_with_triangle();
        let removed = session.remove_point(1).unwrap();
        assert_eq!(removed, GeoPoint::new(39.96, 32.69));
        assert_eq!(session.current_points()[1], GeoPoint::new(39.95, 32.70));
        assert_eq!(
            session.remove_point(5),
            Err(DrawingError::PointOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_finalize_requires_three_points() {
        let mut session = DrawingSession::new();
        session.add_point(GeoPoint::new(0.0, 0.0));
        session.add_point(GeoPoint::new(1.0, 1.0));

        assert!(matches!(
            session.finalize(now()),
            Err(DrawingError::TooFewPoints { count: 2, .. })
        ));
        assert_eq!(session.current_points().len(), 2, "points kept on failure");
    }

    #[test]
    fn test_finalize_moves_points_to_completed() {
        let mut session = session_with_triangle();
        let message = session.finalize(now()).unwrap();

        let PolygonMessage::PolygonFinalized(record) = message else {
            panic!("expected finalized message");
        };
        assert_eq!(record.id, 1);
        assert_eq!(record.point_count, 3);
        assert!(session.current_points().is_empty());
        assert_eq!(session.completed().len(), 1);
    }

    #[test]
    fn test_context_click_hits_corner_first() {
        let mut session = session_with_triangle();
        let action = session.context_click(GeoPoint::new(39.95002, 32.68003), now());

        assert_eq!(
            action,
            ContextAction::RemovedPoint {
                index: 0,
                point: GeoPoint::new(39.95, 32.68)
            }
        );
        assert_eq!(session.current_points().len(), 2);
    }

    #[test]
    fn test_context_click_finalizes_on_empty_space() {
        let mut session = session_with_triangle();
        let action = session.context_click(GeoPoint::new(10.0, 10.0), now());
        assert!(matches!(action, ContextAction::Finalized(_)));

        let action = session.context_click(GeoPoint::new(10.0, 10.0), now());
        assert_eq!(action, ContextAction::Ignored);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut session = session_with_triangle();
        session.finalize(now()).unwrap();
        let deleted = session.delete(1, now()).unwrap();
        assert_eq!(deleted.polygon_id(), 1);
        assert!(session.completed().is_empty());

        session.add_point(GeoPoint::new(0.0, 0.0));
        session.add_point(GeoPoint::new(0.0, 1.0));
        session.add_point(GeoPoint::new(1.0, 1.0));
        let message = session.finalize(now()).unwrap();
        assert_eq!(message.polygon_id(), 2);
    }

    #[test]
    fn test_delete_unknown_polygon() {
        let mut session = DrawingSession::new();
        assert_eq!(
            session.delete(9, now()),
            Err(DrawingError::UnknownPolygon(9))
        );
    }

    #[test]
    fn test_deleted_message_carries_original_record() {
        let mut session = session_with_triangle();
        let PolygonMessage::PolygonFinalized(record) = session.finalize(now()).unwrap() else {
            panic!("expected finalized message");
        };

        match session.delete(record.id, now()).unwrap() {
            PolygonMessage::PolygonDeleted(deletion) => {
                assert_eq!(deletion.original_data, record);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }
}
