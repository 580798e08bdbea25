//! Scanner - a sensor reporting beacon positions in its own local frame.
//!
//! A scanner starts `Unresolved`. Resolution fixes its orientation and its
//! global location exactly once; at that moment the stored points are
//! rewritten to their oriented form and indexed for membership tests.
//! Translation to the global frame is applied on demand.

use crate::geometry::{OrientationCatalog, OrientationId, Point, PointSet};

use super::types::ScannerId;

/// A parsed scanner block: id plus points in the scanner's local frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerRecord {
    pub id: ScannerId,
    pub points: Vec<Point>,
}

impl ScannerRecord {
    pub fn new(id: ScannerId, points: Vec<Point>) -> Self {
        Self { id, points }
    }
}

/// Resolution state of a scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScannerState {
    #[default]
    Unresolved,
    Resolved {
        orientation: OrientationId,
        location: Point,
    },
}

/// A scanner with its points and resolution state.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Unique identifier for this scanner.
    pub id: ScannerId,

    /// Local points; oriented in place once resolved.
    points: Vec<Point>,

    /// Current resolution state.
    state: ScannerState,

    /// Oriented points as a hash set. Empty until resolved.
    point_set: PointSet,
}

impl Scanner {
    /// Create an unresolved scanner from its local points.
    pub fn new(id: ScannerId, points: Vec<Point>) -> Self {
        Self {
            id,
            points,
            state: ScannerState::Unresolved,
            point_set: PointSet::new(),
        }
    }

    /// Create the reference scanner: resolved at the origin, identity orientation.
    pub fn reference(id: ScannerId, points: Vec<Point>) -> Self {
        let mut scanner = Self::new(id, points);
        scanner.resolve(OrientationId::IDENTITY, Point::zeros());
        scanner
    }

    pub fn from_record(record: ScannerRecord) -> Self {
        Self::new(record.id, record.points)
    }

    /// Stored points: local if unresolved, oriented if resolved.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, ScannerState::Resolved { .. })
    }

    /// Global location, if resolved.
    pub fn location(&self) -> Option<Point> {
        match self.state {
            ScannerState::Resolved { location, .. } => Some(location),
            ScannerState::Unresolved => None,
        }
    }

    /// Resolved orientation, if any.
    pub fn orientation(&self) -> Option<OrientationId> {
        match self.state {
            ScannerState::Resolved { orientation, .. } => Some(orientation),
            ScannerState::Unresolved => None,
        }
    }

    /// Oriented points as a hash set (empty while unresolved).
    pub fn point_set(&self) -> &PointSet {
        &self.point_set
    }

    /// Copy of the stored points under the given orientation.
    ///
    /// Used to try orientations on an unresolved scanner without mutating it.
    pub fn oriented_points(&self, orientation: OrientationId) -> Vec<Point> {
        let o = OrientationCatalog::global().get(orientation);
        self.points.iter().map(|p| o.apply(p)).collect()
    }

    /// Points translated to the global frame. Empty while unresolved.
    pub fn global_points(&self) -> impl Iterator<Item = Point> + '_ {
        let location = self.location();
        self.points
            .iter()
            .filter_map(move |p| location.map(|loc| p + loc))
    }

    /// Fix orientation and location, rewriting points in place.
    ///
    /// Panics if the scanner is already resolved.
    pub fn resolve(&mut self, orientation: OrientationId, location: Point) {
        assert!(!self.is_resolved(), "scanner {} already resolved", self.id);

        let o = OrientationCatalog::global().get(orientation);
        for p in self.points.iter_mut() {
            *p = o.apply(p);
        }
        self.point_set = self.points.iter().copied().collect();
        self.state = ScannerState::Resolved {
            orientation,
            location,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    fn sample_points() -> Vec<Point> {
        vec![point(686, 422, 578), point(605, 423, 415), point(515, 917, -361)]
    }

    #[test]
    fn test_new_scanner_is_unresolved() {
        let scanner = Scanner::new(ScannerId(1), sample_points());

        assert!(!scanner.is_resolved());
        assert_eq!(scanner.location(), None);
        assert_eq!(scanner.orientation(), None);
        assert!(scanner.point_set().is_empty());
        assert_eq!(scanner.global_points().count(), 0);
    }

    #[test]
    fn test_reference_scanner_at_origin() {
        let scanner = Scanner::reference(ScannerId(0), sample_points());

        assert_eq!(
            scanner.state(),
            ScannerState::Resolved {
                orientation: OrientationId::IDENTITY,
                location: Point::zeros(),
            }
        );
        assert_eq!(scanner.points(), sample_points().as_slice());
        assert_eq!(scanner.point_set().len(), 3);
    }

    #[test]
    fn test_resolve_orients_points_once() {
        let mut scanner = Scanner::new(ScannerId(1), sample_points());
        let orientation = OrientationId(5);
        let expected = scanner.oriented_points(orientation);

        scanner.resolve(orientation, point(68, -1246, -43));

        assert_eq!(scanner.points(), expected.as_slice());
        assert_eq!(scanner.points()[0], point(-686, 422, -578));
        assert!(scanner.point_set().contains(&point(-686, 422, -578)));
    }

    #[test]
    fn test_global_points_apply_location() {
        let mut scanner = Scanner::new(ScannerId(1), sample_points());
        scanner.resolve(OrientationId(5), point(68, -1246, -43));

        let global: Vec<Point> = scanner.global_points().collect();

        assert_eq!(global[0], point(-618, -824, -621));
        assert_eq!(global[1], point(-537, -823, -458));
        assert_eq!(global[2], point(-447, -329, 318));
    }

    #[test]
    #[should_panic(expected = "already resolved")]
    fn test_resolve_twice_panics() {
        let mut scanner = Scanner::reference(ScannerId(0), sample_points());
        scanner.resolve(OrientationId(1), Point::zeros());
    }
}
