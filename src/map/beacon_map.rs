//! BeaconMap - the assembled global map of a fully resolved Atlas.
//!
//! Holds a read-only view of every resolved scanner and the deduplicated set
//! of beacons in the global frame. Built once after resolution succeeds;
//! all queries are pure.

use crate::alignment::resolver::alignment_failed;
use crate::atlas::{Atlas, ScannerId};
use crate::error::Result;
use crate::geometry::{OrientationId, Point, PointSet, manhattan_distance, sort_points};

/// A resolved scanner as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScanner {
    pub id: ScannerId,
    pub orientation: OrientationId,
    /// Global location of the scanner.
    pub location: Point,
    /// Points in the scanner's frame after orientation, before translation.
    pub points: Vec<Point>,
}

impl ResolvedScanner {
    /// Points translated into the global frame.
    pub fn global_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(move |p| p + self.location)
    }
}

/// Deduplicated global beacon map plus scanner locations.
#[derive(Debug, Clone)]
pub struct BeaconMap {
    /// Resolved scanners, sorted by id.
    scanners: Vec<ResolvedScanner>,
    /// Every beacon in the global frame, each once.
    beacons: PointSet,
}

impl BeaconMap {
    /// Assemble the map from a fully resolved Atlas.
    ///
    /// Fails with `AlignmentFailed` if any scanner is still unresolved.
    pub fn assemble(atlas: &Atlas) -> Result<Self> {
        if !atlas.is_fully_resolved() {
            return Err(alignment_failed(atlas));
        }

        let scanners = atlas
            .scanners()
            .filter_map(|s| {
                Some(ResolvedScanner {
                    id: s.id,
                    orientation: s.orientation()?,
                    location: s.location()?,
                    points: s.points().to_vec(),
                })
            })
            .collect();

        Ok(Self::from_scanners(scanners))
    }

    /// Build directly from resolved scanner records.
    pub fn from_scanners(mut scanners: Vec<ResolvedScanner>) -> Self {
        scanners.sort_by_key(|s| s.id);
        let beacons = scanners.iter().flat_map(|s| s.global_points()).collect();
        Self { scanners, beacons }
    }

    /// Number of distinct beacons.
    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }

    /// Largest Manhattan distance between any two scanner locations.
    ///
    /// Zero when fewer than two scanners are present.
    pub fn max_scanner_distance(&self) -> u64 {
        let mut max_distance = 0;
        for (i, a) in self.scanners.iter().enumerate() {
            for b in &self.scanners[i + 1..] {
                max_distance = max_distance.max(manhattan_distance(&a.location, &b.location));
            }
        }
        max_distance
    }

    /// All beacons, sorted lexicographically.
    pub fn beacons(&self) -> Vec<Point> {
        let mut beacons: Vec<Point> = self.beacons.iter().copied().collect();
        sort_points(&mut beacons);
        beacons
    }

    pub fn contains_beacon(&self, p: &Point) -> bool {
        self.beacons.contains(p)
    }

    /// Resolved scanners, sorted by id.
    pub fn scanners(&self) -> &[ResolvedScanner] {
        &self.scanners
    }

    pub fn scanner(&self, id: ScannerId) -> Option<&ResolvedScanner> {
        self.scanners
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &self.scanners[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::{Resolver, ResolverConfig};
    use crate::atlas::ScannerRecord;
    use crate::error::FusionError;
    use crate::geometry::point;
    use crate::io::parse_report;

    const SAMPLE: &str = include_str!("../../data/sample_report.txt");

    fn resolved_sample() -> Atlas {
        let mut atlas = Atlas::from_records(parse_report(SAMPLE).unwrap(), ScannerId(0)).unwrap();
        Resolver::new(ResolverConfig::default())
            .unwrap()
            .resolve(&mut atlas)
            .unwrap();
        atlas
    }

    #[test]
    fn test_sample_beacon_count_and_distance() {
        let map = BeaconMap::assemble(&resolved_sample()).unwrap();

        assert_eq!(map.beacon_count(), 79);
        assert_eq!(map.max_scanner_distance(), 3621);
        assert_eq!(map.scanners().len(), 5);
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let atlas = resolved_sample();
        let first = BeaconMap::assemble(&atlas).unwrap();
        let second = BeaconMap::assemble(&atlas).unwrap();

        assert_eq!(first.beacons(), second.beacons());
        assert_eq!(first.scanners(), second.scanners());
        assert_eq!(first.max_scanner_distance(), second.max_scanner_distance());
        assert_eq!(first.beacon_count(), second.beacon_count());
    }

    #[test]
    fn test_known_beacons_present() {
        let map = BeaconMap::assemble(&resolved_sample()).unwrap();
        let beacons = map.beacons();

        assert_eq!(beacons.first(), Some(&point(-892, 524, 684)));
        assert_eq!(beacons.last(), Some(&point(1994, -1805, 1792)));
        assert!(map.contains_beacon(&point(459, -707, 401)));
        assert!(map.contains_beacon(&point(-618, -824, -621)));
    }

    #[test]
    fn test_shared_beacon_counted_once() {
        let a = ResolvedScanner {
            id: ScannerId(0),
            orientation: OrientationId::IDENTITY,
            location: Point::zeros(),
            points: vec![point(10, 10, 10), point(1, 2, 3)],
        };
        // Same physical beacon (10, 10, 10) seen from a flipped, shifted scanner.
        let b = ResolvedScanner {
            id: ScannerId(1),
            orientation: OrientationId(7),
            location: point(5, 5, 5),
            points: vec![point(5, 5, 5), point(-1, -2, -3)],
        };

        let map = BeaconMap::from_scanners(vec![b, a]);

        assert_eq!(map.beacon_count(), 3);
        assert_eq!(map.scanners()[0].id, ScannerId(0));
        assert_eq!(map.max_scanner_distance(), 15);
        assert_eq!(map.scanner(ScannerId(1)).unwrap().location, point(5, 5, 5));
        assert!(map.scanner(ScannerId(2)).is_none());
    }

    #[test]
    fn test_single_scanner_distance_is_zero() {
        let map = BeaconMap::from_scanners(vec![ResolvedScanner {
            id: ScannerId(0),
            orientation: OrientationId::IDENTITY,
            location: Point::zeros(),
            points: vec![point(1, 1, 1)],
        }]);

        assert_eq!(map.max_scanner_distance(), 0);
        assert_eq!(map.beacon_count(), 1);
    }

    #[test]
    fn test_unresolved_atlas_is_rejected() {
        let records = vec![
            ScannerRecord::new(ScannerId(0), vec![point(0, 0, 1)]),
            ScannerRecord::new(ScannerId(1), vec![point(0, 0, 2)]),
        ];
        let atlas = Atlas::from_records(records, ScannerId(0)).unwrap();

        assert!(matches!(
            BeaconMap::assemble(&atlas),
            Err(FusionError::AlignmentFailed { .. })
        ));
    }
}
