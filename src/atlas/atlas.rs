//! Atlas - arena of all scanners in a fusion run.
//!
//! The Atlas owns every `Scanner` and tracks which are still unresolved:
//! - One **reference** scanner, resolved at construction at the origin.
//! - Zero or more **unresolved** scanners, placed one at a time by the
//!   resolver and never revisited afterwards.
//!
//! Scanners are addressed by `ScannerId`; iteration over the arena follows
//! input order so diagnostics are reproducible.

use std::collections::HashMap;

use crate::error::{FusionError, Result};
use crate::geometry::{OrientationId, Point};

use super::scanner::{Scanner, ScannerRecord};
use super::types::ScannerId;

/// Arena of scanners plus the resolution bookkeeping.
pub struct Atlas {
    /// All scanners, in input order.
    scanners: Vec<Scanner>,
    /// Scanner id -> index into `scanners`.
    index: HashMap<ScannerId, usize>,
    /// Reference scanner id.
    reference: ScannerId,
    /// Resolved scanner ids, in the order they were placed.
    resolution_order: Vec<ScannerId>,
}

impl Atlas {
    /// Build an Atlas from parsed records.
    ///
    /// The record with `reference` id becomes the resolved reference scanner.
    pub fn from_records(records: Vec<ScannerRecord>, reference: ScannerId) -> Result<Self> {
        let mut scanners = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.id) {
                return Err(FusionError::DuplicateScanner(record.id));
            }
            index.insert(record.id, scanners.len());
            scanners.push(if record.id == reference {
                Scanner::reference(record.id, record.points)
            } else {
                Scanner::from_record(record)
            });
        }

        if !index.contains_key(&reference) {
            return Err(FusionError::MissingReference(reference));
        }

        Ok(Self {
            scanners,
            index,
            reference,
            resolution_order: vec![reference],
        })
    }

    pub fn reference_id(&self) -> ScannerId {
        self.reference
    }

    /// Number of scanners in the Atlas.
    pub fn num_scanners(&self) -> usize {
        self.scanners.len()
    }

    pub fn num_resolved(&self) -> usize {
        self.resolution_order.len()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.num_resolved() == self.num_scanners()
    }

    pub fn get(&self, id: ScannerId) -> Option<&Scanner> {
        self.index.get(&id).map(|&i| &self.scanners[i])
    }

    /// All scanners, in input order.
    pub fn scanners(&self) -> impl Iterator<Item = &Scanner> {
        self.scanners.iter()
    }

    /// Resolved scanner ids, in placement order.
    pub fn resolved_ids(&self) -> &[ScannerId] {
        &self.resolution_order
    }

    /// Unresolved scanner ids, in input order.
    pub fn unresolved_ids(&self) -> Vec<ScannerId> {
        self.scanners
            .iter()
            .filter(|s| !s.is_resolved())
            .map(|s| s.id)
            .collect()
    }

    /// Commit a resolution for an unresolved scanner.
    ///
    /// Returns false, changing nothing, if `id` is unknown or already resolved.
    pub fn resolve(&mut self, id: ScannerId, orientation: OrientationId, location: Point) -> bool {
        let Some(&i) = self.index.get(&id) else {
            return false;
        };
        let scanner = &mut self.scanners[i];
        if scanner.is_resolved() {
            return false;
        }

        scanner.resolve(orientation, location);
        self.resolution_order.push(id);
        true
    }
}

impl Default for Atlas {
    /// An empty Atlas whose reference (scanner 0) is absent.
    fn default() -> Self {
        Self {
            scanners: Vec::new(),
            index: HashMap::new(),
            reference: ScannerId(0),
            resolution_order: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    fn records() -> Vec<ScannerRecord> {
        vec![
            ScannerRecord::new(ScannerId(0), vec![point(1, 2, 3)]),
            ScannerRecord::new(ScannerId(3), vec![point(4, 5, 6)]),
            ScannerRecord::new(ScannerId(1), vec![point(7, 8, 9)]),
        ]
    }

    #[test]
    fn test_reference_starts_resolved() {
        let atlas = Atlas::from_records(records(), ScannerId(0)).unwrap();

        assert_eq!(atlas.num_scanners(), 3);
        assert_eq!(atlas.num_resolved(), 1);
        assert_eq!(atlas.resolved_ids(), &[ScannerId(0)]);
        assert_eq!(atlas.unresolved_ids(), vec![ScannerId(3), ScannerId(1)]);
        assert_eq!(atlas.get(ScannerId(0)).unwrap().location(), Some(Point::zeros()));
    }

    #[test]
    fn test_missing_reference() {
        let result = Atlas::from_records(records(), ScannerId(9));

        assert_eq!(result.err(), Some(FusionError::MissingReference(ScannerId(9))));
    }

    #[test]
    fn test_duplicate_scanner() {
        let mut input = records();
        input.push(ScannerRecord::new(ScannerId(3), vec![]));

        let result = Atlas::from_records(input, ScannerId(0));

        assert_eq!(result.err(), Some(FusionError::DuplicateScanner(ScannerId(3))));
    }

    #[test]
    fn test_resolve_is_one_way() {
        let mut atlas = Atlas::from_records(records(), ScannerId(0)).unwrap();

        assert!(atlas.resolve(ScannerId(1), OrientationId(2), point(10, 0, 0)));
        assert!(!atlas.resolve(ScannerId(1), OrientationId(3), point(20, 0, 0)));
        assert!(!atlas.resolve(ScannerId(0), OrientationId(3), point(20, 0, 0)));
        assert!(!atlas.resolve(ScannerId(42), OrientationId(3), point(20, 0, 0)));

        let scanner = atlas.get(ScannerId(1)).unwrap();
        assert_eq!(scanner.orientation(), Some(OrientationId(2)));
        assert_eq!(scanner.location(), Some(point(10, 0, 0)));
        assert_eq!(atlas.resolved_ids(), &[ScannerId(0), ScannerId(1)]);
        assert!(!atlas.is_fully_resolved());
    }
}
