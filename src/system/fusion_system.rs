//! Fusion System - main entry point for a fusion run.
//!
//! The `FusionSystem` is the top-level struct that users interact with.
//! It owns the configuration, builds the Atlas from parsed records, picks
//! the sequential or parallel resolver and assembles the final map.

use std::time::Instant;

use tracing::info;

use crate::alignment::{ParallelResolver, Resolver, ResolverStats};
use crate::atlas::{Atlas, ScannerRecord};
use crate::config::FusionConfig;
use crate::error::Result;
use crate::map::BeaconMap;

/// Main fusion system.
pub struct FusionSystem {
    config: FusionConfig,
}

impl FusionSystem {
    /// Create a new system, rejecting invalid configuration.
    pub fn new(config: FusionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Place every scanner into the global frame.
    ///
    /// Returns the fully resolved Atlas and the resolver counters.
    pub fn resolve(&self, records: Vec<ScannerRecord>) -> Result<(Atlas, ResolverStats)> {
        let mut atlas = Atlas::from_records(records, self.config.reference())?;
        let start = Instant::now();

        let stats = if self.config.workers > 1 {
            ParallelResolver::new(self.config.resolver(), self.config.workers)?.resolve(&mut atlas)?
        } else {
            Resolver::new(self.config.resolver())?.resolve(&mut atlas)?
        };

        info!(
            "Resolved {} scanners in {:.1} ms ({} pairs searched, {} skipped, {} orientation trials)",
            atlas.num_scanners(),
            start.elapsed().as_secs_f64() * 1e3,
            stats.pairs_searched,
            stats.pairs_skipped,
            stats.orientations_tried
        );

        Ok((atlas, stats))
    }

    /// Resolve and assemble the global beacon map.
    pub fn run(&self, records: Vec<ScannerRecord>) -> Result<BeaconMap> {
        let (atlas, _) = self.resolve(records)?;
        BeaconMap::assemble(&atlas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::ScannerId;
    use crate::error::FusionError;
    use crate::geometry::{OrientationSet, Point, point};
    use crate::io::parse_report;

    const SAMPLE: &str = include_str!("../../data/sample_report.txt");

    #[test]
    fn test_end_to_end_sample() {
        let system = FusionSystem::new(FusionConfig::default()).unwrap();
        let map = system.run(parse_report(SAMPLE).unwrap()).unwrap();

        assert_eq!(map.beacon_count(), 79);
        assert_eq!(map.max_scanner_distance(), 3621);
    }

    #[test]
    fn test_end_to_end_parallel_proper() {
        let config = FusionConfig {
            workers: 4,
            orientations: OrientationSet::Proper,
            ..Default::default()
        };
        let map = FusionSystem::new(config)
            .unwrap()
            .run(parse_report(SAMPLE).unwrap())
            .unwrap();

        assert_eq!(map.beacon_count(), 79);
        assert_eq!(map.max_scanner_distance(), 3621);
    }

    #[test]
    fn test_alternate_reference_gives_same_counts() {
        // Frame anchored at scanner 1: locations shift, counts do not.
        let config = FusionConfig {
            reference_id: 1,
            ..Default::default()
        };
        let map = FusionSystem::new(config)
            .unwrap()
            .run(parse_report(SAMPLE).unwrap())
            .unwrap();

        assert_eq!(map.beacon_count(), 79);
        assert_eq!(map.max_scanner_distance(), 3621);
    }

    #[test]
    fn test_coordinates_near_i32_limits() {
        // Spread of 4e9 per axis: squared distances exceed i64.
        let mut beacons: Vec<Point> = (0..12)
            .map(|i| point(2_000_000_000 - 37 * i, i * i, -2_000_000_000 + 5 * i))
            .collect();
        beacons.push(point(-2_000_000_000, 0, 2_000_000_000));

        let location = point(1000, -2000, 3000);
        let records = vec![
            ScannerRecord::new(ScannerId(0), beacons.clone()),
            ScannerRecord::new(ScannerId(1), beacons.iter().map(|b| b - location).collect()),
        ];

        let map = FusionSystem::new(FusionConfig::default())
            .unwrap()
            .run(records)
            .unwrap();

        assert_eq!(map.beacon_count(), 13);
        assert_eq!(map.scanner(ScannerId(1)).unwrap().location, location);
        assert_eq!(map.max_scanner_distance(), 6000);
    }

    #[test]
    fn test_missing_reference() {
        let config = FusionConfig {
            reference_id: 9,
            ..Default::default()
        };
        let result = FusionSystem::new(config)
            .unwrap()
            .run(parse_report(SAMPLE).unwrap());

        assert!(matches!(result, Err(FusionError::MissingReference(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FusionConfig {
            workers: 0,
            ..Default::default()
        };

        assert!(FusionSystem::new(config).is_err());
    }
}
