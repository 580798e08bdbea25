//! Sequential alignment resolver.
//!
//! Places every scanner of an Atlas into the global frame. Each resolved
//! scanner serves as a base exactly once: it is searched against all
//! scanners still unresolved at that moment, over every orientation in the
//! active set. Newly placed scanners join the worklist, so a scanner only
//! needs a chain of overlaps back to the reference, not a direct one.
//!
//! Resolution fails with `AlignmentFailed` when the worklist drains while
//! scanners remain unresolved.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::atlas::{Atlas, Scanner, ScannerId};
use crate::error::{FusionError, Result};
use crate::geometry::{OrientationCatalog, OrientationId, OrientationSet, Point};

use super::fingerprint::FingerprintCache;
use super::matcher::{MatcherConfig, OverlapMatcher};

/// Settings shared by the sequential and parallel resolvers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolverConfig {
    pub matcher: MatcherConfig,
    pub orientations: OrientationSet,
}

/// A discovered placement for one scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Scanner being placed.
    pub scanner: ScannerId,
    /// Resolved scanner it was matched against.
    pub base: ScannerId,
    pub orientation: OrientationId,
    /// Global location: match offset plus the base location.
    pub location: Point,
}

/// Counters for one resolution run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolverStats {
    /// Scanner pairs given the full orientation search.
    pub pairs_searched: usize,

    /// Scanner pairs rejected by the distance fingerprint.
    pub pairs_skipped: usize,

    /// Orientation trials run across all searched pairs.
    pub orientations_tried: usize,

    /// Scanners placed (reference excluded).
    pub placements: usize,

    /// Parallel rounds executed (0 for the sequential resolver).
    pub rounds: usize,
}

/// Search every orientation of `candidate` against a resolved `base`.
///
/// Returns the placement and the number of orientations tried.
pub fn search_placement(
    base: &Scanner,
    candidate: &Scanner,
    config: &ResolverConfig,
) -> (Option<Placement>, usize) {
    let Some(base_location) = base.location() else {
        return (None, 0);
    };

    let matcher = OverlapMatcher::new(config.matcher.min_overlap);
    let mut tried = 0;

    for orientation in OrientationCatalog::global().iter(config.orientations) {
        tried += 1;
        let oriented = candidate.oriented_points(orientation.id);
        if let Some(offset) = matcher.find_offset(base.points(), base.point_set(), &oriented) {
            let placement = Placement {
                scanner: candidate.id,
                base: base.id,
                orientation: orientation.id,
                location: offset + base_location,
            };
            return (Some(placement), tried);
        }
    }

    (None, tried)
}

/// Build the error reported when some scanners cannot be reached.
pub(crate) fn alignment_failed(atlas: &Atlas) -> FusionError {
    let mut resolved = atlas.resolved_ids().to_vec();
    resolved.sort();
    let unresolved = atlas.unresolved_ids();

    warn!(
        "Alignment failed: {} of {} scanners unresolved ({:?})",
        unresolved.len(),
        atlas.num_scanners(),
        unresolved
    );

    FusionError::AlignmentFailed {
        resolved,
        unresolved,
    }
}

/// Worklist resolver running on the calling thread.
pub struct Resolver {
    config: ResolverConfig,
    stats: ResolverStats,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.matcher.validate()?;
        Ok(Self {
            config,
            stats: ResolverStats::default(),
        })
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    /// Resolve every scanner in the Atlas.
    ///
    /// On failure the Atlas keeps whatever placements were committed, but no
    /// map should be assembled from it.
    pub fn resolve(&mut self, atlas: &mut Atlas) -> Result<ResolverStats> {
        self.stats = ResolverStats::default();

        let fingerprints = self
            .config
            .matcher
            .fingerprint_prefilter
            .then(|| FingerprintCache::build(atlas));

        let mut worklist: VecDeque<ScannerId> = atlas.resolved_ids().iter().copied().collect();

        while let Some(base_id) = worklist.pop_front() {
            if atlas.is_fully_resolved() {
                break;
            }

            for candidate_id in atlas.unresolved_ids() {
                if let Some(cache) = &fingerprints {
                    if !cache.may_overlap(base_id, candidate_id, self.config.matcher.min_overlap) {
                        debug!("Fingerprint rejects {} -> {}", base_id, candidate_id);
                        self.stats.pairs_skipped += 1;
                        continue;
                    }
                }

                let (Some(base), Some(candidate)) = (atlas.get(base_id), atlas.get(candidate_id))
                else {
                    continue;
                };

                self.stats.pairs_searched += 1;
                let (placement, tried) = search_placement(base, candidate, &self.config);
                self.stats.orientations_tried += tried;

                let Some(placement) = placement else {
                    continue;
                };
                if atlas.resolve(placement.scanner, placement.orientation, placement.location) {
                    self.stats.placements += 1;
                    worklist.push_back(placement.scanner);

                    info!(
                        "Placed scanner {} via {} (orientation {}, location [{}, {}, {}])",
                        placement.scanner,
                        placement.base,
                        placement.orientation,
                        placement.location.x,
                        placement.location.y,
                        placement.location.z
                    );
                }
            }
        }

        if !atlas.is_fully_resolved() {
            return Err(alignment_failed(atlas));
        }

        debug!("Resolver finished: {:?}", self.stats);
        Ok(self.stats.clone())
    }
}
