//! Overlap matcher: exact translation search between two point sets.
//!
//! Given a reference set (already oriented into the global axes) and a
//! candidate set under one trial orientation, every pair (r, p) proposes the
//! translation `r - p`. A translation is accepted once at least `threshold`
//! shifted candidate points land exactly on reference points.
//!
//! If the sets truly share `threshold` beacons, every corresponding pair
//! proposes the true translation, so the search usually stops long before
//! the full |reference| × |candidate| hypothesis space is visited.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::FusionError;
use crate::geometry::{Point, PointSet};

/// Shared beacons required to accept an overlap.
pub const DEFAULT_MIN_OVERLAP: usize = 12;

/// Configuration for the overlap matcher.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum number of shared beacons for a match.
    pub min_overlap: usize,

    /// Skip scanner pairs whose distance fingerprints rule out an overlap.
    pub fingerprint_prefilter: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
            fingerprint_prefilter: true,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<(), FusionError> {
        if self.min_overlap == 0 {
            return Err(FusionError::InvalidConfig(
                "matcher.min_overlap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Brute-force translation search with a fixed acceptance threshold.
#[derive(Debug, Clone, Copy)]
pub struct OverlapMatcher {
    threshold: usize,
}

impl OverlapMatcher {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Find a translation mapping at least `threshold` candidate points onto
    /// the reference.
    ///
    /// `reference` fixes the enumeration order, `reference_set` must contain
    /// the same points and serves the membership tests. Returns the first
    /// accepted offset, or `None` once every hypothesis is exhausted.
    pub fn find_offset(
        &self,
        reference: &[Point],
        reference_set: &PointSet,
        candidate: &[Point],
    ) -> Option<Point> {
        if self.threshold == 0 || reference.is_empty() || candidate.is_empty() {
            return None;
        }
        // Hits count candidate entries, so repeats may match a smaller reference.
        if candidate.len() < self.threshold {
            return None;
        }

        // Any `threshold` matching candidate points include at least one of
        // the first `len - threshold + 1`, so later anchors add nothing new.
        let anchors = &candidate[..candidate.len() - self.threshold + 1];
        let mut tried: HashSet<Point> = HashSet::new();

        for r in reference {
            for p in anchors {
                let offset = r - p;
                if !tried.insert(offset) {
                    continue;
                }
                if self.reaches_threshold(reference_set, candidate, &offset) {
                    return Some(offset);
                }
            }
        }

        None
    }

    /// Count with early exit in both directions.
    fn reaches_threshold(
        &self,
        reference_set: &PointSet,
        candidate: &[Point],
        offset: &Point,
    ) -> bool {
        let mut hits = 0;
        for (i, p) in candidate.iter().enumerate() {
            if reference_set.contains(&(p + offset)) {
                hits += 1;
                if hits >= self.threshold {
                    return true;
                }
            }
            let remaining = candidate.len() - i - 1;
            if hits + remaining < self.threshold {
                return false;
            }
        }
        false
    }
}

/// Number of candidate points that land on the reference after `offset`.
pub fn count_overlap(reference_set: &PointSet, candidate: &[Point], offset: &Point) -> usize {
    candidate
        .iter()
        .filter(|p| reference_set.contains(&(*p + offset)))
        .count()
}

/// Convenience wrapper building the reference set on the fly.
pub fn find_offset(reference: &[Point], candidate: &[Point], threshold: usize) -> Option<Point> {
    let reference_set: PointSet = reference.iter().copied().collect();
    OverlapMatcher::new(threshold).find_offset(reference, &reference_set, candidate)
}
