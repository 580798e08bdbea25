//! Pairwise-distance fingerprints for cheap overlap rejection.
//!
//! Squared distances between two beacons are unchanged by every orientation
//! in the catalog and by translation. If two scanners share `k` beacons, the
//! `k(k-1)/2` pairs among them appear in both scanners' distance multisets,
//! so a smaller multiset intersection proves the pair cannot overlap and the
//! full orientation search can be skipped.

use std::collections::HashMap;

use crate::atlas::{Atlas, ScannerId};
use crate::geometry::{Point, squared_distance};

/// Multiset of pairwise squared distances within one scanner.
#[derive(Debug, Clone, Default)]
pub struct DistanceFingerprint {
    /// squared distance -> number of point pairs at that distance
    counts: HashMap<i128, usize>,
    /// The scanner reported the same point twice; the bound does not hold.
    has_duplicates: bool,
}

impl DistanceFingerprint {
    pub fn from_points(points: &[Point]) -> Self {
        let mut counts: HashMap<i128, usize> = HashMap::new();
        let mut has_duplicates = false;

        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                if a == b {
                    has_duplicates = true;
                }
                *counts.entry(squared_distance(a, b)).or_insert(0) += 1;
            }
        }

        Self {
            counts,
            has_duplicates,
        }
    }

    /// Total number of point pairs.
    pub fn num_pairs(&self) -> usize {
        self.counts.values().sum()
    }

    /// Size of the multiset intersection with another fingerprint.
    pub fn shared_pairs(&self, other: &DistanceFingerprint) -> usize {
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };

        small
            .counts
            .iter()
            .filter_map(|(d, &n)| large.counts.get(d).map(|&m| n.min(m)))
            .sum()
    }

    /// False only when the two scanners provably share fewer than
    /// `min_overlap` beacons.
    pub fn may_overlap(&self, other: &DistanceFingerprint, min_overlap: usize) -> bool {
        if self.has_duplicates || other.has_duplicates {
            return true;
        }
        self.shared_pairs(other) >= required_shared_pairs(min_overlap)
    }
}

/// Number of point pairs spanned by `min_overlap` shared beacons.
pub fn required_shared_pairs(min_overlap: usize) -> usize {
    min_overlap * min_overlap.saturating_sub(1) / 2
}

/// Fingerprints for every scanner of an Atlas, computed once per run.
#[derive(Debug, Default)]
pub struct FingerprintCache {
    fingerprints: HashMap<ScannerId, DistanceFingerprint>,
}

impl FingerprintCache {
    pub fn build(atlas: &Atlas) -> Self {
        let fingerprints = atlas
            .scanners()
            .map(|s| (s.id, DistanceFingerprint::from_points(s.points())))
            .collect();
        Self { fingerprints }
    }

    /// True if the pair is worth a full search. Unknown ids are never rejected.
    pub fn may_overlap(&self, a: ScannerId, b: ScannerId, min_overlap: usize) -> bool {
        match (self.fingerprints.get(&a), self.fingerprints.get(&b)) {
            (Some(fa), Some(fb)) => fa.may_overlap(fb, min_overlap),
            _ => true,
        }
    }
}
