//! Integer point utilities for exact beacon coordinates.
//!
//! Beacon positions are reported as exact integers, so the whole pipeline
//! works on `Vector3<i64>` and compares points by equality.

use std::cmp::Ordering;
use std::collections::HashSet;

use nalgebra::Vector3;

/// A beacon or scanner position with exact integer coordinates.
pub type Point = Vector3<i64>;

/// Hash-backed point set used for constant-time membership tests.
pub type PointSet = HashSet<Point>;

/// Construct a point from its three coordinates.
#[inline]
pub fn point(x: i64, y: i64, z: i64) -> Point {
    Vector3::new(x, y, z)
}

/// Manhattan (L1) distance between two points.
///
/// Saturates at `u64::MAX` instead of overflowing.
#[inline]
pub fn manhattan_distance(a: &Point, b: &Point) -> u64 {
    a.x.abs_diff(b.x)
        .saturating_add(a.y.abs_diff(b.y))
        .saturating_add(a.z.abs_diff(b.z))
}

/// Squared Euclidean distance between two points.
///
/// Invariant under every orientation in the catalog and under translation,
/// which makes it usable as a frame-independent fingerprint.
///
/// Differences are exact in `i128`; the squares wrap only for coordinates
/// near the ends of the `i64` range. Equal distances always give equal keys.
#[inline]
pub fn squared_distance(a: &Point, b: &Point) -> i128 {
    let sq = |u: i64, v: i64| {
        let d = i128::from(u) - i128::from(v);
        d.wrapping_mul(d)
    };
    sq(a.x, b.x)
        .wrapping_add(sq(a.y, b.y))
        .wrapping_add(sq(a.z, b.z))
}

/// Lexicographic (x, then y, then z) ordering.
///
/// `Vector3` has no `Ord`, this gives sorted outputs a stable order.
#[inline]
pub fn lexicographic(a: &Point, b: &Point) -> Ordering {
    a.x.cmp(&b.x).then(a.y.cmp(&b.y)).then(a.z.cmp(&b.z))
}

/// Sort points in place lexicographically.
pub fn sort_points(points: &mut [Point]) {
    points.sort_by(lexicographic);
}
