//! Discrete orientation catalog.
//!
//! A scanner's local axes relate to the global frame through one of 48
//! signed axis permutations (6 permutations × 8 sign combinations). Each
//! orientation is stored as an integer 3×3 matrix with entries in {-1, 0, 1}:
//!
//! ```text
//! out[k] = sign_k * p[perm[k]]      M[(k, perm[k])] = sign_k
//! ```
//!
//! Only 24 of the 48 are proper rotations (det = +1); the remaining 24 are
//! reflections. The catalog keeps all of them and lets callers choose.

use std::fmt;
use std::sync::OnceLock;

use nalgebra::Matrix3;
use serde::Deserialize;

use super::point::Point;

/// Number of orientations in the catalog.
pub const NUM_ORIENTATIONS: usize = 48;

/// Axis permutations, indexed by `id / 8`. Index 0 is the identity.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 2, 0],
    [1, 0, 2],
    [2, 0, 1],
    [2, 1, 0],
];

/// Identifier of one orientation in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrientationId(pub u8);

impl OrientationId {
    /// The identity orientation.
    pub const IDENTITY: OrientationId = OrientationId(0);

    /// Position of this orientation in the catalog table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OrientationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Which orientations the resolver searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationSet {
    /// All 48 signed permutations, reflections included.
    #[default]
    All,
    /// The 24 proper rotations (determinant +1).
    Proper,
}

/// One signed axis permutation.
#[derive(Debug, Clone)]
pub struct Orientation {
    pub id: OrientationId,
    pub permutation: [usize; 3],
    /// Bit k set means output axis k is negated.
    pub sign_mask: u8,
    pub matrix: Matrix3<i64>,
}

impl Orientation {
    fn new(id: OrientationId) -> Self {
        let permutation = PERMUTATIONS[id.index() / 8];
        let sign_mask = (id.index() % 8) as u8;

        let mut matrix = Matrix3::zeros();
        for (row, &col) in permutation.iter().enumerate() {
            matrix[(row, col)] = if sign_mask & (1 << row) != 0 { -1 } else { 1 };
        }

        Self {
            id,
            permutation,
            sign_mask,
            matrix,
        }
    }

    /// Apply this orientation to a point.
    #[inline]
    pub fn apply(&self, p: &Point) -> Point {
        self.matrix * p
    }

    /// Determinant of the orientation matrix, always +1 or -1.
    pub fn determinant(&self) -> i64 {
        let m = &self.matrix;
        m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
    }

    /// True for rotations, false for reflections.
    pub fn is_proper(&self) -> bool {
        self.determinant() == 1
    }
}

/// Precomputed table of all orientations and their inverses.
pub struct OrientationCatalog {
    orientations: Vec<Orientation>,
    inverses: Vec<OrientationId>,
}

impl OrientationCatalog {
    fn build() -> Self {
        let orientations: Vec<Orientation> = (0..NUM_ORIENTATIONS)
            .map(|i| Orientation::new(OrientationId(i as u8)))
            .collect();

        // Signed permutation matrices are orthogonal: the inverse is the transpose.
        let inverses = orientations
            .iter()
            .map(|o| {
                let transposed = o.matrix.transpose();
                orientations
                    .iter()
                    .find(|candidate| candidate.matrix == transposed)
                    .map(|candidate| candidate.id)
                    .unwrap_or(OrientationId::IDENTITY)
            })
            .collect();

        Self {
            orientations,
            inverses,
        }
    }

    /// The process-wide catalog, built on first use.
    pub fn global() -> &'static OrientationCatalog {
        static CATALOG: OnceLock<OrientationCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::build)
    }

    pub fn len(&self) -> usize {
        self.orientations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orientations.is_empty()
    }

    /// Look up an orientation.
    ///
    /// Panics if `id` is outside `[0, 48)`.
    pub fn get(&self, id: OrientationId) -> &Orientation {
        &self.orientations[id.index()]
    }

    /// Transform a point by the given orientation.
    #[inline]
    pub fn transform(&self, id: OrientationId, p: &Point) -> Point {
        self.get(id).apply(p)
    }

    /// The orientation that undoes `id`.
    pub fn inverse(&self, id: OrientationId) -> OrientationId {
        self.inverses[id.index()]
    }

    pub fn determinant(&self, id: OrientationId) -> i64 {
        self.get(id).determinant()
    }

    /// True for the 24 rotations, false for mirror images.
    pub fn is_proper(&self, id: OrientationId) -> bool {
        self.get(id).is_proper()
    }

    /// Iterate the orientations of a set, in id order.
    pub fn iter(&self, set: OrientationSet) -> impl Iterator<Item = &Orientation> + '_ {
        self.orientations
            .iter()
            .filter(move |o| set == OrientationSet::All || o.is_proper())
    }
}

/// Transform a point using the global catalog.
#[inline]
pub fn transform(id: OrientationId, p: &Point) -> Point {
    OrientationCatalog::global().transform(id, p)
}
