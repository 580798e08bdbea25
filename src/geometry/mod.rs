//! Geometry utilities: integer points and the discrete orientation catalog.

pub mod orientation;
pub mod point;

pub use orientation::{
    NUM_ORIENTATIONS, Orientation, OrientationCatalog, OrientationId, OrientationSet, transform,
};
pub use point::{Point, PointSet, manhattan_distance, point, sort_points, squared_distance};
