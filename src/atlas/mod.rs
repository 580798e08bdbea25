//! Atlas module - scanner data structures.
//!
//! - [`ScannerId`] - stable scanner identifier taken from the report
//! - [`Scanner`] - local points plus one-way resolution state
//! - [`Atlas`] - arena owning every scanner of a fusion run

pub mod atlas;
pub mod scanner;
pub mod types;

pub use atlas::Atlas;
pub use scanner::{Scanner, ScannerRecord, ScannerState};
pub use types::ScannerId;
