//! Map assembly: the deduplicated global beacon set and distance queries.

pub mod beacon_map;

pub use beacon_map::{BeaconMap, ResolvedScanner};
