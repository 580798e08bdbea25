//! Scanner fusion: discrete registration of overlapping 3D beacon scanners.
//!
//! Each scanner reports beacon positions in its own frame, with unknown
//! orientation (one of 48 signed axis permutations) and unknown position.
//! Scanners that overlap share at least 12 beacons; from that alone the
//! crate places every scanner into the frame of a reference scanner and
//! assembles one deduplicated beacon map.
//!
//! ```no_run
//! use scanner_fusion::config::FusionConfig;
//! use scanner_fusion::io::load_report;
//! use scanner_fusion::system::FusionSystem;
//!
//! # fn main() -> anyhow::Result<()> {
//! let records = load_report("data/sample_report.txt")?;
//! let map = FusionSystem::new(FusionConfig::default())?.run(records)?;
//! println!("{} beacons, max distance {}", map.beacon_count(), map.max_scanner_distance());
//! # Ok(())
//! # }
//! ```

pub mod alignment;
pub mod atlas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod map;
pub mod system;

pub use error::{FusionError, Result};
