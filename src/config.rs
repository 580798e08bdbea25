//! Configuration for a fusion run.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard setup: reference scanner 0, 12 shared beacons, all 48
//! orientations, sequential resolution.
//!
//! ```yaml
//! reference_id: 0
//! matcher:
//!   min_overlap: 12
//!   fingerprint_prefilter: true
//! orientations: all   # or `proper` for the 24 rotations
//! workers: 4
//! ```

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::alignment::{MatcherConfig, ResolverConfig};
use crate::atlas::ScannerId;
use crate::error::FusionError;
use crate::geometry::OrientationSet;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Scanner that defines the global frame.
    pub reference_id: u32,

    /// Overlap matcher settings.
    pub matcher: MatcherConfig,

    /// Orientation candidates searched per scanner pair.
    pub orientations: OrientationSet,

    /// Resolver worker threads. 1 runs the sequential resolver.
    pub workers: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            reference_id: 0,
            matcher: MatcherConfig::default(),
            orientations: OrientationSet::All,
            workers: 1,
        }
    }
}

impl FusionConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let config: FusionConfig = serde_yaml::from_reader(file)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the resolver cannot run with.
    pub fn validate(&self) -> Result<(), FusionError> {
        self.matcher.validate()?;
        if self.workers == 0 {
            return Err(FusionError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn reference(&self) -> ScannerId {
        ScannerId(self.reference_id)
    }

    /// Settings shared by the sequential and parallel resolvers.
    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig {
            matcher: self.matcher.clone(),
            orientations: self.orientations,
        }
    }
}
