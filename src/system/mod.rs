//! Fusion system orchestration.
//!
//! This module contains the top-level `FusionSystem` that turns parsed
//! scanner records into a resolved Atlas and an assembled beacon map.

mod fusion_system;

pub use fusion_system::FusionSystem;
