//! Alignment module: places scanners into the global frame.
//!
//! # Architecture
//!
//! The alignment pipeline consists of:
//! 1. **Prefilter** (`fingerprint.rs`): rejects scanner pairs whose pairwise
//!    distance multisets cannot share enough beacons
//! 2. **Matching** (`matcher.rs`): exact translation search for one
//!    (reference, candidate, orientation) triple
//! 3. **Resolution** (`resolver.rs`): worklist over resolved bases × unresolved
//!    candidates × orientations, on the calling thread
//! 4. **Parallel resolution** (`parallel.rs`): the same search in rounds on a
//!    worker pool

pub mod fingerprint;
pub mod matcher;
pub mod parallel;
pub mod resolver;

pub use fingerprint::{DistanceFingerprint, FingerprintCache};
pub use matcher::{DEFAULT_MIN_OVERLAP, MatcherConfig, OverlapMatcher, count_overlap, find_offset};
pub use parallel::ParallelResolver;
pub use resolver::{Placement, Resolver, ResolverConfig, ResolverStats, search_placement};
