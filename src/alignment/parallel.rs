//! Parallel alignment resolver.
//!
//! Runs the same search as the sequential resolver, spread across worker
//! threads in rounds. Each round uses the three-phase locking pattern:
//! - Phase 1 (COLLECT): read lock to snapshot the frontier and the
//!   unresolved scanners, producing (base, candidate) jobs
//! - Phase 2 (SOLVE): workers pull jobs from a channel and search them while
//!   holding read locks only, so the resolved set cannot change mid-round
//! - Phase 3 (APPLY): write lock to commit at most one placement per
//!   candidate, the earliest in job order
//!
//! The frontier of the next round is the set of scanners placed in this
//! one, so every resolved scanner is used as a base exactly once.

use std::collections::BTreeMap;
use std::thread;

use crossbeam_channel::unbounded;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::atlas::{Atlas, ScannerId};
use crate::error::{FusionError, Result};

use super::fingerprint::FingerprintCache;
use super::resolver::{Placement, ResolverConfig, ResolverStats, alignment_failed, search_placement};

/// One (base, candidate) search, tagged with its position in the round.
#[derive(Debug, Clone, Copy)]
struct Job {
    index: usize,
    base: ScannerId,
    candidate: ScannerId,
}

/// Outcome of one job.
struct JobResult {
    index: usize,
    placement: Option<Placement>,
    orientations_tried: usize,
}

/// Multi-threaded round-based resolver.
pub struct ParallelResolver {
    config: ResolverConfig,
    workers: usize,
}

impl ParallelResolver {
    pub fn new(config: ResolverConfig, workers: usize) -> Result<Self> {
        config.matcher.validate()?;
        if workers == 0 {
            return Err(FusionError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(Self { config, workers })
    }

    /// Resolve every scanner in the Atlas.
    pub fn resolve(&self, atlas: &mut Atlas) -> Result<ResolverStats> {
        let shared = RwLock::new(std::mem::take(atlas));
        let result = self.resolve_shared(&shared);
        *atlas = shared.into_inner();
        result
    }

    fn resolve_shared(&self, shared: &RwLock<Atlas>) -> Result<ResolverStats> {
        let mut stats = ResolverStats::default();
        let fingerprints = self
            .config
            .matcher
            .fingerprint_prefilter
            .then(|| FingerprintCache::build(&shared.read()));

        let mut frontier: Vec<ScannerId> = shared.read().resolved_ids().to_vec();

        loop {
            // Phase 1: COLLECT
            let jobs = {
                let atlas = shared.read();
                if atlas.is_fully_resolved() {
                    break;
                }
                if frontier.is_empty() {
                    return Err(alignment_failed(&atlas));
                }

                let unresolved = atlas.unresolved_ids();
                let mut jobs = Vec::with_capacity(frontier.len() * unresolved.len());
                for &base in &frontier {
                    for &candidate in &unresolved {
                        let worth_searching = fingerprints.as_ref().map_or(true, |cache| {
                            cache.may_overlap(base, candidate, self.config.matcher.min_overlap)
                        });
                        if worth_searching {
                            jobs.push(Job {
                                index: jobs.len(),
                                base,
                                candidate,
                            });
                        } else {
                            stats.pairs_skipped += 1;
                        }
                    }
                }
                jobs
            };

            stats.rounds += 1;
            stats.pairs_searched += jobs.len();
            debug!(
                "Round {}: {} frontier scanner(s), {} job(s)",
                stats.rounds,
                frontier.len(),
                jobs.len()
            );

            // Phase 2: SOLVE
            let results = self.solve_round(shared, jobs);

            // Phase 3: APPLY
            let mut winners: BTreeMap<ScannerId, (usize, Placement)> = BTreeMap::new();
            for result in results {
                stats.orientations_tried += result.orientations_tried;
                if let Some(placement) = result.placement {
                    let entry = winners
                        .entry(placement.scanner)
                        .or_insert((result.index, placement));
                    if result.index < entry.0 {
                        *entry = (result.index, placement);
                    }
                }
            }

            let mut committed: Vec<(usize, Placement)> = winners.into_values().collect();
            committed.sort_by_key(|(index, _)| *index);

            frontier.clear();
            let mut atlas = shared.write();
            for (_, placement) in committed {
                if atlas.resolve(placement.scanner, placement.orientation, placement.location) {
                    stats.placements += 1;
                    frontier.push(placement.scanner);
                    info!(
                        "Placed scanner {} via {} (orientation {}, location [{}, {}, {}])",
                        placement.scanner,
                        placement.base,
                        placement.orientation,
                        placement.location.x,
                        placement.location.y,
                        placement.location.z
                    );
                }
            }
        }

        debug!("Parallel resolver finished: {:?}", stats);
        Ok(stats)
    }

    /// Run one round of jobs on the worker pool.
    fn solve_round(&self, shared: &RwLock<Atlas>, jobs: Vec<Job>) -> Vec<JobResult> {
        let num_jobs = jobs.len();
        let (job_sender, job_receiver) = unbounded::<Job>();
        let (result_sender, result_receiver) = unbounded::<JobResult>();

        for job in jobs {
            // Receiver outlives this loop, send cannot fail.
            let _ = job_sender.send(job);
        }
        drop(job_sender);

        let workers = self.workers.min(num_jobs.max(1));
        let config = &self.config;

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_receiver = job_receiver.clone();
                let result_sender = result_sender.clone();
                scope.spawn(move || {
                    let atlas = shared.read();
                    for job in job_receiver.iter() {
                        let (placement, orientations_tried) =
                            match (atlas.get(job.base), atlas.get(job.candidate)) {
                                (Some(base), Some(candidate)) => {
                                    search_placement(base, candidate, config)
                                }
                                _ => (None, 0),
                            };
                        let _ = result_sender.send(JobResult {
                            index: job.index,
                            placement,
                            orientations_tried,
                        });
                    }
                });
            }
        });
        drop(result_sender);

        result_receiver.iter().collect()
    }
}
