//! Sizing of the data-loading worker pool from the host's CPU topology.
//!
//! The heuristic uses half of the physical cores, leaving the rest for the main process
//! and I/O, and clamps the result to `[1, 4]` by default. When the physical core count is
//! not available it is estimated as half of the logical cores, and that estimate then goes
//! through the same halving.
use std::fmt;

use serde::Serialize;

use crate::config::Config;
use crate::consts::{
    DEFAULT_LOGICAL_CORES, DEFAULT_MAX_WORKERS, DEFAULT_MIN_WORKERS, NUM_WORKERS_ENV_VAR_NAME,
};
use crate::cores::{CoreCountProvider, SystemCores};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidLimits {
    #[error("the minimum number of workers must be at least 1")]
    ZeroMin,
    #[error("the minimum number of workers ({min}) is above the maximum ({max})")]
    MinAboveMax { min: usize, max: usize },
}

/// Inclusive bounds applied to the computed worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerLimits {
    min: usize,
    max: usize,
}

impl WorkerLimits {
    pub fn new(min: usize, max: usize) -> Result<Self, InvalidLimits> {
        if min == 0 {
            return Err(InvalidLimits::ZeroMin);
        }
        if min > max {
            return Err(InvalidLimits::MinAboveMax { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn clamp(&self, candidate: usize) -> usize {
        candidate.clamp(self.min, self.max)
    }
}

impl Default for WorkerLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WORKERS,
            max: DEFAULT_MAX_WORKERS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhysicalSource {
    /// The provider answered the physical core query.
    Detected,
    /// The physical query failed and half of the logical cores were used instead.
    EstimatedFromLogical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerSource {
    Heuristic,
    Config,
    Env,
}

/// How many workers to spawn, and how we got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Recommendation {
    pub num_workers: usize,
    pub worker_source: WorkerSource,
    pub logical_cores: Option<usize>,
    pub physical_cores: usize,
    pub physical_source: PhysicalSource,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.num_workers == 1 { "" } else { "s" };
        write!(f, "{} worker{plural} ", self.num_workers)?;
        match self.worker_source {
            WorkerSource::Env => return write!(f, "(set by {NUM_WORKERS_ENV_VAR_NAME})"),
            WorkerSource::Config => return write!(f, "(set by config)"),
            WorkerSource::Heuristic => {}
        }

        write!(f, "from {} physical cores ", self.physical_cores)?;
        match (self.physical_source, self.logical_cores) {
            (PhysicalSource::Detected, _) => write!(f, "(detected)"),
            (PhysicalSource::EstimatedFromLogical, Some(logical)) => {
                write!(f, "(estimated from {logical} logical cores)")
            }
            (PhysicalSource::EstimatedFromLogical, None) => {
                write!(f, "(estimated, logical core count unknown)")
            }
        }
    }
}

/// Physical core count to size from, falling back to half of the logical cores when the
/// provider cannot answer.
pub fn estimate_physical_cores<P>(provider: &P) -> (usize, PhysicalSource)
where
    P: CoreCountProvider + ?Sized,
{
    estimate_from(provider, provider.logical_cores())
}

// `logical_cores` is the one reading taken for this call, also the one reported.
fn estimate_from<P>(provider: &P, logical_cores: Option<usize>) -> (usize, PhysicalSource)
where
    P: CoreCountProvider + ?Sized,
{
    match provider.physical_cores() {
        Ok(physical) => {
            log::debug!("Detected {physical} physical cores");
            (physical, PhysicalSource::Detected)
        }
        Err(e) => {
            let logical = logical_cores.unwrap_or_else(|| {
                log::debug!(
                    "Logical core count unavailable, assuming {DEFAULT_LOGICAL_CORES}"
                );
                DEFAULT_LOGICAL_CORES
            });
            log::debug!("{e}, estimating physical cores from {logical} logical cores");
            (logical / 2, PhysicalSource::EstimatedFromLogical)
        }
    }
}

/// Runs the heuristic against `provider` and keeps the breakdown.
/// Explicit overrides are not looked at, see `resolve_num_workers` for that.
pub fn recommend<P>(provider: &P, limits: WorkerLimits) -> Recommendation
where
    P: CoreCountProvider + ?Sized,
{
    let logical_cores = provider.logical_cores();
    let (physical_cores, physical_source) = estimate_from(provider, logical_cores);
    // The fallback estimate is halved a second time here, like a detected count.
    let num_workers = limits.clamp(physical_cores / 2);

    Recommendation {
        num_workers,
        worker_source: WorkerSource::Heuristic,
        logical_cores,
        physical_cores,
        physical_source,
    }
}

/// Worker count for `provider` with the default `[1, 4]` bounds.
pub fn optimal_num_workers<P>(provider: &P) -> usize
where
    P: CoreCountProvider + ?Sized,
{
    recommend(provider, WorkerLimits::default()).num_workers
}

/// Worker count for the current host, always within `[1, 4]`.
pub fn get_optimal_num_workers() -> usize {
    optimal_num_workers(&SystemCores)
}

/// The worker count to actually use: the heuristic under the config's limits, unless
/// `WORKER_ADVISOR_NUM_WORKERS` or the config's `num-workers` pins it.
pub fn resolve_num_workers<P>(provider: &P, config: &Config) -> Recommendation
where
    P: CoreCountProvider + ?Sized,
{
    let from_env = std::env::var(NUM_WORKERS_ENV_VAR_NAME).ok();
    resolve(provider, config, from_env.as_deref())
}

fn resolve<P>(provider: &P, config: &Config, from_env: Option<&str>) -> Recommendation
where
    P: CoreCountProvider + ?Sized,
{
    let mut recommendation = recommend(provider, config.limits());

    if let Some(n) = from_env.and_then(parse_override) {
        recommendation.num_workers = n;
        recommendation.worker_source = WorkerSource::Env;
    } else if let Some(n) = config.num_workers() {
        recommendation.num_workers = n;
        recommendation.worker_source = WorkerSource::Config;
    }

    recommendation
}

fn parse_override(value: &str) -> Option<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            log::warn!(
                "Ignoring {NUM_WORKERS_ENV_VAR_NAME}={value:?}: expected a positive integer"
            );
            None
        }
    }
}
