//! Picks how many data-loading workers to spawn on the current host.
//!
//! ```
//! let n = worker_advisor::get_optimal_num_workers();
//! assert!((1..=4).contains(&n));
//! ```
mod config;
mod cores;
mod workers;

pub mod consts;

pub use config::{Config, ConfigLoadError, ConfigLoadErrorKind};
pub use cores::{CoreCountProvider, CoreOverrides, FixedCores, PhysicalCoresError, SystemCores};
pub use workers::{
    InvalidLimits, PhysicalSource, Recommendation, WorkerLimits, WorkerSource,
    estimate_physical_cores, get_optimal_num_workers, optimal_num_workers, recommend,
    resolve_num_workers,
};
