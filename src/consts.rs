/// Env var holding an explicit worker count, replacing the computed one.
pub const NUM_WORKERS_ENV_VAR_NAME: &str = "WORKER_ADVISOR_NUM_WORKERS";

/// Fewest workers ever recommended by default.
pub const DEFAULT_MIN_WORKERS: usize = 1;
/// Most workers ever recommended by default, whatever the size of the host.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Assumed logical core count when the OS cannot tell us.
pub const DEFAULT_LOGICAL_CORES: usize = 1;
