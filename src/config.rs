use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;

use crate::consts::{DEFAULT_MAX_WORKERS, DEFAULT_MIN_WORKERS};
use crate::workers::{InvalidLimits, WorkerLimits};

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawWorkers")]
struct Workers {
    limits: WorkerLimits,
    num_workers: Option<NonZeroUsize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawWorkers {
    #[serde(default = "default_min")]
    min: usize,
    #[serde(default = "default_max")]
    max: usize,
    num_workers: Option<NonZeroUsize>,
}

fn default_min() -> usize {
    DEFAULT_MIN_WORKERS
}

fn default_max() -> usize {
    DEFAULT_MAX_WORKERS
}

impl TryFrom<RawWorkers> for Workers {
    type Error = InvalidLimits;

    fn try_from(raw: RawWorkers) -> Result<Self, Self::Error> {
        Ok(Self {
            limits: WorkerLimits::new(raw.min, raw.max)?,
            num_workers: raw.num_workers,
        })
    }
}

/// Optional settings file:
///
/// ```toml
/// [workers]
/// min = 1
/// max = 4
/// num-workers = 3
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    workers: Workers,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs_err::read_to_string(path).map_err(|e| ConfigLoadError {
            path: path.into(),
            source: ConfigLoadErrorKind::Io(e),
        })?;
        Self::parse(&content).map_err(|e| ConfigLoadError {
            path: path.into(),
            source: ConfigLoadErrorKind::InvalidConfig(e),
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn limits(&self) -> WorkerLimits {
        self.workers.limits
    }

    pub fn num_workers(&self) -> Option<usize> {
        self.workers.num_workers.map(NonZeroUsize::get)
    }
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub enum ConfigLoadErrorKind {
    Io(#[from] std::io::Error),
    InvalidConfig(#[from] toml::de::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to load config at `{path}`")]
#[non_exhaustive]
pub struct ConfigLoadError {
    pub path: Box<Path>,
    pub source: ConfigLoadErrorKind,
}
