//! Where core counts come from.
//! The advice in `workers` never talks to the host directly: it goes through a
//! `CoreCountProvider` so callers (and tests) can pin the values.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PhysicalCoresError {
    #[error("physical core detection is not supported on this platform")]
    Unsupported,
    #[error("physical core detection failed: {0}")]
    Detection(String),
}

pub trait CoreCountProvider {
    /// Number of logical execution contexts visible to the process, if known.
    fn logical_cores(&self) -> Option<usize>;

    /// Number of physical cores, excluding SMT siblings.
    fn physical_cores(&self) -> Result<usize, PhysicalCoresError>;
}

impl<T: CoreCountProvider + ?Sized> CoreCountProvider for &T {
    fn logical_cores(&self) -> Option<usize> {
        (**self).logical_cores()
    }

    fn physical_cores(&self) -> Result<usize, PhysicalCoresError> {
        (**self).physical_cores()
    }
}

/// Reads both counts from the host every time it is asked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemCores;

impl CoreCountProvider for SystemCores {
    fn logical_cores(&self) -> Option<usize> {
        Some(num_cpus::get())
    }

    #[cfg(feature = "detect_physical_cores")]
    fn physical_cores(&self) -> Result<usize, PhysicalCoresError> {
        Ok(num_cpus::get_physical())
    }

    #[cfg(not(feature = "detect_physical_cores"))]
    fn physical_cores(&self) -> Result<usize, PhysicalCoresError> {
        Err(PhysicalCoresError::Unsupported)
    }
}

/// Fixed answers. A missing physical count behaves like a host without detection support.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixedCores {
    pub logical: Option<usize>,
    pub physical: Option<usize>,
}

impl FixedCores {
    pub fn new(logical: Option<usize>, physical: Option<usize>) -> Self {
        Self { logical, physical }
    }
}

impl CoreCountProvider for FixedCores {
    fn logical_cores(&self) -> Option<usize> {
        self.logical
    }

    fn physical_cores(&self) -> Result<usize, PhysicalCoresError> {
        self.physical.ok_or(PhysicalCoresError::Unsupported)
    }
}

/// Pins one or both counts and defers to `inner` for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreOverrides<P> {
    inner: P,
    logical: Option<usize>,
    physical: Option<usize>,
}

impl<P: CoreCountProvider> CoreOverrides<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            logical: None,
            physical: None,
        }
    }

    pub fn logical(mut self, logical: Option<usize>) -> Self {
        self.logical = logical;
        self
    }

    pub fn physical(mut self, physical: Option<usize>) -> Self {
        self.physical = physical;
        self
    }
}

impl<P: CoreCountProvider> CoreCountProvider for CoreOverrides<P> {
    fn logical_cores(&self) -> Option<usize> {
        self.logical.or_else(|| self.inner.logical_cores())
    }

    fn physical_cores(&self) -> Result<usize, PhysicalCoresError> {
        match self.physical {
            Some(n) => Ok(n),
            None => self.inner.physical_cores(),
        }
    }
}
