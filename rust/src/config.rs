//! Configuration types for the CPM scheduler.

use pyo3::prelude::*;

/// Configuration for a schedule computation.
#[pyclass]
#[derive(Clone, Debug)]
pub struct CpmConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for CpmConfig {
    fn default() -> Self {
        Self { verbosity: 0 }
    }
}

#[pymethods]
impl CpmConfig {
    #[new]
    #[pyo3(signature = (verbosity=0))]
    fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    fn __repr__(&self) -> String {
        format!("CpmConfig(verbosity={})", self.verbosity)
    }
}
