//! Rust implementation of the CPM scheduling core.
//!
//! Provides dependency normalization and Critical Path Method schedule
//! computation for the project planning system. The host application
//! (form editing, chart rendering, activity generation, persistence)
//! consumes this crate through the Python module defined here.

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::collections::HashMap;

mod config;
pub mod dates;
pub mod graph;
pub mod logging;
mod models;
pub mod normalize;
pub mod schedule;

pub use config::CpmConfig;
pub use graph::{ActivityGraph, GraphError};
pub use models::{Activity, Dependency, DependencyKind, ScheduleResult, ScheduledActivity};
pub use normalize::{derive_predecessors, normalize_links, Link};
pub use schedule::{compute_schedule, ScheduleOutcome};

/// Compute the CPM schedule for a batch of activities.
///
/// Runs dependency normalization, topological ordering, forward and
/// backward passes, and float derivation. A dependency cycle never
/// raises: the result carries `used_fallback=True` and a sequential
/// schedule instead.
///
/// # Arguments
/// * `activities` - Activities to schedule (input is not mutated)
/// * `config` - Optional configuration (verbosity); defaults to silent
///
/// # Returns
/// * ScheduleResult with annotated activities sorted by start day
#[pyfunction]
#[pyo3(signature = (activities, config=None))]
fn py_compute_schedule(activities: Vec<Activity>, config: Option<CpmConfig>) -> ScheduleResult {
    let config = config.unwrap_or_default();
    compute_schedule(&activities, &config).into_result()
}

/// Canonicalize an activity's dependency information.
///
/// Merges the typed dependency list with the legacy plain predecessor
/// list into one deduplicated, sanitized dependency set. Used by the
/// editing layer to keep both fields consistent without running a full
/// schedule.
#[pyfunction]
#[pyo3(signature = (dependencies, predecessors=Vec::new()))]
fn normalize_activity_dependencies(
    dependencies: Vec<Dependency>,
    predecessors: Vec<String>,
) -> Vec<Dependency> {
    let links = normalize_links(&dependencies, &predecessors);
    normalize::canonical_dependencies(&links)
}

/// Derive the legacy predecessor-id list from a dependency set.
///
/// Ids are deduplicated with first-seen order preserved.
#[pyfunction]
fn derive_predecessor_ids(dependencies: Vec<Dependency>) -> Vec<String> {
    let links = normalize_links(&dependencies, &[]);
    derive_predecessors(&links)
}

/// Map a computed schedule's 1-based day offsets to calendar dates.
///
/// # Arguments
/// * `activities` - Annotated activities from a schedule computation
/// * `project_start` - Calendar date of project day 1
///
/// # Returns
/// * Dict of activity id -> (start_date, end_date), inclusive
#[pyfunction]
fn py_materialize_dates(
    activities: Vec<ScheduledActivity>,
    project_start: NaiveDate,
) -> HashMap<String, (NaiveDate, NaiveDate)> {
    dates::materialize_dates(&activities, project_start)
}

/// The Python extension module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Dependency>()?;
    m.add_class::<Activity>()?;
    m.add_class::<ScheduledActivity>()?;
    m.add_class::<ScheduleResult>()?;

    // Config types
    m.add_class::<CpmConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_compute_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_activity_dependencies, m)?)?;
    m.add_function(wrap_pyfunction!(derive_predecessor_ids, m)?)?;
    m.add_function(wrap_pyfunction!(py_materialize_dates, m)?)?;

    Ok(())
}
