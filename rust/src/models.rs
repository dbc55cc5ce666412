//! Core data types for the CPM scheduling system.

use pyo3::prelude::*;

// Note: PyO3-facing types hold plain Strings and f64s so the host
// application can hand us unvalidated form data; sanitization happens
// in the normalizer, not at the boundary.

/// The four dependency relationship kinds.
///
/// `FS` is the default everywhere an unrecognized kind appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Finish-to-start: successor starts after predecessor finishes.
    FinishToStart,
    /// Start-to-start: successor starts relative to predecessor's start.
    StartToStart,
    /// Finish-to-finish: successor finishes relative to predecessor's finish.
    FinishToFinish,
    /// Start-to-finish: successor finishes relative to predecessor's start.
    StartToFinish,
}

impl DependencyKind {
    /// Parse a kind string, coercing anything unrecognized to `FS`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SS" => Self::StartToStart,
            "FF" => Self::FinishToFinish,
            "SF" => Self::StartToFinish,
            _ => Self::FinishToStart,
        }
    }

    /// Canonical two-letter form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }
}

/// A typed dependency on a predecessor activity with optional lag time.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Dependency {
    #[pyo3(get, set)]
    pub activity_id: String,
    #[pyo3(get, set)]
    pub kind: String,
    #[pyo3(get, set)]
    pub lag_days: f64,
}

#[pymethods]
impl Dependency {
    #[new]
    #[pyo3(signature = (activity_id, kind=String::from("FS"), lag_days=0.0))]
    fn new(activity_id: String, kind: String, lag_days: f64) -> Self {
        Self {
            activity_id,
            kind,
            lag_days,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Dependency(activity_id={:?}, kind={:?}, lag_days={})",
            self.activity_id, self.kind, self.lag_days
        )
    }
}

/// An activity to be scheduled.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Activity {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration_days: f64,
    #[pyo3(get, set)]
    pub dependencies: Vec<Dependency>,
    /// Legacy plain predecessor ids, equivalent to FS links with zero lag.
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
    /// User-pinned earliest start day (1-based); raises the computed
    /// start as a floor, never lowers it.
    #[pyo3(get, set)]
    pub manual_start: Option<i64>,
}

#[pymethods]
impl Activity {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        duration_days,
        dependencies=Vec::new(),
        predecessors=Vec::new(),
        manual_start=None
    ))]
    fn new(
        id: String,
        name: String,
        duration_days: f64,
        dependencies: Vec<Dependency>,
        predecessors: Vec<String>,
        manual_start: Option<i64>,
    ) -> Self {
        Self {
            id,
            name,
            duration_days,
            dependencies,
            predecessors,
            manual_start,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Activity(id={:?}, name={:?}, duration_days={}, deps={})",
            self.id,
            self.name,
            self.duration_days,
            self.dependencies.len()
        )
    }
}

/// An activity annotated with its computed schedule.
///
/// All day values are 1-based and inclusive; `dependencies` and
/// `predecessors` are the canonical normalized forms.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduledActivity {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration_days: i64,
    #[pyo3(get, set)]
    pub dependencies: Vec<Dependency>,
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
    #[pyo3(get, set)]
    pub manual_start: Option<i64>,
    #[pyo3(get, set)]
    pub start_day: i64,
    #[pyo3(get, set)]
    pub end_day: i64,
    #[pyo3(get, set)]
    pub total_float: i64,
    #[pyo3(get, set)]
    pub free_float: i64,
    #[pyo3(get, set)]
    pub is_critical: bool,
}

#[pymethods]
impl ScheduledActivity {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        duration_days,
        dependencies,
        predecessors,
        manual_start,
        start_day,
        end_day,
        total_float,
        free_float,
        is_critical
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        name: String,
        duration_days: i64,
        dependencies: Vec<Dependency>,
        predecessors: Vec<String>,
        manual_start: Option<i64>,
        start_day: i64,
        end_day: i64,
        total_float: i64,
        free_float: i64,
        is_critical: bool,
    ) -> Self {
        Self {
            id,
            name,
            duration_days,
            dependencies,
            predecessors,
            manual_start,
            start_day,
            end_day,
            total_float,
            free_float,
            is_critical,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduledActivity(id={:?}, start_day={}, end_day={}, critical={})",
            self.id, self.start_day, self.end_day, self.is_critical
        )
    }
}

/// Result from a full schedule computation.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct ScheduleResult {
    /// Annotated activities, sorted ascending by start day.
    #[pyo3(get, set)]
    pub activities: Vec<ScheduledActivity>,
    /// Overall project span in days (max earliest finish, min 1; 0 when empty).
    #[pyo3(get, set)]
    pub project_days: i64,
    /// True when a dependency cycle forced the sequential fallback.
    #[pyo3(get, set)]
    pub used_fallback: bool,
}

#[pymethods]
impl ScheduleResult {
    #[new]
    #[pyo3(signature = (activities, project_days=0, used_fallback=false))]
    fn new(activities: Vec<ScheduledActivity>, project_days: i64, used_fallback: bool) -> Self {
        Self {
            activities,
            project_days,
            used_fallback,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(activities={}, project_days={}, used_fallback={})",
            self.activities.len(),
            self.project_days,
            self.used_fallback
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_canonical() {
        assert_eq!(DependencyKind::parse("FS"), DependencyKind::FinishToStart);
        assert_eq!(DependencyKind::parse("SS"), DependencyKind::StartToStart);
        assert_eq!(DependencyKind::parse("FF"), DependencyKind::FinishToFinish);
        assert_eq!(DependencyKind::parse("SF"), DependencyKind::StartToFinish);
    }

    #[test]
    fn test_kind_parse_trims_and_ignores_case() {
        assert_eq!(DependencyKind::parse(" ss "), DependencyKind::StartToStart);
        assert_eq!(DependencyKind::parse("ff"), DependencyKind::FinishToFinish);
    }

    #[test]
    fn test_kind_parse_unrecognized_defaults_to_fs() {
        assert_eq!(DependencyKind::parse(""), DependencyKind::FinishToStart);
        assert_eq!(
            DependencyKind::parse("start-before"),
            DependencyKind::FinishToStart
        );
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            DependencyKind::FinishToStart,
            DependencyKind::StartToStart,
            DependencyKind::FinishToFinish,
            DependencyKind::StartToFinish,
        ] {
            assert_eq!(DependencyKind::parse(kind.as_str()), kind);
        }
    }
}
