//! Critical Path Method schedule computation.
//!
//! Runs a forward pass (earliest dates) and backward pass (latest dates)
//! over the activity dependency graph, derives total/free float and
//! criticality, and returns annotated activities sorted by start day.
//! A dependency cycle is the only structural failure; it selects a
//! sequential fallback schedule instead of an error.

use crate::config::CpmConfig;
use crate::graph::ActivityGraph;
use crate::models::{Activity, DependencyKind, ScheduleResult, ScheduledActivity};
use crate::normalize::{
    canonical_dependencies, coerce_duration, coerce_manual_start, derive_predecessors,
    normalize_links, Link,
};
use crate::{log_changes, log_checks, log_debug};

/// Outcome of a schedule computation.
///
/// Both variants carry a fully annotated schedule; the variant records
/// whether the graph was acyclic or the sequential fallback had to run.
#[derive(Clone, Debug)]
pub enum ScheduleOutcome {
    /// Normal CPM result.
    Acyclic {
        activities: Vec<ScheduledActivity>,
        project_days: i64,
    },
    /// Cycle detected; activities were chained sequentially in input order.
    CyclicFallback {
        activities: Vec<ScheduledActivity>,
        project_days: i64,
    },
}

impl ScheduleOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::CyclicFallback { .. })
    }

    pub fn activities(&self) -> &[ScheduledActivity] {
        match self {
            Self::Acyclic { activities, .. } | Self::CyclicFallback { activities, .. } => {
                activities
            }
        }
    }

    pub fn project_days(&self) -> i64 {
        match self {
            Self::Acyclic { project_days, .. } | Self::CyclicFallback { project_days, .. } => {
                *project_days
            }
        }
    }

    /// Collapse to the boundary result shape.
    pub fn into_result(self) -> ScheduleResult {
        let used_fallback = self.is_fallback();
        let project_days = self.project_days();
        let activities = match self {
            Self::Acyclic { activities, .. } | Self::CyclicFallback { activities, .. } => {
                activities
            }
        };
        ScheduleResult {
            activities,
            project_days,
            used_fallback,
        }
    }
}

/// Per-activity data after sanitization, in input order.
struct Prepared {
    ids: Vec<String>,
    names: Vec<String>,
    durations: Vec<i64>,
    manual_starts: Vec<Option<i64>>,
    links: Vec<Vec<Link>>,
}

/// Earliest start implied for an activity by one incoming edge,
/// given the predecessor's resolved earliest dates.
fn earliest_start_bound(
    kind: DependencyKind,
    lag: i64,
    pred_es: i64,
    pred_ef: i64,
    duration: i64,
) -> i64 {
    match kind {
        DependencyKind::FinishToStart => pred_ef + 1 + lag,
        DependencyKind::StartToStart => pred_es + lag,
        DependencyKind::FinishToFinish => pred_ef + lag - duration + 1,
        DependencyKind::StartToFinish => pred_es + lag - duration + 1,
    }
}

/// Upper bound on a predecessor's latest start implied by one outgoing
/// edge. The same four relations as the forward pass, algebraically
/// inverted. Evaluated with the successor's *earliest* dates instead,
/// it yields the per-edge free-float bound.
fn latest_start_bound(
    kind: DependencyKind,
    lag: i64,
    succ_start: i64,
    succ_finish: i64,
    duration: i64,
) -> i64 {
    match kind {
        DependencyKind::FinishToStart => succ_start - lag - duration,
        DependencyKind::StartToStart => succ_start - lag,
        DependencyKind::FinishToFinish => succ_finish - lag - duration + 1,
        DependencyKind::StartToFinish => succ_finish - lag,
    }
}

/// Sanitize the input batch: normalize dependencies, drop self-links,
/// coerce durations and manual starts. The input is never mutated.
fn prepare(activities: &[Activity]) -> Prepared {
    let mut ids = Vec::with_capacity(activities.len());
    let mut names = Vec::with_capacity(activities.len());
    let mut durations = Vec::with_capacity(activities.len());
    let mut manual_starts = Vec::with_capacity(activities.len());
    let mut links = Vec::with_capacity(activities.len());

    for activity in activities {
        let mut activity_links = normalize_links(&activity.dependencies, &activity.predecessors);
        activity_links.retain(|link| link.predecessor != activity.id);

        ids.push(activity.id.clone());
        names.push(activity.name.clone());
        durations.push(coerce_duration(activity.duration_days));
        manual_starts.push(coerce_manual_start(activity.manual_start));
        links.push(activity_links);
    }

    Prepared {
        ids,
        names,
        durations,
        manual_starts,
        links,
    }
}

fn annotate(
    prep: &Prepared,
    index: usize,
    start_day: i64,
    end_day: i64,
    total_float: i64,
    free_float: i64,
) -> ScheduledActivity {
    ScheduledActivity {
        id: prep.ids[index].clone(),
        name: prep.names[index].clone(),
        duration_days: prep.durations[index],
        dependencies: canonical_dependencies(&prep.links[index]),
        predecessors: derive_predecessors(&prep.links[index]),
        manual_start: prep.manual_starts[index],
        start_day,
        end_day,
        total_float,
        free_float,
        is_critical: total_float == 0,
    }
}

/// Chain activities end-to-end in input order. Safety valve for cyclic
/// graphs; every activity is critical with zero float.
fn sequential_fallback(prep: &Prepared) -> ScheduleOutcome {
    let mut activities = Vec::with_capacity(prep.ids.len());
    let mut cursor = 1i64;

    for i in 0..prep.ids.len() {
        let start = cursor.max(prep.manual_starts[i].unwrap_or(1));
        let end = start + prep.durations[i] - 1;
        cursor = end + 1;
        activities.push(annotate(prep, i, start, end, 0, 0));
    }

    let project_days = activities.last().map(|a| a.end_day).unwrap_or(1).max(1);
    ScheduleOutcome::CyclicFallback {
        activities,
        project_days,
    }
}

/// Compute the CPM schedule for a batch of activities.
///
/// Pure function of the activity and dependency sets: the input is an
/// immutable snapshot and a new annotated batch is produced, sorted
/// ascending by start day (ties keep input order). Malformed fields are
/// coerced, dangling references dropped, and a dependency cycle degrades
/// to the sequential fallback; there is no error path.
pub fn compute_schedule(activities: &[Activity], config: &CpmConfig) -> ScheduleOutcome {
    if activities.is_empty() {
        return ScheduleOutcome::Acyclic {
            activities: Vec::new(),
            project_days: 0,
        };
    }

    let prep = prepare(activities);
    let graph = ActivityGraph::new(&prep.ids, &prep.links);

    let order = match graph.topological_order() {
        Ok(order) => order,
        Err(_) => {
            log_changes!(
                config.verbosity,
                "Dependency cycle detected among {} activities; using sequential fallback",
                prep.ids.len()
            );
            return sequential_fallback(&prep);
        }
    };

    let n = prep.ids.len();

    // Forward pass: earliest start/finish in topological order. Every
    // incoming constraint must hold, so the start is the max over the
    // manual/default floor and all per-edge bounds.
    let mut earliest_start = vec![1i64; n];
    let mut earliest_finish = vec![1i64; n];
    for &i in &order {
        let mut start = prep.manual_starts[i].unwrap_or(1);
        for edge in graph.predecessors(i) {
            let bound = earliest_start_bound(
                edge.kind,
                edge.lag_days,
                earliest_start[edge.node],
                earliest_finish[edge.node],
                prep.durations[i],
            );
            log_debug!(
                config.verbosity,
                "  {} <- {} {:?} lag={}: start bound {}",
                prep.ids[i],
                prep.ids[edge.node],
                edge.kind,
                edge.lag_days,
                bound
            );
            start = start.max(bound);
        }
        earliest_start[i] = start;
        earliest_finish[i] = start + prep.durations[i] - 1;
        log_checks!(
            config.verbosity,
            "forward {}: es={} ef={}",
            prep.ids[i],
            earliest_start[i],
            earliest_finish[i]
        );
    }

    let project_days = earliest_finish.iter().copied().max().unwrap_or(1).max(1);

    // Backward pass: latest start/finish in reverse topological order.
    // No successor may be pushed late, so the latest start is the min
    // over the tail-end bound and all per-edge bounds, floored at day 1.
    let mut latest_start = vec![1i64; n];
    let mut latest_finish = vec![1i64; n];
    for &i in order.iter().rev() {
        let mut bound = project_days - prep.durations[i] + 1;
        for edge in graph.successors(i) {
            bound = bound.min(latest_start_bound(
                edge.kind,
                edge.lag_days,
                latest_start[edge.node],
                latest_finish[edge.node],
                prep.durations[i],
            ));
        }
        latest_start[i] = bound.max(1);
        latest_finish[i] = latest_start[i] + prep.durations[i] - 1;
        log_checks!(
            config.verbosity,
            "backward {}: ls={} lf={}",
            prep.ids[i],
            latest_start[i],
            latest_finish[i]
        );
    }

    // Float derivation. Free float is the minimum per-edge slack against
    // each direct successor's earliest dates; when no per-edge slack was
    // computed (no successors), it falls back to total float.
    let mut annotated = Vec::with_capacity(n);
    for i in 0..n {
        let total_float = latest_start[i] - earliest_start[i];
        let mut free: Option<i64> = None;
        for edge in graph.successors(i) {
            let slack = latest_start_bound(
                edge.kind,
                edge.lag_days,
                earliest_start[edge.node],
                earliest_finish[edge.node],
                prep.durations[i],
            ) - earliest_start[i];
            free = Some(free.map_or(slack, |current| current.min(slack)));
        }
        let free_float = free.unwrap_or(total_float);

        annotated.push(annotate(
            &prep,
            i,
            earliest_start[i],
            earliest_finish[i],
            total_float,
            free_float,
        ));
    }

    // Stable sort keeps input order among equal start days.
    annotated.sort_by_key(|a| a.start_day);

    ScheduleOutcome::Acyclic {
        activities: annotated,
        project_days,
    }
}
