//! Calendar materialization of a computed schedule.
//!
//! The scheduler works in 1-based day offsets; the project layer maps
//! those offsets onto real dates given the project's start date. Day 1
//! is the project start date itself and ranges are inclusive.

use chrono::{Days, NaiveDate};
use std::collections::HashMap;

use crate::models::ScheduledActivity;

// Note: We use std HashMap here for PyO3 interface compatibility

/// Map each activity's (start_day, end_day) to inclusive calendar dates.
pub fn materialize_dates(
    activities: &[ScheduledActivity],
    project_start: NaiveDate,
) -> HashMap<String, (NaiveDate, NaiveDate)> {
    activities
        .iter()
        .map(|activity| {
            // Day values are >= 1 by construction.
            let start = project_start + Days::new(activity.start_day.max(1) as u64 - 1);
            let end = project_start + Days::new(activity.end_day.max(1) as u64 - 1);
            (activity.id.clone(), (start, end))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(id: &str, start_day: i64, end_day: i64) -> ScheduledActivity {
        ScheduledActivity {
            id: id.to_string(),
            name: id.to_uppercase(),
            duration_days: end_day - start_day + 1,
            dependencies: vec![],
            predecessors: vec![],
            manual_start: None,
            start_day,
            end_day,
            total_float: 0,
            free_float: 0,
            is_critical: true,
        }
    }

    #[test]
    fn test_day_one_is_project_start() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let dates = materialize_dates(&[scheduled("a", 1, 5)], start);
        let (a_start, a_end) = dates["a"];
        assert_eq!(a_start, start);
        assert_eq!(a_end, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_offsets_span_month_boundary() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        let dates = materialize_dates(&[scheduled("a", 3, 4)], start);
        let (a_start, a_end) = dates["a"];
        assert_eq!(a_start, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(a_end, NaiveDate::from_ymd_opt(2025, 2, 2).unwrap());
    }

    #[test]
    fn test_empty_schedule() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(materialize_dates(&[], start).is_empty());
    }
}
