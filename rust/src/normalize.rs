//! Dependency normalization.
//!
//! Canonicalizes an activity's typed dependency list and its legacy plain
//! predecessor list into one deduplicated set of [`Link`]s, and derives
//! the legacy predecessor-id list back from that set. Malformed entries
//! degrade to empty contributions; nothing here fails.

use rustc_hash::FxHashSet;

use crate::models::{Dependency, DependencyKind};

/// A canonical, sanitized dependency edge.
///
/// Only the normalizer produces these; all graph arithmetic consumes them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    /// Id of the predecessor activity.
    pub predecessor: String,
    pub kind: DependencyKind,
    pub lag_days: i64,
}

/// Coerce a raw duration to a positive whole-day count.
///
/// Non-finite or non-positive input becomes 1; fractional days round up.
pub fn coerce_duration(raw: f64) -> i64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1;
    }
    (raw.ceil() as i64).max(1)
}

/// Coerce a raw lag to a whole-day offset (may be negative for leads).
pub fn coerce_lag(raw: f64) -> i64 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round() as i64
}

/// Clamp a manual start to day 1 or later.
pub fn coerce_manual_start(raw: Option<i64>) -> Option<i64> {
    raw.map(|day| day.max(1))
}

/// Normalize typed dependencies plus legacy predecessors into one
/// deduplicated link set.
///
/// Processing order is explicit dependencies first, then legacy
/// predecessors (synthesized as FS with zero lag); the dedup key is
/// (predecessor, kind, lag) and the first occurrence wins. Output keeps
/// insertion order.
pub fn normalize_links(dependencies: &[Dependency], predecessors: &[String]) -> Vec<Link> {
    let mut seen: FxHashSet<Link> = FxHashSet::default();
    let mut links: Vec<Link> = Vec::with_capacity(dependencies.len() + predecessors.len());

    for dep in dependencies {
        let id = dep.activity_id.trim();
        if id.is_empty() {
            continue;
        }
        let link = Link {
            predecessor: id.to_string(),
            kind: DependencyKind::parse(&dep.kind),
            lag_days: coerce_lag(dep.lag_days),
        };
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    for pred in predecessors {
        let id = pred.trim();
        if id.is_empty() {
            continue;
        }
        let link = Link {
            predecessor: id.to_string(),
            kind: DependencyKind::FinishToStart,
            lag_days: 0,
        };
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Derive the legacy predecessor-id list from a link set.
///
/// Ids are deduplicated with first-seen order preserved.
pub fn derive_predecessors(links: &[Link]) -> Vec<String> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut ids: Vec<String> = Vec::new();
    for link in links {
        if seen.insert(link.predecessor.as_str()) {
            ids.push(link.predecessor.clone());
        }
    }
    ids
}

/// Convert canonical links back to the boundary `Dependency` shape.
pub fn canonical_dependencies(links: &[Link]) -> Vec<Dependency> {
    links
        .iter()
        .map(|link| Dependency {
            activity_id: link.predecessor.clone(),
            kind: link.kind.as_str().to_string(),
            lag_days: link.lag_days as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(id: &str, kind: &str, lag: f64) -> Dependency {
        Dependency {
            activity_id: id.to_string(),
            kind: kind.to_string(),
            lag_days: lag,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_links() {
        assert!(normalize_links(&[], &[]).is_empty());
    }

    #[test]
    fn test_blank_ids_discarded() {
        let links = normalize_links(&[dep("", "FS", 0.0), dep("   ", "SS", 1.0)], &[]);
        assert!(links.is_empty());
    }

    #[test]
    fn test_id_trimmed() {
        let links = normalize_links(&[dep("  a  ", "FS", 0.0)], &[]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].predecessor, "a");
    }

    #[test]
    fn test_unknown_kind_coerced_to_fs() {
        let links = normalize_links(&[dep("a", "whenever", 0.0)], &[]);
        assert_eq!(links[0].kind, DependencyKind::FinishToStart);
    }

    #[test]
    fn test_lag_rounded_and_nonfinite_zeroed() {
        let links = normalize_links(
            &[dep("a", "FS", 1.6), dep("b", "FS", f64::NAN), dep("c", "FS", -2.4)],
            &[],
        );
        assert_eq!(links[0].lag_days, 2);
        assert_eq!(links[1].lag_days, 0);
        assert_eq!(links[2].lag_days, -2);
    }

    #[test]
    fn test_duplicate_links_collapse_first_wins() {
        let links = normalize_links(
            &[dep("a", "FS", 0.0), dep("a", "fs", 0.2), dep("a", "SS", 0.0)],
            &[],
        );
        // (a, FS, 0) appears twice after coercion; (a, SS, 0) is distinct.
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, DependencyKind::FinishToStart);
        assert_eq!(links[1].kind, DependencyKind::StartToStart);
    }

    #[test]
    fn test_legacy_predecessors_synthesize_fs_zero_lag() {
        let links = normalize_links(&[], &["a".to_string(), "b".to_string()]);
        assert_eq!(links.len(), 2);
        assert!(links
            .iter()
            .all(|l| l.kind == DependencyKind::FinishToStart && l.lag_days == 0));
    }

    #[test]
    fn test_legacy_entry_skipped_when_equivalent_exists() {
        let links = normalize_links(&[dep("a", "FS", 0.0)], &["a".to_string()]);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_legacy_entry_kept_when_typed_link_differs() {
        // An SS link to "a" does not shadow the legacy FS link to "a".
        let links = normalize_links(&[dep("a", "SS", 0.0)], &["a".to_string()]);
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].kind, DependencyKind::FinishToStart);
    }

    #[test]
    fn test_explicit_dependencies_precede_legacy() {
        let links = normalize_links(&[dep("b", "FF", 1.0)], &["a".to_string()]);
        assert_eq!(links[0].predecessor, "b");
        assert_eq!(links[1].predecessor, "a");
    }

    #[test]
    fn test_derive_predecessors_unique_first_seen() {
        let links = normalize_links(
            &[dep("b", "FS", 0.0), dep("a", "SS", 1.0), dep("b", "FF", 2.0)],
            &[],
        );
        assert_eq!(derive_predecessors(&links), vec!["b", "a"]);
    }

    #[test]
    fn test_canonical_dependencies_round_trip() {
        let links = normalize_links(&[dep("a", "sf", 1.4)], &[]);
        let deps = canonical_dependencies(&links);
        assert_eq!(deps[0].activity_id, "a");
        assert_eq!(deps[0].kind, "SF");
        assert_eq!(deps[0].lag_days, 1.0);
    }

    #[test]
    fn test_coerce_duration() {
        assert_eq!(coerce_duration(5.0), 5);
        assert_eq!(coerce_duration(4.2), 5);
        assert_eq!(coerce_duration(0.0), 1);
        assert_eq!(coerce_duration(-3.0), 1);
        assert_eq!(coerce_duration(f64::NAN), 1);
        assert_eq!(coerce_duration(f64::INFINITY), 1);
    }

    #[test]
    fn test_coerce_manual_start_floors_at_one() {
        assert_eq!(coerce_manual_start(Some(10)), Some(10));
        assert_eq!(coerce_manual_start(Some(0)), Some(1));
        assert_eq!(coerce_manual_start(Some(-5)), Some(1));
        assert_eq!(coerce_manual_start(None), None);
    }
}
