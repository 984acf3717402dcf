//! Dashboard data shaping.
//!
//! Takes raw backend payloads (as saved in a snapshot file) and reshapes them
//! for the stat cards, the interval bar chart, the department donut, and the
//! two searchable tables. Every transformation is total: missing or
//! ill-typed fields become zero or empty, never an error.

pub mod departments;
pub mod filter;
pub mod intervals;
pub mod stats;
pub mod tables;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::picker::CommittedRange;

pub use departments::DepartmentSlice;
pub use filter::TimeFilter;
pub use intervals::IntervalBar;
pub use stats::StatCards;
pub use tables::{ExpectedVisitor, PendingCheckout};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Raw backend payloads captured for one filter.
///
/// Each field holds the untouched JSON body of the matching endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// `filter_type` the payloads were fetched with (e.g. `"weekly"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    /// `count-for-current-date`
    pub stats: Value,
    /// `not-checkout-visitor`
    pub pending_checkouts: Value,
    /// `visitor-by-department`
    pub departments: Value,
    /// `today-pre-registers`
    pub expected_visitors: Value,
    /// `checkins-by-intervals`
    pub intervals: Value,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("invalid snapshot JSON")
    }

    /// The filter the snapshot was captured for, if recorded and known.
    pub fn filter(&self) -> Option<TimeFilter> {
        self.filter_type.as_deref().and_then(TimeFilter::parse)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the dashboard renders for one filter.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// Filter the numbers belong to.
    pub filter: TimeFilter,
    pub filter_type: &'static str,
    /// Set when the snapshot was captured for a different filter than the
    /// one currently active.
    pub stale: bool,
    pub range: CommittedRange,
    pub search: String,
    pub stats: StatCards,
    pub pre_register_to_checkin_ratio: f64,
    pub checkin_to_checkout_pct: u64,
    pub intervals: Vec<IntervalBar>,
    pub departments: Vec<DepartmentSlice>,
    pub pending_checkouts: Vec<PendingCheckout>,
    pub expected_visitors: Vec<ExpectedVisitor>,
}

/// Shape a snapshot for display under the `active` filter.
///
/// The snapshot's own filter decides interval alignment; `search` narrows
/// both tables.
pub fn build_report(
    snapshot: &Snapshot,
    active: TimeFilter,
    range: &CommittedRange,
    search: &str,
) -> DashboardReport {
    let filter = snapshot.filter().unwrap_or(active);
    let stats = StatCards::from_payload(&snapshot.stats);

    let pending = tables::pending_checkouts(&snapshot.pending_checkouts);
    let expected = tables::expected_visitors(&snapshot.expected_visitors);

    DashboardReport {
        filter,
        filter_type: filter.api_param(),
        stale: filter != active,
        range: range.clone(),
        search: search.to_string(),
        pre_register_to_checkin_ratio: stats.pre_register_to_checkin_ratio(),
        checkin_to_checkout_pct: stats.checkin_to_checkout_pct(),
        stats,
        intervals: intervals::interval_bars(&snapshot.intervals, filter),
        departments: departments::department_slices(&snapshot.departments),
        pending_checkouts: tables::search(&pending, search).into_iter().cloned().collect(),
        expected_visitors: tables::search(&expected, search).into_iter().cloned().collect(),
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// A JSON number or numeric string as `f64`; anything else is `0.0`.
pub(crate) fn as_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// [`as_number`] rounded to the nearest non-negative whole count.
///
/// Values beyond `u64::MAX` saturate, so totals built from counts must use
/// saturating arithmetic.
pub(crate) fn as_count(value: Option<&Value>) -> u64 {
    as_number(value).max(0.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_handles_numbers_and_strings() {
        assert_eq!(as_count(Some(&json!(5))), 5);
        assert_eq!(as_count(Some(&json!("17"))), 17);
        assert_eq!(as_count(Some(&json!(" 3 "))), 3);
        assert_eq!(as_count(Some(&json!(2.9))), 3);
        assert_eq!(as_count(Some(&json!(2.4))), 2);
        assert_eq!(as_count(Some(&json!(1e20))), u64::MAX);
        assert_eq!(as_count(Some(&json!(-4))), 0);
        assert_eq!(as_count(Some(&json!("abc"))), 0);
        assert_eq!(as_count(Some(&json!(null))), 0);
        assert_eq!(as_count(None), 0);
        assert_eq!(as_number(Some(&json!("12.5"))), 12.5);
    }

    #[test]
    fn empty_snapshot_parses() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.filter().is_none());
        assert!(snapshot.stats.is_null());
    }

    #[test]
    fn invalid_snapshot_is_an_error() {
        assert!(Snapshot::from_json("[1, 2").is_err());
    }

    #[test]
    fn report_flags_stale_snapshot() {
        let snapshot = Snapshot::from_json(r#"{ "filter_type": "weekly" }"#).unwrap();
        let report = build_report(&snapshot, TimeFilter::Day, &CommittedRange::default(), "");
        assert_eq!(report.filter, TimeFilter::Week);
        assert!(report.stale);

        let fresh = build_report(&snapshot, TimeFilter::Week, &CommittedRange::default(), "");
        assert!(!fresh.stale);
    }

    #[test]
    fn report_without_recorded_filter_uses_active() {
        let report = build_report(
            &Snapshot::default(),
            TimeFilter::Quarterly,
            &CommittedRange::default(),
            "",
        );
        assert_eq!(report.filter, TimeFilter::Quarterly);
        assert_eq!(report.filter_type, "quarterly");
        assert!(!report.stale);
        assert_eq!(report.checkin_to_checkout_pct, 0);
    }
}
