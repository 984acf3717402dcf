//! Check-in/check-out interval bars.
//!
//! The `checkins-by-intervals` endpoint answers in two shapes depending on
//! the filter: nested under `checkin_by_intervals.original.intervals`, or as
//! a bare array in `checkin_by_intervals`. Both normalize to [`IntervalBar`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::as_count;
use super::filter::TimeFilter;

/// The eight 3-hour buckets the quarterly view is aligned to.
pub const QUARTER_DAY_BUCKETS: [&str; 8] = [
    "00:00:00 - 03:00:00",
    "03:00:00 - 06:00:00",
    "06:00:00 - 09:00:00",
    "09:00:00 - 12:00:00",
    "12:00:00 - 15:00:00",
    "15:00:00 - 18:00:00",
    "18:00:00 - 21:00:00",
    "21:00:00 - 23:59:59",
];

/// `HH:MM:SS` → `HH:MM`.
static SECONDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}:\d{2}):\d{2}\b").expect("seconds regex must compile"));

/// Spaces around a range dash.
static DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-\s+").expect("dash regex must compile"));

/// One bar of the interval chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalBar {
    pub label: String,
    pub checkins: u64,
    pub checkouts: u64,
    pub total: u64,
}

impl IntervalBar {
    fn from_row(label: String, row: Option<&Value>) -> Self {
        let checkins = as_count(row.and_then(|r| r.get("checkin_count")));
        let checkouts = as_count(row.and_then(|r| r.get("checkout_count")));
        Self {
            label,
            checkins,
            checkouts,
            total: checkins.saturating_add(checkouts),
        }
    }
}

/// Pull the interval rows out of either payload shape.
///
/// Empty arrays count as absent, so a nested-but-empty payload still falls
/// through to the direct shape.
pub fn extract_intervals(payload: &Value) -> &[Value] {
    let root = payload.get("checkin_by_intervals");

    let nested = root
        .and_then(|r| r.get("original"))
        .and_then(|o| o.get("intervals"))
        .and_then(Value::as_array)
        .filter(|rows| !rows.is_empty());
    if let Some(rows) = nested {
        return rows;
    }

    root.and_then(Value::as_array)
        .filter(|rows| !rows.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Shorten an interval label: `"09:00:00 - 12:00:00"` → `"09:00-12:00"`.
///
/// Seconds are dropped from both ends of the range, not just the first.
pub fn shorten_label(interval: &str) -> String {
    let without_seconds = SECONDS_RE.replace_all(interval.trim(), "$1");
    DASH_RE.replace_all(&without_seconds, "-").into_owned()
}

/// Normalize an intervals payload into chart bars.
///
/// The quarterly view with exactly eight rows is aligned to
/// [`QUARTER_DAY_BUCKETS`]: each bucket takes the row with a matching
/// `interval`, else the row at the same position.
pub fn interval_bars(payload: &Value, filter: TimeFilter) -> Vec<IntervalBar> {
    let rows = extract_intervals(payload);

    if filter == TimeFilter::Quarterly && rows.len() == QUARTER_DAY_BUCKETS.len() {
        return QUARTER_DAY_BUCKETS
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let row = rows
                    .iter()
                    .find(|r| r.get("interval").and_then(Value::as_str) == Some(*bucket))
                    .or_else(|| rows.get(i));
                IntervalBar::from_row(shorten_label(bucket), row)
            })
            .collect();
    }

    rows.iter()
        .map(|row| {
            let label = row
                .get("interval")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(shorten_label)
                .unwrap_or_else(|| "Unknown".to_string());
            IntervalBar::from_row(label, Some(row))
        })
        .collect()
}
