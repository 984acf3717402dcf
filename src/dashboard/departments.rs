//! Visits-by-department donut slices.

use serde::Serialize;
use serde_json::Value;

use super::{as_count, as_number};

/// Slice colors, cycled by department index.
pub const PALETTE: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#EC4899", "#84CC16",
];

/// One donut slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSlice {
    pub label: String,
    pub value: u64,
    pub color: &'static str,
    /// Share of all visits, 0-100.
    pub percentage: f64,
}

/// Build slices from a `visitor-by-department` payload's `data` array.
///
/// The backend's `percentage` wins when present; otherwise the share is
/// computed from the slice totals.
pub fn department_slices(payload: &Value) -> Vec<DepartmentSlice> {
    let Some(rows) = payload.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    let total = rows
        .iter()
        .map(|r| as_count(r.get("total_visitors")))
        .fold(0u64, u64::saturating_add);

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let value = as_count(row.get("total_visitors"));
            let percentage = match row.get("percentage") {
                Some(p) if !p.is_null() => as_number(Some(p)),
                _ => share(value, total),
            };
            DepartmentSlice {
                label: row
                    .get("department_name")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .unwrap_or("Unknown Department")
                    .to_string(),
                value,
                color: PALETTE[i % PALETTE.len()],
                percentage,
            }
        })
        .collect()
}

/// Sum of all slice values. Zero means the donut shows its empty state.
pub fn total_visits(slices: &[DepartmentSlice]) -> u64 {
    slices.iter().map(|s| s.value).fold(0, u64::saturating_add)
}

fn share(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (value as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_slices_with_defaults() {
        let payload = json!({
            "data": [
                { "department_name": "Engineering", "total_visitors": 30, "percentage": 60 },
                { "department_name": null, "total_visitors": 20, "percentage": "40" },
                { "department_name": "Legal" }
            ]
        });
        let slices = department_slices(&payload);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].label, "Engineering");
        assert_eq!(slices[0].color, PALETTE[0]);
        assert_eq!(slices[0].percentage, 60.0);
        assert_eq!(slices[1].label, "Unknown Department");
        assert_eq!(slices[1].percentage, 40.0);
        assert_eq!(slices[2].value, 0);
        assert_eq!(slices[2].percentage, 0.0);
        assert_eq!(total_visits(&slices), 50);
    }

    #[test]
    fn computes_share_when_backend_omits_it() {
        let payload = json!({
            "data": [
                { "department_name": "A", "total_visitors": 1 },
                { "department_name": "B", "total_visitors": 3 }
            ]
        });
        let slices = department_slices(&payload);
        assert_eq!(slices[0].percentage, 25.0);
        assert_eq!(slices[1].percentage, 75.0);
    }

    #[test]
    fn palette_cycles() {
        let rows: Vec<Value> = (0..10)
            .map(|i| json!({ "department_name": format!("D{i}"), "total_visitors": 1 }))
            .collect();
        let slices = department_slices(&json!({ "data": rows }));
        assert_eq!(slices[8].color, PALETTE[0]);
        assert_eq!(slices[9].color, PALETTE[1]);
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(department_slices(&json!({ "data": "oops" })).is_empty());
        assert!(department_slices(&Value::Null).is_empty());
    }

    #[test]
    fn huge_totals_saturate() {
        let payload = json!({
            "data": [
                { "department_name": "A", "total_visitors": 1e20 },
                { "department_name": "B", "total_visitors": 5 }
            ]
        });
        let slices = department_slices(&payload);
        assert_eq!(slices[0].value, u64::MAX);
        assert_eq!(total_visits(&slices), u64::MAX);
        assert_eq!(slices[0].percentage, 100.0);
    }
}
