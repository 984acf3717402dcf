//! Pending-checkout and expected-visitor tables with client-side search.

use serde::Serialize;
use serde_json::Value;

/// A visitor who checked in but has not checked out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingCheckout {
    pub host_name: String,
    pub visitor_name: String,
    pub visitor_id: String,
    pub checkin_time: String,
}

/// A pre-registered visitor expected today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpectedVisitor {
    pub host_name: String,
    pub visitor_name: String,
    pub expected_time_of_arrival: String,
    pub purpose: Option<String>,
}

/// Rows that can be matched against a search box term.
pub trait Searchable {
    fn matches(&self, term: &str) -> bool;
}

impl Searchable for PendingCheckout {
    /// Case-insensitive match on host, visitor name, or visitor id.
    fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.host_name, &self.visitor_name, &self.visitor_id]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

impl Searchable for ExpectedVisitor {
    /// Case-insensitive on host, visitor, and purpose; the arrival time is
    /// matched verbatim.
    fn matches(&self, term: &str) -> bool {
        let lowered = term.to_lowercase();
        self.host_name.to_lowercase().contains(&lowered)
            || self.visitor_name.to_lowercase().contains(&lowered)
            || self.expected_time_of_arrival.contains(term)
            || self
                .purpose
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&lowered))
    }
}

/// Filter rows by `term`. An empty term keeps every row.
pub fn search<'a, T: Searchable>(rows: &'a [T], term: &str) -> Vec<&'a T> {
    rows.iter().filter(|row| row.matches(term)).collect()
}

/// Rows from a `not-checkout-visitor` payload's `data` array.
///
/// Accepts both camelCase and snake_case field names; camelCase wins when
/// both are non-empty.
pub fn pending_checkouts(payload: &Value) -> Vec<PendingCheckout> {
    rows(payload, "data")
        .iter()
        .map(|row| PendingCheckout {
            host_name: text_field(row, &["hostName", "host_name"]),
            visitor_name: text_field(row, &["guestName", "visitor_name"]),
            visitor_id: text_field(row, &["visitorId", "visitor_id"]),
            checkin_time: text_field(row, &["checkInTime", "checkin_time"]),
        })
        .collect()
}

/// Rows from a `today-pre-registers` payload's `total_pre_registers_today`.
pub fn expected_visitors(payload: &Value) -> Vec<ExpectedVisitor> {
    rows(payload, "total_pre_registers_today")
        .iter()
        .map(|row| {
            let purpose = text_field(row, &["purpose"]);
            ExpectedVisitor {
                host_name: text_field(row, &["host_name"]),
                visitor_name: text_field(row, &["visitor_name"]),
                expected_time_of_arrival: text_field(row, &["expected_time_of_arrival"]),
                purpose: (!purpose.is_empty()).then_some(purpose),
            }
        })
        .collect()
}

fn rows<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First non-empty value among `keys`, with numbers rendered as text.
fn text_field(row: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| match row.get(*key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending_payload() -> Value {
        json!({
            "data": [
                { "hostName": "Priya Nair", "guestName": "Tom Reed", "visitorId": "V-1001", "checkInTime": "09:14" },
                { "host_name": "Ravi Kumar", "visitor_name": "Ana Silva", "visitor_id": 2042, "checkin_time": "10:02" },
                { "hostName": "", "host_name": "Mei Chen", "visitor_name": "Lars Berg" }
            ]
        })
    }

    #[test]
    fn pending_accepts_both_field_styles() {
        let rows = pending_checkouts(&pending_payload());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].host_name, "Priya Nair");
        assert_eq!(rows[0].visitor_id, "V-1001");
        assert_eq!(rows[1].visitor_name, "Ana Silva");
        assert_eq!(rows[1].visitor_id, "2042");
        // Empty camelCase falls through to snake_case.
        assert_eq!(rows[2].host_name, "Mei Chen");
        assert_eq!(rows[2].checkin_time, "");
    }

    #[test]
    fn pending_search_is_case_insensitive() {
        let rows = pending_checkouts(&pending_payload());
        let hits = search(&rows, "RAVI");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].visitor_name, "Ana Silva");

        assert_eq!(search(&rows, "v-10").len(), 1);
        assert_eq!(search(&rows, "").len(), 3);
        assert!(search(&rows, "nobody").is_empty());
    }

    #[test]
    fn expected_visitors_search() {
        let payload = json!({
            "total_pre_registers_today": [
                { "host_name": "Priya", "visitor_name": "Tom", "expected_time_of_arrival": 930, "purpose": "Interview" },
                { "host_name": "Ravi", "visitor_name": "Ana", "expected_time_of_arrival": 1415, "purpose": null }
            ]
        });
        let rows = expected_visitors(&payload);
        assert_eq!(rows[0].expected_time_of_arrival, "930");
        assert_eq!(rows[1].purpose, None);

        assert_eq!(search(&rows, "interview").len(), 1);
        assert_eq!(search(&rows, "141").len(), 1);
        assert_eq!(search(&rows, "a").len(), 2);
    }

    #[test]
    fn missing_rows_are_empty() {
        assert!(pending_checkouts(&json!({})).is_empty());
        assert!(expected_visitors(&json!({ "total_pre_registers_today": {} })).is_empty());
    }
}
