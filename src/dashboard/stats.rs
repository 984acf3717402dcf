//! Stat cards and the two headline ratios.

use serde::Serialize;
use serde_json::Value;

use super::as_count;

/// Counts behind the stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatCards {
    pub total_employees: u64,
    pub total_pre_registers: u64,
    pub total_checkin_visitors: u64,
    pub total_checkout_visitors: u64,
}

impl StatCards {
    /// Read the first row of a `count-for-current-date` payload's `data`.
    ///
    /// An absent or empty `data` array yields all zeros.
    pub fn from_payload(payload: &Value) -> Self {
        let Some(row) = payload
            .get("data")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
        else {
            return Self::default();
        };

        Self {
            total_employees: as_count(row.get("total_employees")),
            total_pre_registers: as_count(row.get("total_pre_registers")),
            total_checkin_visitors: as_count(row.get("total_checkin_visitors")),
            total_checkout_visitors: as_count(row.get("total_checkout_visitors")),
        }
    }

    /// Check-ins as a percentage of pre-registrations. Unrounded.
    pub fn pre_register_to_checkin_ratio(&self) -> f64 {
        if self.total_pre_registers == 0 {
            return 0.0;
        }
        (self.total_checkin_visitors as f64 / self.total_pre_registers as f64) * 100.0
    }

    /// Check-outs as a whole-number percentage of check-ins.
    pub fn checkin_to_checkout_pct(&self) -> u64 {
        if self.total_checkin_visitors == 0 {
            return 0;
        }
        let pct = (self.total_checkout_visitors as f64 / self.total_checkin_visitors as f64) * 100.0;
        pct.round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_first_row() {
        let payload = json!({
            "data": [
                {
                    "total_employees": 120,
                    "total_pre_registers": 40,
                    "total_checkin_visitors": 30,
                    "total_checkout_visitors": 20
                },
                { "total_employees": 999 }
            ]
        });
        let cards = StatCards::from_payload(&payload);
        assert_eq!(cards.total_employees, 120);
        assert_eq!(cards.total_pre_registers, 40);
        assert_eq!(cards.total_checkin_visitors, 30);
        assert_eq!(cards.total_checkout_visitors, 20);
    }

    #[test]
    fn missing_data_is_zero() {
        assert_eq!(StatCards::from_payload(&json!({})), StatCards::default());
        assert_eq!(StatCards::from_payload(&json!({ "data": [] })), StatCards::default());
        assert_eq!(StatCards::from_payload(&Value::Null), StatCards::default());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let payload = json!({ "data": [{ "total_checkin_visitors": "12", "total_checkout_visitors": "n/a" }] });
        let cards = StatCards::from_payload(&payload);
        assert_eq!(cards.total_checkin_visitors, 12);
        assert_eq!(cards.total_checkout_visitors, 0);
    }

    #[test]
    fn ratios() {
        let cards = StatCards {
            total_pre_registers: 3,
            total_checkin_visitors: 2,
            total_checkout_visitors: 1,
            ..StatCards::default()
        };
        assert!((cards.pre_register_to_checkin_ratio() - 66.666_666).abs() < 1e-3);
        assert_eq!(cards.checkin_to_checkout_pct(), 50);

        let thirds = StatCards {
            total_checkin_visitors: 3,
            total_checkout_visitors: 2,
            ..StatCards::default()
        };
        assert_eq!(thirds.checkin_to_checkout_pct(), 67);
    }

    #[test]
    fn ratios_guard_division_by_zero() {
        let cards = StatCards {
            total_checkout_visitors: 5,
            ..StatCards::default()
        };
        assert_eq!(cards.pre_register_to_checkin_ratio(), 0.0);
        assert_eq!(cards.checkin_to_checkout_pct(), 0);
    }
}
