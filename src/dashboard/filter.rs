//! Time-range filter tabs and their backend `filter_type` values.

use serde::{Deserialize, Serialize};

/// A dashboard time filter tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFilter {
    #[default]
    Day,
    Week,
    Month,
    Quarterly,
    Yearly,
    CustomRange,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 6] = [
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarterly,
        Self::Yearly,
        Self::CustomRange,
    ];

    /// Tab label as shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
            Self::CustomRange => "Custom Range",
        }
    }

    /// Value of the backend's `filter_type` query parameter.
    pub fn api_param(&self) -> &'static str {
        match self {
            Self::Day => "daily",
            Self::Week => "weekly",
            Self::Month => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::CustomRange => "custom",
        }
    }

    /// Parse a tab label, kebab-case name, or `filter_type` value.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "day" | "daily" => Some(Self::Day),
            "week" | "weekly" => Some(Self::Week),
            "month" | "monthly" => Some(Self::Month),
            "quarter" | "quarterly" => Some(Self::Quarterly),
            "year" | "yearly" => Some(Self::Yearly),
            "custom-range" | "custom" => Some(Self::CustomRange),
            _ => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::CustomRange)
    }
}

impl std::fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a tab label to its `filter_type`, defaulting to `daily`.
pub fn filter_type_for_tab(tab: &str) -> &'static str {
    let filter = match tab {
        "Day" => TimeFilter::Day,
        "Week" => TimeFilter::Week,
        "Month" => TimeFilter::Month,
        "Quarterly" => TimeFilter::Quarterly,
        "Yearly" => TimeFilter::Yearly,
        "Custom Range" => TimeFilter::CustomRange,
        _ => TimeFilter::Day,
    };
    filter.api_param()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_labels_map_to_api_params() {
        assert_eq!(filter_type_for_tab("Day"), "daily");
        assert_eq!(filter_type_for_tab("Week"), "weekly");
        assert_eq!(filter_type_for_tab("Month"), "monthly");
        assert_eq!(filter_type_for_tab("Quarterly"), "quarterly");
        assert_eq!(filter_type_for_tab("Yearly"), "yearly");
        assert_eq!(filter_type_for_tab("Custom Range"), "custom");
    }

    #[test]
    fn unknown_tab_defaults_to_daily() {
        assert_eq!(filter_type_for_tab("Fortnight"), "daily");
        assert_eq!(filter_type_for_tab(""), "daily");
    }

    #[test]
    fn parse_accepts_labels_and_params() {
        assert_eq!(TimeFilter::parse("Custom Range"), Some(TimeFilter::CustomRange));
        assert_eq!(TimeFilter::parse("custom_range"), Some(TimeFilter::CustomRange));
        assert_eq!(TimeFilter::parse("custom"), Some(TimeFilter::CustomRange));
        assert_eq!(TimeFilter::parse("WEEKLY"), Some(TimeFilter::Week));
        assert_eq!(TimeFilter::parse("quarter"), Some(TimeFilter::Quarterly));
        assert_eq!(TimeFilter::parse("hourly"), None);
    }

    #[test]
    fn every_filter_roundtrips_through_its_param() {
        for filter in TimeFilter::ALL {
            assert_eq!(TimeFilter::parse(filter.api_param()), Some(filter));
            assert_eq!(TimeFilter::parse(filter.label()), Some(filter));
        }
    }
}
