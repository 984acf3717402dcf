//! Selection state for the date-range picker.
//!
//! A range is picked with two clicks. The first click anchors the start, the
//! second closes the range. Clicking an earlier date as the second click swaps
//! the two so that `start <= end` always holds for a complete range.

use chrono::NaiveDate;

/// ISO calendar date format used for every date crossing the picker boundary.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// The in-progress selection held by an open picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing selected yet.
    #[default]
    Empty,
    /// Start anchored, waiting for the end click.
    StartOnly(NaiveDate),
    /// A closed inclusive range. `start <= end`.
    Complete { start: NaiveDate, end: NaiveDate },
}

/// Which click the picker is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    AwaitingStart,
    AwaitingEnd,
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingStart => write!(f, "awaiting-start"),
            Self::AwaitingEnd => write!(f, "awaiting-end"),
        }
    }
}

impl SelectionState {
    /// Build a complete range from two dates in either order.
    pub fn range(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self::Complete { start: a, end: b }
        } else {
            Self::Complete { start: b, end: a }
        }
    }

    /// Seed a selection from a committed pair of ISO strings.
    ///
    /// Both strings must be present and parse, otherwise the selection is
    /// `Empty`. A committed pair that arrives inverted is normalized.
    pub fn from_committed(start: Option<&str>, end: Option<&str>) -> Self {
        match (start.and_then(parse_iso), end.and_then(parse_iso)) {
            (Some(start), Some(end)) => Self::range(start, end),
            _ => Self::Empty,
        }
    }

    /// Apply a calendar click and return the next state.
    ///
    /// Awaiting start (`Empty` or `Complete`): the click anchors a new start.
    /// Awaiting end (`StartOnly`): the click closes the range, swapping when
    /// the clicked date precedes the start.
    pub fn click(self, date: NaiveDate) -> Self {
        match self {
            Self::StartOnly(start) => Self::range(start, date),
            Self::Empty | Self::Complete { .. } => Self::StartOnly(date),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::StartOnly(_) => SelectionMode::AwaitingEnd,
            _ => SelectionMode::AwaitingStart,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            Self::Empty => None,
            Self::StartOnly(start) | Self::Complete { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match *self {
            Self::Complete { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// The range as ISO strings, only when complete.
    pub fn to_iso_pair(&self) -> Option<(String, String)> {
        match *self {
            Self::Complete { start, end } => Some((format_iso(start), format_iso(end))),
            _ => None,
        }
    }

    pub fn is_start(&self, date: NaiveDate) -> bool {
        self.start() == Some(date)
    }

    pub fn is_end(&self, date: NaiveDate) -> bool {
        self.end() == Some(date)
    }

    /// True for dates strictly between start and end of a complete range.
    pub fn is_strictly_inside(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Complete { start, end } => start < date && date < end,
            _ => false,
        }
    }
}

/// Parse an ISO `YYYY-MM-DD` date, tolerating surrounding whitespace.
pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT).ok()
}

/// Format a date as ISO `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn first_click_anchors_start() {
        let state = SelectionState::Empty.click(d(2024, 3, 10));
        assert_eq!(state, SelectionState::StartOnly(d(2024, 3, 10)));
        assert_eq!(state.mode(), SelectionMode::AwaitingEnd);
    }

    #[test]
    fn second_click_after_start_closes_range() {
        let state = SelectionState::Empty
            .click(d(2024, 3, 5))
            .click(d(2024, 3, 10));
        assert_eq!(
            state,
            SelectionState::Complete {
                start: d(2024, 3, 5),
                end: d(2024, 3, 10)
            }
        );
        assert_eq!(state.mode(), SelectionMode::AwaitingStart);
    }

    #[test]
    fn second_click_before_start_swaps() {
        let state = SelectionState::Empty
            .click(d(2024, 3, 10))
            .click(d(2024, 3, 5));
        assert_eq!(state.start(), Some(d(2024, 3, 5)));
        assert_eq!(state.end(), Some(d(2024, 3, 10)));
    }

    #[test]
    fn same_date_twice_is_single_day_range() {
        let state = SelectionState::Empty
            .click(d(2024, 3, 7))
            .click(d(2024, 3, 7));
        assert_eq!(state.start(), state.end());
        assert!(state.is_complete());
    }

    #[test]
    fn third_click_restarts() {
        let state = SelectionState::range(d(2024, 3, 1), d(2024, 3, 9)).click(d(2024, 4, 2));
        assert_eq!(state, SelectionState::StartOnly(d(2024, 4, 2)));
    }

    #[test]
    fn from_committed_requires_both_dates() {
        assert_eq!(
            SelectionState::from_committed(Some("2024-01-05"), None),
            SelectionState::Empty
        );
        assert_eq!(
            SelectionState::from_committed(None, None),
            SelectionState::Empty
        );
        assert_eq!(
            SelectionState::from_committed(Some("2024-01-05"), Some("2024-01-10")),
            SelectionState::range(d(2024, 1, 5), d(2024, 1, 10))
        );
    }

    #[test]
    fn from_committed_treats_garbage_as_empty() {
        assert_eq!(
            SelectionState::from_committed(Some("yesterday"), Some("2024-01-10")),
            SelectionState::Empty
        );
        assert_eq!(
            SelectionState::from_committed(Some("2024-02-30"), Some("2024-03-01")),
            SelectionState::Empty
        );
    }

    #[test]
    fn strictly_inside_excludes_endpoints() {
        let state = SelectionState::range(d(2024, 3, 5), d(2024, 3, 8));
        assert!(!state.is_strictly_inside(d(2024, 3, 5)));
        assert!(state.is_strictly_inside(d(2024, 3, 6)));
        assert!(state.is_strictly_inside(d(2024, 3, 7)));
        assert!(!state.is_strictly_inside(d(2024, 3, 8)));
        assert!(!SelectionState::StartOnly(d(2024, 3, 5)).is_strictly_inside(d(2024, 3, 6)));
    }

    #[test]
    fn iso_pair_only_when_complete() {
        assert_eq!(SelectionState::StartOnly(d(2024, 3, 5)).to_iso_pair(), None);
        assert_eq!(
            SelectionState::range(d(2024, 12, 31), d(2024, 1, 1)).to_iso_pair(),
            Some(("2024-01-01".to_string(), "2024-12-31".to_string()))
        );
    }
}
