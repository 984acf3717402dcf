//! Month grid generation and per-day rendering flags.

use std::str::FromStr;

use anyhow::Context;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use super::selection::{SelectionState, format_iso};

/// Weekday column headers, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A displayed calendar month.
///
/// Stored as the first day of the month so that navigation can lean on
/// chrono's month arithmetic for year rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    /// Month `month` (1-12) of `year`, if representable.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Shift by `delta` months in either direction.
    ///
    /// Saturates at the edges of chrono's representable range.
    pub fn shift(&self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        shifted.map_or(*self, |first| Self { first })
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            None => 31,
        }
    }

    /// Blank cells before day 1 in a Sunday-first grid (0 = Sunday).
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Date of `day` within this month, if it exists.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    /// Long title, e.g. `"March 2024"`.
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl std::fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for CalendarMonth {
    type Err = anyhow::Error;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .with_context(|| format!("expected YYYY-MM, got '{s}'"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("invalid year in '{s}'"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("invalid month in '{s}'"))?;
        Self::new(year, month).with_context(|| format!("month out of range in '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Day cells
// ---------------------------------------------------------------------------

/// Resolved visual style of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStyle {
    Selected,
    InRange,
    Today,
    Default,
}

/// A calendar date projected against the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_start: bool,
    pub is_end: bool,
    pub is_in_range: bool,
    pub is_today: bool,
}

impl DayCell {
    pub fn project(date: NaiveDate, selection: &SelectionState, today: NaiveDate) -> Self {
        Self {
            date,
            is_start: selection.is_start(date),
            is_end: selection.is_end(date),
            is_in_range: selection.is_strictly_inside(date),
            is_today: date == today,
        }
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// First match wins: endpoint, inside the range, today, default.
    pub fn style(&self) -> DayStyle {
        if self.is_start || self.is_end {
            DayStyle::Selected
        } else if self.is_in_range {
            DayStyle::InRange
        } else if self.is_today {
            DayStyle::Today
        } else {
            DayStyle::Default
        }
    }
}

impl Serialize for DayCell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("DayCell", 7)?;
        s.serialize_field("date", &format_iso(self.date))?;
        s.serialize_field("day", &self.day())?;
        s.serialize_field("is_start", &self.is_start)?;
        s.serialize_field("is_end", &self.is_end)?;
        s.serialize_field("is_in_range", &self.is_in_range)?;
        s.serialize_field("is_today", &self.is_today)?;
        s.serialize_field("style", &self.style())?;
        s.end()
    }
}

/// One slot of a 7-column month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GridCell {
    Blank,
    Day(DayCell),
}

/// Leading blanks followed by one cell per day of `month`.
pub fn month_grid(
    month: CalendarMonth,
    selection: &SelectionState,
    today: NaiveDate,
) -> Vec<GridCell> {
    let blanks = month.leading_blanks() as usize;
    let mut cells = Vec::with_capacity(blanks + month.days_in_month() as usize);
    cells.extend(std::iter::repeat_n(GridCell::Blank, blanks));
    cells.extend(
        (1..=month.days_in_month())
            .filter_map(|day| month.date(day))
            .map(|date| GridCell::Day(DayCell::project(date, selection, today))),
    );
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn leading_blanks_match_weekday_of_first() {
        // 2024-03-01 was a Friday.
        assert_eq!(CalendarMonth::new(2024, 3).unwrap().leading_blanks(), 5);
        // 2023-10-01 was a Sunday.
        assert_eq!(CalendarMonth::new(2023, 10).unwrap().leading_blanks(), 0);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(CalendarMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(CalendarMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(CalendarMonth::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(CalendarMonth::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn shift_rolls_over_years() {
        let dec = CalendarMonth::new(2023, 12).unwrap();
        assert_eq!(dec.shift(1), CalendarMonth::new(2024, 1).unwrap());
        let jan = CalendarMonth::new(2024, 1).unwrap();
        assert_eq!(jan.shift(-1), dec);
        assert_eq!(jan.shift(-25), CalendarMonth::new(2021, 12).unwrap());
    }

    #[test]
    fn parse_year_month() {
        let m: CalendarMonth = "2024-07".parse().unwrap();
        assert_eq!((m.year(), m.month()), (2024, 7));
        assert_eq!(m.to_string(), "2024-07");
        assert!("2024-13".parse::<CalendarMonth>().is_err());
        assert!("July".parse::<CalendarMonth>().is_err());
    }

    #[test]
    fn title_is_long_month_name() {
        assert_eq!(CalendarMonth::new(2024, 3).unwrap().title(), "March 2024");
    }

    #[test]
    fn grid_has_blanks_then_days() {
        let month = CalendarMonth::new(2024, 2).unwrap();
        let grid = month_grid(month, &SelectionState::Empty, d(2024, 2, 14));
        // 2024-02-01 was a Thursday.
        assert_eq!(grid.len(), 4 + 29);
        assert!(grid[..4].iter().all(|c| *c == GridCell::Blank));
        match grid[4] {
            GridCell::Day(cell) => assert_eq!(cell.day(), 1),
            GridCell::Blank => panic!("expected day 1 after blanks"),
        }
    }

    #[test]
    fn style_precedence() {
        let selection = SelectionState::range(d(2024, 3, 5), d(2024, 3, 10));
        let today = d(2024, 3, 7);

        let start = DayCell::project(d(2024, 3, 5), &selection, today);
        assert_eq!(start.style(), DayStyle::Selected);
        assert!(start.is_start && !start.is_end);

        let end = DayCell::project(d(2024, 3, 10), &selection, today);
        assert_eq!(end.style(), DayStyle::Selected);
        assert!(end.is_end);

        // Today inside the range renders as in-range.
        let inside_today = DayCell::project(today, &selection, today);
        assert_eq!(inside_today.style(), DayStyle::InRange);

        let outside = DayCell::project(d(2024, 3, 20), &selection, d(2024, 3, 20));
        assert_eq!(outside.style(), DayStyle::Today);

        let plain = DayCell::project(d(2024, 3, 21), &selection, today);
        assert_eq!(plain.style(), DayStyle::Default);
    }

    #[test]
    fn single_day_range_marks_both_ends() {
        let selection = SelectionState::range(d(2024, 3, 5), d(2024, 3, 5));
        let cell = DayCell::project(d(2024, 3, 5), &selection, d(2024, 1, 1));
        assert!(cell.is_start && cell.is_end);
        assert_eq!(cell.style(), DayStyle::Selected);
    }

    #[test]
    fn day_cell_serializes_iso_date() {
        let cell = DayCell::project(d(2024, 3, 5), &SelectionState::Empty, d(2024, 3, 5));
        let json = serde_json::to_string(&GridCell::Day(cell)).unwrap();
        assert!(json.contains("\"kind\":\"day\""));
        assert!(json.contains("\"date\":\"2024-03-05\""));
        assert!(json.contains("\"style\":\"today\""));
    }
}
