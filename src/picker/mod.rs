//! Date-range picker.
//!
//! A self-contained calendar state machine. The parent view owns the
//! committed `(start, end)` pair; the picker only holds the in-progress
//! selection between [`DateRangePicker::open`] and either
//! [`DateRangePicker::apply`] or [`DateRangePicker::cancel`].
//!
//! ```rust,ignore
//! use vistrack::picker::{CommittedRange, DateRangePicker, SystemClock};
//!
//! let clock = SystemClock;
//! let mut picker = DateRangePicker::new(&clock);
//! picker.open(&CommittedRange::default(), &clock);
//! picker.select_day(5);
//! picker.select_day(10);
//! picker.apply(&mut parent);
//! ```

pub mod calendar;
pub mod render;
pub mod selection;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use calendar::{CalendarMonth, DayCell, DayStyle, GridCell, month_grid};
pub use render::Theme;
pub use selection::{SelectionMode, SelectionState, format_iso, parse_iso};

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Source of "today".
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Receives the picker's outcome.
pub trait RangeSink {
    /// Called exactly once per successful apply, with ISO `YYYY-MM-DD` dates.
    fn on_date_range_select(&mut self, start: &str, end: &str);

    /// Called whenever the picker closes.
    fn on_close(&mut self);
}

/// The parent's committed range, as ISO strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl CommittedRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// The range as a selection; `Empty` unless both dates parse.
    pub fn selection(&self) -> SelectionState {
        SelectionState::from_committed(self.start.as_deref(), self.end.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Picker
// ---------------------------------------------------------------------------

/// Calendar range picker.
#[derive(Debug, Clone)]
pub struct DateRangePicker {
    is_open: bool,
    month: CalendarMonth,
    selection: SelectionState,
    /// Selection seeded from the parent at open; restored on cancel.
    seed: SelectionState,
}

impl DateRangePicker {
    /// A closed picker showing the clock's current month.
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            is_open: false,
            month: CalendarMonth::containing(clock.today()),
            selection: SelectionState::Empty,
            seed: SelectionState::Empty,
        }
    }

    /// Open the picker seeded from the parent's committed range.
    ///
    /// Unparseable or half-present committed dates seed an empty selection.
    /// The displayed month always resets to the clock's current month.
    pub fn open(&mut self, committed: &CommittedRange, clock: &dyn Clock) {
        self.seed = committed.selection();
        self.selection = self.seed;
        self.month = CalendarMonth::containing(clock.today());
        self.is_open = true;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Whether Apply is enabled.
    pub fn can_apply(&self) -> bool {
        self.is_open && self.selection.is_complete()
    }

    /// Click a calendar date. Ignored while closed.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if !self.is_open {
            return false;
        }
        self.selection = self.selection.click(date);
        true
    }

    /// Click day `day` of the displayed month. Days that do not exist in the
    /// month are not clickable.
    pub fn select_day(&mut self, day: u32) -> bool {
        match self.month.date(day) {
            Some(date) => self.select_date(date),
            None => false,
        }
    }

    /// Select today as a single-day range.
    pub fn select_today(&mut self, clock: &dyn Clock) -> bool {
        if !self.is_open {
            return false;
        }
        let today = clock.today();
        self.selection = SelectionState::range(today, today);
        true
    }

    /// Move the displayed month by `delta`. The selection is untouched.
    pub fn navigate_month(&mut self, delta: i32) {
        if self.is_open {
            self.month = self.month.shift(delta);
        }
    }

    /// Emit the complete range to `sink` and close.
    ///
    /// Returns `false` without side effects unless the selection is complete.
    pub fn apply(&mut self, sink: &mut dyn RangeSink) -> bool {
        if !self.is_open {
            return false;
        }
        let Some((start, end)) = self.selection.to_iso_pair() else {
            return false;
        };

        sink.on_date_range_select(&start, &end);
        self.seed = self.selection;
        self.is_open = false;
        sink.on_close();
        true
    }

    /// Discard the in-progress selection and close.
    pub fn cancel(&mut self, sink: &mut dyn RangeSink) {
        if !self.is_open {
            return;
        }
        self.selection = self.seed;
        self.is_open = false;
        sink.on_close();
    }

    /// Outside click or Escape. Same as [`cancel`](Self::cancel).
    pub fn dismiss(&mut self, sink: &mut dyn RangeSink) {
        self.cancel(sink);
    }

    /// The displayed month's grid projected against the selection.
    pub fn grid(&self, today: NaiveDate) -> Vec<GridCell> {
        month_grid(self.month, &self.selection, today)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        selected: Vec<(String, String)>,
        closes: usize,
    }

    impl RangeSink for Recorder {
        fn on_date_range_select(&mut self, start: &str, end: &str) {
            self.selected.push((start.to_string(), end.to_string()));
        }

        fn on_close(&mut self) {
            self.closes += 1;
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(d(2024, 3, 15))
    }

    fn opened(committed: &CommittedRange) -> DateRangePicker {
        let clock = clock();
        let mut picker = DateRangePicker::new(&clock);
        picker.open(committed, &clock);
        picker
    }

    #[test]
    fn open_resets_month_and_seeds_selection() {
        let committed = CommittedRange::new("2024-01-05", "2024-01-10");
        let picker = opened(&committed);
        assert!(picker.is_open());
        assert_eq!(picker.month(), CalendarMonth::new(2024, 3).unwrap());
        assert_eq!(picker.selection(), SelectionState::range(d(2024, 1, 5), d(2024, 1, 10)));
        assert_eq!(picker.mode(), SelectionMode::AwaitingStart);
    }

    #[test]
    fn closed_picker_ignores_input() {
        let clock = clock();
        let mut picker = DateRangePicker::new(&clock);
        assert!(!picker.select_day(3));
        assert!(!picker.select_today(&clock));
        picker.navigate_month(1);
        assert_eq!(picker.month(), CalendarMonth::new(2024, 3).unwrap());
        assert_eq!(picker.selection(), SelectionState::Empty);
    }

    #[test]
    fn select_day_rejects_days_outside_month() {
        let mut picker = opened(&CommittedRange::default());
        picker.navigate_month(-1); // February 2024
        assert!(!picker.select_day(30));
        assert!(!picker.select_day(0));
        assert!(picker.select_day(29));
    }

    #[test]
    fn apply_emits_once_and_closes() {
        let mut picker = opened(&CommittedRange::default());
        picker.select_day(10);
        picker.select_day(5);

        let mut sink = Recorder::default();
        assert!(picker.apply(&mut sink));
        assert_eq!(
            sink.selected,
            vec![("2024-03-05".to_string(), "2024-03-10".to_string())]
        );
        assert_eq!(sink.closes, 1);
        assert!(!picker.is_open());

        // A second apply on a closed picker does nothing.
        assert!(!picker.apply(&mut sink));
        assert_eq!(sink.selected.len(), 1);
    }

    #[test]
    fn apply_is_noop_until_complete() {
        let mut picker = opened(&CommittedRange::default());
        let mut sink = Recorder::default();

        assert!(!picker.can_apply());
        assert!(!picker.apply(&mut sink));

        picker.select_day(4);
        assert!(!picker.can_apply());
        assert!(!picker.apply(&mut sink));

        assert!(sink.selected.is_empty());
        assert_eq!(sink.closes, 0);
        assert!(picker.is_open());
    }

    #[test]
    fn cancel_restores_seed() {
        let committed = CommittedRange::new("2024-01-05", "2024-01-10");
        let mut picker = opened(&committed);
        picker.select_day(20);

        let mut sink = Recorder::default();
        picker.cancel(&mut sink);
        assert!(sink.selected.is_empty());
        assert_eq!(sink.closes, 1);
        assert!(!picker.is_open());
        assert_eq!(picker.selection(), committed.selection());
    }

    #[test]
    fn dismiss_matches_cancel() {
        let mut picker = opened(&CommittedRange::default());
        picker.select_day(1);
        let mut sink = Recorder::default();
        picker.dismiss(&mut sink);
        assert_eq!(sink.closes, 1);
        assert_eq!(picker.selection(), SelectionState::Empty);
    }

    #[test]
    fn navigation_leaves_selection_alone() {
        let mut picker = opened(&CommittedRange::default());
        picker.select_day(28);
        picker.navigate_month(1);
        picker.select_day(3);
        assert_eq!(
            picker.selection(),
            SelectionState::range(d(2024, 3, 28), d(2024, 4, 3))
        );
        picker.navigate_month(-1);
        assert_eq!(picker.month(), CalendarMonth::new(2024, 3).unwrap());
    }

    #[test]
    fn today_shortcut_completes_single_day() {
        let clock = clock();
        let mut picker = opened(&CommittedRange::default());
        picker.select_day(2);
        assert!(picker.select_today(&clock));
        assert_eq!(picker.selection(), SelectionState::range(clock.0, clock.0));
        assert!(picker.can_apply());
    }
}
