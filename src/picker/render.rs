//! Terminal rendering for the picker.
//!
//! Each day occupies a 4-column slot: start marker, two-digit day, end
//! marker. The theme only changes colors, never layout.

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use super::DateRangePicker;
use super::calendar::{CalendarMonth, DayCell, DayStyle, GridCell, WEEKDAY_HEADERS, month_grid};
use super::selection::SelectionState;

const CELL_WIDTH: usize = 4;

/// Light or dark color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Rendering switches.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub theme: Theme,
    /// Draw the green start / red end corner markers.
    pub show_markers: bool,
    /// Append the selection status block.
    pub show_status: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_markers: true,
            show_status: true,
        }
    }
}

/// Render an open picker: title, weekday headers, grid, status, and the
/// Apply hint.
pub fn render_picker(picker: &DateRangePicker, today: NaiveDate, opts: RenderOptions) -> String {
    let mut out = render_month(picker.month(), &picker.selection(), today, opts);

    let apply = if picker.can_apply() {
        "[a] Apply".green().bold()
    } else {
        "[a] Apply".dimmed()
    };
    out.push('\n');
    out.push_str(&format!(
        "  {}  {}  {}  {}  {}\n",
        "[p] Prev".dimmed(),
        "[n] Next".dimmed(),
        "[t] Today".cyan(),
        "[c] Cancel".dimmed(),
        apply
    ));
    out
}

/// Render one month with `selection` highlighted.
pub fn render_month(
    month: CalendarMonth,
    selection: &SelectionState,
    today: NaiveDate,
    opts: RenderOptions,
) -> String {
    let width = CELL_WIDTH * 7;
    let mut out = String::new();

    out.push_str(&format!("{:^width$}\n", month.title()).bold().to_string());
    out.push_str(&format!("{}\n", "-".repeat(width)));

    let headers: String = WEEKDAY_HEADERS
        .iter()
        .map(|h| format!("{h:^w$}", w = CELL_WIDTH))
        .collect();
    out.push_str(&headers.dimmed().to_string());
    out.push('\n');

    for week in month_grid(month, selection, today).chunks(7) {
        for cell in week {
            match cell {
                GridCell::Blank => out.push_str(&" ".repeat(CELL_WIDTH)),
                GridCell::Day(day) => out.push_str(&render_cell(day, opts)),
            }
        }
        out.push('\n');
    }

    if opts.show_status {
        out.push('\n');
        for line in status_lines(selection) {
            out.push_str(&format!("  {line}\n"));
        }
    }

    out
}

fn render_cell(cell: &DayCell, opts: RenderOptions) -> String {
    let left = if opts.show_markers && cell.is_start {
        start_marker(opts.theme)
    } else {
        " ".normal()
    };
    let right = if opts.show_markers && cell.is_end {
        end_marker(opts.theme)
    } else {
        " ".normal()
    };
    let day = format!("{:>2}", cell.day());

    format!("{left}{}{right}", style_day(day, cell.style(), opts.theme))
}

fn style_day(day: String, style: DayStyle, theme: Theme) -> ColoredString {
    match (style, theme) {
        (DayStyle::Selected, Theme::Light) => day.white().bold().on_blue(),
        (DayStyle::Selected, Theme::Dark) => day.white().bold().on_bright_blue(),
        (DayStyle::InRange, Theme::Light) => day.blue(),
        (DayStyle::InRange, Theme::Dark) => day.bright_cyan(),
        (DayStyle::Today, Theme::Light) => day.bold().underline(),
        (DayStyle::Today, Theme::Dark) => day.bright_white().bold().underline(),
        (DayStyle::Default, Theme::Light) => day.normal(),
        (DayStyle::Default, Theme::Dark) => day.bright_black(),
    }
}

fn start_marker(theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => "•".green(),
        Theme::Dark => "•".bright_green(),
    }
}

fn end_marker(theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => "•".red(),
        Theme::Dark => "•".bright_red(),
    }
}

/// Human-readable selection status, plain text.
pub fn status_lines(selection: &SelectionState) -> Vec<String> {
    match *selection {
        SelectionState::Complete { start, end } => vec![
            "Selected Range:".to_string(),
            format!("From: {}", display_date(start)),
            format!("To:   {}", display_date(end)),
        ],
        SelectionState::StartOnly(start) => vec![
            "Start Date Selected:".to_string(),
            display_date(start),
            "Click to select end date".to_string(),
        ],
        SelectionState::Empty => vec![
            "No dates selected".to_string(),
            "Click to select start date".to_string(),
        ],
    }
}

fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
