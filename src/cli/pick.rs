//! `vistrack pick`: the interactive terminal picker.
//!
//! Reads one command per line from stdin and redraws the calendar after each
//! one. Applying writes the range to the saved session.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;

use crate::config;
use crate::events::EventLog;
use crate::picker::render::render_picker;
use crate::picker::{Clock, DateRangePicker, SystemClock, parse_iso};
use crate::session::Session;

/// One line of picker input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerCommand {
    /// Click a day of the displayed month.
    Day(u32),
    /// Click a full date, which may lie outside the displayed month.
    Date(NaiveDate),
    Next,
    Prev,
    Today,
    Apply,
    Cancel,
    /// Escape or outside click.
    Dismiss,
}

/// Parse a line of input. Blank or unknown input is `None`.
pub fn parse_command(input: &str) -> Option<PickerCommand> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "" => None,
        "n" | "next" | ">" => Some(PickerCommand::Next),
        "p" | "prev" | "<" => Some(PickerCommand::Prev),
        "t" | "today" => Some(PickerCommand::Today),
        "a" | "apply" => Some(PickerCommand::Apply),
        "c" | "cancel" => Some(PickerCommand::Cancel),
        "q" | "quit" | "esc" | "escape" => Some(PickerCommand::Dismiss),
        other => other
            .parse::<u32>()
            .ok()
            .map(PickerCommand::Day)
            .or_else(|| parse_iso(other).map(PickerCommand::Date)),
    }
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The picker changed and stays open.
    Updated,
    /// The command had no effect.
    Ignored(&'static str),
    Applied { start: String, end: String },
    Cancelled,
    Dismissed,
}

impl Step {
    pub fn closes(&self) -> bool {
        matches!(
            self,
            Self::Applied { .. } | Self::Cancelled | Self::Dismissed
        )
    }
}

/// Run one command against an open picker, reporting to `session`.
pub fn step(
    picker: &mut DateRangePicker,
    session: &mut Session,
    clock: &dyn Clock,
    command: PickerCommand,
) -> Step {
    match command {
        PickerCommand::Day(day) => {
            if picker.select_day(day) {
                Step::Updated
            } else {
                Step::Ignored("no such day in this month")
            }
        }
        PickerCommand::Date(date) => {
            picker.select_date(date);
            Step::Updated
        }
        PickerCommand::Next => {
            picker.navigate_month(1);
            Step::Updated
        }
        PickerCommand::Prev => {
            picker.navigate_month(-1);
            Step::Updated
        }
        PickerCommand::Today => {
            picker.select_today(clock);
            Step::Updated
        }
        PickerCommand::Apply => {
            if !picker.apply(session) {
                return Step::Ignored("select a start and an end date first");
            }
            session.take_applied();
            Step::Applied {
                start: session.range.start.clone().unwrap_or_default(),
                end: session.range.end.clone().unwrap_or_default(),
            }
        }
        PickerCommand::Cancel => {
            picker.cancel(session);
            Step::Cancelled
        }
        PickerCommand::Dismiss => {
            picker.dismiss(session);
            Step::Dismissed
        }
    }
}

/// Open the picker on the saved session and run it until it closes.
pub fn run_pick() -> Result<()> {
    let cfg = config::load();
    let opts = cfg.render_options();
    let log = EventLog::from_config(&cfg);
    let clock = SystemClock;

    let mut session = Session::load_or(cfg.general.default_filter);
    let mut picker = DateRangePicker::new(&clock);
    picker.open(&session.range, &clock);
    log.picker_opened();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", render_picker(&picker, clock.today(), opts));
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;

        // End of input behaves like Escape.
        let command = match lines.next() {
            Some(line) => {
                let line = line?;
                match parse_command(&line) {
                    Some(command) => command,
                    None => {
                        println!(
                            "{}",
                            "Enter a day number, YYYY-MM-DD, n, p, t, a, c, or q.".yellow()
                        );
                        continue;
                    }
                }
            }
            None => PickerCommand::Dismiss,
        };

        let outcome = step(&mut picker, &mut session, &clock, command);
        match &outcome {
            Step::Updated => {}
            Step::Ignored(reason) => println!("{}", reason.yellow()),
            Step::Applied { start, end } => {
                let path = session.save()?;
                log.range_applied(start, end);
                println!(
                    "{} Range applied: {} → {} ({})",
                    "✓".green().bold(),
                    start.bold(),
                    end.bold(),
                    session.filter
                );
                println!("  {}", format!("Saved to {}", path.display()).dimmed());
            }
            Step::Cancelled => {
                log.picker_cancelled();
                println!("{}", "Cancelled. Committed range unchanged.".dimmed());
            }
            Step::Dismissed => {
                log.picker_dismissed();
                println!("{}", "Closed. Committed range unchanged.".dimmed());
            }
        }

        if outcome.closes() {
            return Ok(());
        }
    }
}
