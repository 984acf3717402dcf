//! Interaction event log.
//!
//! Appends one JSON line per picker or filter interaction to
//! `~/.vistrack/events.jsonl`. Logging is best-effort: write failures are
//! swallowed so they never interrupt the dashboard.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::VistrackConfig;
use crate::dashboard::TimeFilter;

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventAction {
    PickerOpened,
    RangeApplied,
    PickerCancelled,
    PickerDismissed,
    FilterChanged,
}

/// One line of the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: String,
    pub action: EventAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<TimeFilter>,
}

impl Event {
    pub fn new(action: EventAction) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            action,
            start: None,
            end: None,
            filter: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Append-only JSONL event sink.
#[derive(Debug, Clone)]
pub struct EventLog {
    enabled: bool,
    path: Option<PathBuf>,
}

impl EventLog {
    /// Log to the default location, honoring `[logging] enabled`.
    pub fn from_config(config: &VistrackConfig) -> Self {
        Self {
            enabled: config.logging.enabled,
            path: events_log_path(),
        }
    }

    /// Log to an explicit file.
    pub fn at(path: PathBuf) -> Self {
        Self {
            enabled: true,
            path: Some(path),
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn record(&self, event: &Event) {
        if self.enabled {
            let _ = self.append(event);
        }
    }

    pub fn picker_opened(&self) {
        self.record(&Event::new(EventAction::PickerOpened));
    }

    pub fn range_applied(&self, start: &str, end: &str) {
        let mut event = Event::new(EventAction::RangeApplied);
        event.start = Some(start.to_string());
        event.end = Some(end.to_string());
        event.filter = Some(TimeFilter::CustomRange);
        self.record(&event);
    }

    pub fn picker_cancelled(&self) {
        self.record(&Event::new(EventAction::PickerCancelled));
    }

    pub fn picker_dismissed(&self) {
        self.record(&Event::new(EventAction::PickerDismissed));
    }

    pub fn filter_changed(&self, filter: TimeFilter) {
        let mut event = Event::new(EventAction::FilterChanged);
        event.filter = Some(filter);
        self.record(&event);
    }

    /// Read every well-formed entry; malformed lines are skipped.
    pub fn read_all(&self) -> Vec<Event> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<Event>(&line).ok())
            .collect()
    }

    fn append(&self, event: &Event) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

/// Return the path to the event log file.
pub fn events_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vistrack").join("events.jsonl"))
}
