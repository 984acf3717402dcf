//! The dashboard view's committed state.
//!
//! The session owns the authoritative `(start, end)` range and the active
//! time filter. It is the parent the picker reports to, and it is persisted
//! at `~/.vistrack/session.json` so consecutive CLI invocations behave like a
//! single long-lived view.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dashboard::TimeFilter;
use crate::picker::{CommittedRange, RangeSink, parse_iso};

/// Active filter plus committed range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub filter: TimeFilter,
    pub range: CommittedRange,
    /// Set by [`RangeSink::on_date_range_select`], cleared by
    /// [`Session::take_applied`].
    #[serde(skip)]
    applied: bool,
}

impl Session {
    pub fn new(filter: TimeFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Switch tabs. Leaving Custom Range drops the committed dates.
    pub fn set_filter(&mut self, filter: TimeFilter) {
        self.filter = filter;
        if !filter.is_custom() {
            self.range = CommittedRange::default();
        }
    }

    /// Set the start date directly. An end date earlier than the new start is
    /// cleared.
    pub fn set_start_date(&mut self, date: &str) {
        if let (Some(start), Some(end)) = (
            parse_iso(date),
            self.range.end.as_deref().and_then(parse_iso),
        ) && start > end
        {
            self.range.end = None;
        }
        self.range.start = Some(date.to_string());
    }

    pub fn set_end_date(&mut self, date: &str) {
        self.range.end = Some(date.to_string());
    }

    pub fn clear_range(&mut self) {
        self.range = CommittedRange::default();
    }

    /// Whether a range was applied since the last call.
    pub fn take_applied(&mut self) -> bool {
        std::mem::take(&mut self.applied)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Load the persisted session, starting on `default_filter` when nothing
    /// usable has been saved.
    pub fn load_or(default_filter: TimeFilter) -> Self {
        match session_path() {
            Some(path) => Self::load_from(&path, default_filter),
            None => Self::new(default_filter),
        }
    }

    /// Load from `path`. A missing or malformed file gives a fresh session on
    /// `default_filter`.
    pub fn load_from(path: &Path, default_filter: TimeFilter) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_else(|| Self::new(default_filter))
    }

    /// Persist to `~/.vistrack/session.json`.
    pub fn save(&self) -> Result<PathBuf> {
        let path = session_path().context("could not determine home directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize session")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

impl RangeSink for Session {
    /// A picked range always belongs to the Custom Range tab.
    fn on_date_range_select(&mut self, start: &str, end: &str) {
        self.filter = TimeFilter::CustomRange;
        self.range = CommittedRange::new(start, end);
        self.applied = true;
    }

    fn on_close(&mut self) {}
}

/// Path to the persisted session file.
pub fn session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vistrack").join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaving_custom_range_clears_dates() {
        let mut session = Session::new(TimeFilter::CustomRange);
        session.on_date_range_select("2024-01-05", "2024-01-10");
        session.set_filter(TimeFilter::CustomRange);
        assert!(!session.range.is_empty());

        session.set_filter(TimeFilter::Week);
        assert!(session.range.is_empty());
        assert_eq!(session.filter, TimeFilter::Week);
    }

    #[test]
    fn later_start_clears_end() {
        let mut session = Session::new(TimeFilter::CustomRange);
        session.set_start_date("2024-01-05");
        session.set_end_date("2024-01-10");

        session.set_start_date("2024-01-08");
        assert_eq!(session.range.end.as_deref(), Some("2024-01-10"));

        session.set_start_date("2024-01-12");
        assert_eq!(session.range.start.as_deref(), Some("2024-01-12"));
        assert_eq!(session.range.end, None);
    }

    #[test]
    fn selecting_a_range_switches_to_custom() {
        let mut session = Session::new(TimeFilter::Day);
        session.on_date_range_select("2024-02-01", "2024-02-03");
        assert_eq!(session.filter, TimeFilter::CustomRange);
        assert!(session.take_applied());
        assert!(!session.take_applied());
    }

    #[test]
    fn json_roundtrip_skips_transient_flag() {
        let mut session = Session::new(TimeFilter::Month);
        session.on_date_range_select("2024-02-01", "2024-02-03");
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("applied"));
        assert!(json.contains("custom-range"));

        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.range, CommittedRange::new("2024-02-01", "2024-02-03"));
    }

    #[test]
    fn unreadable_file_falls_back_to_default_filter() {
        let dir = std::env::temp_dir().join(format!("vistrack-session-{}", std::process::id()));
        let path = dir.join("session.json");
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(
            Session::load_from(&path, TimeFilter::Quarterly),
            Session::new(TimeFilter::Quarterly)
        );

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(
            Session::load_from(&path, TimeFilter::Month),
            Session::new(TimeFilter::Month)
        );

        let session = Session::new(TimeFilter::Yearly);
        session.save_to(&path).unwrap();
        assert_eq!(Session::load_from(&path, TimeFilter::Month).filter, TimeFilter::Yearly);

        let _ = fs::remove_dir_all(&dir);
    }
}
