//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a [`Reply`]: a
//! status code plus a JSON body. Client mistakes (bad JSON, bad dates,
//! unknown filters) are 400s; only unexpected failures propagate as errors.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tiny_http::{Response, StatusCode};

use crate::config::{self, VistrackConfig};
use crate::dashboard::{self, Snapshot, TimeFilter};
use crate::events;
use crate::picker::calendar::WEEKDAY_HEADERS;
use crate::picker::render::status_lines;
use crate::picker::{CommittedRange, GridCell, Theme, format_iso, parse_iso};
use crate::session;

use super::{WebState, content_type_json};

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// An API answer before it becomes an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    /// 200 with `data` as the body.
    pub fn ok<T: Serialize>(data: &T) -> Result<Self> {
        let body = serde_json::to_value(data).context("failed to serialize JSON response")?;
        Ok(Self { status: 200, body })
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }),
        }
    }

    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        Response::from_data(self.body.to_string().into_bytes())
            .with_header(content_type_json())
            .with_status_code(StatusCode(self.status))
    }
}

// ---------------------------------------------------------------------------
// JSON request and response types
// ---------------------------------------------------------------------------

/// Everything the frontend needs to draw the picker.
#[derive(Serialize)]
struct PickerView {
    is_open: bool,
    /// Displayed month as `YYYY-MM`.
    month: String,
    title: String,
    today: String,
    theme: Theme,
    mode: String,
    start: Option<String>,
    end: Option<String>,
    can_apply: bool,
    status: Vec<String>,
    weekdays: [&'static str; 7],
    grid: Vec<GridCell>,
}

#[derive(Serialize)]
struct SessionView<'a> {
    filter: TimeFilter,
    label: &'static str,
    filter_type: &'static str,
    range: &'a CommittedRange,
}

#[derive(Serialize)]
struct ApplyResponse<'a> {
    applied: bool,
    picker: PickerView,
    session: SessionView<'a>,
}

#[derive(Serialize)]
struct ConfigResponse {
    config: VistrackConfig,
    toml_text: String,
}

#[derive(Serialize)]
struct HealthResponse {
    config_exists: bool,
    session_exists: bool,
    snapshot_configured: bool,
    snapshot_readable: bool,
    event_log_exists: bool,
    event_count: usize,
    picker_open: bool,
}

#[derive(Deserialize)]
struct SelectRequest {
    date: String,
}

#[derive(Deserialize)]
struct NavigateRequest {
    delta: i32,
}

#[derive(Deserialize)]
struct FilterRequest {
    filter: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn picker_view(state: &WebState) -> PickerView {
    let picker = &state.picker;
    let selection = picker.selection();
    let month = picker.month();
    let today = state.clock.today();

    PickerView {
        is_open: picker.is_open(),
        month: month.to_string(),
        title: month.title(),
        today: format_iso(today),
        theme: state.config.general.theme,
        mode: picker.mode().to_string(),
        start: selection.start().map(format_iso),
        end: selection.end().map(format_iso),
        can_apply: picker.can_apply(),
        status: status_lines(&selection),
        weekdays: WEEKDAY_HEADERS,
        grid: picker.grid(today),
    }
}

fn session_view(state: &WebState) -> SessionView<'_> {
    let filter = state.session.filter;
    SessionView {
        filter,
        label: filter.label(),
        filter_type: filter.api_param(),
        range: &state.session.range,
    }
}

/// Parse a JSON request body, or explain why it is not acceptable.
fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> std::result::Result<T, Reply> {
    serde_json::from_str(body).map_err(|e| Reply::error(400, &format!("invalid request body: {e}")))
}

/// Extract and percent-decode a query parameter.
fn query_param(url: &str, key: &str) -> Option<String> {
    url.split_once('?')?.1.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (percent_decode(k) == key).then(|| percent_decode(v))
    })
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes pass through.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

// ---------------------------------------------------------------------------
// Picker handlers
// ---------------------------------------------------------------------------

/// `GET /api/picker`: current picker state.
pub fn get_picker(state: &mut WebState) -> Result<Reply> {
    Reply::ok(&picker_view(state))
}

/// `POST /api/picker/open`: open seeded from the committed range.
pub fn post_picker_open(state: &mut WebState) -> Result<Reply> {
    state.picker.open(&state.session.range, state.clock.as_ref());
    state.log.picker_opened();
    Reply::ok(&picker_view(state))
}

/// `POST /api/picker/select`: click a date. Body: `{ "date": "YYYY-MM-DD" }`.
pub fn post_picker_select(state: &mut WebState, body: &str) -> Result<Reply> {
    let req: SelectRequest = match parse_body(body) {
        Ok(req) => req,
        Err(reply) => return Ok(reply),
    };
    let Some(date) = parse_iso(&req.date) else {
        return Ok(Reply::error(400, &format!("invalid date '{}': expected YYYY-MM-DD", req.date)));
    };
    state.picker.select_date(date);
    Reply::ok(&picker_view(state))
}

/// `POST /api/picker/today`: select today as a single-day range.
pub fn post_picker_today(state: &mut WebState) -> Result<Reply> {
    state.picker.select_today(state.clock.as_ref());
    Reply::ok(&picker_view(state))
}

/// `POST /api/picker/navigate`: body `{ "delta": -1 }` or `{ "delta": 1 }`.
pub fn post_picker_navigate(state: &mut WebState, body: &str) -> Result<Reply> {
    let req: NavigateRequest = match parse_body(body) {
        Ok(req) => req,
        Err(reply) => return Ok(reply),
    };
    state.picker.navigate_month(req.delta);
    Reply::ok(&picker_view(state))
}

/// `POST /api/picker/apply`: commit a complete selection.
///
/// An incomplete selection leaves everything as is and answers
/// `"applied": false`.
pub fn post_picker_apply(state: &mut WebState) -> Result<Reply> {
    let applied = state.picker.apply(&mut state.session);
    if applied && state.session.take_applied() {
        state.save_session()?;
        if let (Some(start), Some(end)) = (&state.session.range.start, &state.session.range.end) {
            state.log.range_applied(start, end);
        }
    }

    Reply::ok(&ApplyResponse {
        applied,
        picker: picker_view(state),
        session: session_view(state),
    })
}

/// `POST /api/picker/cancel`: discard the in-progress selection.
pub fn post_picker_cancel(state: &mut WebState) -> Result<Reply> {
    if state.picker.is_open() {
        state.picker.cancel(&mut state.session);
        state.log.picker_cancelled();
    }
    Reply::ok(&picker_view(state))
}

/// `POST /api/picker/dismiss`: outside click or Escape.
pub fn post_picker_dismiss(state: &mut WebState) -> Result<Reply> {
    if state.picker.is_open() {
        state.picker.dismiss(&mut state.session);
        state.log.picker_dismissed();
    }
    Reply::ok(&picker_view(state))
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

/// `GET /api/session`: active filter and committed range.
pub fn get_session(state: &mut WebState) -> Result<Reply> {
    Reply::ok(&session_view(state))
}

/// `PUT /api/session/filter`: body `{ "filter": "Week" }`.
pub fn put_session_filter(state: &mut WebState, body: &str) -> Result<Reply> {
    let req: FilterRequest = match parse_body(body) {
        Ok(req) => req,
        Err(reply) => return Ok(reply),
    };
    let Some(filter) = TimeFilter::parse(&req.filter) else {
        return Ok(Reply::error(400, &format!("unknown filter '{}'", req.filter)));
    };

    state.session.set_filter(filter);
    state.save_session()?;
    state.log.filter_changed(filter);
    Reply::ok(&session_view(state))
}

// ---------------------------------------------------------------------------
// Report handler
// ---------------------------------------------------------------------------

/// `GET /api/report?search=TERM`: the dashboard for the active filter.
pub fn get_report(state: &mut WebState, url: &str) -> Result<Reply> {
    let Some(path) = &state.snapshot else {
        return Ok(Reply::error(404, "no snapshot configured (set data.snapshot)"));
    };
    let snapshot = Snapshot::load(path)?;
    let search = query_param(url, "search").unwrap_or_default();

    let report = dashboard::build_report(
        &snapshot,
        state.session.filter,
        &state.session.range,
        &search,
    );
    Reply::ok(&report)
}

// ---------------------------------------------------------------------------
// Config and health handlers
// ---------------------------------------------------------------------------

/// `GET /api/config`: configuration this server runs with.
pub fn get_config(state: &mut WebState) -> Result<Reply> {
    let toml_text =
        toml::to_string_pretty(&state.config).context("failed to serialize config")?;
    Reply::ok(&ConfigResponse {
        config: state.config.clone(),
        toml_text,
    })
}

/// `GET /api/health`: file and picker status.
pub fn get_health(state: &mut WebState) -> Result<Reply> {
    let exists = |p: Option<std::path::PathBuf>| p.map(|p| p.exists()).unwrap_or(false);

    let resp = HealthResponse {
        config_exists: exists(config::global_config_file()),
        session_exists: exists(session::session_path()),
        snapshot_configured: state.snapshot.is_some(),
        snapshot_readable: state
            .snapshot
            .as_deref()
            .is_some_and(|p| Snapshot::load(p).is_ok()),
        event_log_exists: exists(events::events_log_path()),
        event_count: state.log.read_all().len(),
        picker_open: state.picker.is_open(),
    };

    Reply::ok(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::FixedClock;
    use chrono::NaiveDate;

    fn state() -> WebState {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        WebState::in_memory(VistrackConfig::default(), Box::new(FixedClock(today)))
    }

    #[test]
    fn query_param_extracts_and_decodes() {
        assert_eq!(query_param("/api/report?search=ravi", "search").as_deref(), Some("ravi"));
        assert_eq!(
            query_param("/api/report?x=1&search=Ana%20Silva", "search").as_deref(),
            Some("Ana Silva")
        );
        assert_eq!(query_param("/api/report?search=a+b", "search").as_deref(), Some("a b"));
        assert_eq!(query_param("/api/report?search=", "search").as_deref(), Some(""));
        assert_eq!(query_param("/api/report", "search"), None);
        assert_eq!(query_param("/api/report?other=1", "search"), None);
    }

    #[test]
    fn percent_decode_passes_malformed_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%41"), "A");
    }

    #[test]
    fn select_rejects_bad_input() {
        let mut state = state();
        post_picker_open(&mut state).unwrap();

        let reply = post_picker_select(&mut state, r#"{"date": "03/05/2024"}"#).unwrap();
        assert_eq!(reply.status, 400);

        let reply = post_picker_select(&mut state, "not json").unwrap();
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn open_select_apply_updates_session() {
        let mut state = state();
        let reply = post_picker_open(&mut state).unwrap();
        assert_eq!(reply.body["is_open"], true);
        assert_eq!(reply.body["month"], "2024-03");
        assert_eq!(reply.body["mode"], "awaiting-start");

        post_picker_select(&mut state, r#"{"date": "2024-03-10"}"#).unwrap();
        let reply = post_picker_select(&mut state, r#"{"date": "2024-03-05"}"#).unwrap();
        assert_eq!(reply.body["start"], "2024-03-05");
        assert_eq!(reply.body["end"], "2024-03-10");
        assert_eq!(reply.body["can_apply"], true);

        let reply = post_picker_apply(&mut state).unwrap();
        assert_eq!(reply.body["applied"], true);
        assert_eq!(reply.body["picker"]["is_open"], false);
        assert_eq!(reply.body["session"]["filter"], "custom-range");
        assert_eq!(reply.body["session"]["range"]["start"], "2024-03-05");
    }

    #[test]
    fn apply_with_partial_selection_is_refused() {
        let mut state = state();
        post_picker_open(&mut state).unwrap();
        post_picker_select(&mut state, r#"{"date": "2024-03-10"}"#).unwrap();

        let reply = post_picker_apply(&mut state).unwrap();
        assert_eq!(reply.body["applied"], false);
        assert_eq!(reply.body["picker"]["is_open"], true);
        assert!(state.session.range.is_empty());
    }

    #[test]
    fn navigate_moves_month() {
        let mut state = state();
        post_picker_open(&mut state).unwrap();
        let reply = post_picker_navigate(&mut state, r#"{"delta": -3}"#).unwrap();
        assert_eq!(reply.body["month"], "2023-12");
        assert_eq!(reply.body["title"], "December 2023");
    }

    #[test]
    fn grid_marks_today() {
        let mut state = state();
        let reply = post_picker_open(&mut state).unwrap();
        let grid = reply.body["grid"].as_array().unwrap();
        // March 2024 starts on a Friday.
        assert_eq!(grid[0]["kind"], "blank");
        assert_eq!(grid[5]["kind"], "day");
        assert_eq!(grid[5]["date"], "2024-03-01");
        let today = grid.iter().find(|c| c["date"] == "2024-03-15").unwrap();
        assert_eq!(today["style"], "today");
    }

    #[test]
    fn filter_change_validates_and_clears_range() {
        let mut state = state();
        state.session.range = CommittedRange::new("2024-01-05", "2024-01-10");
        state.session.filter = TimeFilter::CustomRange;

        let reply = put_session_filter(&mut state, r#"{"filter": "fortnight"}"#).unwrap();
        assert_eq!(reply.status, 400);

        let reply = put_session_filter(&mut state, r#"{"filter": "Week"}"#).unwrap();
        assert_eq!(reply.body["filter_type"], "weekly");
        assert!(state.session.range.is_empty());
    }

    #[test]
    fn report_without_snapshot_is_404() {
        let mut state = state();
        let reply = get_report(&mut state, "/api/report").unwrap();
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn config_reply_includes_toml() {
        let mut state = state();
        let reply = get_config(&mut state).unwrap();
        assert!(reply.body["toml_text"].as_str().unwrap().contains("[general]"));
        assert_eq!(reply.body["config"]["web"]["addr"], "127.0.0.1:9747");
    }
}
