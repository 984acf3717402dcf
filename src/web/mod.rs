//! Embedded web dashboard for vistrack.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with the date-range picker and report panels
//! - JSON API endpoints driving one shared picker and the saved session
//!
//! Launched via `vistrack serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::VistrackConfig;
use crate::events::EventLog;
use crate::picker::{Clock, DateRangePicker, SystemClock};
use crate::session::Session;

pub use api::Reply;

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// Everything one dashboard instance owns.
///
/// Requests are handled one at a time, so handlers get `&mut WebState`
/// directly.
pub struct WebState {
    pub(crate) picker: DateRangePicker,
    pub(crate) session: Session,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) config: VistrackConfig,
    pub(crate) snapshot: Option<PathBuf>,
    pub(crate) log: EventLog,
    /// Write the session to `~/.vistrack/session.json` after each change.
    pub(crate) persist: bool,
}

impl WebState {
    /// State backed by the saved session, the system clock, and the event log.
    pub fn load(config: VistrackConfig) -> Self {
        let clock = SystemClock;
        let session = Session::load_or(config.general.default_filter);
        Self {
            picker: DateRangePicker::new(&clock),
            session,
            clock: Box::new(clock),
            snapshot: config.data.snapshot.as_deref().map(PathBuf::from),
            log: EventLog::from_config(&config),
            config,
            persist: true,
        }
    }

    /// Throwaway state: nothing is read from or written to disk.
    pub fn in_memory(config: VistrackConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            picker: DateRangePicker::new(clock.as_ref()),
            session: Session::new(config.general.default_filter),
            clock,
            snapshot: config.data.snapshot.as_deref().map(PathBuf::from),
            log: EventLog::disabled(),
            config,
            persist: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Persist the session if this state is disk-backed.
    pub(crate) fn save_session(&self) -> Result<()> {
        if self.persist {
            self.session.save()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server with `config`.
///
/// Blocks the current thread. Handles requests sequentially; an error in one
/// request becomes a JSON 500 without stopping the server.
pub fn serve(config: VistrackConfig) -> Result<()> {
    let addr = config.web.addr.clone();
    let open = config.web.open_browser;
    let mut state = WebState::load(config);

    let server = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("vistrack dashboard running at http://{addr}");
    match &state.snapshot {
        Some(path) => println!("Report snapshot: {}", path.display()),
        None => println!("No report snapshot configured (set data.snapshot)."),
    }
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let response = match dispatch(&mut state, &method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => Reply::error(500, &format!("{e:#}")).into_response(),
        };
        let _ = request.respond(response);

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    state: &mut WebState,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);

    if matches!((method, path), (&Method::Get, "/") | (&Method::Get, "/index.html")) {
        return Ok(serve_frontend());
    }

    route(state, method, url, body).map(Reply::into_response)
}

/// Route an API request. Unknown paths get a JSON 404.
pub fn route(state: &mut WebState, method: &Method, url: &str, body: Option<&str>) -> Result<Reply> {
    let path = url.split('?').next().unwrap_or(url);
    let body = body.unwrap_or("{}");

    match (method, path) {
        // Picker
        (&Method::Get, "/api/picker") => api::get_picker(state),
        (&Method::Post, "/api/picker/open") => api::post_picker_open(state),
        (&Method::Post, "/api/picker/select") => api::post_picker_select(state, body),
        (&Method::Post, "/api/picker/today") => api::post_picker_today(state),
        (&Method::Post, "/api/picker/navigate") => api::post_picker_navigate(state, body),
        (&Method::Post, "/api/picker/apply") => api::post_picker_apply(state),
        (&Method::Post, "/api/picker/cancel") => api::post_picker_cancel(state),
        (&Method::Post, "/api/picker/dismiss") => api::post_picker_dismiss(state),

        // Session
        (&Method::Get, "/api/session") => api::get_session(state),
        (&Method::Put, "/api/session/filter") => api::put_session_filter(state, body),

        // Report
        (&Method::Get, "/api/report") => api::get_report(state, url),

        // Configuration and health
        (&Method::Get, "/api/config") => api::get_config(state),
        (&Method::Get, "/api/health") => api::get_health(state),

        _ => Ok(Reply::error(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
