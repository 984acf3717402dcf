//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `vistrack pick`: interactive date-range picker
//! - `vistrack calendar [--month YYYY-MM]`: print a month with the committed range
//! - `vistrack range`: show, set, or clear the committed range
//! - `vistrack filter [TAB]`: list tabs or switch the active one
//! - `vistrack report`: shape a dashboard snapshot into cards, charts, and tables
//! - `vistrack health`: check config, session, snapshot, event log
//! - `vistrack config show|init|set|reset`: configuration management

pub mod pick;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config;
use crate::dashboard::departments::total_visits;
use crate::dashboard::filter::filter_type_for_tab;
use crate::dashboard::{DashboardReport, Snapshot, TimeFilter, build_report};
use crate::events::{self, EventLog};
use crate::picker::render::render_month;
use crate::picker::{CalendarMonth, Clock, SystemClock, parse_iso};
use crate::session::{self, Session};

pub use pick::run_pick;

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// vistrack calendar
// ---------------------------------------------------------------------------

/// Print one month with the committed range highlighted.
pub fn run_calendar(month: Option<&str>) -> Result<()> {
    let cfg = config::load();
    let session = Session::load_or(cfg.general.default_filter);
    let today = SystemClock.today();

    let month = match month {
        Some(raw) => raw.parse::<CalendarMonth>()?,
        None => CalendarMonth::containing(today),
    };

    print!(
        "{}",
        render_month(month, &session.range.selection(), today, cfg.render_options())
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// vistrack range
// ---------------------------------------------------------------------------

/// Show the committed range, or change it.
///
/// Setting either date switches to the Custom Range tab. A start later than
/// the saved end clears the end.
pub fn run_range(start: Option<&str>, end: Option<&str>, clear: bool) -> Result<()> {
    let cfg = config::load();
    let mut session = Session::load_or(cfg.general.default_filter);

    for date in [start, end].into_iter().flatten() {
        if parse_iso(date).is_none() {
            anyhow::bail!("invalid date '{date}': expected YYYY-MM-DD");
        }
    }

    let changed = clear || start.is_some() || end.is_some();
    if clear {
        session.clear_range();
    }
    if start.is_some() || end.is_some() {
        session.set_filter(TimeFilter::CustomRange);
    }
    if let Some(start) = start {
        session.set_start_date(start);
    }
    if let Some(end) = end {
        session.set_end_date(end);
    }

    if changed {
        session.save()?;
        if let (Some(start), Some(end)) = (&session.range.start, &session.range.end) {
            EventLog::from_config(&cfg).range_applied(start, end);
        }
    }

    print_session(&session);
    Ok(())
}

fn print_session(session: &Session) {
    println!("{}", "Committed Range".bold().cyan());
    println!("{}", "=".repeat(40));
    println!(
        "  {} {} ({})",
        "Filter:".bold(),
        session.filter,
        session.filter.api_param().dimmed()
    );
    println!(
        "  {} {}",
        "Start: ".bold(),
        session.range.start.as_deref().unwrap_or("-")
    );
    println!(
        "  {} {}",
        "End:   ".bold(),
        session.range.end.as_deref().unwrap_or("-")
    );
}

// ---------------------------------------------------------------------------
// vistrack filter
// ---------------------------------------------------------------------------

/// List the tabs, or switch to `tab`.
pub fn run_filter(tab: Option<&str>) -> Result<()> {
    let cfg = config::load();
    let mut session = Session::load_or(cfg.general.default_filter);

    let Some(tab) = tab else {
        println!("{}", "Time Filters".bold().cyan());
        println!("{}", "=".repeat(40));
        for filter in TimeFilter::ALL {
            let marker = if filter == session.filter {
                "●".green().bold()
            } else {
                "○".dimmed()
            };
            println!(
                "  {} {:<14} {}",
                marker,
                filter.label(),
                filter_type_for_tab(filter.label()).dimmed()
            );
        }
        return Ok(());
    };

    let filter = TimeFilter::parse(tab).with_context(|| {
        let valid: Vec<&str> = TimeFilter::ALL.iter().map(|f| f.label()).collect();
        format!("unknown filter '{tab}'. Valid: {}", valid.join(", "))
    })?;

    session.set_filter(filter);
    session.save()?;
    EventLog::from_config(&cfg).filter_changed(filter);

    println!(
        "{} Active filter: {} ({})",
        "✓".green().bold(),
        filter.label().bold(),
        filter.api_param()
    );
    if filter.is_custom() && session.range.is_empty() {
        println!(
            "  {}",
            "No range committed yet. Run `vistrack pick` to choose one.".dimmed()
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// vistrack report
// ---------------------------------------------------------------------------

/// Shape a snapshot for the active filter and print it.
///
/// `snapshot` falls back to `[data] snapshot` from the config.
pub fn run_report(snapshot: Option<&str>, search: &str, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let path = resolve_snapshot(snapshot, cfg.data.snapshot.as_deref())?;
    let session = Session::load_or(cfg.general.default_filter);

    let snapshot = Snapshot::load(&path)?;
    let report = build_report(&snapshot, session.filter, &session.range, search);

    match format {
        OutputFormat::Json => print_report_json(&report)?,
        OutputFormat::Csv => print_report_csv(&report)?,
        OutputFormat::Table => print_report_table(&report),
    }

    Ok(())
}

/// Pick the snapshot path: explicit argument first, then config.
pub fn resolve_snapshot(explicit: Option<&str>, configured: Option<&str>) -> Result<PathBuf> {
    explicit
        .or(configured)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .context("no snapshot file given. Pass a path or set `data.snapshot` in the config.")
}

fn print_report_table(report: &DashboardReport) {
    println!(
        "{}",
        format!("Visitor Dashboard · {}", report.filter).bold().cyan()
    );
    println!("{}", "=".repeat(60));

    if report.stale {
        println!(
            "  {}",
            format!(
                "Snapshot was captured for '{}'; the active filter differs.",
                report.filter_type
            )
            .yellow()
        );
    }
    if report.filter.is_custom()
        && let (Some(start), Some(end)) = (&report.range.start, &report.range.end)
    {
        println!("  {} {} → {}", "Range:".bold(), start, end);
    }
    println!();

    // Stat cards
    let stats = &report.stats;
    println!(
        "  {} {}",
        "Total employees:    ".bold(),
        format_number(stats.total_employees)
    );
    println!(
        "  {} {}",
        "Pre-registered:     ".bold(),
        format_number(stats.total_pre_registers)
    );
    println!(
        "  {} {}",
        "Checked in:         ".bold(),
        format_number(stats.total_checkin_visitors)
    );
    println!(
        "  {} {}",
        "Checked out:        ".bold(),
        format_number(stats.total_checkout_visitors)
    );
    println!(
        "  {} {:.2}%",
        "Pre-reg → check-in: ".bold(),
        report.pre_register_to_checkin_ratio
    );
    println!(
        "  {} {}%",
        "Check-in → out:     ".bold(),
        report.checkin_to_checkout_pct
    );
    println!();

    // Interval chart
    println!("{}", "Check-ins by Interval".bold().cyan());
    if report.intervals.is_empty() {
        println!("  {}", "No interval data.".dimmed());
    } else {
        let peak = report.intervals.iter().map(|b| b.total).max().unwrap_or(0);
        println!(
            "  {:<14} {:>8} {:>9}  Total",
            "Interval", "Check-in", "Check-out"
        );
        println!("  {}", "-".repeat(56));
        for bar in &report.intervals {
            println!(
                "  {:<14} {:>8} {:>9}  {} {}",
                truncate(&bar.label, 14),
                bar.checkins,
                bar.checkouts,
                bar_chart(bar.total, peak, 16).blue(),
                bar.total
            );
        }
    }
    println!();

    // Department donut
    println!("{}", "Visits by Department".bold().cyan());
    if total_visits(&report.departments) == 0 {
        println!("  {}", "No visits recorded.".dimmed());
    } else {
        for slice in &report.departments {
            println!(
                "  {:<24} {:>6} {:>6.1}%",
                truncate(&slice.label, 24),
                format_number(slice.value),
                slice.percentage
            );
        }
    }
    println!();

    // Tables
    let search_note = if report.search.is_empty() {
        String::new()
    } else {
        format!(" matching '{}'", report.search)
    };

    println!(
        "{}",
        format!("Not Checked Out{search_note}").bold().cyan()
    );
    if report.pending_checkouts.is_empty() {
        println!("  {}", "Nobody.".dimmed());
    } else {
        println!(
            "  {:<20} {:<20} {:<12} Check-in",
            "Host", "Visitor", "Visitor ID"
        );
        println!("  {}", "-".repeat(62));
        for (i, row) in report.pending_checkouts.iter().enumerate() {
            let line = format!(
                "  {:<20} {:<20} {:<12} {}",
                truncate(&row.host_name, 20),
                truncate(&row.visitor_name, 20),
                truncate(&row.visitor_id, 12),
                row.checkin_time
            );
            if i % 2 == 0 {
                println!("{line}");
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
    println!();

    println!(
        "{}",
        format!("Expected Today{search_note}").bold().cyan()
    );
    if report.expected_visitors.is_empty() {
        println!("  {}", "Nobody.".dimmed());
    } else {
        println!("  {:<20} {:<20} {:<8} Purpose", "Host", "Visitor", "ETA");
        println!("  {}", "-".repeat(62));
        for row in &report.expected_visitors {
            println!(
                "  {:<20} {:<20} {:<8} {}",
                truncate(&row.host_name, 20),
                truncate(&row.visitor_name, 20),
                row.expected_time_of_arrival,
                row.purpose.as_deref().unwrap_or("-")
            );
        }
    }
}

fn print_report_json(report: &DashboardReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Long-format CSV: one `section,label,metric,value` row per number or cell.
fn print_report_csv(report: &DashboardReport) -> Result<()> {
    write_report_csv(report, io::stdout())
}

fn write_report_csv<W: io::Write>(report: &DashboardReport, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["section", "label", "metric", "value"])?;
    for record in report_csv_records(report) {
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn report_csv_records(report: &DashboardReport) -> Vec<[String; 4]> {
    let mut records = Vec::new();
    let mut push = |section: &str, label: &str, metric: &str, value: String| {
        records.push([section.to_string(), label.to_string(), metric.to_string(), value]);
    };

    let stats = &report.stats;
    push("stats", "", "total_employees", stats.total_employees.to_string());
    push("stats", "", "total_pre_registers", stats.total_pre_registers.to_string());
    push("stats", "", "total_checkin_visitors", stats.total_checkin_visitors.to_string());
    push("stats", "", "total_checkout_visitors", stats.total_checkout_visitors.to_string());
    push(
        "stats",
        "",
        "pre_register_to_checkin_ratio",
        format!("{:.2}", report.pre_register_to_checkin_ratio),
    );
    push(
        "stats",
        "",
        "checkin_to_checkout_pct",
        report.checkin_to_checkout_pct.to_string(),
    );

    for bar in &report.intervals {
        push("interval", bar.label.as_str(), "checkins", bar.checkins.to_string());
        push("interval", bar.label.as_str(), "checkouts", bar.checkouts.to_string());
    }
    for slice in &report.departments {
        push("department", slice.label.as_str(), "visits", slice.value.to_string());
        push("department", slice.label.as_str(), "percentage", format!("{:.1}", slice.percentage));
    }
    for row in &report.pending_checkouts {
        push("pending", row.visitor_id.as_str(), "visitor_name", row.visitor_name.clone());
        push("pending", row.visitor_id.as_str(), "host_name", row.host_name.clone());
        push("pending", row.visitor_id.as_str(), "checkin_time", row.checkin_time.clone());
    }
    for row in &report.expected_visitors {
        push("expected", row.visitor_name.as_str(), "host_name", row.host_name.clone());
        push(
            "expected",
            row.visitor_name.as_str(),
            "expected_time_of_arrival",
            row.expected_time_of_arrival.clone(),
        );
    }

    records
}

// ---------------------------------------------------------------------------
// vistrack health
// ---------------------------------------------------------------------------

/// Check config files, the saved session, the snapshot, and the event log.
pub fn run_health() -> Result<()> {
    println!("{}", "vistrack Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.vistrack/config.toml found"
        } else {
            "not found (run `vistrack config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".vistrack.toml found"
        } else {
            "none (optional)"
        },
    );
    print_health_item(
        "Theme / Default tab",
        true,
        &format!("{} / {}", cfg.general.theme, cfg.general.default_filter),
    );

    let session_exists = session::session_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let session = Session::load_or(cfg.general.default_filter);
    print_health_item(
        "Session",
        session_exists,
        &if session_exists {
            format!(
                "{} ({} → {})",
                session.filter,
                session.range.start.as_deref().unwrap_or("-"),
                session.range.end.as_deref().unwrap_or("-")
            )
        } else {
            "nothing saved yet".to_string()
        },
    );

    match cfg.data.snapshot.as_deref() {
        Some(path) => {
            let loaded = Snapshot::load(Path::new(path));
            let detail = match &loaded {
                Ok(snapshot) => match snapshot.filter() {
                    Some(filter) => format!("{path} ({filter})"),
                    None => path.to_string(),
                },
                Err(e) => format!("{e:#}"),
            };
            print_health_item("Snapshot", loaded.is_ok(), &detail);
        }
        None => print_health_item("Snapshot", false, "not configured (set data.snapshot)"),
    }

    let log = EventLog::from_config(&cfg);
    let log_exists = events::events_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Event log",
        cfg.logging.enabled && log_exists,
        &if !cfg.logging.enabled {
            "disabled".to_string()
        } else if log_exists {
            format!("{} entries", format_number(log.read_all().len() as u64))
        } else {
            "no log file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// vistrack config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective vistrack Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.vistrack/config.toml", global_exists);
    print_source(".vistrack.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "VISTRACK_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.vistrack/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to customize vistrack.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// A horizontal bar of up to `width` blocks, scaled against `peak`.
fn bar_chart(value: u64, peak: u64, width: usize) -> String {
    if peak == 0 {
        return String::new();
    }
    let len = ((value as f64 / peak as f64) * width as f64).round() as usize;
    "█".repeat(len.min(width))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
