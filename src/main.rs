use anyhow::Result;
use clap::{Parser, Subcommand};

use vistrack::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "vistrack")]
#[command(about = "Visitor management dashboard with a date-range picker")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the interactive date-range picker and commit a range
    Pick,
    /// Print a month with the committed range highlighted
    Calendar {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Show, set, or clear the committed date range
    Range {
        /// Set the start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Set the end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Clear the committed range
        #[arg(long)]
        clear: bool,
    },
    /// List the time filter tabs, or switch to one
    Filter {
        /// Tab label or filter type, e.g. "Week", "quarterly", "custom-range"
        tab: Option<String>,
    },
    /// Render the dashboard for a captured snapshot
    Report {
        /// Snapshot JSON file (default: data.snapshot from config)
        snapshot: Option<String>,
        /// Narrow the visitor tables to rows matching this term
        #[arg(long, default_value = "")]
        search: String,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Launch the local web dashboard
    Serve {
        /// Listen address (default: web.addr from config)
        #[arg(long)]
        addr: Option<String>,
        /// Snapshot JSON file backing the report panels
        #[arg(long)]
        snapshot: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    /// Check config, session, snapshot, and event log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write the default config to ~/.vistrack/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `picker.show_markers false`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Pick => cli::run_pick(),
        Commands::Calendar { month } => cli::run_calendar(month.as_deref()),
        Commands::Range { start, end, clear } => {
            cli::run_range(start.as_deref(), end.as_deref(), clear)
        }
        Commands::Filter { tab } => cli::run_filter(tab.as_deref()),
        Commands::Report {
            snapshot,
            search,
            format,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_report(snapshot.as_deref(), &search, fmt)
        }
        Commands::Serve {
            addr,
            snapshot,
            no_browser,
        } => {
            let mut cfg = config::load();
            if let Some(addr) = addr {
                cfg.web.addr = addr;
            }
            if snapshot.is_some() {
                cfg.data.snapshot = snapshot;
            }
            if no_browser {
                cfg.web.open_browser = false;
            }
            web::serve(cfg)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
