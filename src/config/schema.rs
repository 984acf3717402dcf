/// Configuration schema and defaults for vistrack.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[general]`, `[picker]`, `[web]`, `[data]`, and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override.
use serde::{Deserialize, Serialize};

use crate::dashboard::TimeFilter;
use crate::picker::Theme;
use crate::picker::render::RenderOptions;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level vistrack configuration.
///
/// Maps directly to the `~/.vistrack/config.toml` and `.vistrack.toml` file
/// schemas. Missing sections and fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VistrackConfig {
    pub general: GeneralConfig,
    pub picker: PickerConfig,
    pub web: WebConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

impl VistrackConfig {
    /// Terminal rendering options derived from `[general]` and `[picker]`.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            theme: self.general.theme,
            show_markers: self.picker.show_markers,
            show_status: self.picker.show_status,
        }
    }
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Color theme for the calendar: `light` or `dark`.
    pub theme: Theme,
    /// Tab selected when no session has been saved yet.
    pub default_filter: TimeFilter,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            default_filter: TimeFilter::Day,
        }
    }
}

// ---------------------------------------------------------------------------
// [picker]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Print the "Selected Range" status block under the calendar.
    pub show_status: bool,
    /// Draw start/end markers beside the range endpoints.
    pub show_markers: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            show_status: true,
            show_markers: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `vistrack serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

/// Default listen address for the web dashboard.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Snapshot file backing `/api/report`. Unset means no report data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append interaction events to `~/.vistrack/events.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl VistrackConfig {
    /// The annotated config written by `vistrack config init`.
    pub fn default_toml() -> String {
        r#"# vistrack configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (VISTRACK_*)
#   2. Project config (.vistrack.toml in current directory)
#   3. User global config (~/.vistrack/config.toml)
#   4. Built-in defaults

[general]
theme = "light"               # light | dark
default_filter = "day"        # day | week | month | quarterly | yearly | custom-range

[picker]
show_status = true
show_markers = true

[web]
addr = "127.0.0.1:9747"
open_browser = true

[data]
# snapshot = "dashboard-snapshot.json"

[logging]
enabled = true                # events go to ~/.vistrack/events.jsonl
"#
        .to_string()
    }
}
