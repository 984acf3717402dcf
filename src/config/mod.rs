/// Configuration system for vistrack.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** from [`schema::VistrackConfig::default()`]
/// 2. **User global config** at `~/.vistrack/config.toml`
/// 3. **Project local config** at `.vistrack.toml` in the current directory
/// 4. **Environment variables** named `VISTRACK_*` (highest precedence)
///
/// A later file layer replaces the earlier one wholesale; since every field
/// deserializes with its default, only explicitly set values differ.
///
/// # Usage
///
/// ```rust,ignore
/// use vistrack::config;
///
/// let cfg = config::load();
/// let opts = cfg.render_options();
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::dashboard::TimeFilter;
use crate::picker::Theme;

pub use schema::VistrackConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
pub fn load() -> VistrackConfig {
    let mut config = VistrackConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
}

/// Load a TOML config file. Missing or malformed files yield `None`.
fn load_toml_file(path: Option<PathBuf>) -> Option<VistrackConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vistrack").join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".vistrack.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment overrides, reading variables through `var`.
///
/// Supported variables:
/// - `VISTRACK_THEME`: `light` or `dark`
/// - `VISTRACK_DEFAULT_FILTER`: any tab label or filter type
/// - `VISTRACK_WEB_ADDR`: listen address for `serve`
/// - `VISTRACK_OPEN_BROWSER`: `1`/`true`/`yes`/`on`
/// - `VISTRACK_SNAPSHOT`: snapshot file for reports
/// - `VISTRACK_LOGGING`: event log on/off
fn apply_env_overrides(config: &mut VistrackConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("VISTRACK_THEME")
        && let Some(theme) = parse_theme(&val)
    {
        config.general.theme = theme;
    }
    if let Some(val) = var("VISTRACK_DEFAULT_FILTER")
        && let Some(filter) = TimeFilter::parse(&val)
    {
        config.general.default_filter = filter;
    }

    if let Some(val) = var("VISTRACK_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Some(val) = var("VISTRACK_OPEN_BROWSER") {
        config.web.open_browser = is_truthy(&val);
    }

    if let Some(val) = var("VISTRACK_SNAPSHOT")
        && !val.is_empty()
    {
        config.data.snapshot = Some(val);
    }

    if let Some(val) = var("VISTRACK_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_theme(val: &str) -> Option<Theme> {
    match val.to_ascii_lowercase().as_str() {
        "light" => Some(Theme::Light),
        "dark" => Some(Theme::Dark),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.vistrack/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.vistrack/ directory")?;
    }

    fs::write(&path, VistrackConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single dotted key (e.g. `picker.show_markers`) in the global config.
///
/// The updated file must still deserialize, so `general.theme = "blue"` is
/// rejected before anything is written.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&VistrackConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    toml::from_str::<VistrackConfig>(&output)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// Sections are created on demand; the leaf's existing type decides how
/// `raw_value` is parsed.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((&leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };
    if leaf.is_empty() || sections.is_empty() {
        anyhow::bail!("config key must look like 'section.field', got '{key}'");
    }

    let defaults = toml::Value::try_from(VistrackConfig::default())
        .context("failed to serialize default config")?;

    let mut current = root;
    let mut known = Some(&defaults);
    for &part in sections {
        known = known.and_then(|v| v.get(part));
        if known.is_none() {
            anyhow::bail!("config key not found: section '{part}' in '{key}'");
        }
        let table = current
            .as_table_mut()
            .with_context(|| format!("expected table above '{part}' in '{key}'"))?;
        current = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{key}'"))?;

    // Unset optional keys (e.g. data.snapshot) are not in the defaults.
    let template = table
        .get(leaf)
        .or_else(|| known.and_then(|v| v.get(leaf)))
        .cloned();

    let new_value = match template {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = VistrackConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("VISTRACK_THEME", "Dark"),
                ("VISTRACK_DEFAULT_FILTER", "Custom Range"),
                ("VISTRACK_WEB_ADDR", "0.0.0.0:9000"),
                ("VISTRACK_OPEN_BROWSER", "0"),
                ("VISTRACK_SNAPSHOT", "snap.json"),
                ("VISTRACK_LOGGING", "off"),
            ]),
        );
        assert_eq!(config.general.theme, Theme::Dark);
        assert_eq!(config.general.default_filter, TimeFilter::CustomRange);
        assert_eq!(config.web.addr, "0.0.0.0:9000");
        assert!(!config.web.open_browser);
        assert_eq!(config.data.snapshot.as_deref(), Some("snap.json"));
        assert!(!config.logging.enabled);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = VistrackConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("VISTRACK_THEME", "neon"),
                ("VISTRACK_DEFAULT_FILTER", "fortnight"),
                ("VISTRACK_WEB_ADDR", ""),
            ]),
        );
        assert_eq!(config, VistrackConfig::default());
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[general]\ntheme = \"light\"\n").unwrap();
        set_toml_value(&mut root, "general.theme", "dark").unwrap();
        assert_eq!(root["general"]["theme"].as_str(), Some("dark"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root: toml::Value = toml::from_str("[picker]\nshow_markers = true\n").unwrap();
        set_toml_value(&mut root, "picker.show_markers", "no").unwrap();
        assert_eq!(root["picker"]["show_markers"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_creates_missing_section() {
        let mut root: toml::Value = toml::from_str("").unwrap();
        set_toml_value(&mut root, "logging.enabled", "false").unwrap();
        set_toml_value(&mut root, "data.snapshot", "snap.json").unwrap();
        assert_eq!(root["logging"]["enabled"].as_bool(), Some(false));
        assert_eq!(root["data"]["snapshot"].as_str(), Some("snap.json"));

        let config: VistrackConfig = toml::from_str(&toml::to_string(&root).unwrap()).unwrap();
        assert!(!config.logging.enabled);
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let mut root: toml::Value = toml::from_str("[general]\ntheme = \"light\"\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "theme", "dark").is_err());
        assert!(set_toml_value(&mut root, "", "dark").is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: VistrackConfig = toml::from_str(&toml_str).unwrap();
    }
}
