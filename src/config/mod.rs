/// Configuration system for loandash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::DashConfig::default()`]
/// 2. **User global config** — `~/.loandash/config.toml`
/// 3. **Project local config** — `.loandash.toml` in the current directory
/// 4. **Environment variables** — `LOANDASH_*` overrides (highest precedence)
///
/// A present file replaces the previous layer wholesale; missing sections
/// inside it fall back to built-in defaults.
///
/// # Usage
///
/// ```rust,ignore
/// use loandash::config;
///
/// let cfg = config::load();
/// let client = StatsClient::from_config(&cfg.endpoint);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::DashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> DashConfig {
    let mut config = DashConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_overrides(&mut config, |name| std::env::var(name).ok());

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Malformed files are ignored so a typo never stops the dashboard from
/// starting with defaults.
fn load_toml_file(path: Option<PathBuf>) -> Option<DashConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("[loandash] ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.loandash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".loandash").join("config.toml"))
}

/// Path to the project local config: `.loandash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".loandash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment overrides (highest precedence layer).
///
/// Supported variables:
/// - `LOANDASH_URL` — backend base URL
/// - `LOANDASH_PATH` — statistics endpoint path
/// - `LOANDASH_TIMEOUT_MS` — request timeout
/// - `LOANDASH_COLOR` — colorized output (`1`/`true`/`yes`/`on`)
/// - `LOANDASH_LOG` — refresh journal on/off
///
/// `lookup` is `std::env::var` in production and a map in tests.
fn apply_overrides(config: &mut DashConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("LOANDASH_URL")
        && !val.is_empty()
    {
        config.endpoint.base_url = val;
    }
    if let Some(val) = lookup("LOANDASH_PATH")
        && !val.is_empty()
    {
        config.endpoint.path = val;
    }
    if let Some(val) = lookup("LOANDASH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.endpoint.timeout_ms = ms;
    }
    if let Some(val) = lookup("LOANDASH_COLOR") {
        config.display.color = is_truthy(&val);
    }
    if let Some(val) = lookup("LOANDASH_LOG") {
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

// ---------------------------------------------------------------------------
// Config init / show
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.loandash/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.loandash/ directory")?;
    }

    fs::write(&path, DashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
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
    use std::collections::HashMap;

    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> DashConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = DashConfig::default();
        apply_overrides(&mut config, |name| env.get(name).cloned());
        config
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn env_overrides_endpoint() {
        let config = overrides(&[
            ("LOANDASH_URL", "http://10.0.0.5:8000"),
            ("LOANDASH_PATH", "/v2/stats"),
            ("LOANDASH_TIMEOUT_MS", "2500"),
        ]);
        assert_eq!(config.endpoint.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.endpoint.path, "/v2/stats");
        assert_eq!(config.endpoint.timeout_ms, 2500);
    }

    #[test]
    fn env_overrides_ignore_bad_values() {
        let config = overrides(&[("LOANDASH_URL", ""), ("LOANDASH_TIMEOUT_MS", "soon")]);
        assert_eq!(config.endpoint, schema::EndpointConfig::default());
    }

    #[test]
    fn env_toggles_color_and_logging() {
        let config = overrides(&[("LOANDASH_COLOR", "0"), ("LOANDASH_LOG", "off")]);
        assert!(!config.display.color);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(
            expand_home("/var/log/loandash.jsonl"),
            Some(PathBuf::from("/var/log/loandash.jsonl"))
        );
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: DashConfig = toml::from_str(&toml_str).unwrap();
    }
}
