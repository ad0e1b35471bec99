/// Configuration schema and defaults for loandash.
///
/// Defines the TOML-serializable configuration with three sections:
/// `[endpoint]`, `[display]` and `[logging]`. Every field has a built-in
/// default; users only set what they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level loandash configuration.
///
/// Maps to `~/.loandash/config.toml` and `.loandash.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub endpoint: EndpointConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [endpoint]
// ---------------------------------------------------------------------------

/// Where the statistics come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Scheme, host and port of the backend.
    pub base_url: String,
    /// Path of the statistics endpoint.
    pub path: String,
    /// Request timeout in milliseconds. A request that exceeds it fails
    /// the refresh cycle with a network failure.
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            path: "/api/statistiche".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colorize terminal output.
    pub color: bool,
    /// Width in cells of the longest chart bar.
    pub bar_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            bar_width: 32,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Refresh journal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether refresh cycles are journaled.
    pub enabled: bool,
    /// Path to the journal file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.loandash/refresh-log.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl DashConfig {
    /// Default config file contents written by `loandash config init`.
    pub fn default_toml() -> String {
        r#"# loandash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (LOANDASH_*)
#   2. Project config (.loandash.toml in current directory)
#   3. User global config (~/.loandash/config.toml)
#   4. Built-in defaults

[endpoint]
base_url = "http://127.0.0.1:5000"   # LOANDASH_URL
path = "/api/statistiche"            # LOANDASH_PATH
timeout_ms = 10000                   # LOANDASH_TIMEOUT_MS

[display]
color = true                         # LOANDASH_COLOR
bar_width = 32

[logging]
enabled = true                       # LOANDASH_LOG
path = "~/.loandash/refresh-log.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = DashConfig::default();
        assert_eq!(config.endpoint.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.endpoint.path, "/api/statistiche");
        assert_eq!(config.endpoint.timeout_ms, 10_000);
        assert!(config.display.color);
        assert_eq!(config.display.bar_width, 32);
        assert!(config.logging.enabled);
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[endpoint]
base_url = "http://stats.internal:8080"
"#;
        let config: DashConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.base_url, "http://stats.internal:8080");
        // Everything else falls back to defaults
        assert_eq!(config.endpoint.path, "/api/statistiche");
        assert_eq!(config.display.bar_width, 32);
    }

    #[test]
    fn default_toml_parses_back() {
        let config: DashConfig = toml::from_str(&DashConfig::default_toml()).unwrap();
        assert_eq!(config, DashConfig::default());
    }
}
