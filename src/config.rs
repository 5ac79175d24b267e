//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::poller::OverlapPolicy;
use crate::render::PageMode;
use crate::updater::Routine;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracking server connection
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Polling intervals and overlap handling
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_fast_interval")]
    pub statistics_interval_ms: u64,

    #[serde(default = "default_fast_interval")]
    pub rooms_interval_ms: u64,

    #[serde(default = "default_fast_interval")]
    pub visits_interval_ms: u64,

    #[serde(default = "default_slow_interval")]
    pub movements_interval_ms: u64,

    #[serde(default = "default_slow_interval")]
    pub group_movements_interval_ms: u64,

    #[serde(default)]
    pub overlap: OverlapPolicy,
}

fn default_fast_interval() -> u64 {
    2000
}

fn default_slow_interval() -> u64 {
    3000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            statistics_interval_ms: default_fast_interval(),
            rooms_interval_ms: default_fast_interval(),
            visits_interval_ms: default_fast_interval(),
            movements_interval_ms: default_slow_interval(),
            group_movements_interval_ms: default_slow_interval(),
            overlap: OverlapPolicy::default(),
        }
    }
}

impl PollConfig {
    /// Polling period of a routine (never below 100ms)
    pub fn interval_for(&self, routine: Routine) -> Duration {
        let ms = match routine {
            Routine::Statistics => self.statistics_interval_ms,
            Routine::RoomsStatus => self.rooms_interval_ms,
            Routine::ActiveVisits => self.visits_interval_ms,
            Routine::Movements => self.movements_interval_ms,
            Routine::GroupMovements => self.group_movements_interval_ms,
        };
        Duration::from_millis(ms.max(100))
    }
}

/// Presentation settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub mode: PageMode,
}

/// Dashboard host configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Meta refresh of the hosted page in seconds (0 disables it)
    #[serde(default = "default_refresh")]
    pub refresh_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_refresh() -> u64 {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            refresh_secs: default_refresh(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        log_warnings(&config.apply_env_overrides());
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        log_warnings(&config.apply_env_overrides());
        Ok(config)
    }

    /// Load from default locations with environment overrides.
    ///
    /// Nothing is logged; problems are collected in the report so callers
    /// can emit them once logging is set up.
    pub fn load_default() -> LoadReport {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("roomwatch").join("config.toml")),
            Some(PathBuf::from("/etc/roomwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths, |key| std::env::var(key).ok())
    }

    /// Load the first readable config among `paths`, then apply overrides
    /// from `lookup`. Files that exist but fail to load are skipped with a
    /// warning.
    pub fn load_first(paths: &[PathBuf], lookup: impl Fn(&str) -> Option<String>) -> LoadReport {
        let mut warnings = Vec::new();
        let mut loaded = None;

        for path in paths.iter().filter(|path| path.exists()) {
            match Self::load(path) {
                Ok(config) => {
                    loaded = Some((config, path.clone()));
                    break;
                }
                Err(e) => warnings.push(e.to_string()),
            }
        }

        let (mut config, path) = match loaded {
            Some((config, path)) => (config, Some(path)),
            None => (Config::default(), None),
        };
        warnings.extend(config.apply_overrides(lookup));

        LoadReport {
            config,
            path,
            warnings,
        }
    }

    /// Apply environment variable overrides to an existing config.
    /// Returns a warning for every value that was ignored.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Unparseable values are ignored
    /// and reported in the returned warnings.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(url) = lookup("ROOMWATCH_API_URL") {
            self.source.base_url = url;
        }

        if let Some(mode) = lookup("ROOMWATCH_MODE") {
            match mode.parse() {
                Ok(mode) => self.display.mode = mode,
                Err(e) => warnings.push(format!("Ignoring ROOMWATCH_MODE: {}", e)),
            }
        }

        if let Some(overlap) = lookup("ROOMWATCH_OVERLAP") {
            match overlap.parse() {
                Ok(overlap) => self.poll.overlap = overlap,
                Err(e) => warnings.push(format!("Ignoring ROOMWATCH_OVERLAP: {}", e)),
            }
        }

        if let Some(host) = lookup("ROOMWATCH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ROOMWATCH_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warnings.push(format!("Ignoring ROOMWATCH_PORT '{}': {}", port, e)),
            }
        }

        if let Some(level) = lookup("ROOMWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ROOMWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }

        warnings
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct LoadReport {
    pub config: Config,
    /// File the config was read from, if any
    pub path: Option<PathBuf>,
    /// Skipped files and ignored overrides
    pub warnings: Vec<String>,
}

fn log_warnings(warnings: &[String]) {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Roomwatch Configuration
#
# Environment variables override these settings:
# - ROOMWATCH_API_URL
# - ROOMWATCH_MODE
# - ROOMWATCH_OVERLAP
# - ROOMWATCH_HOST
# - ROOMWATCH_PORT
# - ROOMWATCH_LOG_LEVEL
# - ROOMWATCH_LOG_FORMAT

[source]
# Base URL of the tracking server
base_url = "http://localhost:5000"

# Request timeout in milliseconds
request_timeout_ms = 10000

[poll]
# Polling intervals per panel (ms)
statistics_interval_ms = 2000
rooms_interval_ms = 2000
visits_interval_ms = 2000
movements_interval_ms = 3000
group_movements_interval_ms = 3000

# What to do when a panel is due while its previous request is pending:
# "supersede" aborts the pending request, "allow" lets both run
overlap = "supersede"

[display]
# Page mode: standard or security
mode = "standard"

[server]
# Dashboard host
host = "127.0.0.1"

# Dashboard port
port = 8090

# Browser auto-refresh of the hosted page (seconds, 0 disables)
refresh_secs = 2

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source.base_url, "http://localhost:5000");
        assert_eq!(config.display.mode, PageMode::Standard);
        assert_eq!(config.poll.overlap, OverlapPolicy::Supersede);
        assert_eq!(config.server.addr(), "127.0.0.1:8090");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.source.base_url, defaults.source.base_url);
        assert_eq!(config.poll.movements_interval_ms, defaults.poll.movements_interval_ms);
        assert_eq!(config.poll.overlap, defaults.poll.overlap);
        assert_eq!(config.server.port, defaults.server.port);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[display]\nmode = \"security\"\n\n[poll]\noverlap = \"allow\"\nrooms_interval_ms = 500"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.display.mode, PageMode::Security);
        assert_eq!(config.poll.overlap, OverlapPolicy::Allow);
        assert_eq!(config.poll.interval_for(Routine::RoomsStatus), Duration::from_millis(500));
        assert_eq!(config.poll.interval_for(Routine::Movements), Duration::from_millis(3000));
        assert_eq!(config.source.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nmode = \"kiosk\"").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ROOMWATCH_API_URL", "http://tracker:5000"),
            ("ROOMWATCH_MODE", "security"),
            ("ROOMWATCH_OVERLAP", "allow"),
            ("ROOMWATCH_PORT", "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        let warnings = config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert!(warnings.is_empty());

        assert_eq!(config.source.base_url, "http://tracker:5000");
        assert_eq!(config.display.mode, PageMode::Security);
        assert_eq!(config.poll.overlap, OverlapPolicy::Allow);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_bad_overrides_ignored() {
        let mut config = Config::default();
        let warnings = config.apply_overrides(|key| match key {
            "ROOMWATCH_MODE" => Some("kiosk".to_string()),
            "ROOMWATCH_OVERLAP" => Some("queue".to_string()),
            "ROOMWATCH_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });

        assert_eq!(config.display.mode, PageMode::Standard);
        assert_eq!(config.poll.overlap, OverlapPolicy::Supersede);
        assert_eq!(config.server.port, 8090);

        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].starts_with("Ignoring ROOMWATCH_MODE"));
        assert!(warnings[1].starts_with("Ignoring ROOMWATCH_OVERLAP"));
        assert!(warnings[2].starts_with("Ignoring ROOMWATCH_PORT 'not-a-port'"));
    }

    #[test]
    fn test_load_first_skips_broken_file_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[server\nport = 1").unwrap();
        std::fs::write(&good, "[server]\nport = 9100").unwrap();

        let paths = [dir.path().join("absent.toml"), broken.clone(), good.clone()];
        let report = Config::load_first(&paths, |_| None);

        assert_eq!(report.path, Some(good));
        assert_eq!(report.config.server.port, 9100);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("broken.toml"));
    }

    #[test]
    fn test_load_first_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = [dir.path().join("absent.toml")];

        let report = Config::load_first(&paths, |key| match key {
            "ROOMWATCH_MODE" => Some("kiosk".to_string()),
            _ => None,
        });

        assert_eq!(report.path, None);
        assert_eq!(report.config.server.port, 8090);
        assert_eq!(report.warnings, vec!["Ignoring ROOMWATCH_MODE: Unknown page mode: kiosk".to_string()]);
    }

    #[test]
    fn test_interval_floor() {
        let poll = PollConfig {
            statistics_interval_ms: 0,
            ..PollConfig::default()
        };
        assert_eq!(poll.interval_for(Routine::Statistics), Duration::from_millis(100));
    }
}
