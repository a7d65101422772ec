//! Configuration management for winmax.
//!
//! Configuration is loaded from TOML files in the following locations (in order):
//! 1. `%APPDATA%/WindowMaximizer/config/config.toml` (Windows standard)
//! 2. `./config.toml` (current directory, for development)

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name used for the data and config directories.
pub const APP_NAME: &str = "WindowMaximizer";

/// Upper bound for the settle delay before the foreground window is read.
pub const MAX_SETTLE_DELAY_MS: u64 = 2000;

/// Main configuration structure for winmax.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Behavior configuration.
    pub behavior: BehaviorConfig,
    /// Where state and logs are written.
    pub storage: StorageConfig,
}

/// Behavior-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Delay before reading the foreground window, letting a just-focused
    /// window finish its layout animation.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            log_level: default_log_level(),
        }
    }
}

impl BehaviorConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Storage-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for state files and the log. Defaults to the local data dir.
    pub state_dir: Option<PathBuf>,

    /// Whether to append diagnostics to `winmax.log` in the state directory.
    #[serde(default = "default_true")]
    pub log_to_file: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            log_to_file: true,
        }
    }
}

// Default value functions for serde
fn default_settle_delay() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// A config value that was out of range and has been corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl Config {
    /// Load configuration from the first config file that exists.
    pub fn load() -> Result<Self> {
        let paths = config_paths();

        for path in &paths {
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Clamp out-of-range values, returning a warning for each correction.
    pub fn validate(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.behavior.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            warnings.push(ConfigWarning {
                field: "behavior.settle_delay_ms",
                message: format!(
                    "{} exceeds the maximum of {}; clamped",
                    self.behavior.settle_delay_ms, MAX_SETTLE_DELAY_MS
                ),
            });
            self.behavior.settle_delay_ms = MAX_SETTLE_DELAY_MS;
        }

        let level = self.behavior.log_level.to_lowercase();
        if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            warnings.push(ConfigWarning {
                field: "behavior.log_level",
                message: format!("unknown level '{}'; using info", self.behavior.log_level),
            });
            self.behavior.log_level = default_log_level();
        }

        warnings
    }

    /// Directory holding state files and the log.
    pub fn state_dir(&self) -> PathBuf {
        self.storage.state_dir.clone().unwrap_or_else(default_state_dir)
    }
}

/// `%LOCALAPPDATA%/WindowMaximizer`, or `./WindowMaximizer` if no home is known.
pub fn default_state_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.data_local_dir().join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(APP_NAME))
}

/// Get all possible config file paths in priority order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Windows standard: %APPDATA%/WindowMaximizer/config/config.toml
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        paths.push(proj_dirs.config_dir().join("config.toml"));
    }

    // 2. Current directory: ./config.toml
    paths.push(PathBuf::from("config.toml"));

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.behavior.settle_delay_ms, 100);
        assert_eq!(config.behavior.settle_delay(), Duration::from_millis(100));
        assert_eq!(config.behavior.log_level, "info");
        assert!(config.storage.state_dir.is_none());
        assert!(config.storage.log_to_file);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.behavior.settle_delay_ms, config.behavior.settle_delay_ms);
        assert_eq!(parsed.storage.log_to_file, config.storage.log_to_file);
    }

    #[test]
    fn test_config_partial_parse() {
        // Config with only some fields should use defaults for the rest
        let toml_str = r#"
            [behavior]
            settle_delay_ms = 250
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.behavior.settle_delay_ms, 250);
        assert_eq!(config.behavior.log_level, "info"); // default
        assert!(config.storage.log_to_file); // default
    }

    #[test]
    fn test_storage_override() {
        let toml_str = r#"
            [storage]
            state_dir = "C:/Temp/winmax"
            log_to_file = false
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.state_dir(), PathBuf::from("C:/Temp/winmax"));
        assert!(!config.storage.log_to_file);
    }

    #[test]
    fn test_default_state_dir_names_app() {
        let config = Config::default();
        assert!(config.state_dir().to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_validate_clamps_settle_delay() {
        let mut config = Config::default();
        config.behavior.settle_delay_ms = 10_000;
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "behavior.settle_delay_ms");
        assert_eq!(config.behavior.settle_delay_ms, MAX_SETTLE_DELAY_MS);
    }

    #[test]
    fn test_validate_resets_unknown_log_level() {
        let mut config = Config::default();
        config.behavior.log_level = "verbose".to_string();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.behavior.log_level, "info");

        config.behavior.log_level = "DEBUG".to_string();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_default_is_clean() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_paths_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty());
        assert!(paths.last().unwrap().ends_with("config.toml"));
    }

    #[test]
    fn test_config_paths_share_app_directory() {
        // Config lives under the same application name as the state and log files.
        let paths = config_paths();
        let (last, rest) = paths.split_last().unwrap();
        assert_eq!(last, &PathBuf::from("config.toml"));
        for path in rest {
            // Platforms lowercase or prefix the application directory differently.
            let app = APP_NAME.to_lowercase();
            assert!(
                path.components()
                    .any(|c| c.as_os_str().to_string_lossy().to_lowercase().contains(&app)),
                "{} is outside the {} directory",
                path.display(),
                APP_NAME
            );
            assert!(!path.components().any(|c| c.as_os_str() == "winmax"));
        }
    }

    #[test]
    fn test_load_from_path_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "behavior = [").unwrap();
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_path(&dir.path().join("nope.toml")).is_err());
    }
}
