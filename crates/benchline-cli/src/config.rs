//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Command-line arguments, which take precedence at the call sites

use crate::error::{Error, Result};
use benchline_core::RunnerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File stem searched in the working directory and home directory
const CONFIG_STEMS: [&str; 2] = [".benchline", "benchline"];

/// Supported configuration file extensions, in search order
const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Context (user or project id) tests run in when `--context` is not given
    pub default_context: Option<String>,

    /// Test runner settings
    pub runner: RunnerConfig,

    /// Fixture settings
    pub fixtures: FixturesConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LogSettings,
}

/// Fixture configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    /// Fixture file used when `--fixtures` is not given
    pub path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output when the terminal supports it
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,

    /// Redact secrets from inputs and outputs before printing them
    pub redact: bool,
}

/// Logging configuration as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level filter, used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
            redact: true,
        }
    }
}

/// Config file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(FileFormat::Toml),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "toml, yaml or json".to_string(),
            }),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::from_path(path)? {
            FileFormat::Toml => toml::from_str(&content).map_err(|e| {
                Error::config(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Configuration file paths checked by [`Config::load`], in order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        for stem in CONFIG_STEMS {
            for ext in CONFIG_EXTENSIONS {
                paths.push(PathBuf::from(format!("{}.{}", stem, ext)));
            }
        }

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let benchline_dir = config_dir.join("benchline");
            for ext in CONFIG_EXTENSIONS {
                paths.push(benchline_dir.join(format!("config.{}", ext)));
            }
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            for ext in CONFIG_EXTENSIONS {
                paths.push(home_dir.join(format!(".benchline.{}", ext)));
            }
        }

        paths
    }

    /// Path of the user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("benchline").join("config.toml"))
    }

    /// Path of the project configuration file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".benchline.toml")
    }

    /// Merge with another config (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.default_context.is_some() {
            self.default_context = other.default_context;
        }
        if other.runner.max_results.is_some() {
            self.runner.max_results = other.runner.max_results;
        }
        if other.fixtures.path.is_some() {
            self.fixtures.path = other.fixtures.path;
        }
        if other.logging.level.is_some() {
            self.logging.level = other.logging.level;
        }
        if other.logging.format.is_some() {
            self.logging.format = other.logging.format;
        }
        if other.logging.file.is_some() {
            self.logging.file = other.logging.file;
        }
        self.output = other.output;
    }

    /// Serialize in the format implied by `path`
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        match FileFormat::from_path(path)? {
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Builder for creating configurations programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the default test context
    pub fn default_context(mut self, context: impl Into<String>) -> Self {
        self.config.default_context = Some(context.into());
        self
    }

    /// Cap the number of results kept per session
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.runner.max_results = Some(max_results);
        self
    }

    /// Set the default fixture file
    pub fn fixtures_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.fixtures.path = Some(path.into());
        self
    }

    /// Set the default log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = Some(level.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> Config {
        ConfigBuilder::new()
            .default_context("proj_42")
            .max_results(100)
            .fixtures_path("fixtures/replies.yaml")
            .log_level("debug")
            .build()
    }

    #[test]
    fn test_save_and_load_each_format() {
        let dir = TempDir::new().unwrap();
        let config = sample_config();

        for name in ["config.toml", "config.yaml", "config.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            let loaded = Config::from_file(&path).unwrap();
            assert_eq!(loaded, config, "format of {}", name);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".benchline.toml");
        std::fs::write(&path, "default_context = \"user_1\"\n\n[runner]\nmax_results = 5\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_context.as_deref(), Some("user_1"));
        assert_eq!(config.runner.max_results, Some(5));
        assert!(config.output.color);
        assert!(config.output.redact);
        assert!(config.fixtures.path.is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/benchline.toml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "x=1").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
    }

    #[test]
    fn test_merge_keeps_unset_values() {
        let mut base = sample_config();
        let other = ConfigBuilder::new().default_context("user_7").build();
        base.merge(other);

        assert_eq!(base.default_context.as_deref(), Some("user_7"));
        assert_eq!(base.runner.max_results, Some(100));
        assert_eq!(base.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_default_paths_start_in_working_directory() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".benchline.toml"));
        assert!(paths.contains(&PathBuf::from("benchline.json")));
    }
}
