use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Remote content source settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Initial load behavior
    #[serde(default)]
    pub load: LoadConfig,
}

/// Headless CMS query API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub project_id: String,
    pub dataset: String,
    /// Dated API version, e.g. `2024-01-18`
    pub api_version: String,
    /// Query the edge cache instead of the live API
    #[serde(default = "default_true")]
    pub use_cdn: bool,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
    /// Retries for transient failures (timeouts, 5xx, 429)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: "fmvvts18".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-18".to_string(),
            use_cdn: true,
            timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl ContentConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which slot implementation holds the state blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for state files (defaults to the platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Name of the slot holding the state blob
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    "assignmentTracker".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: None,
            storage_key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Configured data dir, or `<platform data dir>/duetrack`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("duetrack")
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Deadline for the whole initial fetch, retries included
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout() -> u64 {
    15
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl LoadConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl TrackerConfig {
    /// Load configuration from the default path, creating it if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let config: TrackerConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated(path: &Path) -> Result<(Self, ValidationResult)> {
        let config = Self::load_from(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let content = &self.content;
        if content.project_id.trim().is_empty() {
            result.add_error("content.project_id", "Project ID must not be empty");
        } else if !content
            .project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            result.add_error(
                "content.project_id",
                "Project ID may only contain letters, digits and dashes",
            );
        }

        if content.dataset.is_empty()
            || !content
                .dataset
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            result.add_error(
                "content.dataset",
                "Dataset must be lowercase letters, digits, '_' or '-'",
            );
        }

        if !is_valid_api_version(&content.api_version) {
            result.add_error(
                "content.api_version",
                format!(
                    "Expected YYYY-MM-DD, '1' or 'X', got: {}",
                    content.api_version
                ),
            );
        }

        if content.timeout_secs == 0 {
            result.add_error("content.timeout_secs", "Request timeout must be greater than 0");
        }

        if content.max_retries > 10 {
            result.add_warning("content.max_retries", "More than 10 retries configured");
        }

        if self.storage.storage_key.trim().is_empty() {
            result.add_error("storage.storage_key", "Storage key must not be empty");
        }

        if self.load.fetch_timeout_secs == 0 {
            result.add_error("load.fetch_timeout_secs", "Fetch timeout must be greater than 0");
        } else if self.load.fetch_timeout_secs > 300 {
            result.add_warning(
                "load.fetch_timeout_secs",
                "Fetch timeout is more than 5 minutes",
            );
        }

        result
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no config directory on this platform".into()))?
            .join("duetrack");

        Ok(config_dir.join("config.toml"))
    }
}

fn is_valid_api_version(version: &str) -> bool {
    version == "1"
        || version == "X"
        || chrono::NaiveDate::parse_from_str(version, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_default_config() {
        let config = TrackerConfig::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_empty_project_id() {
        let mut config = TrackerConfig::default();
        config.content.project_id = "  ".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "content.project_id"));
    }

    #[test]
    fn test_bad_dataset() {
        let mut config = TrackerConfig::default();
        config.content.dataset = "Production!".to_string();
        assert!(config
            .validate()
            .errors
            .iter()
            .any(|e| e.field == "content.dataset"));
    }

    #[test]
    fn test_api_version_formats() {
        assert!(is_valid_api_version("2024-01-18"));
        assert!(is_valid_api_version("1"));
        assert!(is_valid_api_version("X"));
        assert!(!is_valid_api_version("2024-13-01"));
        assert!(!is_valid_api_version("latest"));
    }

    #[test]
    fn test_zero_timeouts_are_errors() {
        let mut config = TrackerConfig::default();
        config.content.timeout_secs = 0;
        config.load.fetch_timeout_secs = 0;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "content.timeout_secs"));
        assert!(result.errors.iter().any(|e| e.field == "load.fetch_timeout_secs"));
    }

    #[test]
    fn test_long_fetch_timeout_is_warning() {
        let mut config = TrackerConfig::default();
        config.load.fetch_timeout_secs = 600;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "load.fetch_timeout_secs"));
    }

    #[test]
    fn test_load_from_missing_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = TrackerConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.storage.storage_key, "assignmentTracker");
        assert_eq!(config.content.dataset, "production");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\nbackend = \"sqlite\"\n\n[load]\nfetch_timeout_secs = 3\n",
        )
        .unwrap();

        let config = TrackerConfig::load_from(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.load.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.content.project_id, "fmvvts18");
    }

    #[test]
    fn test_load_validated_rejects_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = TrackerConfig::default();
        config.content.project_id = String::new();
        config.save_to(&path).unwrap();
        let err = TrackerConfig::load_validated(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[content\nproject_id = ").unwrap();
        let err = TrackerConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        // A directory exists at the path but cannot be read as a file.
        let path = dir.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();
        let err = TrackerConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
