use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding the backend API key
pub const ANON_KEY_ENV: &str = "FAMHUB_ANON_KEY";

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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Where family data lives
    pub backend: BackendConfig,

    /// Bulletin board settings
    #[serde(default)]
    pub board: BoardConfig,

    /// Shared calendar settings
    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// Which repository implementation backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local SQLite file (offline use and development)
    #[default]
    Sqlite,
    /// Hosted PostgREST-compatible API plus object storage
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,

    /// Base URL of the hosted backend (without `/rest/v1`)
    pub rest_url: String,

    /// Public API key sent as `apikey` and bearer token.
    /// Falls back to the `FAMHUB_ANON_KEY` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// SQLite database file used by the local backend
    pub database_path: PathBuf,

    /// Storage bucket for board attachments
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
}

fn default_storage_bucket() -> String {
    "board-files".to_string()
}

impl BackendConfig {
    /// Key from the config file, or from the environment when unset.
    pub fn resolved_anon_key(&self) -> Option<String> {
        self.anon_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(ANON_KEY_ENV).ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Posts and comments younger than this get the NEW badge
    #[serde(default = "default_new_badge_hours")]
    pub new_badge_hours: i64,

    /// Number of posts shown on the home dashboard
    #[serde(default = "default_recent_posts")]
    pub recent_posts: usize,
}

fn default_new_badge_hours() -> i64 {
    24
}

fn default_recent_posts() -> usize {
    3
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            new_badge_hours: default_new_badge_hours(),
            recent_posts: default_recent_posts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Granularity of the schedule time picker
    #[serde(default = "default_time_step")]
    pub time_step_minutes: u32,

    /// Holidays added on top of the built-in list (`YYYY-MM-DD`)
    #[serde(default)]
    pub extra_holidays: Vec<String>,
}

fn default_time_step() -> u32 {
    10
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            time_step_minutes: default_time_step(),
            extra_holidays: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = default_config_dir();
        let database_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("famhub")
            .join("famhub.db");

        Self {
            config_dir,
            backend: BackendConfig {
                kind: BackendKind::Sqlite,
                rest_url: "http://localhost:54321".to_string(),
                anon_key: None,
                database_path,
                storage_bucket: default_storage_bucket(),
            },
            board: BoardConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("famhub")
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, creating a default one if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors;
    /// warnings are logged and returned alongside the config.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.backend.kind == BackendKind::Rest {
            self.validate_url(&self.backend.rest_url, "backend.rest_url", &mut result);

            if self.backend.resolved_anon_key().is_none() {
                result.add_warning(
                    "backend.anon_key",
                    format!("No API key configured (set {})", ANON_KEY_ENV),
                );
            }
        }

        if self.backend.storage_bucket.trim().is_empty() {
            result.add_error("backend.storage_bucket", "Storage bucket cannot be empty");
        }

        if self.board.new_badge_hours <= 0 {
            result.add_warning("board.new_badge_hours", "NEW badge disabled (window <= 0)");
        }

        if self.board.recent_posts == 0 {
            result.add_warning("board.recent_posts", "Home dashboard shows no posts");
        }

        let step = self.calendar.time_step_minutes;
        if step == 0 || step > 60 || 60 % step != 0 {
            result.add_error(
                "calendar.time_step_minutes",
                format!("Time step must divide an hour evenly, got {}", step),
            );
        }

        for key in &self.calendar.extra_holidays {
            let well_formed = key.len() == 10
                && chrono::NaiveDate::parse_from_str(key, "%Y-%m-%d").is_ok();
            if !well_formed {
                result.add_error(
                    "calendar.extra_holidays",
                    format!("Not a YYYY-MM-DD date: {}", key),
                );
            }
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_rest_url() {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Rest;
        config.backend.anon_key = Some("key".into());
        config.backend.rest_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "backend.rest_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Rest;
        config.backend.anon_key = Some("key".into());
        config.backend.rest_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_rest_url_ignored_for_sqlite() {
        let mut config = Config::default();
        config.backend.rest_url = "not-a-url".to_string();
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_time_step_must_divide_hour() {
        let mut config = Config::default();
        config.calendar.time_step_minutes = 7;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "calendar.time_step_minutes"));

        config.calendar.time_step_minutes = 15;
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_malformed_extra_holiday() {
        let mut config = Config::default();
        config.calendar.extra_holidays = vec!["2026-05-01".into(), "2026-5-1".into()];
        let result = config.validate();
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("2026-5-1"));
    }

    #[test]
    fn test_zero_badge_window_is_warning() {
        let mut config = Config::default();
        config.board.new_badge_hours = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "board.new_badge_hours"));
    }

    #[test]
    fn test_load_creates_default_then_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("famhub").join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.board.new_badge_hours, 24);

        let mut edited = created.clone();
        edited.calendar.extra_holidays.push("2026-05-01".into());
        edited.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.calendar.extra_holidays, vec!["2026-05-01".to_string()]);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
config_dir = "/tmp/famhub"

[backend]
kind = "rest"
rest_url = "https://example.supabase.co"
database_path = "/tmp/famhub.db"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Rest);
        assert_eq!(config.backend.storage_bucket, "board-files");
        assert_eq!(config.board.recent_posts, 3);
        assert_eq!(config.calendar.time_step_minutes, 10);
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
