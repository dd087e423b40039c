//! Configuration handling for the TUI

use crate::api::{Role, DEFAULT_API_URL};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the backend address
pub const API_URL_ENV: &str = "ADMISSIONS_API_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TuiConfig {
    /// Backend base URL
    pub api_base_url: Option<String>,
    /// Timeout applied to every HTTP call
    pub request_timeout_secs: Option<u64>,
    /// Role preselected on the login form
    pub default_role: Option<String>,
}

impl TuiConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("edu", "admissions", "admissions-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user's config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: TuiConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Backend URL: environment, then config file, then the default
    pub fn api_base_url(&self) -> String {
        let from_env = std::env::var(API_URL_ENV).ok();
        Self::pick_base_url(from_env.as_deref(), self.api_base_url.as_deref())
    }

    fn pick_base_url(from_env: Option<&str>, from_file: Option<&str>) -> String {
        from_env
            .into_iter()
            .chain(from_file)
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Role preselected on the login form; unknown values fall back to student
    pub fn default_role(&self) -> Role {
        self.default_role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or(Role::Student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.api_base_url.is_none());
        assert!(config.request_timeout_secs.is_none());
        assert!(config.default_role.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_role(), Role::Student);
    }

    #[test]
    fn test_serialization() {
        let config = TuiConfig {
            api_base_url: Some("http://admissions.local:8080".to_string()),
            request_timeout_secs: Some(10),
            default_role: Some("admin".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, config);
        assert_eq!(deserialized.default_role(), Role::Admin);
    }

    #[test]
    fn test_partial_serialization() {
        let json = r#"{"request_timeout_secs": 5}"#;
        let config: TuiConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let config: TuiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TuiConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"default_role": "student", "theme": "dark"}"#;
        let config: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_role.as_deref(), Some("student"));
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = TuiConfig {
            request_timeout_secs: Some(0),
            ..TuiConfig::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_default_role_falls_back() {
        let config = TuiConfig {
            default_role: Some("registrar".to_string()),
            ..TuiConfig::default()
        };
        assert_eq!(config.default_role(), Role::Student);
    }

    #[test]
    fn test_base_url_precedence() {
        assert_eq!(
            TuiConfig::pick_base_url(Some("http://env:1/"), Some("http://file:2")),
            "http://env:1"
        );
        assert_eq!(
            TuiConfig::pick_base_url(Some("  "), Some("http://file:2")),
            "http://file:2"
        );
        assert_eq!(TuiConfig::pick_base_url(None, None), DEFAULT_API_URL);
    }

    #[test]
    fn test_config_path_returns_option() {
        // May be None on exotic platforms; must not panic
        let _ = TuiConfig::config_path();
    }

    #[test]
    fn test_load_from_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = TuiConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, TuiConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = TuiConfig {
            api_base_url: Some("https://apply.example.edu".to_string()),
            ..TuiConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(TuiConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(TuiConfig::load_from(&path).is_err());
    }
}
