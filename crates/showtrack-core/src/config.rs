use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ShowtrackError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `catalog.api_key`.
pub const API_KEY_ENV: &str = "SHOWTRACK_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub artwork_base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub page_limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform data directory location of the database.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// Overrides where device-local session values are kept.
    #[serde(default)]
    pub local_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub enabled: bool,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AppConfig {
    /// Load config: user file (if exists) or built-in defaults, then env overrides.
    pub fn load() -> Result<Self, ShowtrackError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit path, falling back to defaults when it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ShowtrackError> {
        if path.exists() {
            let user_str = std::fs::read_to_string(path)?;
            toml::from_str(&user_str).map_err(|e| ShowtrackError::Config(e.to_string()))
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| ShowtrackError::Config(e.to_string()))
        }
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.catalog.api_key = Some(key);
            }
        }
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the database file.
    pub fn db_path(&self) -> PathBuf {
        self.storage.db_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|d| d.data_dir().join("showtrack.db"))
                .unwrap_or_else(|| PathBuf::from("showtrack.db"))
        })
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path(&self) -> Result<PathBuf, ShowtrackError> {
        let path = self.db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Directory holding device-local values such as the saved session.
    pub fn local_dir(&self) -> PathBuf {
        self.storage.local_dir.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|d| d.data_dir().join("local"))
                .unwrap_or_else(|| PathBuf::from("local"))
        })
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "showtrack")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.page_limit, 10);
        assert!(config.catalog.api_key.is_none());
        assert!(config.catalog.base_url.starts_with("https://"));
        assert!(!config.demo.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.catalog.base_url, config.catalog.base_url);
        assert_eq!(deserialized.demo.email, config.demo.email);
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.catalog.page_limit, 10);
    }

    #[test]
    fn test_load_from_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::default();
        config.catalog.api_key = Some("key-123".into());
        config.storage.db_path = Some(dir.path().join("custom.db"));
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.catalog.api_key.as_deref(), Some("key-123"));
        assert_eq!(loaded.db_path(), dir.path().join("custom.db"));
    }

    #[test]
    fn test_invalid_user_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog\nbroken").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ShowtrackError::Config(_))
        ));
    }
}
