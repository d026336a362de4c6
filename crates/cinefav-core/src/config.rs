use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CinefavError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `api.base_url`.
pub const API_BASE_ENV: &str = "CINEFAV_API_BASE";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds; 0 leaves it to the transport.
    #[serde(default)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub recent_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesConfig {
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    pub toast_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api".into(),
            timeout_secs: 0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 600,
            recent_limit: 5,
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self { page_size: 15 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { toast_secs: 2 }
    }
}

impl AppConfig {
    /// Load config: user file (if exists) over built-in defaults.
    pub fn load() -> Result<Self, CinefavError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::parse(DEFAULT_CONFIG)
        }
    }

    /// Load config from an explicit file. Missing sections fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, CinefavError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CinefavError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, CinefavError> {
        toml::from_str(content).map_err(|e| CinefavError::Config(e.to_string()))
    }

    /// Apply `CINEFAV_API_BASE` if it is set and non-empty.
    pub fn apply_env(&mut self) {
        self.apply_api_base(std::env::var(API_BASE_ENV).ok());
    }

    fn apply_api_base(&mut self, value: Option<String>) {
        if let Some(base) = value.map(|v| v.trim().to_string()) {
            if !base.is_empty() {
                tracing::debug!(base_url = %base, "api base overridden from environment");
                self.api.base_url = base;
            }
        }
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), CinefavError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CinefavError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.api.timeout_secs > 0).then(|| Duration::from_secs(self.api.timeout_secs))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.ui.toast_secs)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Directory for persisted client data (identity token, logs).
    pub fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn identity_path() -> PathBuf {
        Self::data_dir().join("user_id")
    }

    pub fn log_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "cinefav")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
