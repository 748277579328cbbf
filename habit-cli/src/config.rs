use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const API_URL_ENV: &str = "HABITS_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitConfig {
    /// Base URL of the habit API, e.g. "http://localhost:8080"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Path protected routes redirect to when no session exists
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_login_path() -> String {
    habit_core::session::LOGIN_PATH.to_string()
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            login_path: default_login_path(),
        }
    }
}

impl HabitConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("habit-tracker")
            .join("config.toml"))
    }

    /// Load config from disk, then apply `HABITS_API_URL`. Returns defaults if
    /// the file doesn't exist.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
