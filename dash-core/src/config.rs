use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    model::Coordinates,
    schedule::{MAX_REFRESH_PERIOD, REFRESH_PERIOD},
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Where the backend lives and how to log in to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), username: None, password: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Auto-refresh period in minutes.
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_minutes: default_refresh_minutes() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [backend]
/// base_url = "http://127.0.0.1:5000"
/// username = "alice"
/// password = "..."
///
/// [location]
/// lat = 48.85
/// lon = 2.35
///
/// [dashboard]
/// refresh_minutes = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    /// Position used when asked for "my location".
    #[serde(default)]
    pub location: Option<Coordinates>,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path of the dashboard's log file.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.cache_dir().join("dashboard.log"))
    }

    /// Username and password, only when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.backend.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.backend.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }

    pub fn set_credentials(&mut self, username: String, password: String) {
        self.backend.username = Some(username);
        self.backend.password = Some(password);
    }

    pub fn clear_credentials(&mut self) {
        self.backend.username = None;
        self.backend.password = None;
    }

    /// Auto-refresh period; zero minutes falls back to the default and
    /// anything longer than a day is clamped to one.
    pub fn refresh_period(&self) -> Duration {
        match self.dashboard.refresh_minutes {
            0 => REFRESH_PERIOD,
            minutes => Duration::from_secs(minutes.saturating_mul(60)).min(MAX_REFRESH_PERIOD),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_refresh_minutes() -> u64 {
    REFRESH_PERIOD.as_secs() / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = Config::default();
        assert_eq!(cfg.backend.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.location, None);
        assert_eq!(cfg.refresh_period(), REFRESH_PERIOD);
    }

    #[test]
    fn credentials_require_both_parts() {
        let mut cfg = Config::default();
        assert!(cfg.credentials().is_none());

        cfg.backend.username = Some("alice".into());
        assert!(cfg.credentials().is_none());

        cfg.set_credentials("alice".into(), "secret".into());
        assert_eq!(cfg.credentials(), Some(("alice", "secret")));

        cfg.backend.password = Some(String::new());
        assert!(cfg.credentials().is_none());

        cfg.clear_credentials();
        assert_eq!(cfg.backend.username, None);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[location]\nlat = 48.85\nlon = 2.35\n").unwrap();
        assert_eq!(cfg.backend, BackendConfig::default());
        assert_eq!(cfg.location, Some(Coordinates { lat: 48.85, lon: 2.35 }));
        assert_eq!(cfg.dashboard.refresh_minutes, 10);
    }

    #[test]
    fn zero_refresh_minutes_uses_default_period() {
        let mut cfg = Config::default();
        cfg.dashboard.refresh_minutes = 0;
        assert_eq!(cfg.refresh_period(), REFRESH_PERIOD);

        cfg.dashboard.refresh_minutes = 2;
        assert_eq!(cfg.refresh_period(), Duration::from_secs(120));
    }

    #[test]
    fn huge_refresh_minutes_are_clamped_to_a_day() {
        let mut cfg = Config::default();
        cfg.dashboard.refresh_minutes = u64::MAX;
        assert_eq!(cfg.refresh_period(), MAX_REFRESH_PERIOD);

        cfg.dashboard.refresh_minutes = 24 * 60 + 1;
        assert_eq!(cfg.refresh_period(), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut cfg = Config::default();
        cfg.backend.base_url = "https://weather.example".into();
        cfg.set_credentials("alice".into(), "secret".into());
        cfg.location = Some(Coordinates { lat: 1.5, lon: -2.25 });
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
