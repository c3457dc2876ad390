use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{PlaneError, Result};

const DEFAULT_BASE_URL: &str = "https://app.plane.so";
const DEFAULT_REVALIDATE_SECS: u64 = 30;

#[derive(Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidate_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| PlaneError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| PlaneError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "plane")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(PlaneError::NoConfigDir)
    }

    /// Get the session cookie with env var taking precedence over config file
    pub fn cookie(&self) -> Result<String> {
        if let Ok(cookie) = std::env::var("PLANE_SESSION") {
            return Ok(cookie);
        }

        self.cookie.clone().ok_or(PlaneError::MissingSession)
    }

    /// API host, env var first, then config, then the hosted default
    pub fn base_url(&self) -> String {
        std::env::var("PLANE_API_URL")
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// How long a cached binding stays fresh before it is fetched again.
    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs.unwrap_or(DEFAULT_REVALIDATE_SECS))
    }
}
