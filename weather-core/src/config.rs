use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Environment variable that injects the provider key at deploy time.
///
/// The same variable is read at compile time, so a build can bake the key in
/// without it ever appearing in source.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// base_url = "http://api.weatherapi.com/v1"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Key stored by `weather configure`. Overridden by `WEATHER_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider base address, without the trailing endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self { api_key: None, base_url: default_base_url() }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-card", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Resolve the key: runtime environment first, then the config file,
    /// then whatever was present in the environment at build time.
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(env::var(API_KEY_ENV).ok(), option_env!("WEATHER_API_KEY"))
    }

    fn resolve_api_key(&self, runtime: Option<String>, baked: Option<&str>) -> Option<String> {
        runtime
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .or_else(|| baked.filter(|k| !k.trim().is_empty()).map(str::to_owned))
    }

    /// Like [`Config::api_key`], but with a user-facing error when absent.
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` or set {API_KEY_ENV}."
            )
        })
    }
}
