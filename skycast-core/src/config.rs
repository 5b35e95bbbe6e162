use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    model::{Coordinates, DisplayUnit, ThemeMode},
    provider::ProviderId,
};

/// Environment variable overriding the default provider's API key.
pub const API_KEY_ENV: &str = "SKYCAST_API_KEY";
/// Environment variable overriding the default provider's API host.
pub const API_HOST_ENV: &str = "SKYCAST_API_HOST";

pub const DEFAULT_RAPIDAPI_HOST: &str = "weatherapi-com.p.rapidapi.com";
pub const DEFAULT_FORECAST_DAYS: u8 = 5;
/// Longest forecast the view lays out.
pub const MAX_FORECAST_DAYS: u8 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Credentials for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Value for the `X-RapidAPI-Host` header. Unused by direct providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Replaces the provider's scheme and host, e.g. for a local proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(api_key: String) -> Self {
        Self { api_key, api_host: None, base_url: None }
    }
}

/// Where startup coordinates come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GeolocationConfig {
    /// Look up the machine's public IP address.
    Ip {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lookup_url: Option<String>,
    },
    Fixed {
        latitude: f64,
        longitude: f64,
    },
    Off,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        GeolocationConfig::Ip { lookup_url: None }
    }
}

impl GeolocationConfig {
    pub fn fixed(coords: Coordinates) -> Self {
        GeolocationConfig::Fixed { latitude: coords.latitude, longitude: coords.longitude }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Optional default provider id, e.g. "rapidapi" or "weatherapi".
    pub default_provider: Option<String>,

    pub default_unit: DisplayUnit,
    pub default_theme: ThemeMode,
    pub forecast_days: u8,
    pub timeout_secs: u64,
    pub geolocation: GeolocationConfig,

    /// Example TOML:
    /// [providers.rapidapi]
    /// api_key = "..."
    /// api_host = "weatherapi-com.p.rapidapi.com"
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            default_unit: DisplayUnit::default(),
            default_theme: ThemeMode::default(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            geolocation: GeolocationConfig::default(),
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow!(
                "No default provider configured.\n\
                 Hint: run `skycast configure <provider>` (e.g. `skycast configure rapidapi`) first."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        cfg.clamp_forecast_days();

        Ok(cfg)
    }

    /// Pull `forecast_days` into `1..=MAX_FORECAST_DAYS`.
    pub fn clamp_forecast_days(&mut self) {
        let clamped = self.forecast_days.clamp(1, MAX_FORECAST_DAYS);
        if clamped != self.forecast_days {
            tracing::warn!(
                configured = self.forecast_days,
                used = clamped,
                "forecast_days out of range"
            );
            self.forecast_days = clamped;
        }
    }

    /// Save config to `path`, creating parent directories as needed.
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

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key and set the default provider if none is set.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.api_key = api_key.clone())
            .or_insert_with(|| ProviderConfig::new(api_key));

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some_and(|key| !key.is_empty())
    }

    /// Apply [`API_KEY_ENV`] and [`API_HOST_ENV`] to the default provider.
    pub fn apply_env(&mut self) {
        let key = std::env::var(API_KEY_ENV).ok().filter(|v| !v.is_empty());
        let host = std::env::var(API_HOST_ENV).ok().filter(|v| !v.is_empty());
        self.apply_overrides(key, host);
    }

    /// Override credentials of the default provider, falling back to RapidAPI
    /// when no default is configured yet.
    pub fn apply_overrides(&mut self, api_key: Option<String>, api_host: Option<String>) {
        if api_key.is_none() && api_host.is_none() {
            return;
        }

        let id = self.default_provider_id().unwrap_or(ProviderId::RapidApi);
        let entry = self
            .providers
            .entry(id.as_str().to_string())
            .or_insert_with(|| ProviderConfig::new(String::new()));

        if let Some(key) = api_key {
            tracing::debug!(provider = %id, "API key taken from environment");
            entry.api_key = key;
        }
        if let Some(host) = api_host {
            entry.api_host = Some(host);
        }

        if self.default_provider.is_none() {
            self.set_default_provider(id);
        }
    }
}
