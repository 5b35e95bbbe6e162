use crate::{
    Config,
    error::FetchError,
    model::{Query, WeatherReport},
    provider::{rapidapi::RapidApiProvider, weatherapi::WeatherApiProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod rapidapi;
pub mod weatherapi;
mod wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    RapidApi,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::RapidApi => "rapidapi",
            ProviderId::WeatherApi => "weatherapi",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "rapidapi" => Ok(ProviderId::RapidApi),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: rapidapi, weatherapi."
            )),
        }
    }
}

/// Source of current conditions plus a daily forecast.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &Query, days: u8) -> Result<WeatherReport, FetchError>;
}

/// Shared HTTP client with the configured request timeout.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider_cfg = config
        .provider_config(id)
        .filter(|cfg| !cfg.api_key.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API key configured for provider '{id}'.\n\
                 Hint: run `skycast configure {id}` and enter your API key."
            )
        })?;

    let http = http_client(Duration::from_secs(config.timeout_secs))
        .context("Failed to build HTTP client")?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::RapidApi => {
            let mut provider = RapidApiProvider::new(
                provider_cfg.api_key.clone(),
                provider_cfg.api_host.clone(),
                http,
            );
            if let Some(url) = &provider_cfg.base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
        ProviderId::WeatherApi => {
            let mut provider = WeatherApiProvider::new(provider_cfg.api_key.clone(), http);
            if let Some(url) = &provider_cfg.base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
    };

    tracing::debug!(provider = %id, "weather provider ready");
    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in [ProviderId::RapidApi, ProviderId::WeatherApi] {
            let parsed = ProviderId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(id, parsed);
        }
        assert_eq!(ProviderId::try_from("RapidAPI").unwrap(), ProviderId::RapidApi);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("openweather").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::RapidApi, &cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn provider_from_config_errors_when_api_key_empty() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, String::new());
        assert!(provider_from_config(ProviderId::WeatherApi, &cfg).is_err());
    }

    #[test]
    fn default_provider_from_config_errors_when_not_set() {
        let cfg = Config::default();
        let err = default_provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No default provider configured"));
        assert!(msg.contains("Hint: run `skycast configure"));
    }

    #[test]
    fn default_provider_from_config_works_when_set_and_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::RapidApi, "KEY".to_string());

        assert!(default_provider_from_config(&cfg).is_ok());
    }
}
