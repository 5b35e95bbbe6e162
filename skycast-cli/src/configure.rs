//! Interactive `skycast configure <provider>`.

use anyhow::Result;
use inquire::{Confirm, CustomType, Password, Select, Text};
use std::path::Path;

use skycast_core::{
    Config, Coordinates, DisplayUnit, GeolocationConfig, ProviderId, config::DEFAULT_RAPIDAPI_HOST,
};

/// Everything the prompts collect.
#[derive(Debug, Clone, PartialEq)]
pub struct Answers {
    pub provider: ProviderId,
    pub api_key: String,
    pub api_host: Option<String>,
    pub make_default: bool,
    pub unit: DisplayUnit,
    pub geolocation: GeolocationConfig,
}

pub fn run(path: &Path, mut config: Config, provider: &str) -> Result<()> {
    let provider = ProviderId::try_from(provider)?;
    if let Some(notice) = replacement_notice(&config, provider) {
        println!("{notice}");
    }
    let answers = prompt(&config, provider)?;

    apply(&mut config, answers);
    config.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Heads-up shown before an existing key gets overwritten.
fn replacement_notice(config: &Config, provider: ProviderId) -> Option<String> {
    config
        .is_provider_configured(provider)
        .then(|| format!("An API key for {provider} is already configured; it will be replaced."))
}

fn prompt(config: &Config, provider: ProviderId) -> Result<Answers> {
    let api_key = Password::new(&format!("API key for {provider}:"))
        .without_confirmation()
        .prompt()?;

    let api_host = match provider {
        ProviderId::RapidApi => {
            let current = config
                .provider_config(provider)
                .and_then(|cfg| cfg.api_host.clone())
                .unwrap_or_else(|| DEFAULT_RAPIDAPI_HOST.to_string());
            Some(Text::new("RapidAPI host:").with_default(&current).prompt()?)
        }
        ProviderId::WeatherApi => None,
    };

    let make_default = Confirm::new(&format!("Use {provider} as the default provider?"))
        .with_default(true)
        .prompt()?;

    let units = vec!["Celsius", "Fahrenheit"];
    let start = match config.default_unit {
        DisplayUnit::Celsius => 0,
        DisplayUnit::Fahrenheit => 1,
    };
    let unit = match Select::new("Default temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()?
    {
        "Fahrenheit" => DisplayUnit::Fahrenheit,
        _ => DisplayUnit::Celsius,
    };

    let modes = vec!["Look up by IP address", "Fixed coordinates", "Off"];
    let geolocation = match Select::new("Startup location:", modes).prompt()? {
        "Fixed coordinates" => {
            let latitude = CustomType::<f64>::new("Latitude:").prompt()?;
            let longitude = CustomType::<f64>::new("Longitude:").prompt()?;
            GeolocationConfig::fixed(Coordinates { latitude, longitude })
        }
        "Off" => GeolocationConfig::Off,
        _ => GeolocationConfig::Ip { lookup_url: None },
    };

    Ok(Answers { provider, api_key, api_host, make_default, unit, geolocation })
}

pub fn apply(config: &mut Config, answers: Answers) {
    config.upsert_provider_api_key(answers.provider, answers.api_key.trim().to_string());

    if let Some(host) = answers.api_host.filter(|h| !h.trim().is_empty()) {
        if let Some(entry) = config.providers.get_mut(answers.provider.as_str()) {
            entry.api_host = Some(host.trim().to_string());
        }
    }

    if answers.make_default {
        config.set_default_provider(answers.provider);
    }
    config.default_unit = answers.unit;
    config.geolocation = answers.geolocation;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(provider: ProviderId) -> Answers {
        Answers {
            provider,
            api_key: "  secret \n".into(),
            api_host: Some("weatherapi-com.p.rapidapi.com".into()),
            make_default: true,
            unit: DisplayUnit::Fahrenheit,
            geolocation: GeolocationConfig::Off,
        }
    }

    #[test]
    fn apply_stores_trimmed_key_and_preferences() {
        let mut cfg = Config::default();
        apply(&mut cfg, answers(ProviderId::RapidApi));

        let rapid = cfg.provider_config(ProviderId::RapidApi).unwrap();
        assert_eq!(rapid.api_key, "secret");
        assert_eq!(rapid.api_host.as_deref(), Some("weatherapi-com.p.rapidapi.com"));
        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::RapidApi);
        assert_eq!(cfg.default_unit, DisplayUnit::Fahrenheit);
        assert_eq!(cfg.geolocation, GeolocationConfig::Off);
    }

    #[test]
    fn declining_default_keeps_existing_one() {
        let mut cfg = Config::default();
        apply(&mut cfg, answers(ProviderId::RapidApi));

        let mut second = answers(ProviderId::WeatherApi);
        second.make_default = false;
        second.api_host = None;
        apply(&mut cfg, second);

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::RapidApi);
        assert!(cfg.is_provider_configured(ProviderId::WeatherApi));
        assert!(cfg.provider_config(ProviderId::WeatherApi).unwrap().api_host.is_none());
    }

    #[test]
    fn notice_only_when_a_key_exists() {
        let mut cfg = Config::default();
        assert!(replacement_notice(&cfg, ProviderId::RapidApi).is_none());

        cfg.upsert_provider_api_key(ProviderId::RapidApi, String::new());
        assert!(replacement_notice(&cfg, ProviderId::RapidApi).is_none());

        apply(&mut cfg, answers(ProviderId::RapidApi));
        let notice = replacement_notice(&cfg, ProviderId::RapidApi).unwrap();
        assert!(notice.contains("rapidapi"));
        assert_eq!(cfg.provider_api_key(ProviderId::RapidApi), Some("secret"));
        assert!(replacement_notice(&cfg, ProviderId::WeatherApi).is_none());
    }

    #[test]
    fn applied_config_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        apply(&mut cfg, answers(ProviderId::WeatherApi));
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }
}
