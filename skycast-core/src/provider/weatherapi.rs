use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::FetchError,
    model::{Query, WeatherReport},
};

use super::{WeatherProvider, wire};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// WeatherAPI.com called directly with a `key` query parameter.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, http: Client) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, query: &Query, days: u8) -> Result<WeatherReport, FetchError> {
        let url = format!("{}/forecast.json", self.base_url);
        tracing::debug!(%url, %query, days, "requesting forecast from WeatherAPI.com");

        let day_count = days.to_string();
        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query.as_str()),
                ("days", day_count.as_str()),
            ])
            .send()
            .await?;

        wire::read_report(res, days).await
    }
}
