use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::DEFAULT_RAPIDAPI_HOST,
    error::FetchError,
    model::{Query, WeatherReport},
};

use super::{WeatherProvider, wire};

/// WeatherAPI.com served through the RapidAPI gateway.
#[derive(Debug, Clone)]
pub struct RapidApiProvider {
    api_key: String,
    api_host: String,
    base_url: String,
    http: Client,
}

impl RapidApiProvider {
    pub fn new(api_key: String, api_host: Option<String>, http: Client) -> Self {
        let api_host = api_host.unwrap_or_else(|| DEFAULT_RAPIDAPI_HOST.to_string());
        let base_url = format!("https://{api_host}");
        Self { api_key, api_host, base_url, http }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl WeatherProvider for RapidApiProvider {
    async fn fetch(&self, query: &Query, days: u8) -> Result<WeatherReport, FetchError> {
        let url = format!("{}/forecast.json", self.base_url);
        tracing::debug!(%url, %query, days, "requesting forecast from RapidAPI");

        let day_count = days.to_string();
        let res = self
            .http
            .get(&url)
            .query(&[("q", query.as_str()), ("days", day_count.as_str())])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .send()
            .await?;

        wire::read_report(res, days).await
    }
}
