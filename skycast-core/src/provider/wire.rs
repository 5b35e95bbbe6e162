//! WeatherAPI.com `forecast.json` payload, shared by every provider that
//! fronts that API.

use chrono::NaiveDate;
use reqwest::Response;
use serde::Deserialize;
use std::collections::HashSet;

use crate::{
    config::MAX_FORECAST_DAYS,
    error::FetchError,
    model::{ForecastDay, WeatherReport, WeatherSnapshot},
};

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

/// Check the status, then decode the body into a report.
pub(super) async fn read_report(res: Response, days: u8) -> Result<WeatherReport, FetchError> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(FetchError::Status { status, body: truncate_body(&body) });
    }

    decode_report(&body, days)
}

pub(super) fn decode_report(body: &str, days: u8) -> Result<WeatherReport, FetchError> {
    let parsed: WaForecastResponse = serde_json::from_str(body)?;

    let days = usize::from(days.min(MAX_FORECAST_DAYS));
    let mut seen = HashSet::new();
    let mut forecast = Vec::with_capacity(days);
    for entry in parsed.forecast.forecastday.into_iter().take(days) {
        if !seen.insert(entry.date) {
            return Err(FetchError::Malformed(format!("forecast repeats date {}", entry.date)));
        }
        forecast.push(ForecastDay {
            date: entry.date,
            avg_temp_c: entry.day.avgtemp_c,
            condition_text: entry.day.condition.text,
            condition_icon_url: icon_url(&entry.day.condition.icon),
        });
    }

    let snapshot = WeatherSnapshot {
        location_name: parsed.location.name,
        country: parsed.location.country,
        local_time: parsed.location.localtime,
        current_temp_c: parsed.current.temp_c,
        condition_text: parsed.current.condition.text,
        condition_icon_url: icon_url(&parsed.current.condition.icon),
    };

    Ok(WeatherReport { snapshot, forecast })
}

/// The API hands out protocol-relative icon links.
fn icon_url(raw: &str) -> String {
    if raw.starts_with("//") { format!("https:{raw}") } else { raw.to_string() }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
