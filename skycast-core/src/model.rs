use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location text sent to the weather API: a city name or `"lat,lon"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Returns `None` when the input is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    pub fn from_coordinates(coords: Coordinates) -> Self {
        Self(format!("{},{}", coords.latitude, coords.longitude))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    /// Local time at the location, verbatim from the API (`YYYY-MM-DD H:MM`).
    pub local_time: String,
    pub current_temp_c: f64,
    pub condition_text: String,
    pub condition_icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub avg_temp_c: f64,
    pub condition_text: String,
    pub condition_icon_url: String,
}

/// Result of one successful fetch. Snapshot and forecast are only ever
/// replaced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    pub fn toggled(self) -> Self {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            DisplayUnit::Celsius => celsius,
            DisplayUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "°C",
            DisplayUnit::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Backdrop derived from the current condition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundTheme {
    Rain,
    Cloudy,
    Snow,
    Thunder,
    Clear,
}

impl BackgroundTheme {
    /// First keyword found wins; order matters ("thunder rain" is Rain).
    const KEYWORDS: [(&'static str, BackgroundTheme); 4] = [
        ("rain", BackgroundTheme::Rain),
        ("cloud", BackgroundTheme::Cloudy),
        ("snow", BackgroundTheme::Snow),
        ("thunder", BackgroundTheme::Thunder),
    ];

    pub fn from_condition(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, theme)| *theme)
            .unwrap_or(BackgroundTheme::Clear)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundTheme::Rain => "rain",
            BackgroundTheme::Cloudy => "cloudy",
            BackgroundTheme::Snow => "snow",
            BackgroundTheme::Thunder => "thunder",
            BackgroundTheme::Clear => "clear",
        }
    }
}

impl fmt::Display for BackgroundTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
