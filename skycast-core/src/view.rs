//! The single state owner behind the weather screen.
//!
//! `WeatherView` holds the query field, display toggles and the outcome of
//! the last applied fetch. Fetches are stamped with a generation number when
//! issued; a completion is applied only if it belongs to the newest fetch,
//! so a slow response can never overwrite a newer one.

use chrono::NaiveDate;

use crate::{
    error::{FetchError, LocationError},
    model::{BackgroundTheme, Coordinates, DisplayUnit, Query, ThemeMode, WeatherReport},
};

pub const TITLE: &str = "SkyCast";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherState {
    #[default]
    NoData,
    Loaded(WeatherReport),
    Errored(String),
}

/// A fetch the caller must perform and report back through
/// [`WeatherView::complete_fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryEdit {
    Insert(char),
    Backspace,
    Clear,
    Replace(String),
}

#[derive(Debug, Clone, Default)]
pub struct WeatherView {
    query: String,
    unit: DisplayUnit,
    theme: ThemeMode,
    state: WeatherState,
    latest_generation: u64,
    in_flight: usize,
}

impl WeatherView {
    pub fn new(unit: DisplayUnit, theme: ThemeMode) -> Self {
        Self { unit, theme, ..Self::default() }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.state {
            WeatherState::Loaded(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            WeatherState::Errored(msg) => Some(msg),
            _ => None,
        }
    }

    /// Number of issued fetches that have not completed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn edit_query(&mut self, edit: QueryEdit) {
        match edit {
            QueryEdit::Insert(c) => self.query.push(c),
            QueryEdit::Backspace => {
                self.query.pop();
            }
            QueryEdit::Clear => self.query.clear(),
            QueryEdit::Replace(text) => self.query = text,
        }
    }

    /// Issue a fetch for the query field, unless it is blank.
    pub fn handle_search(&mut self) -> Option<FetchTicket> {
        let query = Query::parse(&self.query)?;
        Some(self.begin_fetch(query))
    }

    pub fn begin_fetch(&mut self, query: Query) -> FetchTicket {
        self.latest_generation += 1;
        self.in_flight += 1;
        tracing::debug!(generation = self.latest_generation, %query, "fetch issued");
        FetchTicket { generation: self.latest_generation, query }
    }

    /// Startup geolocation outcome. Failure leaves the view waiting for a
    /// manual search. A fix that arrives after any fetch was issued is ignored.
    pub fn on_located(
        &mut self,
        location: Result<Coordinates, LocationError>,
    ) -> Option<FetchTicket> {
        if self.latest_generation > 0 {
            tracing::debug!("location arrived after a fetch was issued, ignoring");
            return None;
        }

        match location {
            Ok(coords) => {
                tracing::info!(coords.latitude, coords.longitude, "device located");
                Some(self.begin_fetch(Query::from_coordinates(coords)))
            }
            Err(err) => {
                tracing::warn!(error = %err, "geolocation failed, waiting for manual search");
                None
            }
        }
    }

    /// Apply a fetch outcome. Returns `false` when a newer fetch has been
    /// issued since, in which case the outcome is dropped.
    pub fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<WeatherReport, FetchError>,
    ) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if generation != self.latest_generation {
            tracing::debug!(
                generation,
                latest = self.latest_generation,
                "dropping stale fetch result"
            );
            return false;
        }

        self.state = match result {
            Ok(report) => {
                tracing::info!(
                    location = %report.snapshot.location_name,
                    days = report.forecast.len(),
                    "weather loaded"
                );
                WeatherState::Loaded(report)
            }
            Err(err) => {
                tracing::warn!(error = %err, "weather fetch failed");
                WeatherState::Errored(err.user_message().to_string())
            }
        };
        true
    }

    pub fn convert_temp(&self, celsius: f64) -> f64 {
        self.unit.convert(celsius)
    }

    pub fn background(&self) -> BackgroundTheme {
        self.report()
            .map(|r| BackgroundTheme::from_condition(&r.snapshot.condition_text))
            .unwrap_or(BackgroundTheme::Clear)
    }

    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    fn format_temp(&self, celsius: f64) -> String {
        format!("{:.1}{}", self.convert_temp(celsius), self.unit.symbol())
    }

    /// Everything a renderer needs, with temperatures already converted.
    pub fn screen(&self) -> Screen {
        let current = self.report().map(|r| {
            let s = &r.snapshot;
            CurrentPanel {
                heading: format!("{}, {}", s.location_name, s.country),
                local_time: s.local_time.clone(),
                temperature: self.format_temp(s.current_temp_c),
                condition: s.condition_text.clone(),
                icon_url: s.condition_icon_url.clone(),
            }
        });

        let forecast = self
            .report()
            .map(|r| {
                r.forecast
                    .iter()
                    .map(|day| ForecastCard {
                        key: day.date,
                        date_label: day.date.format("%a %Y-%m-%d").to_string(),
                        icon_url: day.condition_icon_url.clone(),
                        temperature: self.format_temp(day.avg_temp_c),
                        condition: day.condition_text.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Screen {
            title: TITLE,
            query: self.query.clone(),
            unit: self.unit,
            unit_toggle_label: self.unit.toggled().symbol(),
            theme: self.theme,
            theme_toggle_label: match self.theme {
                ThemeMode::Light => "Dark",
                ThemeMode::Dark => "Light",
            },
            background: self.background(),
            error: self.error().map(str::to_string),
            current,
            forecast,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub title: &'static str,
    pub query: String,
    pub unit: DisplayUnit,
    /// The unit a toggle would switch to.
    pub unit_toggle_label: &'static str,
    pub theme: ThemeMode,
    pub theme_toggle_label: &'static str,
    pub background: BackgroundTheme,
    pub error: Option<String>,
    pub current: Option<CurrentPanel>,
    pub forecast: Vec<ForecastCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPanel {
    pub heading: String,
    pub local_time: String,
    pub temperature: String,
    pub condition: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    /// Unique within one report.
    pub key: NaiveDate,
    pub date_label: String,
    pub icon_url: String,
    pub temperature: String,
    pub condition: String,
}
