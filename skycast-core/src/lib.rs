//! Core library for the `skycast` weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers and location sources
//! - The view state machine and the session that drives it
//!
//! It is used by `skycast-cli`, but holds no terminal code so other front
//! ends can reuse it.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

/// Canned reports for tests, here and in dependent crates.
#[cfg(any(test, feature = "test-util"))]
pub mod fixtures;

pub use config::{Config, GeolocationConfig, ProviderConfig};
pub use error::{FETCH_ERROR_MESSAGE, FetchError, LocationError};
pub use geolocation::{Geolocator, geolocator_from_config};
pub use model::{
    BackgroundTheme, Coordinates, DisplayUnit, ForecastDay, Query, ThemeMode, WeatherReport,
    WeatherSnapshot,
};
pub use provider::{ProviderId, WeatherProvider, default_provider_from_config};
pub use session::{Action, Event, Flow, Session};
pub use view::{QueryEdit, Screen, WeatherView};
