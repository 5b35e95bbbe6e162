//! One-shot location sources used at startup.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::{
    config::{Config, GeolocationConfig},
    error::LocationError,
    model::Coordinates,
    provider::http_client,
};

const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json";

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Approximates the device position from its public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    lookup_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpGeolocator {
    pub fn new(lookup_url: Option<String>, http: Client) -> Self {
        Self { lookup_url: lookup_url.unwrap_or_else(|| DEFAULT_IP_LOOKUP_URL.to_string()), http }
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let res = self.http.get(&self.lookup_url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!("lookup returned status {status}")));
        }

        let body: IpLookupResponse = res.json().await?;
        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            return Err(LocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates { latitude, longitude }),
            _ => Err(LocationError::Unavailable("lookup returned no coordinates".to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Disabled)
    }
}

pub fn geolocator_from_config(config: &Config) -> anyhow::Result<Box<dyn Geolocator>> {
    let boxed: Box<dyn Geolocator> = match &config.geolocation {
        GeolocationConfig::Ip { lookup_url } => {
            let http = http_client(Duration::from_secs(config.timeout_secs))
                .context("Failed to build HTTP client")?;
            Box::new(IpGeolocator::new(lookup_url.clone(), http))
        }
        GeolocationConfig::Fixed { latitude, longitude } => {
            Box::new(FixedGeolocator(Coordinates { latitude: *latitude, longitude: *longitude }))
        }
        GeolocationConfig::Off => Box::new(DisabledGeolocator),
    };
    Ok(boxed)
}
