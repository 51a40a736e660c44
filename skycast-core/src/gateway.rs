use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::model::{City, WeatherSnapshot};

/// Result cap used when the user does not ask for a specific one.
pub const DEFAULT_RESULT_LIMIT: u32 = 5;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Central London. Only used to probe whether a candidate API key works.
const KEY_PROBE_COORD: (f64, f64) = (51.5073, -0.1277);

/// Boundary to the remote weather service. Workflows depend on this trait so
/// tests can substitute a canned implementation.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    /// Geocode a free-form `"name[, state][, country]"` query.
    ///
    /// `Ok` with an empty vec means the service answered but found no match;
    /// callers must treat that separately from `Err` (transport failure,
    /// timeout, or non-success status).
    async fn search_cities(&self, query: &str, limit: u32) -> Result<Vec<City>>;

    /// Current weather at a coordinate, in imperial units.
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot>;

    /// True only when a probe request with this gateway's key succeeds.
    /// Transport failures and non-success statuses both read as false.
    async fn validate_key(&self) -> bool;
}

/// [`WeatherGateway`] backed by the OpenWeather HTTP API.
///
/// No retries and no backoff: every request either succeeds or fails once
/// within the 10-second timeout.
#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL)
    }

    /// Point the gateway at a different host. Used by tests.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, base_url: base_url.into(), http })
    }

    fn geocoding_url(&self) -> String {
        format!("{}/geo/1.0/direct", self.base_url)
    }

    fn weather_url(&self) -> String {
        format!("{}/data/2.5/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn search_cities(&self, query: &str, limit: u32) -> Result<Vec<City>> {
        debug!(query, limit, "requesting geocoding candidates");

        let limit = limit.to_string();
        let res = self
            .http
            .get(self.geocoding_url())
            .query(&[("q", query), ("limit", limit.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to the OpenWeather geocoding endpoint")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse geocoding JSON")
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot> {
        debug!(lat, lon, "requesting current weather");

        let lat = lat.to_string();
        let lon = lon.to_string();
        let res = self
            .http
            .get(self.weather_url())
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "imperial"),
            ])
            .send()
            .await
            .context("Failed to send request to the OpenWeather current-weather endpoint")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read current-weather response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Current-weather request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        snapshot_from_body(&body)
    }

    async fn validate_key(&self) -> bool {
        let (lat, lon) = KEY_PROBE_COORD;
        let lat = lat.to_string();
        let lon = lon.to_string();

        let res = self
            .http
            .get(self.weather_url())
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await;

        match res {
            Ok(res) => res.status().is_success(),
            Err(err) => {
                debug!(error = %err, "API key probe did not reach OpenWeather");
                false
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn snapshot_from_body(body: &str) -> Result<WeatherSnapshot> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse current-weather JSON")?;

    let description = parsed
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(WeatherSnapshot {
        description,
        temp_f: parsed.main.temp,
        feels_like_f: parsed.main.feels_like,
        wind_mph: parsed.wind.speed,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
