use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    Config,
    error::{DashboardError, Result},
    model::{CurrentConditions, ForecastEntry, Location},
};

use super::WeatherProvider;

/// The forecast feed has one reading every 3 hours; every 8th one gives one per day.
const FORECAST_STRIDE: usize = 8;

/// Client for the OpenWeatherMap `weather` and `forecast` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: base_url.into(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.credential().ok().map(str::to_owned),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// The missing-key configuration error is reported once at startup; each
    /// request made without a key fails as a fetch.
    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            DashboardError::Fetch("No credential configured for OpenWeather".into())
        })
    }

    /// GET `{base_url}/{endpoint}` with the standard query and return the raw body.
    async fn get_body(&self, endpoint: &str, location: &Location) -> Result<String> {
        let api_key = self.api_key()?;
        let url = format!("{}/{endpoint}", self.base_url.trim_end_matches('/'));
        debug!(%url, "Requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                DashboardError::Fetch(format!("Failed to send request to OpenWeather ({endpoint}): {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            DashboardError::Fetch(format!("Failed to read OpenWeather {endpoint} response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(DashboardError::Fetch(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip_all, fields(location = %location))]
    async fn fetch_current(&self, location: &Location) -> Result<CurrentConditions> {
        let body = self.get_body("weather", location).await?;
        parse_current(&body)
    }

    #[instrument(skip_all, fields(location = %location))]
    async fn fetch_forecast(&self, location: &Location) -> Result<Vec<ForecastEntry>> {
        let body = self.get_body("forecast", location).await?;
        let entries = parse_forecast(&body, &Local)?;
        debug!(days = entries.len(), "Sampled forecast");
        Ok(entries)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    humidity: u8,
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
    name: String,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn parse_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| DashboardError::Fetch(format!("Failed to parse OpenWeather {what} JSON: {e}")))
}

fn first_description(weather: &[OwWeather], what: &str) -> Result<String> {
    weather
        .first()
        .map(|w| w.description.clone())
        .ok_or_else(|| DashboardError::Fetch(format!("OpenWeather {what} response has no weather entry")))
}

pub(crate) fn parse_current(body: &str) -> Result<CurrentConditions> {
    let parsed: OwCurrentResponse = parse_json(body, "current")?;
    let description = first_description(&parsed.weather, "current")?;

    Ok(CurrentConditions {
        city: parsed.name,
        temperature_c: parsed.main.temp,
        description,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
    })
}

/// Sample every 8th reading (starting with the first) and date it in `tz`.
pub(crate) fn parse_forecast<Tz: TimeZone>(body: &str, tz: &Tz) -> Result<Vec<ForecastEntry>> {
    let parsed: OwForecastResponse = parse_json(body, "forecast")?;

    parsed
        .list
        .iter()
        .step_by(FORECAST_STRIDE)
        .map(|entry| -> Result<ForecastEntry> {
            Ok(ForecastEntry {
                date: unix_to_date(entry.dt, tz)?,
                temperature_c: entry.main.temp,
                description: first_description(&entry.weather, "forecast")?,
            })
        })
        .collect()
}

fn unix_to_date<Tz: TimeZone>(ts: i64, tz: &Tz) -> Result<NaiveDate> {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(tz).date_naive())
        .ok_or_else(|| DashboardError::Fetch(format!("OpenWeather returned an invalid timestamp: {ts}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
