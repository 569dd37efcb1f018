use crate::{
    Config,
    error::Result,
    model::{CurrentConditions, ForecastEntry, Location},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current conditions and daily forecasts.
///
/// Implementations keep no state between calls beyond their HTTP client.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, location: &Location) -> Result<CurrentConditions>;

    /// One entry per sampled day, in provider order.
    async fn fetch_forecast(&self, location: &Location) -> Result<Vec<ForecastEntry>>;
}

/// Construct the provider described by `config`.
///
/// A missing API key does not fail here: the provider is still built and
/// reports the missing credential on every fetch.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}
