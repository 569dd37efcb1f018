//! Core library for the `weatherdash` terminal dashboard.
//!
//! This crate defines:
//! - Configuration & credential resolution
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - The file-backed recent-search history behind [`HistoryStore`]
//! - The [`Dashboard`] that ties one "Get Weather" pass together
//!
//! Rendering is left to the binary crate.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;

pub use config::Config;
pub use dashboard::{Dashboard, Submission};
pub use error::{DashboardError, Result};
pub use history::{HistoryStore, JsonFileHistory, MAX_HISTORY};
pub use model::{CurrentConditions, ForecastEntry, Location, SearchRecord};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
