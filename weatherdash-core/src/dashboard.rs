//! One pass of "Get Weather": record the search, then fetch current conditions
//! and the forecast. Each step's failure is collected instead of aborting the pass.

use tracing::{info, warn};

use crate::{
    error::{DashboardError, Result},
    history::HistoryStore,
    model::{CurrentConditions, ForecastEntry, Location, SearchRecord},
    provider::WeatherProvider,
};

/// Outcome of a single submission.
///
/// A missing section (`None`) always has a matching entry in `errors`.
#[derive(Debug, Default)]
pub struct Submission {
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Vec<ForecastEntry>>,
    pub errors: Vec<DashboardError>,
}

#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    history: Box<dyn HistoryStore>,
}

impl Dashboard {
    pub fn new(provider: Box<dyn WeatherProvider>, history: Box<dyn HistoryStore>) -> Self {
        Self { provider, history }
    }

    /// Run the submission pipeline for a raw user input.
    ///
    /// Only an empty location fails the whole call; nothing is recorded or
    /// fetched in that case.
    pub async fn submit(&self, raw_location: &str) -> Result<Submission> {
        let location = Location::parse(raw_location)?;
        info!(%location, "Weather requested");

        let mut submission = Submission::default();

        if let Err(e) = self.history.append(&location) {
            warn!(error = %e, "Search was not recorded");
            submission.errors.push(e);
        }

        match self.provider.fetch_current(&location).await {
            Ok(current) => submission.current = Some(current),
            Err(e) => {
                warn!(error = %e, "Current conditions unavailable");
                submission.errors.push(e);
            }
        }

        match self.provider.fetch_forecast(&location).await {
            Ok(forecast) => submission.forecast = Some(forecast),
            Err(e) => {
                warn!(error = %e, "Forecast unavailable");
                submission.errors.push(e);
            }
        }

        Ok(submission)
    }

    /// Stored searches, oldest first.
    pub fn recent_searches(&self) -> Result<Vec<SearchRecord>> {
        self.history.read_all()
    }
}
