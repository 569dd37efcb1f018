use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use weatherdash_core::{
    Config, Dashboard, DashboardError, JsonFileHistory, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather forecast dashboard")]
pub struct Cli {
    /// History file to use instead of the configured one.
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather and the 5-day forecast for a location.
    Show {
        /// City name or ZIP code, e.g. "New York" or "10001".
        #[arg(default_value = "New York")]
        location: String,
    },

    /// List recent searches.
    History,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location } => {
                let dash = build_dashboard(self.history)?;
                show(&dash, &location).await;
                print_recent(&dash);
                Ok(())
            }
            Command::History => {
                let dash = build_dashboard(self.history)?;
                print_recent(&dash);
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Resolve configuration, reporting (but not failing on) a missing credential.
fn build_dashboard(history_override: Option<PathBuf>) -> anyhow::Result<Dashboard> {
    let (mut config, config_err) = Config::resolve();
    if let Some(err) = config_err {
        report(&err);
    }
    if let Some(path) = history_override {
        config.history_path = path;
    }
    if let Err(err) = config.credential() {
        report(&err);
    }
    debug!(history = %config.history_path.display(), base_url = %config.base_url, "Resolved configuration");

    let provider = provider_from_config(&config)?;
    let history = JsonFileHistory::new(config.history_path);
    Ok(Dashboard::new(provider, Box::new(history)))
}

async fn show(dash: &Dashboard, location: &str) {
    let submission = match dash.submit(location).await {
        Ok(submission) => submission,
        Err(err) => {
            report(&err);
            return;
        }
    };

    for err in &submission.errors {
        report(err);
    }

    if let Some(current) = &submission.current {
        println!("{}", render::current(current));
    }

    if let Some(forecast) = submission.forecast.as_deref().filter(|f| !f.is_empty()) {
        println!("{}", render::forecast_table(forecast));
        println!("{}", render::temperature_chart(forecast));
    }
}

fn print_recent(dash: &Dashboard) {
    match dash.recent_searches() {
        Ok(records) if !records.is_empty() => println!("{}", render::recent_searches(&records)),
        Ok(_) => {}
        Err(err) => report(&err),
    }
}

fn report(err: &DashboardError) {
    eprintln!("Error: {err}");
}
