//! Plain-text rendering of dashboard sections.

use weatherdash_core::{CurrentConditions, ForecastEntry, SearchRecord};

const CHART_WIDTH: usize = 40;

pub fn current(c: &CurrentConditions) -> String {
    format!(
        "Current Weather in {}\n\
         Temperature: {}°C\n\
         Description: {}\n\
         Humidity: {}%\n\
         Wind Speed: {} m/s\n",
        c.city,
        c.temperature_c,
        capitalize(&c.description),
        c.humidity_pct,
        c.wind_speed_mps,
    )
}

pub fn forecast_table(entries: &[ForecastEntry]) -> String {
    let desc_width = entries
        .iter()
        .map(|e| e.description.chars().count())
        .chain(std::iter::once("description".len()))
        .max()
        .unwrap_or_default();

    let header = [
        "5-Day Forecast".to_string(),
        format!("{:<10}  {:>11}  {:<desc_width$}", "date", "temperature", "description"),
        format!("{}  {}  {}", "-".repeat(10), "-".repeat(11), "-".repeat(desc_width)),
    ];
    let rows = entries.iter().map(|e| {
        format!(
            "{:<10}  {:>11.1}  {:<desc_width$}",
            e.date.format("%Y-%m-%d"),
            e.temperature_c,
            e.description,
        )
    });

    header.into_iter().chain(rows).map(|line| line + "\n").collect()
}

/// Horizontal bar per day, scaled between the coldest and warmest reading.
pub fn temperature_chart(entries: &[ForecastEntry]) -> String {
    let mut out = String::from("Temperature Trend\n");
    if entries.is_empty() {
        return out;
    }

    let (min, max) = entries.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
        (lo.min(e.temperature_c), hi.max(e.temperature_c))
    });
    let span = max - min;

    for e in entries {
        let len = if span > 0.0 {
            1 + (((e.temperature_c - min) / span) * (CHART_WIDTH - 1) as f64).round() as usize
        } else {
            CHART_WIDTH
        };
        out.push_str(&format!(
            "{}  {:<CHART_WIDTH$}  {:.1}°C\n",
            e.date.format("%Y-%m-%d"),
            "█".repeat(len),
            e.temperature_c,
        ));
    }
    out
}

pub fn recent_searches(records: &[SearchRecord]) -> String {
    let mut out = String::from("Recent Searches\n");
    for r in records {
        out.push_str(&format!(
            "- {} ({})\n",
            r.location,
            r.timestamp.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
