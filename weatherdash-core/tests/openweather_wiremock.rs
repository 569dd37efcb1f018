//! Tests for the OpenWeather client and the dashboard against a mock provider.

use chrono::{DateTime, Local};
use std::time::Duration;
use tempfile::TempDir;
use weatherdash_core::{
    Dashboard, DashboardError, JsonFileHistory, Location, OpenWeatherProvider, WeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.35, "lat": 48.85 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 18.5, "feels_like": 17.8, "pressure": 1015, "humidity": 60 },
        "wind": { "speed": 3.2, "deg": 240 },
        "dt": 1_714_557_600,
        "name": "Paris",
        "cod": 200
    })
}

/// `n` readings, three hours apart.
fn forecast_response(n: usize, start: i64) -> serde_json::Value {
    let list: Vec<_> = (0..n)
        .map(|i| {
            let description = if i % 2 == 0 { "light rain" } else { "overcast clouds" };
            serde_json::json!({
                "dt": start + (i as i64) * 3 * 3600,
                "main": { "temp": 10.0 + i as f64, "humidity": 70 },
                "weather": [{ "description": description }],
                "wind": { "speed": 4.0 }
            })
        })
        .collect();

    serde_json::json!({ "cod": "200", "cnt": n, "list": list, "city": { "name": "Paris", "country": "FR" } })
}

fn local_date(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .unwrap()
        .with_timezone(&Local)
        .date_naive()
        .to_string()
}

fn create_client(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new(Some("TEST_KEY".into()), server.uri(), Duration::from_secs(5))
        .expect("Failed to create client")
}

fn paris() -> Location {
    Location::parse("Paris").unwrap()
}

// ============================================================================
// Current conditions
// ============================================================================

#[tokio::test]
async fn current_sends_expected_query_and_maps_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response()))
        .expect(1)
        .mount(&server)
        .await;

    let current = create_client(&server).fetch_current(&paris()).await.unwrap();

    assert_eq!(current.city, "Paris");
    assert_eq!(current.temperature_c, 18.5);
    assert_eq!(current.description, "clear sky");
    assert_eq!(current.humidity_pct, 60);
    assert_eq!(current.wind_speed_mps, 3.2);
}

#[tokio::test]
async fn current_non_success_status_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = create_client(&server).fetch_current(&paris()).await.unwrap_err();

    assert!(err.is_fetch());
    let msg = err.to_string();
    assert!(msg.contains("404"));
    assert!(msg.contains("city not found"));
}

#[tokio::test]
async fn current_invalid_json_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = create_client(&server).fetch_current(&paris()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse OpenWeather current JSON"));
}

#[tokio::test]
async fn missing_key_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response()))
        .expect(0)
        .mount(&server)
        .await;

    let client = OpenWeatherProvider::new(None, server.uri(), Duration::from_secs(5)).unwrap();
    let err = client.fetch_current(&paris()).await.unwrap_err();

    assert!(matches!(err, DashboardError::Fetch(_)));
    assert!(err.to_string().contains("No credential configured"));
}

#[tokio::test]
async fn submission_without_key_reports_fetch_errors_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response()))
        .expect(0)
        .mount(&server)
        .await;

    let client = OpenWeatherProvider::new(None, server.uri(), Duration::from_secs(5)).unwrap();
    let dir = TempDir::new().unwrap();
    let history = JsonFileHistory::new(dir.path().join("searches.json"));
    let dash = Dashboard::new(Box::new(client), Box::new(history));

    let out = dash.submit("Paris").await.unwrap();

    assert_eq!(out.errors.len(), 2);
    assert!(out.errors.iter().all(DashboardError::is_fetch));
    assert!(
        !out.errors
            .iter()
            .any(|e| matches!(e, DashboardError::Configuration(_)))
    );
    assert_eq!(dash.recent_searches().unwrap()[0].location, "Paris");
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn forecast_samples_one_reading_per_day() {
    let server = MockServer::start().await;
    let start = 1_714_564_800; // 2024-05-01T12:00:00Z
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response(40, start)))
        .mount(&server)
        .await;

    let forecast = create_client(&server).fetch_forecast(&paris()).await.unwrap();

    assert_eq!(forecast.len(), 5);
    for (day, entry) in forecast.iter().enumerate() {
        let raw = day * 8;
        assert_eq!(entry.temperature_c, 10.0 + raw as f64);
        assert_eq!(entry.description, "light rain");
        assert_eq!(entry.date.to_string(), local_date(start + (raw as i64) * 3 * 3600));
    }
}

#[tokio::test]
async fn forecast_partial_feed_rounds_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(forecast_response(17, 1_714_564_800)),
        )
        .mount(&server)
        .await;

    let forecast = create_client(&server).fetch_forecast(&paris()).await.unwrap();
    assert_eq!(forecast.len(), 3);
}

#[tokio::test]
async fn forecast_server_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = create_client(&server).fetch_forecast(&paris()).await.unwrap_err();
    assert!(err.is_fetch());
    assert!(err.to_string().contains("503"));
}

// ============================================================================
// Dashboard end to end
// ============================================================================

#[tokio::test]
async fn dashboard_records_search_and_renders_both_sections() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(forecast_response(40, 1_714_564_800)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let history = JsonFileHistory::new(dir.path().join("searches.json"));
    let dash = Dashboard::new(Box::new(create_client(&server)), Box::new(history));

    let out = dash.submit("Paris").await.unwrap();

    assert!(out.errors.is_empty());
    assert_eq!(out.current.unwrap().city, "Paris");
    assert_eq!(out.forecast.unwrap().len(), 5);
    assert_eq!(dash.recent_searches().unwrap()[0].location, "Paris");
}

#[tokio::test]
async fn transport_error_on_current_still_attempts_forecast() {
    let server = MockServer::start().await;
    // Current conditions never answer within the client timeout.
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_response())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(forecast_response(8, 1_714_564_800)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client =
        OpenWeatherProvider::new(Some("TEST_KEY".into()), server.uri(), Duration::from_millis(500))
            .unwrap();
    let dir = TempDir::new().unwrap();
    let history = JsonFileHistory::new(dir.path().join("searches.json"));
    let dash = Dashboard::new(Box::new(client), Box::new(history));

    let out = dash.submit("Paris").await.unwrap();

    assert!(out.current.is_none());
    assert_eq!(out.forecast.map(|f| f.len()), Some(1));
    assert_eq!(out.errors.len(), 1);
    assert!(out.errors[0].to_string().contains("Failed to send request"));
}

#[tokio::test]
async fn six_submissions_keep_the_last_five() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let history = JsonFileHistory::new(dir.path().join("searches.json"));
    let dash = Dashboard::new(Box::new(create_client(&server)), Box::new(history));

    for city in ["Oslo", "Rome", "Lima", "Kyiv", "Pune", "Cork"] {
        dash.submit(city).await.unwrap();
    }

    let recent: Vec<String> = dash
        .recent_searches()
        .unwrap()
        .into_iter()
        .map(|r| r.location)
        .collect();
    assert_eq!(recent, vec!["Rome", "Lima", "Kyiv", "Pune", "Cork"]);
}
