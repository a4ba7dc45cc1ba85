//! Forecast client tests against a local mock of the Weatherbit API.

use chrono::NaiveDate;
use mockito::Matcher;

use itinerary_optimizer::model::{Coordinate, WeatherCondition};
use itinerary_optimizer::traits::ForecastSource;
use itinerary_optimizer::weatherbit::{WeatherbitClient, WeatherbitConfig};
use itinerary_optimizer::PlanError;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn client_for(server: &mockito::ServerGuard) -> WeatherbitClient {
    WeatherbitClient::new(WeatherbitConfig {
        base_url: server.url(),
        api_key: "test-key".to_string(),
        ..WeatherbitConfig::default()
    })
    .expect("build client")
}

const FORECAST: &str = r#"{
  "city_name": "Hanoi",
  "data": [
    {"valid_date": "2025-06-01", "temp": 30.5, "max_temp": 34.0, "min_temp": 27.1, "pop": 10, "wind_spd": 2.4, "weather": {"code": 800}},
    {"valid_date": "2025-06-02", "temp": 29.0, "max_temp": 31.0, "min_temp": 26.0, "pop": 85, "wind_spd": 4.1, "weather": {"code": 501}},
    {"valid_date": "2025-06-03", "temp": 28.2, "max_temp": 30.0, "min_temp": 26.5, "pop": 35, "wind_spd": 3.0, "weather": {"code": 803}},
    {"valid_date": "2025-06-04", "temp": 28.0, "max_temp": 30.0, "min_temp": 26.0, "pop": 60, "wind_spd": 3.0, "weather": {"code": 202}}
  ]
}"#;

#[test]
fn forecast_is_mapped_and_filtered_to_range() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/forecast/daily")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("lat".into(), "21.028700".into()),
            Matcher::UrlEncoded("lon".into(), "105.852400".into()),
            Matcher::UrlEncoded("days".into(), "16".into()),
            Matcher::UrlEncoded("units".into(), "M".into()),
            Matcher::UrlEncoded("key".into(), "test-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(FORECAST)
        .create();

    let client = client_for(&server);
    let days = client
        .forecast(Coordinate::new(21.0287, 105.8524), date(2), date(3))
        .expect("forecast");

    mock.assert();
    assert_eq!(days.len(), 2, "only days within the requested range");

    assert_eq!(days[0].date, date(2));
    assert_eq!(days[0].condition, WeatherCondition::Rain);
    assert_eq!(days[0].rain_probability, 85);
    assert!(!days[0].is_good_weather);
    assert_eq!(days[0].wind_speed, Some(4.1));

    assert_eq!(days[1].condition, WeatherCondition::Clouds);
    assert!(days[1].is_good_weather, "clouds at 35% is still good weather");
    assert_eq!(days[1].avg_temp, Some(28.2));
}

#[test]
fn server_error_is_reported() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/forecast/daily")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let err = client_for(&server)
        .forecast(Coordinate::new(16.0544, 108.2478), date(1), date(5))
        .unwrap_err();
    assert!(matches!(err, PlanError::Http(_)));
    assert_eq!(err.kind(), "external_source_failure");
}

#[test]
fn missing_data_array_is_a_weather_source_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/forecast/daily")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"city_name": "Hanoi"}"#)
        .create();

    let err = client_for(&server)
        .forecast(Coordinate::new(21.0287, 105.8524), date(1), date(2))
        .unwrap_err();
    assert!(matches!(err, PlanError::WeatherSource(_)));
    assert!(err.is_degradable());
}
