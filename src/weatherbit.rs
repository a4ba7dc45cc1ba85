//! Weatherbit HTTP adapter for daily forecasts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlanError, Result};
use crate::model::{Coordinate, WeatherCondition, WeatherDay};
use crate::traits::ForecastSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherbitConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Longest forecast the API serves, in days.
    pub max_horizon_days: u32,
}

impl Default for WeatherbitConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.weatherbit.io/v2.0".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
            max_horizon_days: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherbitClient {
    config: WeatherbitConfig,
    client: reqwest::blocking::Client,
}

impl WeatherbitClient {
    pub fn new(config: WeatherbitConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &WeatherbitConfig {
        &self.config
    }
}

impl ForecastSource for WeatherbitClient {
    /// Fetches the full horizon and keeps the days within `[start, end]`.
    fn forecast(&self, location: Coordinate, start: NaiveDate, end: NaiveDate) -> Result<Vec<WeatherDay>> {
        let requested = (end - start).num_days() + 1;
        if requested > self.config.max_horizon_days as i64 {
            warn!(
                requested,
                horizon = self.config.max_horizon_days,
                "forecast requested beyond the source horizon, remaining days will be padded"
            );
        }

        let url = format!("{}/forecast/daily", self.config.base_url.trim_end_matches('/'));
        let days = self.config.max_horizon_days.to_string();
        let lat = format!("{:.6}", location.lat);
        let lon = format!("{:.6}", location.lon);

        let body = self
            .client
            .get(url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("days", days.as_str()),
                ("units", "M"),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())?
            .json::<WeatherbitResponse>()?;

        let Some(data) = body.data else {
            return Err(PlanError::WeatherSource("response has no forecast data".to_string()));
        };

        let mut forecast = Vec::with_capacity(data.len());
        for entry in data {
            let Ok(date) = NaiveDate::parse_from_str(&entry.valid_date, "%Y-%m-%d") else {
                debug!(valid_date = %entry.valid_date, "skipping forecast entry with unparseable date");
                continue;
            };
            if date < start || date > end {
                continue;
            }
            forecast.push(entry.into_weather_day(date));
        }

        debug!(
            city = body.city_name.as_deref().unwrap_or("unknown"),
            days = forecast.len(),
            "forecast fetched"
        );
        Ok(forecast)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherbitResponse {
    data: Option<Vec<WeatherbitDay>>,
    city_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherbitDay {
    valid_date: String,
    temp: Option<f64>,
    max_temp: Option<f64>,
    min_temp: Option<f64>,
    #[serde(default)]
    pop: f64,
    wind_spd: Option<f64>,
    weather: WeatherbitCode,
}

#[derive(Debug, Deserialize)]
struct WeatherbitCode {
    code: u32,
}

impl WeatherbitDay {
    fn into_weather_day(self, date: NaiveDate) -> WeatherDay {
        let pop = self.pop.clamp(0.0, 100.0).round() as u8;
        let mut day = WeatherDay::new(date, WeatherCondition::from_weatherbit_code(self.weather.code), pop);
        day.avg_temp = self.temp;
        day.max_temp = self.max_temp;
        day.min_temp = self.min_temp;
        day.wind_speed = self.wind_spd;
        day
    }
}
