//! Itinerary value types shared by every pipeline stage.
//!
//! All types are plain owned values. Stages take an itinerary by value or
//! clone it, so a failing stage never leaves a caller's copy half-edited.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::budget::{BudgetTips, DayBudgetSummary, ItineraryBudgetSummary};
use crate::category::Category;
use crate::clock::ClockTime;

/// Amounts of money, in whole Vietnamese dong.
pub type Vnd = i64;

/// A WGS84 position. Out-of-range or non-finite input is clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawCoordinate")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: clamp_degrees(lat, 90.0),
            lon: clamp_degrees(lon, 180.0),
        }
    }

    pub fn midpoint(self, other: Coordinate) -> Coordinate {
        Coordinate::new((self.lat + other.lat) / 2.0, (self.lon + other.lon) / 2.0)
    }
}

fn clamp_degrees(value: f64, limit: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-limit, limit)
    } else {
        0.0
    }
}

/// Wire shape accepted for coordinates: `lat/lon`, `lat/lng` or `latitude/longitude`.
#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(default, alias = "latitude")]
    lat: Option<f64>,
    #[serde(default, alias = "lng", alias = "longitude")]
    lon: Option<f64>,
}

impl From<RawCoordinate> for Coordinate {
    fn from(raw: RawCoordinate) -> Self {
        Coordinate::new(raw.lat.unwrap_or(0.0), raw.lon.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: Vnd,
}

/// How a synthetic travel segment is covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walking,
    Motorbike,
    Car,
}

/// Record of how a freshly estimated cost was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDetails {
    pub base_cost: Vnd,
    pub country_factor: f64,
    pub country_type: String,
    pub season_factor: f64,
    pub season: String,
    pub group_size_factor: f64,
    pub per_person: Vnd,
    pub total: Vnd,
    pub number_of_people: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub name: String,
    pub category: Category,
    pub location: Coordinate,
    pub address: String,
    pub description: String,
    pub cost: Vnd,
    pub alternatives: Vec<Alternative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation: Option<TravelMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_details: Option<CostDetails>,
}

impl Activity {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        location: Coordinate,
        start_time: ClockTime,
        end_time: ClockTime,
    ) -> Self {
        Self {
            start_time,
            end_time,
            name: name.into(),
            category,
            location,
            address: String::new(),
            description: String::new(),
            cost: 0,
            alternatives: Vec::new(),
            weather_note: None,
            transportation: None,
            cost_details: None,
        }
    }

    pub fn with_cost(mut self, cost: Vnd) -> Self {
        self.cost = cost;
        self
    }

    pub fn is_travel(&self) -> bool {
        self.category.is_travel()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_time.minutes_since(self.start_time)
    }

    /// Moves the activity to `start`, keeping its current duration.
    pub fn shift_to(&mut self, start: ClockTime) {
        let duration = self.duration_minutes();
        self.start_time = start;
        self.end_time = start.plus_minutes(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Atmosphere,
}

impl WeatherCondition {
    /// Maps a Weatherbit weather code onto a condition.
    pub fn from_weatherbit_code(code: u32) -> Self {
        match code {
            0..=299 => WeatherCondition::Thunderstorm,
            300..=499 => WeatherCondition::Drizzle,
            500..=599 => WeatherCondition::Rain,
            600..=699 => WeatherCondition::Snow,
            700..=799 => WeatherCondition::Atmosphere,
            801..=899 => WeatherCondition::Clouds,
            _ => WeatherCondition::Clear,
        }
    }

    pub fn is_wet(self) -> bool {
        matches!(self, WeatherCondition::Rain | WeatherCondition::Thunderstorm)
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Atmosphere => "Atmosphere",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub condition: WeatherCondition,
    /// Probability of precipitation, 0-100.
    pub rain_probability: u8,
    pub is_good_weather: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
}

impl WeatherDay {
    /// Builds a day whose `is_good_weather` flag follows the usual rule:
    /// no rain or storm and less than 40% chance of precipitation.
    pub fn new(date: NaiveDate, condition: WeatherCondition, rain_probability: u8) -> Self {
        let rain_probability = rain_probability.min(100);
        Self {
            date,
            condition,
            rain_probability,
            is_good_weather: !condition.is_wet() && rain_probability < 40,
            avg_temp: None,
            max_temp: None,
            min_temp: None,
            wind_speed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_label: String,
    pub schedule: Vec<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_summary: Option<DayBudgetSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_tips: Option<BudgetTips>,
}

impl DayPlan {
    pub fn new(day_label: impl Into<String>, schedule: Vec<Activity>) -> Self {
        Self {
            day_label: day_label.into(),
            schedule,
            weather: None,
            budget_summary: None,
            budget_tips: None,
        }
    }

    pub fn non_travel_count(&self) -> usize {
        self.schedule.iter().filter(|a| !a.is_travel()).count()
    }

    pub fn total_cost(&self) -> Vnd {
        self.schedule.iter().map(|a| a.cost).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Itinerary {
    pub days: Vec<DayPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_summary: Option<ItineraryBudgetSummary>,
}

impl Itinerary {
    pub fn new(days: Vec<DayPlan>) -> Self {
        Self {
            days,
            budget_summary: None,
        }
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.days.iter().flat_map(|day| day.schedule.iter())
    }

    pub fn total_cost(&self) -> Vnd {
        self.days.iter().map(DayPlan::total_cost).sum()
    }
}
