//! Weather-aware reshuffling of an itinerary.
//!
//! On days with a bad forecast, indoor activities are preferred in every part
//! of the day. Outdoor activities that no longer fit are swapped for an unused
//! indoor place when the pool has one, and kept with a warning otherwise.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::category::{Category, Exposure};
use crate::clock::ClockTime;
use crate::model::{Activity, Coordinate, DayPlan, Itinerary, WeatherCondition, WeatherDay};
use crate::scheduler::{repair_overlaps, ScheduleOptions};
use crate::traits::WeatherFallback;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherOptions {
    /// Outdoor activities before noon survive below this rain probability.
    pub morning_threshold: u8,
    /// Same, for 12:00 to 17:00.
    pub afternoon_threshold: u8,
    /// Same, from 17:00.
    pub evening_threshold: u8,
    /// Minimum gap between activities on a rebuilt day.
    pub repair_gap_minutes: u32,
}

impl Default for WeatherOptions {
    fn default() -> Self {
        Self {
            morning_threshold: 50,
            afternoon_threshold: 30,
            evening_threshold: 40,
            repair_gap_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];

    pub fn of(start: ClockTime) -> Self {
        match start.hour() {
            h if h < 12 => TimeOfDay::Morning,
            h if h < 17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    fn threshold(self, options: &WeatherOptions) -> u8 {
        match self {
            TimeOfDay::Morning => options.morning_threshold,
            TimeOfDay::Afternoon => options.afternoon_threshold,
            TimeOfDay::Evening => options.evening_threshold,
        }
    }
}

/// A candidate stop that can stand in for an outdoor activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub location: Coordinate,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

impl From<&Activity> for Place {
    fn from(activity: &Activity) -> Self {
        Self {
            name: activity.name.clone(),
            category: activity.category,
            location: activity.location,
            address: activity.address.clone(),
            description: activity.description.clone(),
        }
    }
}

/// One forecast entry per trip day, in date order.
///
/// A day without a source entry copies the closest earlier source day; a day
/// with no earlier data at all comes from `fallback`.
pub fn pad_forecast<F: WeatherFallback + ?Sized>(
    forecast: &[WeatherDay],
    start_date: NaiveDate,
    days: usize,
    fallback: &mut F,
) -> Vec<WeatherDay> {
    let mut padded = Vec::with_capacity(days);
    for offset in 0..days {
        let date = start_date + Duration::days(offset as i64);

        if let Some(day) = forecast.iter().find(|d| d.date == date) {
            padded.push(day.clone());
            continue;
        }

        let carried = forecast
            .iter()
            .filter(|d| d.date < date)
            .max_by_key(|d| d.date);
        match carried {
            Some(last) => {
                debug!(%date, from = %last.date, "carrying forecast forward");
                padded.push(WeatherDay {
                    date,
                    ..last.clone()
                });
            }
            None => {
                warn!(%date, "no forecast data, synthesizing weather");
                padded.push(fallback.synthesize(date));
            }
        }
    }
    padded
}

/// Random but reproducible weather for days nothing is known about.
#[derive(Debug, Clone)]
pub struct SeededWeather {
    rng: StdRng,
}

impl SeededWeather {
    const CONDITIONS: [WeatherCondition; 4] = [
        WeatherCondition::Clear,
        WeatherCondition::Clouds,
        WeatherCondition::Rain,
        WeatherCondition::Thunderstorm,
    ];

    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl WeatherFallback for SeededWeather {
    fn synthesize(&mut self, date: NaiveDate) -> WeatherDay {
        let condition = Self::CONDITIONS[self.rng.random_range(0..Self::CONDITIONS.len())];
        let temp = self.rng.random_range(20..35) as f64;
        let rain_probability = self.rng.random_range(0..100u8);

        let mut day = WeatherDay::new(date, condition, rain_probability);
        day.avg_temp = Some(temp);
        day.max_temp = Some(temp + 2.0);
        day.min_temp = Some(temp - 2.0);
        day.wind_speed = Some(self.rng.random_range(0..10) as f64);
        day
    }
}

/// Always produces the same weather.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather {
    pub condition: WeatherCondition,
    pub rain_probability: u8,
    pub avg_temp: f64,
}

impl Default for FixedWeather {
    fn default() -> Self {
        Self {
            condition: WeatherCondition::Clear,
            rain_probability: 10,
            avg_temp: 28.0,
        }
    }
}

impl WeatherFallback for FixedWeather {
    fn synthesize(&mut self, date: NaiveDate) -> WeatherDay {
        let mut day = WeatherDay::new(date, self.condition, self.rain_probability);
        day.avg_temp = Some(self.avg_temp);
        day
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeatherAdapter {
    options: WeatherOptions,
    schedule: ScheduleOptions,
    places: Vec<Place>,
}

impl WeatherAdapter {
    pub fn new(options: WeatherOptions, schedule: ScheduleOptions) -> Self {
        Self {
            options,
            schedule,
            places: Vec::new(),
        }
    }

    /// Substitutes are drawn from `places` instead of the itinerary itself.
    ///
    /// Without an explicit pool every indoor activity of the itinerary is a
    /// candidate, so a rainy day may borrow a stop that another day still
    /// visits. Pass a dedicated pool to avoid repeat visits.
    pub fn with_places(mut self, places: Vec<Place>) -> Self {
        self.places = places;
        self
    }

    /// Attaches `forecast[i]` to day `i` and rebuilds the bad-weather days.
    /// Days past the end of `forecast` are returned unchanged.
    ///
    /// A substitute is never already on the rebuilt day and is used at most
    /// once per call, but it may also be scheduled on another day (see
    /// [`WeatherAdapter::with_places`]).
    pub fn adapt(&self, mut itinerary: Itinerary, forecast: &[WeatherDay]) -> Itinerary {
        let pool: Vec<Place> = if self.places.is_empty() {
            itinerary
                .activities()
                .filter(|a| !a.is_travel())
                .map(Place::from)
                .collect()
        } else {
            self.places.clone()
        };
        let mut used: Vec<String> = Vec::new();

        for (index, day) in itinerary.days.iter_mut().enumerate() {
            let Some(weather) = forecast.get(index) else {
                warn!(day = index + 1, "no forecast for day, left unchanged");
                continue;
            };
            day.weather = Some(weather.clone());

            if !weather.is_good_weather {
                info!(
                    day = index + 1,
                    condition = %weather.condition,
                    rain_probability = weather.rain_probability,
                    "bad weather, rebuilding day"
                );
                let schedule = std::mem::take(&mut day.schedule);
                day.schedule = self.rebuild(schedule, weather, &pool, &mut used);
            }

            annotate(day, weather);
        }
        itinerary
    }

    fn rebuild(
        &self,
        schedule: Vec<Activity>,
        weather: &WeatherDay,
        pool: &[Place],
        used: &mut Vec<String>,
    ) -> Vec<Activity> {
        let stops: Vec<Activity> = schedule.into_iter().filter(|a| !a.is_travel()).collect();

        let mut kept: Vec<Activity> = Vec::with_capacity(stops.len());
        let mut dropped: Vec<Activity> = Vec::new();

        let (neutral, exposed): (Vec<Activity>, Vec<Activity>) = stops
            .into_iter()
            .partition(|a| a.category.exposure() == Exposure::Neutral);
        kept.extend(neutral);

        for part in TimeOfDay::ALL {
            let (indoor, outdoor): (Vec<Activity>, Vec<Activity>) = exposed
                .iter()
                .filter(|a| TimeOfDay::of(a.start_time) == part)
                .cloned()
                .partition(|a| a.category.exposure() == Exposure::Indoor);

            let outdoor_ok = weather.rain_probability < part.threshold(&self.options) || indoor.is_empty();
            kept.extend(indoor);
            if outdoor_ok {
                kept.extend(outdoor);
            } else {
                dropped.extend(outdoor);
            }
        }

        for outdoor in dropped {
            let candidate = pool.iter().find(|place| {
                place.category.exposure() == Exposure::Indoor
                    && !used.contains(&place.name)
                    && !kept.iter().any(|a| a.name == place.name)
            });
            match candidate {
                Some(place) => {
                    debug!(dropped = %outdoor.name, substitute = %place.name, "outdoor activity substituted");
                    used.push(place.name.clone());
                    kept.push(substitute(&outdoor, place, weather));
                }
                None => {
                    debug!(activity = %outdoor.name, "no indoor substitute, keeping outdoor activity");
                    kept.push(outdoor);
                }
            }
        }

        kept.sort_by_key(|a| a.start_time);
        repair_overlaps(&mut kept, self.options.repair_gap_minutes, &self.schedule);
        kept
    }
}

fn substitute(dropped: &Activity, place: &Place, weather: &WeatherDay) -> Activity {
    let mut activity = Activity::new(
        place.name.clone(),
        place.category,
        place.location,
        dropped.start_time,
        dropped.end_time,
    );
    activity.address = place.address.clone();
    activity.description = format!(
        "Replaces {} because of the forecast. {}",
        dropped.name, place.description
    )
    .trim_end()
    .to_string();
    activity.cost = dropped.cost;
    activity.weather_note = Some(format!(
        "Indoor replacement for an outdoor activity: {}, {}% chance of rain.",
        weather.condition, weather.rain_probability
    ));
    activity
}

/// Weather note on every outdoor activity of the day.
fn annotate(day: &mut DayPlan, weather: &WeatherDay) {
    let note = if weather.is_good_weather {
        match weather.avg_temp {
            Some(temp) => format!("Good weather expected: {}, {:.0}°C.", weather.condition, temp),
            None => format!("Good weather expected: {}.", weather.condition),
        }
    } else {
        format!(
            "Poor weather expected: {}, {}% chance of rain. Bring rain gear or consider an indoor alternative.",
            weather.condition, weather.rain_probability
        )
    };

    for activity in day.schedule.iter_mut() {
        if activity.category.exposure() == Exposure::Outdoor {
            activity.weather_note = Some(note.clone());
        }
    }
}
