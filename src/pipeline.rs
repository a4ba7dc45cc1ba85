//! End-to-end planning: draft, route, schedule, cost, budget, weather.
//!
//! Days are independent until the budget step, so routing and scheduling run
//! per day (in parallel when enabled). A day whose stage output fails its
//! checks keeps its pre-stage version; other days are unaffected.

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::budget::{allocate, rebalance, summarize, BudgetAllocation};
use crate::clock::ClockTime;
use crate::cost::{CostContext, CostEstimator};
use crate::draft::{normalize_draft, DraftRequest};
use crate::error::{PlanError, Result};
use crate::haversine::HaversineDistance;
use crate::model::{Coordinate, DayPlan, Itinerary, Vnd, WeatherDay};
use crate::route::{GeoRouteOptimizer, RouteOptions};
use crate::scheduler::{check_day, ScheduleOptions, TemporalScheduler};
use crate::traits::{DistanceProvider, DraftSource, ForecastSource, WeatherFallback};
use crate::weather::{pad_forecast, Place, WeatherAdapter, WeatherOptions};

/// A traveller's request, validated before any stage runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub budget: Vnd,
    pub days: u32,
    #[serde(default = "one")]
    pub number_of_people: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub start_location: Option<Coordinate>,
    #[serde(default)]
    pub start_location_name: String,
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Overrides the configured day start.
    #[serde(default)]
    pub start_time: Option<ClockTime>,
}

fn one() -> u32 {
    1
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, budget: Vnd, days: u32, start_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            budget,
            days,
            number_of_people: 1,
            start_date,
            start_location: None,
            start_location_name: String::new(),
            preferences: Vec::new(),
            start_time: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(PlanError::InvalidInput("destination is required".to_string()));
        }
        if self.budget <= 0 {
            return Err(PlanError::InvalidInput(format!("budget must be positive, got {}", self.budget)));
        }
        if self.days == 0 {
            return Err(PlanError::InvalidInput("trip must last at least one day".to_string()));
        }
        if self.number_of_people == 0 {
            return Err(PlanError::InvalidInput("number_of_people must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(self.days.saturating_sub(1) as i64)
    }

    pub fn draft_request(&self, start_time: ClockTime) -> DraftRequest {
        DraftRequest {
            destination: self.destination.clone(),
            budget: self.budget,
            days: self.days,
            preferences: self.preferences.clone(),
            start_location_name: self.start_location_name.clone(),
            start_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    pub schedule: ScheduleOptions,
    pub weather: WeatherOptions,
    /// Route and schedule days on the rayon pool.
    pub parallel_days: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            schedule: ScheduleOptions::default(),
            weather: WeatherOptions::default(),
            parallel_days: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub itinerary: Itinerary,
    pub allocation: BudgetAllocation,
    /// One entry per day, as attached to the itinerary.
    pub forecast: Vec<WeatherDay>,
    /// False when the forecast was unavailable and days were not reshuffled.
    pub weather_optimized: bool,
}

#[derive(Debug, Clone)]
pub struct Planner<D: DistanceProvider + Clone + Sync = HaversineDistance> {
    router: GeoRouteOptimizer<D>,
    scheduler: TemporalScheduler<D>,
    weather: WeatherAdapter,
    options: PlannerOptions,
}

impl Planner<HaversineDistance> {
    pub fn new(options: PlannerOptions) -> Self {
        Self::with_distance(HaversineDistance, options)
    }
}

impl Default for Planner<HaversineDistance> {
    fn default() -> Self {
        Self::new(PlannerOptions::default())
    }
}

impl<D: DistanceProvider + Clone + Sync> Planner<D> {
    pub fn with_distance(distance: D, options: PlannerOptions) -> Self {
        Self {
            router: GeoRouteOptimizer::new(distance.clone(), RouteOptions::default()),
            scheduler: TemporalScheduler::new(distance, options.schedule.clone()),
            weather: WeatherAdapter::new(options.weather.clone(), options.schedule.clone()),
            options,
        }
    }

    /// Places offered as indoor substitutes on bad-weather days.
    pub fn with_places(mut self, places: Vec<Place>) -> Self {
        self.weather = self.weather.with_places(places);
        self
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Full pipeline. Fails only on an invalid request or a failing draft
    /// source; weather problems degrade to an unadapted itinerary.
    pub fn plan<S, F, W>(
        &self,
        request: &TripRequest,
        drafts: &S,
        forecasts: &F,
        fallback: &mut W,
    ) -> Result<PlanResult>
    where
        S: DraftSource + ?Sized,
        F: ForecastSource + ?Sized,
        W: WeatherFallback + ?Sized,
    {
        request.validate()?;
        info!(
            destination = %request.destination,
            days = request.days,
            people = request.number_of_people,
            "planning trip"
        );

        let day_start = self.day_start(request);
        let payload = drafts.draft(&request.draft_request(day_start)).map_err(|err| {
            warn!(error = %err, "draft source failed");
            err
        })?;
        let itinerary = normalize_draft(payload, request.days as usize)?;

        let forecast = match forecast_location(request, &itinerary) {
            Some(location) => forecasts.forecast(location, request.start_date, request.end_date()),
            None => Err(PlanError::WeatherSource("no location to forecast for".to_string())),
        };

        self.run(itinerary, request, forecast, fallback)
    }

    /// Every stage after drafting, on an already normalized itinerary.
    pub fn run<W>(
        &self,
        itinerary: Itinerary,
        request: &TripRequest,
        forecast: Result<Vec<WeatherDay>>,
        fallback: &mut W,
    ) -> Result<PlanResult>
    where
        W: WeatherFallback + ?Sized,
    {
        request.validate()?;
        let day_start = self.day_start(request);

        let itinerary = self.arrange_days(itinerary, day_start);

        let context = CostContext::derive(&request.destination, request.start_date, request.number_of_people);
        let itinerary = CostEstimator::new(context).estimate_itinerary(itinerary);

        let allocation = allocate(request.budget, request.days, &request.destination);
        let itinerary = rebalance(itinerary, &allocation);

        let days = itinerary.days.len();
        let (mut itinerary, forecast, weather_optimized) = match forecast {
            Ok(source) if !source.is_empty() => {
                let padded = pad_forecast(&source, request.start_date, days, fallback);
                let adapted = self.adapt_weather(itinerary, &padded);
                (adapted, padded, true)
            }
            Ok(_) => {
                warn!("weather source returned no days, skipping weather adaptation");
                let padded = pad_forecast(&[], request.start_date, days, fallback);
                (attach_weather(itinerary, &padded), padded, false)
            }
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "weather source failed, skipping weather adaptation");
                let padded = pad_forecast(&[], request.start_date, days, fallback);
                (attach_weather(itinerary, &padded), padded, false)
            }
        };

        summarize(&mut itinerary, &allocation);

        info!(
            days,
            total_cost = itinerary.total_cost(),
            budget = request.budget,
            weather_optimized,
            "trip planned"
        );

        Ok(PlanResult {
            itinerary,
            allocation,
            forecast,
            weather_optimized,
        })
    }

    fn day_start(&self, request: &TripRequest) -> ClockTime {
        request.start_time.unwrap_or(self.options.schedule.day_start)
    }

    fn arrange_days(&self, mut itinerary: Itinerary, day_start: ClockTime) -> Itinerary {
        let days = std::mem::take(&mut itinerary.days);
        itinerary.days = if self.options.parallel_days {
            days.into_par_iter()
                .enumerate()
                .map(|(index, day)| self.arrange_day(index, day, day_start))
                .collect()
        } else {
            days.into_iter()
                .enumerate()
                .map(|(index, day)| self.arrange_day(index, day, day_start))
                .collect()
        };
        itinerary
    }

    /// Route then schedule one day, keeping the input if the result is unusable.
    fn arrange_day(&self, index: usize, day: DayPlan, day_start: ClockTime) -> DayPlan {
        let stops = day.non_travel_count();
        let routed = self.router.optimize_day(day.schedule.clone());
        if routed.len() != stops {
            warn!(day = index + 1, expected = stops, got = routed.len(), "route lost activities, keeping draft order");
            return day;
        }

        let scheduled = self.scheduler.schedule(routed, day_start);
        if let Err(err) = check_day(index, &scheduled) {
            warn!(day = index + 1, error = %err, "schedule failed checks, keeping draft times");
            return day;
        }

        debug!(day = index + 1, activities = scheduled.len(), "day arranged");
        DayPlan {
            schedule: scheduled,
            ..day
        }
    }

    fn adapt_weather(&self, itinerary: Itinerary, forecast: &[WeatherDay]) -> Itinerary {
        let before = attach_weather(itinerary.clone(), forecast);
        let mut adapted = self.weather.adapt(itinerary, forecast);

        for (index, day) in adapted.days.iter_mut().enumerate() {
            let original = &before.days[index];
            let check = check_day(index, &day.schedule).and_then(|()| {
                if day.non_travel_count() < original.non_travel_count() {
                    Err(PlanError::Invariant {
                        day: index,
                        detail: "weather adaptation dropped activities".to_string(),
                    })
                } else {
                    Ok(())
                }
            });
            if let Err(err) = check {
                warn!(day = index + 1, error = %err, "weather adaptation rejected, keeping day");
                *day = original.clone();
            }
        }
        adapted
    }
}

fn attach_weather(mut itinerary: Itinerary, forecast: &[WeatherDay]) -> Itinerary {
    for (day, weather) in itinerary.days.iter_mut().zip(forecast) {
        day.weather = Some(weather.clone());
    }
    itinerary
}

/// Explicit start location, else the first activity with real coordinates.
fn forecast_location(request: &TripRequest, itinerary: &Itinerary) -> Option<Coordinate> {
    request.start_location.or_else(|| {
        itinerary
            .activities()
            .map(|a| a.location)
            .find(|location| *location != Coordinate::default())
    })
}
