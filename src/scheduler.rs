//! Time-line repair for a single day.
//!
//! Takes stops in their final visiting order, pins the first one to the day
//! start, pushes overlapping stops later and inserts a travel segment between
//! every pair of consecutive stops. Running it on its own output is a no-op.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::Category;
use crate::clock::ClockTime;
use crate::error::{PlanError, Result};
use crate::haversine::HaversineDistance;
use crate::model::{Activity, TravelMode, Vnd};
use crate::traits::DistanceProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    /// Clock time the first activity of every day starts at.
    pub day_start: ClockTime,
    /// Shifted activities shorter than this are stretched.
    pub min_duration_minutes: u32,
    /// Length a too-short activity is stretched to.
    pub extended_duration_minutes: u32,
    /// Travel estimates at or below this are not worth a segment.
    pub travel_insert_threshold_minutes: u32,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            day_start: ClockTime::hm(8, 0),
            min_duration_minutes: 45,
            extended_duration_minutes: 60,
            travel_insert_threshold_minutes: 5,
        }
    }
}

/// Estimated door-to-door leg between two stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub mode: TravelMode,
    pub minutes: u32,
    pub cost: Vnd,
}

/// Speed tier, padding and fare for a leg of `distance_km`.
///
/// Speeds assume congested city traffic: 3 km/h on foot under 1 km,
/// 10 km/h by motorbike up to 5 km, 20 km/h by car beyond. On top of the
/// moving time comes 10 minutes per km (at least 15) for waiting and parking.
pub fn estimate_travel(distance_km: f64) -> TravelEstimate {
    let distance_km = distance_km.max(0.0);
    let (mode, speed_kmh, fare_per_km) = if distance_km < 1.0 {
        (TravelMode::Walking, 3.0, 0.0)
    } else if distance_km < 5.0 {
        (TravelMode::Motorbike, 10.0, 5_000.0)
    } else {
        (TravelMode::Car, 20.0, 15_000.0)
    };

    let moving = (distance_km * 60.0 / speed_kmh).ceil() as u32;
    let buffer = ((distance_km * 10.0).ceil() as u32).max(15);

    TravelEstimate {
        distance_km,
        mode,
        minutes: moving.saturating_add(buffer),
        cost: (distance_km * fare_per_km).ceil() as Vnd,
    }
}

#[derive(Debug, Clone)]
pub struct TemporalScheduler<D: DistanceProvider = HaversineDistance> {
    distance: D,
    options: ScheduleOptions,
}

impl Default for TemporalScheduler<HaversineDistance> {
    fn default() -> Self {
        Self::new(HaversineDistance, ScheduleOptions::default())
    }
}

impl<D: DistanceProvider> TemporalScheduler<D> {
    pub fn new(distance: D, options: ScheduleOptions) -> Self {
        Self { distance, options }
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    /// Produces a time-ordered, non-overlapping day starting at `day_start`,
    /// with travel segments between consecutive stops.
    pub fn schedule(&self, activities: Vec<Activity>, day_start: ClockTime) -> Vec<Activity> {
        let mut stops: Vec<Activity> = activities.into_iter().filter(|a| !a.is_travel()).collect();
        if stops.is_empty() {
            return stops;
        }

        for stop in stops.iter_mut() {
            if stop.end_time <= stop.start_time {
                stop.end_time = stop.start_time.plus_minutes(self.options.extended_duration_minutes);
            }
        }

        // Stable: equal start times keep the visiting order.
        stops.sort_by_key(|a| a.start_time);

        let first = &mut stops[0];
        first.start_time = day_start;
        if first.end_time.minutes_since(day_start) < self.options.min_duration_minutes {
            first.end_time = day_start.plus_minutes(self.options.extended_duration_minutes);
        }

        repair_overlaps(&mut stops, 0, &self.options);

        let mut timeline = Vec::with_capacity(stops.len() * 2);
        let mut inserted = 0;
        for k in 0..stops.len() {
            if k + 1 < stops.len() {
                let (head, tail) = stops.split_at_mut(k + 1);
                let current = &head[k];
                let next = &mut tail[0];

                let leg = estimate_travel(self.distance.distance_km(current.location, next.location));
                if leg.minutes > self.options.travel_insert_threshold_minutes {
                    let arrival = current.end_time.plus_minutes(leg.minutes);
                    if arrival > next.start_time {
                        shift_forward(next, arrival, &self.options);
                    }
                    timeline.push(current.clone());
                    timeline.push(travel_segment(current, next, &leg, arrival));
                    inserted += 1;
                    continue;
                }
            }
            timeline.push(stops[k].clone());
        }

        timeline.sort_by_key(|a| a.start_time);
        debug!(stops = stops.len(), travel_segments = inserted, "day scheduled");
        timeline
    }
}

/// Pushes every activity that starts less than `gap_minutes` after its
/// predecessor ends to exactly that point, keeping its duration.
pub fn repair_overlaps(activities: &mut [Activity], gap_minutes: u32, options: &ScheduleOptions) {
    for k in 1..activities.len() {
        let earliest = activities[k - 1].end_time.plus_minutes(gap_minutes);
        if activities[k].start_time < earliest {
            shift_forward(&mut activities[k], earliest, options);
        }
    }
}

fn shift_forward(activity: &mut Activity, start: ClockTime, options: &ScheduleOptions) {
    let mut duration = activity.duration_minutes();
    if duration < options.min_duration_minutes {
        duration = options.extended_duration_minutes;
    }
    activity.start_time = start;
    activity.end_time = start.plus_minutes(duration);
}

fn travel_segment(from: &Activity, to: &Activity, leg: &TravelEstimate, arrival: ClockTime) -> Activity {
    let hours = leg.minutes / 60;
    let duration = if hours > 0 {
        format!("{} h {} min", hours, leg.minutes % 60)
    } else {
        format!("{} min", leg.minutes)
    };

    let mut segment = Activity::new(
        format!("Travel to {}", to.name),
        Category::Travel,
        from.location.midpoint(to.location),
        from.end_time,
        arrival,
    );
    segment.description = format!(
        "From {} to {} ({:.2} km, {}), padded for traffic and wayfinding.",
        from.name, to.name, leg.distance_km, duration
    );
    segment.cost = leg.cost;
    segment.transportation = Some(leg.mode);
    segment
}

/// Checks that a scheduled day is ordered, gap-free of overlaps and that
/// every activity ends after it starts.
pub fn check_day(day_index: usize, schedule: &[Activity]) -> Result<()> {
    for activity in schedule {
        if activity.end_time <= activity.start_time {
            return Err(PlanError::Invariant {
                day: day_index,
                detail: format!("{} ends at or before its start", activity.name),
            });
        }
    }
    for pair in schedule.windows(2) {
        if pair[1].start_time < pair[0].end_time {
            return Err(PlanError::Invariant {
                day: day_index,
                detail: format!("{} overlaps {}", pair[1].name, pair[0].name),
            });
        }
    }
    Ok(())
}
