//! Geographic ordering of a day's stops.
//!
//! First-improvement 2-opt over an open path: the first segment reversal that
//! shortens the path is taken and the scan restarts from the top, until a full
//! scan finds nothing. Opening hours and meal times are not considered.

use tracing::debug;

use crate::clock::ClockTime;
use crate::haversine::HaversineDistance;
use crate::model::{Activity, Coordinate};
use crate::traits::DistanceProvider;

/// Reversals must beat the current path by more than this to count.
const IMPROVEMENT_EPSILON_KM: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct RouteOptions {
    /// Upper bound on accepted improvements, a guard for pathological inputs.
    pub max_improvements: usize,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            max_improvements: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizedRoute {
    pub activities: Vec<Activity>,
    pub initial_distance_km: f64,
    pub distance_km: f64,
    pub improvements: usize,
}

#[derive(Debug, Clone)]
pub struct GeoRouteOptimizer<D: DistanceProvider = HaversineDistance> {
    distance: D,
    options: RouteOptions,
}

impl Default for GeoRouteOptimizer<HaversineDistance> {
    fn default() -> Self {
        Self::new(HaversineDistance, RouteOptions::default())
    }
}

impl<D: DistanceProvider> GeoRouteOptimizer<D> {
    pub fn new(distance: D, options: RouteOptions) -> Self {
        Self { distance, options }
    }

    /// Reorders `activities` to shorten the path through them.
    ///
    /// The output is a permutation of the input. Travel segments are dropped:
    /// they only make sense between their original neighbours and the
    /// scheduler recreates them.
    pub fn optimize(&self, activities: Vec<Activity>) -> Vec<Activity> {
        self.optimize_route(activities).activities
    }

    pub fn optimize_route(&self, activities: Vec<Activity>) -> OptimizedRoute {
        let stops: Vec<Activity> = activities.into_iter().filter(|a| !a.is_travel()).collect();
        let locations: Vec<Coordinate> = stops.iter().map(|a| a.location).collect();
        let matrix = self.distance.matrix_for(&locations);

        let mut order: Vec<usize> = (0..stops.len()).collect();
        let initial_distance_km = path_length(&order, &matrix);
        let mut distance_km = initial_distance_km;
        let mut improvements = 0;

        if stops.len() > 2 {
            while improvements < self.options.max_improvements {
                match two_opt_improve(&mut order, distance_km, &matrix) {
                    Some(shorter) => {
                        distance_km = shorter;
                        improvements += 1;
                    }
                    None => break,
                }
            }
        }

        debug!(
            stops = stops.len(),
            initial_km = initial_distance_km,
            optimized_km = distance_km,
            improvements,
            "2-opt finished"
        );

        let mut slots: Vec<Option<Activity>> = stops.into_iter().map(Some).collect();
        let activities = order.iter().filter_map(|&i| slots[i].take()).collect();

        OptimizedRoute {
            activities,
            initial_distance_km,
            distance_km,
            improvements,
        }
    }

    /// Chronological sort, 2-opt, then hand the day's time slots out in the
    /// optimized order so that the scheduler's sort keeps it.
    pub fn optimize_day(&self, mut activities: Vec<Activity>) -> Vec<Activity> {
        activities.sort_by_key(|a| a.start_time);
        let mut optimized = self.optimize(activities);
        assign_slots_in_order(&mut optimized);
        optimized
    }
}

/// 2-opt: reverse the first segment `[i+1..=j]` that shortens the path.
/// Returns the new path length if an improvement was made.
fn two_opt_improve(order: &mut [usize], current: f64, matrix: &[Vec<f64>]) -> Option<f64> {
    let n = order.len();
    if n < 3 {
        return None;
    }

    for i in 0..n - 2 {
        for j in i + 2..n {
            order[i + 1..=j].reverse();
            let candidate = path_length(order, matrix);
            if candidate + IMPROVEMENT_EPSILON_KM < current {
                return Some(candidate);
            }
            order[i + 1..=j].reverse();
        }
    }

    None
}

fn path_length(order: &[usize], matrix: &[Vec<f64>]) -> f64 {
    order.windows(2).map(|pair| matrix[pair[0]][pair[1]]).sum()
}

/// Gives the i-th earliest start time to the i-th activity in sequence order.
/// Each activity keeps its own duration; overlaps are left for the scheduler.
pub fn assign_slots_in_order(activities: &mut [Activity]) {
    let mut starts: Vec<ClockTime> = activities.iter().map(|a| a.start_time).collect();
    starts.sort();
    for (activity, start) in activities.iter_mut().zip(starts) {
        activity.shift_to(start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn stop(name: &str, lat: f64, lon: f64, hour: u32) -> Activity {
        Activity::new(
            name,
            Category::Attraction,
            Coordinate::new(lat, lon),
            ClockTime::hm(hour, 0),
            ClockTime::hm(hour + 1, 0),
        )
    }

    fn names(activities: &[Activity]) -> Vec<&str> {
        activities.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_short_inputs_unchanged() {
        let optimizer = GeoRouteOptimizer::default();
        let two = vec![stop("b", 10.0, 10.0, 9), stop("a", 0.0, 0.0, 10)];
        assert_eq!(names(&optimizer.optimize(two)), vec!["b", "a"]);
        assert!(optimizer.optimize(Vec::new()).is_empty());
    }

    #[test]
    fn test_detour_removed() {
        let optimizer = GeoRouteOptimizer::default();
        let input = vec![stop("A", 0.0, 0.0, 8), stop("B", 10.0, 10.0, 9), stop("C", 1.0, 1.0, 10)];
        let route = optimizer.optimize_route(input);
        assert_eq!(names(&route.activities), vec!["A", "C", "B"]);
        assert!(route.distance_km < route.initial_distance_km);
        assert_eq!(route.improvements, 1);
    }

    #[test]
    fn test_travel_segments_dropped() {
        let optimizer = GeoRouteOptimizer::default();
        let mut travel = stop("to B", 5.0, 5.0, 9);
        travel.category = Category::Travel;
        let input = vec![stop("A", 0.0, 0.0, 8), travel, stop("B", 1.0, 1.0, 10)];
        assert_eq!(names(&optimizer.optimize(input)), vec!["A", "B"]);
    }

    #[test]
    fn test_slots_follow_sequence() {
        let mut day = vec![
            stop("A", 0.0, 0.0, 8),
            Activity::new("C", Category::Museum, Coordinate::default(), ClockTime::hm(13, 0), ClockTime::hm(15, 0)),
            stop("B", 0.0, 0.0, 10),
        ];
        assign_slots_in_order(&mut day);
        assert_eq!(day[1].start_time, ClockTime::hm(10, 0));
        assert_eq!(day[1].end_time, ClockTime::hm(12, 0), "duration kept");
        assert_eq!(day[2].start_time, ClockTime::hm(13, 0));
    }
}
