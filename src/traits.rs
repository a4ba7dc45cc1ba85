//! Seams between the optimization core and the outside world.
//!
//! The core only ever talks to distances, forecasts and drafts through these
//! traits, so tests and applications can plug in their own providers.

use chrono::NaiveDate;

use crate::draft::DraftRequest;
use crate::error::Result;
use crate::model::{Coordinate, WeatherDay};

/// Provides point-to-point distances in kilometres.
pub trait DistanceProvider {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64;

    /// Full distance matrix, indexed by the provided location order.
    fn matrix_for(&self, locations: &[Coordinate]) -> Vec<Vec<f64>> {
        let n = locations.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    matrix[i][j] = self.distance_km(*from, *to);
                }
            }
        }
        matrix
    }
}

/// Daily forecasts for a location and inclusive date range.
///
/// Sources may return fewer days than requested (short horizon); callers pad.
pub trait ForecastSource {
    fn forecast(&self, location: Coordinate, start: NaiveDate, end: NaiveDate) -> Result<Vec<WeatherDay>>;
}

/// Produces a forecast for a date when neither the source nor any earlier
/// day has data.
pub trait WeatherFallback {
    fn synthesize(&mut self, date: NaiveDate) -> WeatherDay;
}

/// Produces the raw, unordered day plans the pipeline starts from.
///
/// The returned JSON is normalized by [`crate::draft::normalize_draft`].
pub trait DraftSource {
    fn draft(&self, request: &DraftRequest) -> Result<serde_json::Value>;
}
