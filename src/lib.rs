//! itinerary-optimizer core
//!
//! Turns a loosely structured draft trip into a routed, time-consistent,
//! costed and weather-aware itinerary.

pub mod budget;
pub mod category;
pub mod clock;
pub mod cost;
pub mod draft;
pub mod error;
pub mod haversine;
pub mod model;
pub mod pipeline;
pub mod route;
pub mod scheduler;
pub mod traits;
pub mod weather;
pub mod weatherbit;

pub use error::{PlanError, Result};
pub use pipeline::{PlanResult, Planner, PlannerOptions, TripRequest};
