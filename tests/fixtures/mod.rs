//! Test fixtures for itinerary-optimizer.
//!
//! Provides realistic test data including:
//! - Real Hanoi / Da Nang places (from OpenStreetMap)
//! - A builder for activities with sensible defaults

#![allow(dead_code)]

pub mod vietnam_locations;

pub use vietnam_locations::*;

use itinerary_optimizer::category::Category;
use itinerary_optimizer::clock::ClockTime;
use itinerary_optimizer::model::{Activity, Coordinate, DayPlan, Vnd};

/// Builder for test activities with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestActivity {
    name: String,
    category: Category,
    location: Coordinate,
    start: ClockTime,
    end: ClockTime,
    cost: Vnd,
}

impl TestActivity {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: Category::Attraction,
            location: Coordinate::default(),
            start: ClockTime::hm(9, 0),
            end: ClockTime::hm(10, 0),
            cost: 0,
        }
    }

    /// Name, category and coordinates from a fixture place.
    pub fn at(place: &Place) -> Self {
        Self::new(place.name)
            .category(place.category)
            .location(place.lat, place.lon)
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn location(mut self, lat: f64, lon: f64) -> Self {
        self.location = Coordinate::new(lat, lon);
        self
    }

    pub fn between(mut self, start: (u32, u32), end: (u32, u32)) -> Self {
        self.start = ClockTime::hm(start.0, start.1);
        self.end = ClockTime::hm(end.0, end.1);
        self
    }

    pub fn cost(mut self, cost: Vnd) -> Self {
        self.cost = cost;
        self
    }

    pub fn build(self) -> Activity {
        Activity::new(self.name, self.category, self.location, self.start, self.end).with_cost(self.cost)
    }
}

/// A Hanoi day that zig-zags across town: Old Quarter, Ba Dinh, Old Quarter, Dong Da.
pub fn hanoi_zigzag_day() -> DayPlan {
    DayPlan::new(
        "Day 1",
        vec![
            TestActivity::at(&HOAN_KIEM_LAKE).between((8, 0), (9, 0)).build(),
            TestActivity::at(&HO_CHI_MINH_MAUSOLEUM).between((9, 30), (10, 30)).build(),
            TestActivity::at(&WATER_PUPPET_THEATRE).between((11, 0), (12, 0)).build(),
            TestActivity::at(&TEMPLE_OF_LITERATURE).between((13, 0), (14, 30)).build(),
            TestActivity::at(&CAFE_GIANG).between((15, 0), (16, 0)).build(),
        ],
    )
}
