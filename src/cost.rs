//! Cost estimation for single activities.
//!
//! A fresh estimate is the category's base price scaled for the party size,
//! the destination's price level and the travel season. Prices that came with
//! the draft are read as single-person prices and only rescaled.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{Category, ScalingRegime};
use crate::model::{Activity, CostDetails, Itinerary, Vnd};

/// Price level of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTier {
    Expensive,
    Moderate,
    Budget,
}

impl CostTier {
    pub fn as_str(self) -> &'static str {
        match self {
            CostTier::Expensive => "expensive",
            CostTier::Moderate => "moderate",
            CostTier::Budget => "budget",
        }
    }
}

struct CountryEntry {
    name: &'static str,
    cities: &'static [&'static str],
    factor: f64,
}

const fn country(name: &'static str, cities: &'static [&'static str], factor: f64) -> CountryEntry {
    CountryEntry { name, cities, factor }
}

const EXPENSIVE: &[CountryEntry] = &[
    country("Japan", &["Tokyo", "Osaka", "Kyoto"], 2.5),
    country("South Korea", &["Seoul", "Busan", "Incheon"], 2.0),
    country("Singapore", &["Singapore"], 2.8),
    country("Hong Kong", &["Hong Kong"], 2.5),
    country("United States", &["New York", "San Francisco", "Los Angeles"], 2.5),
    country("United Kingdom", &["London", "Manchester"], 2.3),
    country("Australia", &["Sydney", "Melbourne"], 2.2),
    country("Switzerland", &["Zurich", "Geneva"], 3.0),
    country("Norway", &["Oslo"], 2.8),
    country("Denmark", &["Copenhagen"], 2.7),
    country("France", &["Paris"], 2.2),
    country("Germany", &["Munich", "Berlin"], 2.0),
    country("Italy", &["Milan", "Rome", "Venice"], 1.8),
    country("Canada", &["Toronto", "Vancouver"], 2.0),
    country("Netherlands", &["Amsterdam"], 2.1),
    country("Sweden", &["Stockholm"], 2.5),
    country("Finland", &["Helsinki"], 2.4),
    country("Israel", &["Tel Aviv", "Jerusalem"], 2.2),
    country("United Arab Emirates", &["Dubai", "Abu Dhabi"], 2.3),
];

const MODERATE: &[CountryEntry] = &[
    country("China", &["Shanghai", "Beijing", "Guangzhou"], 1.5),
    country("Taiwan", &["Taipei"], 1.6),
    country("Spain", &["Madrid", "Barcelona"], 1.7),
    country("Portugal", &["Lisbon"], 1.5),
    country("Greece", &["Athens"], 1.4),
    country("Czech Republic", &["Prague"], 1.4),
    country("Poland", &["Warsaw"], 1.3),
    country("Hungary", &["Budapest"], 1.3),
    country("Malaysia", &["Kuala Lumpur"], 1.2),
    country("Mexico", &["Mexico City"], 1.2),
    country("Brazil", &["Sao Paulo", "Rio de Janeiro"], 1.3),
    country("Argentina", &["Buenos Aires"], 1.2),
    country("Chile", &["Santiago"], 1.4),
    country("Russia", &["Moscow", "Saint Petersburg"], 1.5),
    country("Turkey", &["Istanbul"], 1.3),
];

const BUDGET: &[CountryEntry] = &[
    country("Vietnam", &["Hanoi", "Ho Chi Minh City", "Da Nang", "Hue", "Hoi An"], 1.0),
    country("Thailand", &["Bangkok", "Chiang Mai", "Phuket"], 1.1),
    country("Indonesia", &["Jakarta", "Bali", "Yogyakarta"], 1.0),
    country("Philippines", &["Manila", "Cebu"], 1.0),
    country("Cambodia", &["Phnom Penh", "Siem Reap"], 0.9),
    country("Laos", &["Vientiane", "Luang Prabang"], 0.9),
    country("Myanmar", &["Yangon", "Mandalay"], 0.9),
    country("India", &["New Delhi", "Mumbai", "Bangalore"], 0.9),
    country("Nepal", &["Kathmandu"], 0.8),
    country("Sri Lanka", &["Colombo"], 0.9),
    country("Egypt", &["Cairo"], 0.9),
    country("Morocco", &["Marrakech", "Casablanca"], 1.0),
    country("Peru", &["Lima", "Cusco"], 1.0),
    country("Bolivia", &["La Paz"], 0.8),
    country("Colombia", &["Bogota", "Medellin"], 1.0),
];

/// City-level matches cost this much more than the national average.
const CITY_SURCHARGE: f64 = 1.2;

/// Resolved price level of a destination string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DestinationTier {
    pub factor: f64,
    pub tier: CostTier,
    pub is_city: bool,
    /// Matched country, `None` when the destination is unknown.
    pub country: Option<&'static str>,
}

impl Default for DestinationTier {
    fn default() -> Self {
        Self {
            factor: 1.0,
            tier: CostTier::Moderate,
            is_city: false,
            country: None,
        }
    }
}

/// Case-insensitive substring match of the destination against the country
/// tables, most expensive tier first. Within a country the country name is
/// tried before its cities.
pub fn destination_tier(destination: &str) -> DestinationTier {
    let needle = destination.to_lowercase();
    let tiers = [
        (CostTier::Expensive, EXPENSIVE),
        (CostTier::Moderate, MODERATE),
        (CostTier::Budget, BUDGET),
    ];

    for (tier, entries) in tiers {
        for entry in entries {
            if needle.contains(&entry.name.to_lowercase()) {
                return DestinationTier {
                    factor: entry.factor,
                    tier,
                    is_city: false,
                    country: Some(entry.name),
                };
            }
            if entry.cities.iter().any(|city| needle.contains(&city.to_lowercase())) {
                return DestinationTier {
                    factor: entry.factor * CITY_SURCHARGE,
                    tier,
                    is_city: true,
                    country: Some(entry.name),
                };
            }
        }
    }

    DestinationTier::default()
}

/// Peak months (1-12) and multiplier per country.
const PEAK_SEASONS: &[(&str, &[u32], f64)] = &[
    ("Japan", &[4, 5, 10, 11], 1.3),
    ("South Korea", &[4, 5, 11, 12], 1.25),
    ("Thailand", &[12, 1, 2], 1.4),
    ("Vietnam", &[12, 1, 2, 3, 4], 1.3),
    ("Singapore", &[6, 7, 12, 1], 1.2),
    ("France", &[6, 7, 8], 1.5),
    ("Italy", &[6, 7, 8], 1.5),
    ("United States", &[6, 7, 8, 12], 1.3),
    ("United Kingdom", &[6, 7, 8], 1.4),
    ("Australia", &[12, 1, 2], 1.3),
    ("Indonesia", &[6, 7, 8], 1.4),
];

const DEFAULT_SEASON_COUNTRY: &str = "Vietnam";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonKind {
    OffPeak,
    Peak,
    SpecialEvent,
}

impl SeasonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SeasonKind::OffPeak => "off_peak",
            SeasonKind::Peak => "peak",
            SeasonKind::SpecialEvent => "special_event",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonInfo {
    pub country: &'static str,
    pub kind: SeasonKind,
    pub factor: f64,
    pub special_event: Option<&'static str>,
}

struct SpecialEvent {
    name: &'static str,
    /// Empty means every country.
    countries: &'static [&'static str],
    factor: f64,
    active: fn(NaiveDate) -> bool,
}

const SPECIAL_EVENTS: &[SpecialEvent] = &[
    SpecialEvent {
        name: "Lunar New Year",
        countries: &["Vietnam", "China"],
        factor: 1.5,
        active: is_lunar_new_year,
    },
    SpecialEvent {
        name: "Christmas",
        countries: &[],
        factor: 1.4,
        active: is_christmas,
    },
    SpecialEvent {
        name: "New Year",
        countries: &[],
        factor: 1.4,
        active: is_new_year,
    },
    SpecialEvent {
        name: "Cherry Blossom Festival",
        countries: &["Japan"],
        factor: 1.6,
        active: is_cherry_blossom,
    },
];

/// Three days before to a week after the first lunar day.
fn is_lunar_new_year(date: NaiveDate) -> bool {
    let new_year = lunar_new_year(date.year());
    date >= new_year - Duration::days(3) && date <= new_year + Duration::days(7)
}

fn is_christmas(date: NaiveDate) -> bool {
    date.month() == 12 && (20..=26).contains(&date.day())
}

fn is_new_year(date: NaiveDate) -> bool {
    (date.month() == 12 && date.day() >= 27) || (date.month() == 1 && date.day() <= 3)
}

fn is_cherry_blossom(date: NaiveDate) -> bool {
    (date.month() == 4 && date.day() >= 15) || (date.month() == 5 && date.day() <= 10)
}

/// First day of the lunar year for the years we have dates for, Feb 1 otherwise.
pub fn lunar_new_year(year: i32) -> NaiveDate {
    let (month, day) = match year {
        2023 => (1, 22),
        2024 => (2, 10),
        2025 => (1, 29),
        2026 => (2, 17),
        2027 => (2, 6),
        2028 => (1, 26),
        2029 => (2, 13),
        2030 => (2, 3),
        _ => (2, 1),
    };
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Country whose calendar applies to `destination`: a country named in the
/// destination, else the country of a named city, else Vietnam.
fn season_country(destination: &str) -> &'static str {
    let needle = destination.to_lowercase();
    if let Some((name, _, _)) = PEAK_SEASONS
        .iter()
        .find(|(name, _, _)| needle.contains(&name.to_lowercase()))
    {
        return name;
    }
    destination_tier(destination)
        .country
        .unwrap_or(DEFAULT_SEASON_COUNTRY)
}

/// Season for a trip starting on `date`. Special events win over peak months.
pub fn travel_season(date: NaiveDate, destination: &str) -> SeasonInfo {
    let country = season_country(destination);

    let event = SPECIAL_EVENTS
        .iter()
        .find(|event| (event.countries.is_empty() || event.countries.contains(&country)) && (event.active)(date));
    if let Some(event) = event {
        return SeasonInfo {
            country,
            kind: SeasonKind::SpecialEvent,
            factor: event.factor,
            special_event: Some(event.name),
        };
    }

    let peak = PEAK_SEASONS
        .iter()
        .find(|(name, months, _)| *name == country && months.contains(&date.month()));
    match peak {
        Some((_, _, factor)) => SeasonInfo {
            country,
            kind: SeasonKind::Peak,
            factor: *factor,
            special_event: None,
        },
        None => SeasonInfo {
            country,
            kind: SeasonKind::OffPeak,
            factor: 1.0,
            special_event: None,
        },
    }
}

/// Aggregate multiplier used to rescale a single-person price to the party.
pub fn group_size_factor(number_of_people: u32) -> f64 {
    match number_of_people {
        0 | 1 => 1.0,
        2 => 1.8,
        3..=4 => 3.0,
        5..=8 => 5.2,
        n => 0.6 * n as f64 + 0.4,
    }
}

/// How a category's per-person base price grows with the party size.
pub fn people_scaling_factor(category: Category, number_of_people: u32) -> f64 {
    let n = number_of_people.max(1) as f64;
    match category.scaling_regime() {
        ScalingRegime::Group => 1.0 + 0.3 * (n - 1.0),
        ScalingRegime::Individual => n,
        ScalingRegime::Mixed => 1.0 + 0.7 * (n - 1.0),
        ScalingRegime::Unclassified => n * 0.9,
    }
}

/// Factors shared by every estimate of one itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostContext {
    pub country_factor: f64,
    pub country_type: CostTier,
    pub season_factor: f64,
    pub season: SeasonKind,
    pub group_factor: f64,
    pub number_of_people: u32,
}

impl CostContext {
    pub fn derive(destination: &str, start_date: NaiveDate, number_of_people: u32) -> Self {
        let tier = destination_tier(destination);
        let season = travel_season(start_date, destination);
        let number_of_people = number_of_people.max(1);

        debug!(
            destination,
            country_factor = tier.factor,
            tier = tier.tier.as_str(),
            season = season.kind.as_str(),
            season_factor = season.factor,
            number_of_people,
            "cost context derived"
        );

        Self {
            country_factor: tier.factor,
            country_type: tier.tier,
            season_factor: season.factor,
            season: season.kind,
            group_factor: group_size_factor(number_of_people),
            number_of_people,
        }
    }
}

impl Default for CostContext {
    fn default() -> Self {
        Self {
            country_factor: 1.0,
            country_type: CostTier::Moderate,
            season_factor: 1.0,
            season: SeasonKind::OffPeak,
            group_factor: 1.0,
            number_of_people: 1,
        }
    }
}

/// Estimated total cost of `activity` for the whole party.
pub fn estimate(activity: &Activity, context: &CostContext) -> Vnd {
    estimate_detailed(activity, context).0
}

/// Like [`estimate`], also returning the breakdown when the cost was
/// computed from the category table rather than rescaled.
pub fn estimate_detailed(activity: &Activity, context: &CostContext) -> (Vnd, Option<CostDetails>) {
    if activity.cost > 0 {
        let rescaled = activity.cost as f64 * context.group_factor * context.season_factor;
        return (rescaled.round() as Vnd, None);
    }

    let scaled = activity.category.base_cost() as f64
        * people_scaling_factor(activity.category, context.number_of_people);
    let base_cost = (scaled * context.country_factor).round();
    let total = (base_cost * context.season_factor).round() as Vnd;

    let details = CostDetails {
        base_cost: base_cost as Vnd,
        country_factor: context.country_factor,
        country_type: context.country_type.as_str().to_string(),
        season_factor: context.season_factor,
        season: context.season.as_str().to_string(),
        group_size_factor: context.group_factor,
        per_person: (total as f64 / context.number_of_people as f64).round() as Vnd,
        total,
        number_of_people: context.number_of_people,
    };
    (total, Some(details))
}

/// Applies [`estimate_detailed`] to every activity of an itinerary.
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    context: CostContext,
}

impl CostEstimator {
    pub fn new(context: CostContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &CostContext {
        &self.context
    }

    /// Travel segments keep the fare the scheduler gave them.
    pub fn estimate_itinerary(&self, mut itinerary: Itinerary) -> Itinerary {
        let mut estimated = 0usize;
        for activity in itinerary.days.iter_mut().flat_map(|day| day.schedule.iter_mut()) {
            if activity.is_travel() {
                continue;
            }
            let (cost, details) = estimate_detailed(activity, &self.context);
            activity.cost = cost;
            if details.is_some() {
                activity.cost_details = details;
            }
            estimated += 1;
        }
        debug!(activities = estimated, total = itinerary.total_cost(), "costs estimated");
        itinerary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::model::Coordinate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn activity(category: Category) -> Activity {
        Activity::new("x", category, Coordinate::default(), ClockTime::hm(12, 0), ClockTime::hm(13, 0))
    }

    #[test]
    fn test_destination_tiers() {
        let japan = destination_tier("Japan");
        assert_eq!(japan.tier, CostTier::Expensive);
        assert!(!japan.is_city);
        assert_eq!(japan.factor, 2.5);

        let tokyo = destination_tier("Tokyo, Japan");
        assert_eq!(tokyo.country, Some("Japan"));
        assert!(!tokyo.is_city, "country name is matched before cities");

        let hanoi = destination_tier("hanoi");
        assert_eq!(hanoi.tier, CostTier::Budget);
        assert!(hanoi.is_city);
        assert!((hanoi.factor - 1.2).abs() < 1e-9);

        assert_eq!(destination_tier("Atlantis"), DestinationTier::default());
    }

    #[test]
    fn test_group_size_steps() {
        assert_eq!(group_size_factor(1), 1.0);
        assert_eq!(group_size_factor(2), 1.8);
        assert_eq!(group_size_factor(4), 3.0);
        assert_eq!(group_size_factor(8), 5.2);
        assert!((group_size_factor(10) - 6.4).abs() < 1e-9);
    }

    #[test]
    fn test_scaling_regimes() {
        assert!((people_scaling_factor(Category::Museum, 3) - 1.6).abs() < 1e-9);
        assert_eq!(people_scaling_factor(Category::Restaurant, 3), 3.0);
        assert!((people_scaling_factor(Category::Taxi, 3) - 2.4).abs() < 1e-9);
        assert!((people_scaling_factor(Category::Beach, 2) - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_special_events_win_over_peak() {
        let tet = travel_season(date(2025, 1, 27), "Hanoi");
        assert_eq!(tet.kind, SeasonKind::SpecialEvent);
        assert_eq!(tet.special_event, Some("Lunar New Year"));
        assert_eq!(tet.factor, 1.5);

        let christmas = travel_season(date(2025, 12, 24), "Paris");
        assert_eq!(christmas.special_event, Some("Christmas"));

        let sakura = travel_season(date(2025, 4, 20), "Kyoto");
        assert_eq!(sakura.country, "Japan");
        assert_eq!(sakura.factor, 1.6);
    }

    #[test]
    fn test_peak_and_off_peak() {
        let peak = travel_season(date(2025, 7, 10), "France");
        assert_eq!(peak.kind, SeasonKind::Peak);
        assert_eq!(peak.factor, 1.5);

        let off = travel_season(date(2025, 6, 10), "Da Nang");
        assert_eq!(off.country, "Vietnam");
        assert_eq!(off.kind, SeasonKind::OffPeak);
        assert_eq!(off.factor, 1.0);
    }

    #[test]
    fn test_lunar_new_year_default() {
        assert_eq!(lunar_new_year(2026), date(2026, 2, 17));
        assert_eq!(lunar_new_year(2040), date(2040, 2, 1));
    }

    #[test]
    fn test_meal_scales_linearly_with_party() {
        let context = CostContext::derive("Hanoi", date(2025, 6, 10), 4);
        let (cost, details) = estimate_detailed(&activity(Category::Restaurant), &context);
        let expected = (150_000.0 * 4.0 * context.country_factor * context.season_factor).round() as Vnd;
        assert_eq!(cost, expected);
        assert_eq!(cost, 720_000);

        let details = details.unwrap();
        assert_eq!(details.per_person, 180_000);
        assert_eq!(details.country_type, "budget");
    }

    #[test]
    fn test_existing_cost_is_rescaled() {
        let context = CostContext {
            season_factor: 1.3,
            group_factor: group_size_factor(2),
            number_of_people: 2,
            ..CostContext::default()
        };
        let (cost, details) = estimate_detailed(&activity(Category::Museum).with_cost(100_000), &context);
        assert_eq!(cost, 234_000);
        assert!(details.is_none());
    }

    #[test]
    fn test_travel_segments_untouched() {
        use crate::model::{DayPlan, Itinerary};

        let mut travel = activity(Category::Travel);
        travel.cost = 7_500;
        let itinerary = Itinerary::new(vec![DayPlan::new("Day 1", vec![activity(Category::Cafe), travel])]);
        let estimator = CostEstimator::new(CostContext::default());
        let out = estimator.estimate_itinerary(itinerary);

        assert_eq!(out.days[0].schedule[0].cost, 50_000);
        assert_eq!(out.days[0].schedule[1].cost, 7_500);
    }
}
