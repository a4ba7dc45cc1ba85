//! Cost estimation and budget allocation across a whole itinerary.

mod fixtures;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use itinerary_optimizer::budget::{allocate, cost_breakdown, rebalance, summarize, BudgetStatus};
use itinerary_optimizer::category::{BudgetBucket, Category};
use itinerary_optimizer::cost::{estimate, CostContext, CostEstimator, CostTier};
use itinerary_optimizer::model::{DayPlan, Itinerary};

use fixtures::{TestActivity, BUN_CHA_HUONG_LIEN, CAFE_GIANG, HANOI_MUSEUMS, HOAN_KIEM_LAKE, TEMPLE_OF_LITERATURE};

fn off_peak() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
}

fn hanoi_trip() -> Itinerary {
    Itinerary::new(vec![
        DayPlan::new(
            "Day 1",
            vec![
                TestActivity::at(&CAFE_GIANG).between((8, 0), (9, 0)).build(),
                TestActivity::at(&TEMPLE_OF_LITERATURE).between((9, 30), (11, 0)).build(),
                TestActivity::at(&BUN_CHA_HUONG_LIEN).between((12, 0), (13, 0)).cost(70_000).build(),
            ],
        ),
        DayPlan::new(
            "Day 2",
            vec![
                TestActivity::at(&HANOI_MUSEUMS[2]).between((9, 0), (10, 30)).build(),
                TestActivity::at(&HOAN_KIEM_LAKE).between((11, 0), (12, 0)).build(),
                TestActivity::new("Hotel de l'Opera").category(Category::Hotel).between((20, 0), (21, 0)).build(),
            ],
        ),
    ])
}

#[test]
fn four_person_meal_scales_linearly() {
    let context = CostContext::derive("Da Nang", off_peak(), 4);
    let meal = TestActivity::new("Seafood dinner").category(Category::Restaurant).build();
    let expected = (150_000.0 * 4.0 * context.country_factor * context.season_factor).round() as i64;
    assert_eq!(estimate(&meal, &context), expected);
}

#[test]
fn tet_raises_every_estimate() {
    let regular = CostContext::derive("Hanoi", off_peak(), 2);
    let tet = CostContext::derive("Hanoi", NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(), 2);
    assert_eq!(tet.season_factor, 1.5);

    let museum = TestActivity::at(&HANOI_MUSEUMS[0]).build();
    assert!(estimate(&museum, &tet) > estimate(&museum, &regular));
}

#[test]
fn estimator_fills_costs_and_details() {
    let estimator = CostEstimator::new(CostContext::derive("Hanoi", off_peak(), 2));
    let trip = estimator.estimate_itinerary(hanoi_trip());

    for activity in trip.activities() {
        if activity.category == Category::Lake {
            assert_eq!(activity.cost, 0, "lakes are free");
        } else {
            assert!(activity.cost > 0, "{} has no cost", activity.name);
        }
    }

    let bun_cha = &trip.days[0].schedule[2];
    assert_eq!(bun_cha.cost, 126_000, "70k for one, rescaled for two");
    assert!(bun_cha.cost_details.is_none());

    let temple = &trip.days[0].schedule[1];
    let details = temple.cost_details.as_ref().expect("fresh estimate has details");
    assert_eq!(details.number_of_people, 2);
    assert_eq!(details.country_type, "budget");
}

#[test]
fn tokyo_allocation_favours_lodging() {
    let allocation = allocate(10_000_000, 5, "Tokyo");
    let sum: f64 = allocation.fractions.values().sum();
    assert!((sum - 1.0).abs() < 1e-9);
    assert!(allocation.fraction(BudgetBucket::Accommodation) > 0.30);
    assert_eq!(allocation.destination.tier, CostTier::Expensive);
    assert!(allocation.destination.is_city);
}

#[test]
fn rebalanced_buckets_meet_targets() {
    let mut rng = StdRng::seed_from_u64(99);
    let categories = [Category::Restaurant, Category::Museum, Category::Hotel, Category::Taxi, Category::Shopping];

    for _ in 0..25 {
        let activities = (0..rng.random_range(1..12))
            .map(|k| {
                let category = categories[rng.random_range(0..categories.len())];
                TestActivity::new(&format!("a{}", k))
                    .category(category)
                    .cost(rng.random_range(1_000..900_000))
                    .build()
            })
            .collect();
        let trip = Itinerary::new(vec![DayPlan::new("Day 1", activities)]);
        let budget = rng.random_range(500_000..50_000_000);
        let allocation = allocate(budget, 3, "Hanoi");

        let before = cost_breakdown(&trip);
        let after = cost_breakdown(&rebalance(trip, &allocation));
        for bucket in BudgetBucket::ALL {
            if before.by_bucket[&bucket] > 0 {
                assert_eq!(after.by_bucket[&bucket], allocation.amount(bucket), "{:?}", bucket);
            } else {
                assert_eq!(after.by_bucket[&bucket], 0);
            }
        }
    }
}

#[test]
fn tight_budget_is_reported_not_rejected() {
    let allocation = allocate(100_000, 2, "Hanoi");
    let estimator = CostEstimator::new(CostContext::derive("Hanoi", off_peak(), 1));
    let mut trip = estimator.estimate_itinerary(hanoi_trip());
    summarize(&mut trip, &allocation);

    let summary = trip.budget_summary.as_ref().unwrap();
    assert_eq!(summary.status, BudgetStatus::OverBudget);
    assert!(summary.remaining_budget < 0);
    assert_eq!(summary.country_type, CostTier::Budget);
    assert_eq!(trip.days[1].budget_summary.as_ref().unwrap().day_number, 2);
}
