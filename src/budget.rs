//! Budget split across spending buckets and rescaling of estimated costs.
//!
//! `allocate` turns a total budget into per-bucket targets. `rebalance` scales
//! every bucket of an itinerary so its costs add up to exactly that target.
//! `summarize` then attaches per-day and trip-wide status blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::category::BudgetBucket;
use crate::cost::{destination_tier, CostTier, DestinationTier};
use crate::model::{Itinerary, Vnd};

const DEFAULT_SPLIT: [(BudgetBucket, f64); 5] = [
    (BudgetBucket::Accommodation, 0.30),
    (BudgetBucket::Food, 0.25),
    (BudgetBucket::Attractions, 0.20),
    (BudgetBucket::Transportation, 0.15),
    (BudgetBucket::Other, 0.10),
];

/// Reference prices in VND for a destination with factor 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimates {
    pub budget_meal: Vnd,
    pub mid_range_meal: Vnd,
    pub fine_dining: Vnd,
    pub local_transport: Vnd,
    pub taxi_per_km: Vnd,
    pub budget_hotel: Vnd,
    pub mid_range_hotel: Vnd,
    pub luxury_hotel: Vnd,
    pub museum_entrance: Vnd,
    pub tour_guide: Vnd,
}

impl CostEstimates {
    const BASE: CostEstimates = CostEstimates {
        budget_meal: 50_000,
        mid_range_meal: 150_000,
        fine_dining: 500_000,
        local_transport: 30_000,
        taxi_per_km: 15_000,
        budget_hotel: 300_000,
        mid_range_hotel: 800_000,
        luxury_hotel: 2_000_000,
        museum_entrance: 100_000,
        tour_guide: 500_000,
    };

    fn scaled(factor: f64) -> Self {
        let s = |price: Vnd| (price as f64 * factor).round() as Vnd;
        let base = Self::BASE;
        Self {
            budget_meal: s(base.budget_meal),
            mid_range_meal: s(base.mid_range_meal),
            fine_dining: s(base.fine_dining),
            local_transport: s(base.local_transport),
            taxi_per_km: s(base.taxi_per_km),
            budget_hotel: s(base.budget_hotel),
            mid_range_hotel: s(base.mid_range_hotel),
            luxury_hotel: s(base.luxury_hotel),
            museum_entrance: s(base.museum_entrance),
            tour_guide: s(base.tour_guide),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAmounts {
    pub food: Vnd,
    pub attractions: Vnd,
    pub transportation: Vnd,
}

/// Target share of the total budget per bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAllocation {
    pub total_budget: Vnd,
    pub days: u32,
    /// Fractions sum to 1.0.
    pub fractions: BTreeMap<BudgetBucket, f64>,
    pub amounts: BTreeMap<BudgetBucket, Vnd>,
    pub daily: DailyAmounts,
    pub destination: DestinationTier,
    pub cost_estimates: CostEstimates,
}

impl BudgetAllocation {
    pub fn amount(&self, bucket: BudgetBucket) -> Vnd {
        self.amounts.get(&bucket).copied().unwrap_or(0)
    }

    pub fn fraction(&self, bucket: BudgetBucket) -> f64 {
        self.fractions.get(&bucket).copied().unwrap_or(0.0)
    }
}

/// Splits `total_budget` for a trip of `days` days to `destination`.
pub fn allocate(total_budget: Vnd, days: u32, destination: &str) -> BudgetAllocation {
    let tier = destination_tier(destination);
    let mut fractions: BTreeMap<BudgetBucket, f64> = DEFAULT_SPLIT.into_iter().collect();

    let mut shift = |bucket: BudgetBucket, delta: f64| {
        if let Some(fraction) = fractions.get_mut(&bucket) {
            *fraction += delta;
        }
    };

    if days <= 2 {
        shift(BudgetBucket::Accommodation, -0.05);
        shift(BudgetBucket::Attractions, 0.05);
    } else if days >= 7 {
        shift(BudgetBucket::Accommodation, 0.05);
        shift(BudgetBucket::Attractions, -0.05);
    }

    match tier.tier {
        CostTier::Expensive => {
            shift(BudgetBucket::Accommodation, 0.05);
            shift(BudgetBucket::Food, 0.05);
            shift(BudgetBucket::Attractions, -0.05);
            shift(BudgetBucket::Other, -0.05);
        }
        CostTier::Budget => {
            shift(BudgetBucket::Accommodation, -0.05);
            shift(BudgetBucket::Food, -0.05);
            shift(BudgetBucket::Attractions, 0.05);
            shift(BudgetBucket::Transportation, 0.05);
        }
        CostTier::Moderate => {}
    }

    if tier.is_city {
        shift(BudgetBucket::Accommodation, 0.03);
        shift(BudgetBucket::Transportation, -0.02);
        shift(BudgetBucket::Food, -0.01);
    }

    let sum: f64 = fractions.values().sum();
    for fraction in fractions.values_mut() {
        *fraction /= sum;
    }

    let amounts: BTreeMap<BudgetBucket, Vnd> = fractions
        .iter()
        .map(|(bucket, fraction)| (*bucket, (total_budget as f64 * fraction).round() as Vnd))
        .collect();

    let per_day = |bucket: BudgetBucket| {
        let amount = amounts.get(&bucket).copied().unwrap_or(0);
        (amount as f64 / days.max(1) as f64).round() as Vnd
    };
    let daily = DailyAmounts {
        food: per_day(BudgetBucket::Food),
        attractions: per_day(BudgetBucket::Attractions),
        transportation: per_day(BudgetBucket::Transportation),
    };

    debug!(
        total_budget,
        days,
        tier = tier.tier.as_str(),
        is_city = tier.is_city,
        ?fractions,
        "budget allocated"
    );

    BudgetAllocation {
        total_budget,
        days,
        fractions,
        amounts,
        daily,
        destination: tier,
        cost_estimates: CostEstimates::scaled(tier.factor),
    }
}

/// Scales every bucket with a nonzero total so it sums to its target.
///
/// Rounding remainders go to the activities with the largest fractional
/// parts, so each bucket lands on its target to the dong. Buckets whose
/// current total is zero are left as they are.
pub fn rebalance(mut itinerary: Itinerary, allocation: &BudgetAllocation) -> Itinerary {
    for bucket in BudgetBucket::ALL {
        let members: Vec<(usize, usize)> = itinerary
            .days
            .iter()
            .enumerate()
            .flat_map(|(d, day)| {
                day.schedule
                    .iter()
                    .enumerate()
                    .filter(move |(_, a)| a.category.budget_bucket() == bucket)
                    .map(move |(i, _)| (d, i))
            })
            .collect();

        let costs: Vec<i128> = members
            .iter()
            .map(|&(d, i)| itinerary.days[d].schedule[i].cost.max(0) as i128)
            .collect();
        let current: i128 = costs.iter().sum();
        if current == 0 {
            continue;
        }

        let target = allocation.amount(bucket).max(0) as i128;
        let shares = largest_remainder(&costs, current, target);
        for (&(d, i), share) in members.iter().zip(shares) {
            itinerary.days[d].schedule[i].cost = share as Vnd;
        }

        debug!(?bucket, current = current as i64, target = target as i64, "bucket rebalanced");
    }
    itinerary
}

fn largest_remainder(costs: &[i128], current: i128, target: i128) -> Vec<i128> {
    let mut shares: Vec<i128> = costs.iter().map(|c| c * target / current).collect();
    let mut leftover = target - shares.iter().sum::<i128>();

    let mut by_remainder: Vec<(usize, i128)> = costs
        .iter()
        .enumerate()
        .map(|(k, c)| (k, c * target % current))
        .collect();
    by_remainder.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    for (k, remainder) in by_remainder {
        if leftover <= 0 || remainder == 0 {
            break;
        }
        shares[k] += 1;
        leftover -= 1;
    }
    shares
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    WithinBudget,
    OverBudget,
}

impl BudgetStatus {
    pub fn of(cost: Vnd, budget: Vnd) -> Self {
        if cost <= budget {
            BudgetStatus::WithinBudget
        } else {
            BudgetStatus::OverBudget
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBudgetSummary {
    pub day_number: usize,
    pub daily_budget: Vnd,
    pub estimated_cost: Vnd,
    pub remaining: Vnd,
    pub status: BudgetStatus,
}

/// Spending hints for one day at the destination's price level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTips {
    pub recommended_accommodation: Vnd,
    pub recommended_food_per_meal: Vnd,
    pub recommended_transportation: Vnd,
    pub country_factor: f64,
    pub country_type: CostTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryBudgetSummary {
    pub total_budget: Vnd,
    pub estimated_total_cost: Vnd,
    pub remaining_budget: Vnd,
    pub status: BudgetStatus,
    pub allocation: BTreeMap<BudgetBucket, Vnd>,
    pub country_factor: f64,
    pub country_type: CostTier,
    pub is_city: bool,
}

/// Attaches day and trip budget summaries computed from current costs.
pub fn summarize(itinerary: &mut Itinerary, allocation: &BudgetAllocation) {
    let days = itinerary.days.len().max(1);
    let daily_budget = (allocation.total_budget as f64 / days as f64).round() as Vnd;
    let tips = BudgetTips {
        recommended_accommodation: allocation.cost_estimates.mid_range_hotel,
        recommended_food_per_meal: allocation.cost_estimates.mid_range_meal,
        recommended_transportation: allocation.cost_estimates.local_transport,
        country_factor: allocation.destination.factor,
        country_type: allocation.destination.tier,
    };

    for (index, day) in itinerary.days.iter_mut().enumerate() {
        let estimated_cost = day.total_cost();
        day.budget_summary = Some(DayBudgetSummary {
            day_number: index + 1,
            daily_budget,
            estimated_cost,
            remaining: daily_budget - estimated_cost,
            status: BudgetStatus::of(estimated_cost, daily_budget),
        });
        day.budget_tips = Some(tips.clone());
    }

    let estimated_total_cost = itinerary.total_cost();
    let status = BudgetStatus::of(estimated_total_cost, allocation.total_budget);
    if status == BudgetStatus::OverBudget {
        info!(
            total_budget = allocation.total_budget,
            estimated_total_cost,
            "itinerary is over budget"
        );
    }

    itinerary.budget_summary = Some(ItineraryBudgetSummary {
        total_budget: allocation.total_budget,
        estimated_total_cost,
        remaining_budget: allocation.total_budget - estimated_total_cost,
        status,
        allocation: allocation.amounts.clone(),
        country_factor: allocation.destination.factor,
        country_type: allocation.destination.tier,
        is_city: allocation.destination.is_city,
    });
}

/// Cost totals per budget bucket. Every bucket is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub total: Vnd,
    pub by_bucket: BTreeMap<BudgetBucket, Vnd>,
}

pub fn cost_breakdown(itinerary: &Itinerary) -> CostBreakdown {
    let mut by_bucket: BTreeMap<BudgetBucket, Vnd> =
        BudgetBucket::ALL.into_iter().map(|b| (b, 0)).collect();
    for activity in itinerary.activities() {
        *by_bucket.entry(activity.category.budget_bucket()).or_insert(0) += activity.cost;
    }
    CostBreakdown {
        total: by_bucket.values().sum(),
        by_bucket,
    }
}
