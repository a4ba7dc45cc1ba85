//! Boundary normalization of draft itineraries.
//!
//! Draft sources return loosely shaped JSON. Everything is folded into the
//! typed model here, with defaults for whatever is missing; only a payload
//! that is not a list of days at all is rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::category::Category;
use crate::clock::ClockTime;
use crate::error::{PlanError, Result};
use crate::model::{Activity, Alternative, Coordinate, DayPlan, Itinerary, Vnd};

const DEFAULT_START: ClockTime = ClockTime::hm(8, 0);
const DEFAULT_END: ClockTime = ClockTime::hm(10, 0);
/// Price used for synthesized alternatives when the activity has none.
const FALLBACK_ALTERNATIVE_COST: Vnd = 100_000;

/// What a draft source is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRequest {
    pub destination: String,
    pub budget: Vnd,
    pub days: u32,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub start_location_name: String,
    pub start_time: ClockTime,
}

// Every field is read as a bare `Value` so that one mistyped field only
// defaults that field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDay {
    day: Option<Value>,
    day_label: Option<Value>,
    schedule: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawActivity {
    start_time: Option<Value>,
    end_time: Option<Value>,
    name: Option<Value>,
    category: Option<Value>,
    location: Option<Value>,
    address: Option<Value>,
    description: Option<Value>,
    cost: Option<Value>,
    alternatives: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAlternative {
    name: Option<Value>,
    description: Option<Value>,
    cost: Option<Value>,
}

/// Converts a draft payload into an itinerary of exactly `days` days.
///
/// Accepts either a bare array of days or an object with an `itinerary`
/// array. Extra days are cut; missing days repeat the last one.
pub fn normalize_draft(payload: Value, days: usize) -> Result<Itinerary> {
    let list = match payload {
        Value::Array(list) => list,
        Value::Object(mut object) => match object.remove("itinerary") {
            Some(Value::Array(list)) => list,
            _ => return Err(PlanError::DraftSource("draft has no itinerary array".to_string())),
        },
        _ => return Err(PlanError::DraftSource("draft is not a list of days".to_string())),
    };

    let mut plans = Vec::with_capacity(days);
    for (index, raw) in list.into_iter().enumerate() {
        let raw: RawDay = match serde_json::from_value(raw) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(day = index + 1, error = %err, "draft day is not an object, treating as empty");
                RawDay::default()
            }
        };
        plans.push(normalize_day(raw, index));
    }

    if plans.is_empty() && days > 0 {
        return Err(PlanError::DraftSource("draft contains no days".to_string()));
    }

    if plans.len() != days {
        warn!(received = plans.len(), requested = days, "draft day count mismatch, adjusting");
    }
    plans.truncate(days);
    while plans.len() < days {
        let Some(last) = plans.last() else { break };
        let mut copy = last.clone();
        copy.day_label = format!("Day {}", plans.len() + 1);
        plans.push(copy);
    }

    Ok(Itinerary::new(plans))
}

fn normalize_day(raw: RawDay, index: usize) -> DayPlan {
    let label = raw
        .day
        .as_ref()
        .and_then(text)
        .or_else(|| raw.day_label.as_ref().and_then(text))
        .unwrap_or_else(|| format!("Day {}", index + 1));

    let entries = match raw.schedule {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            warn!(day = %label, kind = value_kind(&other), "schedule is not a list, treating as empty");
            Vec::new()
        }
        None => Vec::new(),
    };

    let schedule: Vec<Activity> = entries
        .into_iter()
        .map(|entry| {
            let raw: RawActivity = serde_json::from_value(entry).unwrap_or_else(|err| {
                warn!(day = %label, error = %err, "draft activity is not an object, using defaults");
                RawActivity::default()
            });
            normalize_activity(raw)
        })
        .collect();
    debug!(day = %label, activities = schedule.len(), "draft day normalized");
    DayPlan::new(label, schedule)
}

fn normalize_activity(raw: RawActivity) -> Activity {
    let name = raw.name.as_ref().and_then(text).unwrap_or_else(|| "Unnamed activity".to_string());
    let category = match raw.category.as_ref().and_then(text).map(|label| Category::from_label(&label)) {
        // Travel segments are only ever produced by the scheduler.
        Some(Category::Travel) => Category::Transport,
        Some(category) => category,
        None => Category::Other,
    };
    let location = raw
        .location
        .and_then(|value| serde_json::from_value::<Coordinate>(value).ok())
        .unwrap_or_default();

    let start_time = raw.start_time.as_ref().and_then(clock).unwrap_or(DEFAULT_START);
    let end_time = raw.end_time.as_ref().and_then(clock).unwrap_or(DEFAULT_END);

    let cost = raw.cost.as_ref().map(lenient_money).unwrap_or(0);

    let entries = match raw.alternatives {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    };
    let mut alternatives: Vec<Alternative> = entries
        .into_iter()
        .filter_map(|entry| {
            let alt: RawAlternative = serde_json::from_value(entry).ok()?;
            Some(Alternative {
                name: alt.name.as_ref().and_then(text)?,
                description: alt.description.as_ref().and_then(text).unwrap_or_default(),
                cost: alt.cost.as_ref().map(lenient_money).unwrap_or(0),
            })
        })
        .collect();
    if alternatives.len() < 2 {
        alternatives = synthesized_alternatives(&name, cost);
    }

    let mut activity = Activity::new(name, category, location, start_time, end_time);
    activity.address = raw
        .address
        .as_ref()
        .and_then(text)
        .unwrap_or_else(|| "Address unavailable".to_string());
    activity.description = raw
        .description
        .as_ref()
        .and_then(text)
        .unwrap_or_else(|| "No description".to_string());
    activity.cost = cost;
    activity.alternatives = alternatives;
    activity
}

/// A cheaper and a pricier variant at -20% and +20%.
fn synthesized_alternatives(name: &str, cost: Vnd) -> Vec<Alternative> {
    let reference = if cost > 0 { cost } else { FALLBACK_ALTERNATIVE_COST };
    let reference = reference as f64;
    vec![
        Alternative {
            name: format!("{} (budget option)", name),
            description: format!("A cheaper alternative to {}", name),
            cost: (reference * 0.8).round() as Vnd,
        },
        Alternative {
            name: format!("{} (premium option)", name),
            description: format!("A more upscale alternative to {}", name),
            cost: (reference * 1.2).round() as Vnd,
        },
    ]
}

/// Non-blank strings as-is, numbers in their JSON form.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// "HH:MM" strings, or a bare number read as an hour of the day (9, 13.5).
fn clock(value: &Value) -> Option<ClockTime> {
    match value {
        Value::String(s) => ClockTime::parse_lenient(s),
        Value::Number(n) => {
            let hours = n.as_f64()?;
            if !(0.0..48.0).contains(&hours) {
                return None;
            }
            Some(ClockTime::from_minutes((hours * 60.0).round() as u32))
        }
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numbers are rounded. Strings that read as a plain number ("150000.50") are
/// taken as such; otherwise, like "150,000 VND", they keep their digits.
/// Anything else, and negative amounts, become zero.
fn lenient_money(value: &Value) -> Vnd {
    let amount = match value {
        Value::Number(n) => n.as_f64().map(|f| f.round() as Vnd).unwrap_or(0),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => f.round() as Vnd,
            _ => {
                let digits: String = s.chars().filter(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            }
        },
        _ => 0,
    };
    amount.max(0)
}
