//! Wall-clock times within a trip day.
//!
//! Times are stored as minutes since midnight. Schedules that run past midnight
//! keep counting upwards ("24:30") instead of wrapping, so ordering stays total.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn hm(hours: u32, minutes: u32) -> Self {
        Self(hours * 60 + minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn plus_minutes(self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    /// Minutes from `earlier` to `self`, zero if `self` is not later.
    pub fn minutes_since(self, earlier: ClockTime) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    /// Parses draft-source times, tolerating "8:00", "08:00:00" and stray whitespace.
    /// Returns `None` for anything that does not look like a clock time.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let (hours, minutes) = split_hm(raw)?;
        if hours >= 48 {
            return None;
        }
        Some(Self::hm(hours, minutes))
    }
}

fn split_hm(raw: &str) -> Option<(u32, u32)> {
    let mut parts = raw.trim().split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    if let Some(seconds) = parts.next() {
        seconds.trim().parse::<u32>().ok()?;
    }
    if parts.next().is_some() || minutes >= 60 {
        return None;
    }
    Some((hours, minutes))
}

/// Accepts any "H:MM" that fits, including the long past-midnight times a
/// schedule can carry. Draft input goes through [`ClockTime::parse_lenient`].
impl FromStr for ClockTime {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        split_hm(s)
            .and_then(|(hours, minutes)| hours.checked_mul(60)?.checked_add(minutes))
            .map(Self)
            .ok_or_else(|| PlanError::InvalidInput(format!("malformed clock time {:?}", s)))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
