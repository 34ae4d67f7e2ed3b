//! Climate and season models

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ParseEnumError;

/// Upper latitude bound (exclusive) of the desert band
pub const DESERT_MAX_LATITUDE: f64 = 28.0;
/// Upper latitude bound (exclusive) of the steppe band
pub const STEPPE_MAX_LATITUDE: f64 = 32.0;
/// Upper latitude bound (exclusive) of the mediterranean band
pub const MEDITERRANEAN_MAX_LATITUDE: f64 = 35.5;

/// Coarse climate band derived from latitude.
///
/// The bands are a proxy for aridity across North Africa and are not
/// meaningful outside that region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    Coastal,
    Mediterranean,
    Steppe,
    Desert,
}

impl ClimateZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateZone::Coastal => "coastal",
            ClimateZone::Mediterranean => "mediterranean",
            ClimateZone::Steppe => "steppe",
            ClimateZone::Desert => "desert",
        }
    }

    /// Days added to (or removed from) the base watering interval
    pub fn watering_adjustment_days(&self) -> i64 {
        match self {
            ClimateZone::Desert => -1,
            ClimateZone::Steppe => 0,
            ClimateZone::Mediterranean | ClimateZone::Coastal => 1,
        }
    }
}

impl std::fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClimateZone {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coastal" => Ok(ClimateZone::Coastal),
            "mediterranean" => Ok(ClimateZone::Mediterranean),
            "steppe" => Ok(ClimateZone::Steppe),
            "desert" => Ok(ClimateZone::Desert),
            other => Err(ParseEnumError::new("climate zone", other)),
        }
    }
}

/// Map a latitude to its climate band.
///
/// Missing or non-finite latitudes fall back to [`ClimateZone::Mediterranean`].
/// Longitude plays no part in the classification.
pub fn detect_climate(latitude: Option<f64>) -> ClimateZone {
    let lat = match latitude {
        Some(lat) if lat.is_finite() => lat,
        _ => return ClimateZone::Mediterranean,
    };

    if lat < DESERT_MAX_LATITUDE {
        ClimateZone::Desert
    } else if lat < STEPPE_MAX_LATITUDE {
        ClimateZone::Steppe
    } else if lat < MEDITERRANEAN_MAX_LATITUDE {
        ClimateZone::Mediterranean
    } else {
        ClimateZone::Coastal
    }
}

/// Meteorological season (northern hemisphere)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Season for a calendar month (1-12)
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn of(date: &DateTime<Utc>) -> Self {
        Self::from_month(date.month())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }

    /// Days added to (or removed from) the base watering interval
    pub fn watering_adjustment_days(&self) -> i64 {
        match self {
            Season::Summer => -2,
            Season::Winter => 3,
            Season::Spring | Season::Autumn => 0,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
