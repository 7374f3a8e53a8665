//! Core data types for daily weather observations

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Please enter a location")]
    Empty,
}

/// Store and query key for a location.
///
/// Only surrounding whitespace is removed. Case and internal spacing are
/// kept as typed, so `"springfield"` and `"Springfield"` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocationError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Location {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Location::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}

/// One day's weather record for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub location: Location,

    pub date: NaiveDate,

    /// Daily high (°C)
    pub max_temp: f64,

    /// Daily low (°C)
    pub min_temp: f64,

    /// Relative humidity (%)
    pub humidity: f64,

    /// Precipitation (mm)
    pub precipitation: f64,
}

impl DailyObservation {
    /// Mean temperature of the day, (max + min) / 2
    pub fn mean_temp(&self) -> f64 {
        (self.max_temp + self.min_temp) / 2.0
    }

    /// Calendar month, 1-12
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Whole-year statistics for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatistics {
    pub max_temp: f64,
    pub max_temp_date: NaiveDate,
    pub min_temp: f64,
    pub min_temp_date: NaiveDate,
    pub avg_temp: f64,
    pub total_precip: f64,
}

/// Statistics for one calendar month that had at least one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Calendar month, 1-12
    pub month: u32,
    pub avg_max_temp: f64,
    pub avg_min_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_humidity: f64,
    pub total_precip: f64,
}

impl MonthlyAggregate {
    /// English month name ("January")
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}
