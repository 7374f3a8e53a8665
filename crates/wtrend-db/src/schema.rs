//! Table layout and row types for the observation store

use crate::{DbError, DbResult};
use chrono::NaiveDate;
use sqlx::FromRow;
use wtrend_core::{DailyObservation, Location};

/// Storage format of the `date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Table names
pub mod tables {
    pub const WEATHER_DATA: &str = "weather_data";
}

/// Idempotent schema creation
pub const CREATE_WEATHER_DATA: &str = r#"
    CREATE TABLE IF NOT EXISTS weather_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        location TEXT NOT NULL,
        date TEXT NOT NULL,
        max_temp REAL NOT NULL,
        min_temp REAL NOT NULL,
        humidity REAL NOT NULL,
        precipitation REAL NOT NULL,
        UNIQUE(location, date)
    )
"#;

/// One row of `weather_data`
#[derive(Debug, Clone, FromRow)]
pub struct ObservationRow {
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub humidity: f64,
    pub precipitation: f64,
}

impl ObservationRow {
    pub fn into_observation(self) -> DbResult<DailyObservation> {
        let corrupt = |reason: String| DbError::CorruptRow {
            location: self.location.clone(),
            date: self.date.clone(),
            reason,
        };

        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| corrupt(e.to_string()))?;
        let location = Location::parse(&self.location).map_err(|e| corrupt(e.to_string()))?;

        Ok(DailyObservation {
            location,
            date,
            max_temp: self.max_temp,
            min_temp: self.min_temp,
            humidity: self.humidity,
            precipitation: self.precipitation,
        })
    }
}

/// Format a date for the `date` column
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str) -> ObservationRow {
        ObservationRow {
            location: "Springfield".to_string(),
            date: date.to_string(),
            max_temp: 2.0,
            min_temp: -3.0,
            humidity: 60.0,
            precipitation: 0.0,
        }
    }

    #[test]
    fn test_row_conversion() {
        let obs = row("2024-02-29").into_observation().unwrap();
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(obs.location.as_str(), "Springfield");
    }

    #[test]
    fn test_bad_date_is_corrupt_row() {
        let err = row("2023-02-29").into_observation().unwrap_err();
        assert!(matches!(err, DbError::CorruptRow { .. }));
    }

    #[test]
    fn test_date_format_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
    }

    #[test]
    fn test_table_names() {
        assert_eq!(tables::WEATHER_DATA, "weather_data");
        assert!(CREATE_WEATHER_DATA.contains("UNIQUE(location, date)"));
    }
}
