//! Synthetic daily observations for backfilling a year

use crate::{IngestError, IngestResult};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wtrend_core::{days_in_month, year_bounds, DailyObservation, Location, Season};

/// Half-width of the random band around the seasonal high (°C)
const MAX_TEMP_NOISE: f64 = 4.0;
/// Nights are at least this much cooler than the day's high (°C)
const MIN_DIURNAL_RANGE: f64 = 5.0;
/// Extra random cooling on top of the minimum range (°C)
const EXTRA_DIURNAL_RANGE: f64 = 5.0;
const BASE_HUMIDITY: f64 = 50.0;
const HUMIDITY_NOISE: f64 = 20.0;
const HUMIDITY_FLOOR: f64 = 10.0;
const HUMIDITY_CEILING: f64 = 100.0;
/// Share of days with any precipitation
const WET_DAY_PROBABILITY: f64 = 0.3;
/// Random precipitation added to the seasonal base on wet days (mm)
const PRECIP_NOISE: f64 = 10.0;

/// Seasonal weather generator over a pluggable random source
pub struct SyntheticGenerator<R = StdRng> {
    rng: R,
}

impl SyntheticGenerator<StdRng> {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SyntheticGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One plausible day for `location`
    pub fn generate_day(&mut self, location: &Location, date: NaiveDate) -> DailyObservation {
        let season = Season::from_month(date.month());

        let max_temp =
            season.baseline_max_temp() + self.rng.gen_range(-MAX_TEMP_NOISE..MAX_TEMP_NOISE);
        let min_temp =
            max_temp - MIN_DIURNAL_RANGE - self.rng.gen_range(0.0..EXTRA_DIURNAL_RANGE);

        let humidity = (BASE_HUMIDITY + self.rng.gen_range(-HUMIDITY_NOISE..HUMIDITY_NOISE))
            .clamp(HUMIDITY_FLOOR, HUMIDITY_CEILING);

        let precipitation = if self.rng.gen_bool(WET_DAY_PROBABILITY) {
            season.base_precipitation() + self.rng.gen_range(0.0..PRECIP_NOISE)
        } else {
            0.0
        };

        DailyObservation {
            location: location.clone(),
            date,
            max_temp,
            min_temp,
            humidity,
            precipitation,
        }
    }

    /// Every day of `year` up to and including `today`, oldest first.
    /// Future days are never produced.
    pub fn generate_year(
        &mut self,
        location: &Location,
        year: i32,
        today: NaiveDate,
    ) -> IngestResult<Vec<DailyObservation>> {
        year_bounds(year).ok_or(IngestError::InvalidYear(year))?;

        let mut rows = Vec::with_capacity(366);
        for month in 1..=12 {
            for day in 1..=days_in_month(year, month) {
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    continue;
                };
                if date > today {
                    tracing::debug!(
                        location = %location,
                        generated = rows.len(),
                        "Stopping synthetic generation at {}",
                        today
                    );
                    return Ok(rows);
                }
                rows.push(self.generate_day(location, date));
            }
        }

        Ok(rows)
    }
}
