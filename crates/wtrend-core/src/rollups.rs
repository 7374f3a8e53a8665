//! Annual and monthly rollups over a year of daily observations

use crate::types::{AnnualStatistics, DailyObservation, MonthlyAggregate};
use chrono::NaiveDate;

/// Seed for running maxima. Any real reading replaces it.
pub const MAX_SEED: f64 = f64::NEG_INFINITY;

/// Seed for running minima. Any real reading replaces it.
pub const MIN_SEED: f64 = f64::INFINITY;

/// Rollup error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("no weather data to analyze")]
    NoData,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Running extremum and the date it was first reached.
///
/// Replacement is strict, so on ties the earliest observation fed in wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub value: f64,
    pub date: Option<NaiveDate>,
}

impl Extremum {
    pub fn max_seed() -> Self {
        Self {
            value: MAX_SEED,
            date: None,
        }
    }

    pub fn min_seed() -> Self {
        Self {
            value: MIN_SEED,
            date: None,
        }
    }

    /// Keep the larger of the current value and `value`
    pub fn raise(self, value: f64, date: NaiveDate) -> Self {
        if value > self.value {
            Self {
                value,
                date: Some(date),
            }
        } else {
            self
        }
    }

    /// Keep the smaller of the current value and `value`
    pub fn lower(self, value: f64, date: NaiveDate) -> Self {
        if value < self.value {
            Self {
                value,
                date: Some(date),
            }
        } else {
            self
        }
    }
}

/// Sums and extrema for one calendar month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthBucket {
    pub count: u32,
    pub sum_max_temp: f64,
    pub sum_min_temp: f64,
    pub sum_humidity: f64,
    pub total_precip: f64,
    pub max_temp: f64,
    pub min_temp: f64,
}

impl Default for MonthBucket {
    fn default() -> Self {
        Self {
            count: 0,
            sum_max_temp: 0.0,
            sum_min_temp: 0.0,
            sum_humidity: 0.0,
            total_precip: 0.0,
            max_temp: MAX_SEED,
            min_temp: MIN_SEED,
        }
    }
}

impl MonthBucket {
    fn add(mut self, obs: &DailyObservation) -> Self {
        // Monthly max tracks highs only, monthly min tracks lows only
        if obs.max_temp > self.max_temp {
            self.max_temp = obs.max_temp;
        }
        if obs.min_temp < self.min_temp {
            self.min_temp = obs.min_temp;
        }
        self.count += 1;
        self.sum_max_temp += obs.max_temp;
        self.sum_min_temp += obs.min_temp;
        self.sum_humidity += obs.humidity;
        self.total_precip += obs.precipitation;
        self
    }

    fn is_populated(&self) -> bool {
        self.count > 0
    }

    fn finish(&self, month: u32) -> MonthlyAggregate {
        let n = f64::from(self.count);
        MonthlyAggregate {
            month,
            avg_max_temp: self.sum_max_temp / n,
            avg_min_temp: self.sum_min_temp / n,
            max_temp: self.max_temp,
            min_temp: self.min_temp,
            avg_humidity: self.sum_humidity / n,
            total_precip: self.total_precip,
        }
    }
}

/// Fold state for one location-year
#[derive(Debug, Clone, PartialEq)]
pub struct YearAccumulator {
    pub annual_max: Extremum,
    pub annual_min: Extremum,
    pub sum_daily_mean: f64,
    pub days: u32,
    pub total_precip: f64,
    /// Index is month - 1
    pub months: [MonthBucket; 12],
}

impl Default for YearAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl YearAccumulator {
    pub fn new() -> Self {
        Self {
            annual_max: Extremum::max_seed(),
            annual_min: Extremum::min_seed(),
            sum_daily_mean: 0.0,
            days: 0,
            total_precip: 0.0,
            months: [MonthBucket::default(); 12],
        }
    }

    /// Fold one observation in
    pub fn add(mut self, obs: &DailyObservation) -> Self {
        self.annual_max = self.annual_max.raise(obs.max_temp, obs.date);
        self.annual_min = self.annual_min.lower(obs.min_temp, obs.date);
        self.sum_daily_mean += obs.mean_temp();
        self.days += 1;
        self.total_precip += obs.precipitation;

        let idx = obs.month() as usize - 1;
        self.months[idx] = self.months[idx].add(obs);
        self
    }

    /// Mean of the daily means, 0.0 before any observation
    pub fn avg_temp(&self) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        self.sum_daily_mean / f64::from(self.days)
    }

    /// Populated months in calendar order
    pub fn monthly(&self) -> Vec<MonthlyAggregate> {
        (1u32..)
            .zip(self.months.iter())
            .filter(|(_, bucket)| bucket.is_populated())
            .map(|(month, bucket)| bucket.finish(month))
            .collect()
    }

    pub fn finish(self) -> AnalysisResult<YearSummary> {
        let (Some(max_temp_date), Some(min_temp_date)) =
            (self.annual_max.date, self.annual_min.date)
        else {
            return Err(AnalysisError::NoData);
        };

        Ok(YearSummary {
            annual: AnnualStatistics {
                max_temp: self.annual_max.value,
                max_temp_date,
                min_temp: self.annual_min.value,
                min_temp_date,
                avg_temp: self.avg_temp(),
                total_precip: self.total_precip,
            },
            monthly: self.monthly(),
        })
    }
}

/// Output of [`analyze`]
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub annual: AnnualStatistics,
    pub monthly: Vec<MonthlyAggregate>,
}

/// Compute annual statistics and monthly aggregates in one pass.
///
/// Input is expected in ascending date order with no duplicate days; the
/// store guarantees both. Extremum ties resolve to the first observation.
pub fn analyze(observations: &[DailyObservation]) -> AnalysisResult<YearSummary> {
    if observations.is_empty() {
        return Err(AnalysisError::NoData);
    }

    observations
        .iter()
        .fold(YearAccumulator::new(), YearAccumulator::add)
        .finish()
}
