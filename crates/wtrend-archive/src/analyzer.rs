//! One analysis run: coverage, query, rollup, report

use crate::{ensure_coverage, ArchiveError, ArchiveResult, CoveragePolicy, CoverageReport};
use chrono::{Datelike, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{info, instrument};
use wtrend_core::{analyze, year_bounds, AnnualStatistics, Location, MonthlyAggregate};
use wtrend_db::ObservationStore;
use wtrend_ingest::{IngestError, SyntheticGenerator};

/// Everything the presentation layer needs for one location-year
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: Location,
    pub year: i32,
    pub coverage: CoverageReport,
    pub observed_days: usize,
    pub annual: AnnualStatistics,
    /// Populated months only, January first
    pub monthly: Vec<MonthlyAggregate>,
}

/// Runs the coverage check, backfill, query, and rollup for a location
pub struct WeatherAnalyzer<S, R = StdRng> {
    store: S,
    policy: CoveragePolicy,
    generator: SyntheticGenerator<R>,
}

impl<S, R> WeatherAnalyzer<S, R>
where
    S: ObservationStore,
    R: Rng,
{
    pub fn new(store: S, policy: CoveragePolicy, generator: SyntheticGenerator<R>) -> Self {
        Self {
            store,
            policy,
            generator,
        }
    }

    /// Ensure the schema exists, then wrap the store
    pub async fn connect(
        store: S,
        policy: CoveragePolicy,
        generator: SyntheticGenerator<R>,
    ) -> ArchiveResult<Self> {
        store.ensure_schema().await?;
        Ok(Self::new(store, policy, generator))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> CoveragePolicy {
        self.policy
    }

    /// Analyze `year` for a location typed by the user.
    ///
    /// A blank location is rejected before any I/O.
    #[instrument(skip(self))]
    pub async fn analyze_year(
        &mut self,
        raw_location: &str,
        year: i32,
        today: NaiveDate,
    ) -> ArchiveResult<WeatherReport> {
        let location = Location::parse(raw_location)?;
        let (start, end) = year_bounds(year).ok_or(IngestError::InvalidYear(year))?;

        let coverage = ensure_coverage(
            &self.store,
            self.policy,
            &mut self.generator,
            &location,
            year,
            today,
        )
        .await?;

        let observations = self.store.query_range(&location, start, end).await?;
        if observations.is_empty() {
            return Err(ArchiveError::NoData(location.to_string()));
        }

        let summary = analyze(&observations)?;
        info!(
            location = %location,
            days = observations.len(),
            months = summary.monthly.len(),
            "Analysis complete"
        );

        Ok(WeatherReport {
            location,
            year,
            coverage,
            observed_days: observations.len(),
            annual: summary.annual,
            monthly: summary.monthly,
        })
    }

    /// Analyze the current calendar year up to today
    pub async fn analyze_current_year(&mut self, raw_location: &str) -> ArchiveResult<WeatherReport> {
        let today = Local::now().date_naive();
        self.analyze_year(raw_location, today.year(), today).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wtrend_core::{DailyObservation, LocationError};
    use wtrend_db::DbClient;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn analyzer(policy: CoveragePolicy) -> WeatherAnalyzer<DbClient> {
        let client = DbClient::in_memory().await.unwrap();
        WeatherAnalyzer::connect(client, policy, SyntheticGenerator::seeded(21))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_blank_location_is_rejected_without_io() {
        let mut analyzer = analyzer(CoveragePolicy::default()).await;
        let err = analyzer
            .analyze_year("   ", 2024, day(2024, 5, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidInput(LocationError::Empty)));
        assert_eq!(err.to_string(), "Please enter a location");
    }

    #[tokio::test]
    async fn test_first_run_backfills_and_reports() {
        let mut analyzer = analyzer(CoveragePolicy::default()).await;
        let today = day(2024, 9, 30);

        let report = analyzer
            .analyze_year("  Springfield ", 2024, today)
            .await
            .unwrap();

        assert_eq!(report.location.as_str(), "Springfield");
        assert!(report.coverage.backfilled());
        assert_eq!(report.observed_days, 274);
        let months: Vec<u32> = report.monthly.iter().map(|m| m.month).collect();
        assert_eq!(months, (1..=9).collect::<Vec<u32>>());
        assert!(report.annual.max_temp >= report.annual.min_temp);
        assert!(report.annual.max_temp_date <= today);
    }

    #[tokio::test]
    async fn test_second_run_reuses_stored_year() {
        let mut analyzer = analyzer(CoveragePolicy::default()).await;
        let today = day(2024, 1, 1);

        let first = analyzer.analyze_year("Springfield", 2023, today).await.unwrap();
        let second = analyzer.analyze_year("Springfield", 2023, today).await.unwrap();

        assert!(first.coverage.backfilled());
        assert!(!second.coverage.backfilled());
        assert_eq!(first.annual, second.annual);
        assert_eq!(first.monthly, second.monthly);
    }

    #[tokio::test]
    async fn test_covered_real_data_is_analyzed_as_is() {
        let mut analyzer = analyzer(CoveragePolicy::MinimumCount(2)).await;
        let springfield = Location::parse("Springfield").unwrap();
        let rows = vec![
            DailyObservation {
                location: springfield.clone(),
                date: day(2024, 1, 1),
                max_temp: 2.0,
                min_temp: -3.0,
                humidity: 60.0,
                precipitation: 1.5,
            },
            DailyObservation {
                location: springfield.clone(),
                date: day(2024, 7, 15),
                max_temp: 30.0,
                min_temp: 20.0,
                humidity: 40.0,
                precipitation: 3.0,
            },
        ];
        analyzer.store().insert_batch(&rows).await.unwrap();

        let report = analyzer
            .analyze_year("Springfield", 2024, day(2024, 12, 31))
            .await
            .unwrap();

        assert!(!report.coverage.backfilled());
        assert_eq!(report.annual.max_temp, 30.0);
        assert_eq!(report.annual.max_temp_date, day(2024, 7, 15));
        assert_eq!(report.annual.min_temp, -3.0);
        assert_eq!(report.annual.min_temp_date, day(2024, 1, 1));
        assert!((report.annual.avg_temp - 12.25).abs() < 1e-9);
        assert!((report.annual.total_precip - 4.5).abs() < 1e-9);
        assert_eq!(report.monthly.len(), 2);
    }

    #[tokio::test]
    async fn test_year_with_nothing_elapsed_is_no_data() {
        let mut analyzer = analyzer(CoveragePolicy::default()).await;
        let err = analyzer
            .analyze_year("Springfield", 2030, day(2024, 6, 1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no weather data found for Springfield");
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.db");
        let today = day(2024, 1, 1);

        let first = {
            let client = DbClient::open(&path).await.unwrap();
            let mut analyzer =
                WeatherAnalyzer::connect(client, CoveragePolicy::default(), SyntheticGenerator::seeded(8))
                    .await
                    .unwrap();
            let report = analyzer.analyze_year("Springfield", 2023, today).await.unwrap();
            analyzer.store().clone().close().await;
            report
        };

        let client = DbClient::open(&path).await.unwrap();
        let mut analyzer =
            WeatherAnalyzer::connect(client, CoveragePolicy::default(), SyntheticGenerator::seeded(9))
                .await
                .unwrap();
        let second = analyzer.analyze_year("Springfield", 2023, today).await.unwrap();

        assert!(!second.coverage.backfilled());
        assert_eq!(first.annual, second.annual);
    }
}
