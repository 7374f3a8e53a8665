//! Decides whether a stored year is complete enough, and backfills it if not

use crate::{ArchiveError, ArchiveResult};
use chrono::NaiveDate;
use rand::Rng;
use tracing::{info, instrument};
use wtrend_core::{elapsed_days, year_bounds, Location};
use wtrend_db::{InsertOutcome, ObservationStore};
use wtrend_ingest::{IngestError, SyntheticGenerator};

/// Stored days below which a year is backfilled
pub const DEFAULT_COVERAGE_THRESHOLD: u64 = 300;

/// When a stored year counts as covered.
///
/// Both policies look at the row count only; neither inspects which dates
/// are present. Backfill itself skips existing dates, so a gap is filled
/// whenever backfill runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoveragePolicy {
    /// Covered once at least this many days are stored
    MinimumCount(u64),
    /// Covered once every day of the year up to today is stored
    EveryElapsedDay,
}

impl Default for CoveragePolicy {
    fn default() -> Self {
        CoveragePolicy::MinimumCount(DEFAULT_COVERAGE_THRESHOLD)
    }
}

impl CoveragePolicy {
    pub fn is_satisfied(&self, stored: u64, year: i32, today: NaiveDate) -> bool {
        match *self {
            CoveragePolicy::MinimumCount(threshold) => stored >= threshold,
            CoveragePolicy::EveryElapsedDay => stored >= u64::from(elapsed_days(year, today)),
        }
    }
}

/// What [`ensure_coverage`] found and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    pub year: i32,
    pub stored_before: u64,
    /// Present when backfill ran
    pub backfill: Option<InsertOutcome>,
    pub stored_after: u64,
}

impl CoverageReport {
    pub fn backfilled(&self) -> bool {
        self.backfill.is_some()
    }
}

/// Write a synthetic year for `location` through the store.
///
/// Days after `today` are never written and existing rows are kept.
pub async fn backfill<S, R>(
    store: &S,
    generator: &mut SyntheticGenerator<R>,
    location: &Location,
    year: i32,
    today: NaiveDate,
) -> ArchiveResult<InsertOutcome>
where
    S: ObservationStore + ?Sized,
    R: Rng,
{
    let rows = generator.generate_year(location, year, today)?;
    let outcome = store.insert_batch(&rows).await?;

    info!(
        location = %location,
        year,
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        "Backfilled synthetic observations"
    );
    Ok(outcome)
}

/// Count the stored year and backfill it when `policy` is not met
#[instrument(skip(store, generator, location), fields(location = %location))]
pub async fn ensure_coverage<S, R>(
    store: &S,
    policy: CoveragePolicy,
    generator: &mut SyntheticGenerator<R>,
    location: &Location,
    year: i32,
    today: NaiveDate,
) -> ArchiveResult<CoverageReport>
where
    S: ObservationStore + ?Sized,
    R: Rng,
{
    let (start, end) = year_bounds(year).ok_or(ArchiveError::Ingest(IngestError::InvalidYear(year)))?;

    let stored_before = store.count(location, start, end).await?;
    if policy.is_satisfied(stored_before, year, today) {
        return Ok(CoverageReport {
            year,
            stored_before,
            backfill: None,
            stored_after: stored_before,
        });
    }

    info!(stored = stored_before, ?policy, "Stored year is incomplete, backfilling");
    let outcome = backfill(store, generator, location, year, today).await?;
    let stored_after = store.count(location, start, end).await?;

    Ok(CoverageReport {
        year,
        stored_before,
        backfill: Some(outcome),
        stored_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wtrend_core::DailyObservation;
    use wtrend_db::{DbClient, DbError, DbResult};

    fn springfield() -> Location {
        Location::parse("Springfield").unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn store() -> DbClient {
        let client = DbClient::in_memory().await.unwrap();
        client.ensure_schema().await.unwrap();
        client
    }

    fn real_day(date: NaiveDate) -> DailyObservation {
        DailyObservation {
            location: springfield(),
            date,
            max_temp: 42.5,
            min_temp: 30.25,
            humidity: 12.0,
            precipitation: 0.0,
        }
    }

    #[test]
    fn test_policy_thresholds() {
        let today = day(2024, 6, 30);
        let threshold = CoveragePolicy::default();
        assert!(!threshold.is_satisfied(299, 2024, today));
        assert!(threshold.is_satisfied(300, 2024, today));

        // 2024-06-30 is day 182 of a leap year
        let every = CoveragePolicy::EveryElapsedDay;
        assert!(!every.is_satisfied(181, 2024, today));
        assert!(every.is_satisfied(182, 2024, today));
    }

    #[tokio::test]
    async fn test_empty_year_triggers_backfill() {
        let client = store().await;
        let mut generator = SyntheticGenerator::seeded(1);
        let today = day(2024, 4, 15);

        let report = ensure_coverage(
            &client,
            CoveragePolicy::default(),
            &mut generator,
            &springfield(),
            2024,
            today,
        )
        .await
        .unwrap();

        assert_eq!(report.stored_before, 0);
        assert!(report.backfilled());
        assert!(report.stored_after >= u64::from(elapsed_days(2024, today)));
        assert_eq!(report.stored_after, 31 + 29 + 31 + 15);
    }

    #[tokio::test]
    async fn test_backfill_never_writes_future_dates() {
        let client = store().await;
        let mut generator = SyntheticGenerator::seeded(2);
        let today = day(2024, 8, 20);

        backfill(&client, &mut generator, &springfield(), 2024, today)
            .await
            .unwrap();

        let after_today = client
            .count_observations(&springfield(), day(2024, 8, 21), day(2024, 12, 31))
            .await
            .unwrap();
        assert_eq!(after_today, 0);
    }

    #[tokio::test]
    async fn test_backfill_keeps_real_rows() {
        let client = store().await;
        let real = real_day(day(2023, 7, 4));
        client.insert_observations(&[real.clone()]).await.unwrap();

        let mut generator = SyntheticGenerator::seeded(3);
        let outcome = backfill(&client, &mut generator, &springfield(), 2023, day(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.inserted, 364);

        let stored = client
            .observations_in_range(&springfield(), day(2023, 7, 4), day(2023, 7, 4))
            .await
            .unwrap();
        assert_eq!(stored, vec![real]);
    }

    #[tokio::test]
    async fn test_covered_year_is_left_alone() {
        let client = store().await;
        let mut generator = SyntheticGenerator::seeded(4);
        let today = day(2024, 1, 1);
        backfill(&client, &mut generator, &springfield(), 2023, today)
            .await
            .unwrap();

        let report = ensure_coverage(
            &client,
            CoveragePolicy::default(),
            &mut generator,
            &springfield(),
            2023,
            today,
        )
        .await
        .unwrap();
        assert!(!report.backfilled());
        assert_eq!(report.stored_before, 365);
        assert_eq!(report.stored_after, 365);
    }

    #[tokio::test]
    async fn test_threshold_tolerates_gaps_but_every_day_fills_them() {
        let client = store().await;
        let rows: Vec<DailyObservation> = (1..=310)
            .filter_map(|ordinal| NaiveDate::from_yo_opt(2023, ordinal))
            .map(real_day)
            .collect();
        client.insert_observations(&rows).await.unwrap();

        let today = day(2024, 1, 1);
        let mut generator = SyntheticGenerator::seeded(5);

        let report = ensure_coverage(
            &client,
            CoveragePolicy::default(),
            &mut generator,
            &springfield(),
            2023,
            today,
        )
        .await
        .unwrap();
        assert!(!report.backfilled());
        assert_eq!(report.stored_after, 310);

        let report = ensure_coverage(
            &client,
            CoveragePolicy::EveryElapsedDay,
            &mut generator,
            &springfield(),
            2023,
            today,
        )
        .await
        .unwrap();
        assert!(report.backfilled());
        assert_eq!(report.stored_after, 365);
    }

    struct ReadOnlyStore;

    #[async_trait::async_trait]
    impl ObservationStore for ReadOnlyStore {
        async fn ensure_schema(&self) -> DbResult<()> {
            Ok(())
        }

        async fn count(&self, _: &Location, _: NaiveDate, _: NaiveDate) -> DbResult<u64> {
            Ok(0)
        }

        async fn insert_batch(&self, _: &[DailyObservation]) -> DbResult<InsertOutcome> {
            Err(DbError::StorageWrite(sqlx::Error::PoolClosed))
        }

        async fn query_range(
            &self,
            _: &Location,
            _: NaiveDate,
            _: NaiveDate,
        ) -> DbResult<Vec<DailyObservation>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_write_failure_is_propagated() {
        let mut generator = SyntheticGenerator::seeded(6);
        let err = ensure_coverage(
            &ReadOnlyStore,
            CoveragePolicy::default(),
            &mut generator,
            &springfield(),
            2024,
            day(2024, 2, 1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ArchiveError::Database(DbError::StorageWrite(_))));
    }
}
