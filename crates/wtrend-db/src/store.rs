//! Store contract used by the coverage policy and the analyzer

use crate::{DbClient, DbResult};
use chrono::NaiveDate;
use wtrend_core::{DailyObservation, Location};

/// Result of a batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Rows written
    pub inserted: u64,
    /// Rows whose (location, date) key already existed
    pub skipped: u64,
}

/// Append-only collection of daily observations keyed by (location, date)
#[async_trait::async_trait]
pub trait ObservationStore: Send + Sync {
    /// Idempotently create the backing table
    async fn ensure_schema(&self) -> DbResult<()>;

    /// Observations stored for `location` within [start, end]
    async fn count(&self, location: &Location, start: NaiveDate, end: NaiveDate) -> DbResult<u64>;

    /// All-or-nothing insert; existing keys are skipped, never overwritten
    async fn insert_batch(&self, rows: &[DailyObservation]) -> DbResult<InsertOutcome>;

    /// Observations within [start, end] in ascending date order
    async fn query_range(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<DailyObservation>>;
}

#[async_trait::async_trait]
impl ObservationStore for DbClient {
    async fn ensure_schema(&self) -> DbResult<()> {
        DbClient::ensure_schema(self).await
    }

    async fn count(&self, location: &Location, start: NaiveDate, end: NaiveDate) -> DbResult<u64> {
        self.count_observations(location, start, end).await
    }

    async fn insert_batch(&self, rows: &[DailyObservation]) -> DbResult<InsertOutcome> {
        self.insert_observations(rows).await
    }

    async fn query_range(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<DailyObservation>> {
        self.observations_in_range(location, start, end).await
    }
}
