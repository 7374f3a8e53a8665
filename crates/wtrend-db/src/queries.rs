//! Query operations on the `weather_data` table

use crate::schema::{format_date, ObservationRow, CREATE_WEATHER_DATA};
use crate::{DbClient, DbError, DbResult, InsertOutcome};
use chrono::NaiveDate;
use tracing::{debug, instrument};
use wtrend_core::{DailyObservation, Location};

impl DbClient {
    /// Create the observation table if it does not exist yet
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> DbResult<()> {
        sqlx::query(CREATE_WEATHER_DATA)
            .execute(self.pool())
            .await
            .map_err(DbError::StorageUnavailable)?;

        debug!("Schema ensured");
        Ok(())
    }

    /// Count observations for a location in an inclusive date range
    #[instrument(skip(self, location), fields(location = %location))]
    pub async fn count_observations(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM weather_data
            WHERE location = ? AND date BETWEEN ? AND ?
            "#,
        )
        .bind(location.as_str())
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_one(self.pool())
        .await
        .map_err(DbError::StorageRead)?;

        Ok(count.max(0) as u64)
    }

    /// Insert observations in one transaction, skipping existing
    /// (location, date) keys. Nothing is committed if any statement fails.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn insert_observations(&self, rows: &[DailyObservation]) -> DbResult<InsertOutcome> {
        let mut tx = self.pool().begin().await.map_err(DbError::StorageWrite)?;
        let mut inserted = 0u64;

        for row in rows {
            let result = sqlx::query(
                r#"
                INSERT INTO weather_data (location, date, max_temp, min_temp, humidity, precipitation)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(location, date) DO NOTHING
                "#,
            )
            .bind(row.location.as_str())
            .bind(format_date(row.date))
            .bind(row.max_temp)
            .bind(row.min_temp)
            .bind(row.humidity)
            .bind(row.precipitation)
            .execute(&mut *tx)
            .await
            .map_err(DbError::StorageWrite)?;

            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(DbError::StorageWrite)?;

        let outcome = InsertOutcome {
            inserted,
            skipped: rows.len() as u64 - inserted,
        };
        debug!(
            "Inserted {} observations, skipped {} existing",
            outcome.inserted, outcome.skipped
        );
        Ok(outcome)
    }

    /// Observations for a location in an inclusive date range, oldest first
    #[instrument(skip(self, location), fields(location = %location))]
    pub async fn observations_in_range(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<DailyObservation>> {
        let rows = sqlx::query_as::<_, ObservationRow>(
            r#"
            SELECT location, date, max_temp, min_temp, humidity, precipitation
            FROM weather_data
            WHERE location = ? AND date BETWEEN ? AND ?
            ORDER BY date ASC
            "#,
        )
        .bind(location.as_str())
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_all(self.pool())
        .await
        .map_err(DbError::StorageRead)?;

        debug!(
            "Retrieved {} observations between {} and {}",
            rows.len(),
            start,
            end
        );
        rows.into_iter().map(ObservationRow::into_observation).collect()
    }
}
