//! Embedded SQLite store for daily weather observations
//!
//! One table keyed by (location, date). Rows are written once and never
//! updated; duplicate inserts are skipped.

pub mod client;
pub mod queries;
pub mod schema;
pub mod store;

pub use client::*;
pub use schema::*;
pub use store::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("unable to open weather store: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    #[error("error writing weather data: {0}")]
    StorageWrite(#[source] sqlx::Error),

    #[error("error reading weather data: {0}")]
    StorageRead(#[source] sqlx::Error),

    #[error("corrupt row for {location} on {date}: {reason}")]
    CorruptRow {
        location: String,
        date: String,
        reason: String,
    },
}

impl DbError {
    /// Whether the store itself could not be reached, as opposed to a
    /// single operation failing
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::StorageUnavailable(_))
    }
}

pub type DbResult<T> = Result<T, DbError>;
