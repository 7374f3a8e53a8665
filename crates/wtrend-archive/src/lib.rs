//! Year coverage, synthetic backfill, and report assembly
//!
//! Ties the observation store, the synthetic generator, and the rollup
//! engine together into one analysis run per (location, year).

pub mod analyzer;
pub mod coverage;

pub use analyzer::*;
pub use coverage::*;

use thiserror::Error;
use wtrend_core::{AnalysisError, LocationError};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{0}")]
    InvalidInput(#[from] LocationError),

    #[error(transparent)]
    Database(#[from] wtrend_db::DbError),

    #[error(transparent)]
    Ingest(#[from] wtrend_ingest::IngestError),

    #[error("no weather data found for {0}")]
    NoData(String),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

impl ArchiveError {
    /// The store could not be opened or initialized at all
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, ArchiveError::Database(e) if e.is_unavailable())
    }
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
