//! Observation sources
//!
//! Real weather-service ingestion is not wired up yet; the synthetic
//! generator fills a year with plausible seasonal data instead.

pub mod simulator;

pub use simulator::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot generate observations for year {0}")]
    InvalidYear(i32),
}

pub type IngestResult<T> = Result<T, IngestError>;
