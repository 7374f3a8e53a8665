//! Core data types, calendar helpers, and rollup calculations for the
//! weather trend analyzer
//!
//! This crate is pure: it performs no I/O. The store, the synthetic
//! generator, and the presentation layer all build on these types.

pub mod calendar;
pub mod rollups;
pub mod season;
pub mod types;

pub use calendar::*;
pub use rollups::*;
pub use season::*;
pub use types::*;
