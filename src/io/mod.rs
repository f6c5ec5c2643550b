//! Input helpers.
//!
//! - CSV ingest of the measurement table (`ingest`)

pub mod ingest;

pub use ingest::*;
