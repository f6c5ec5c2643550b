//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - predictor terms and their registry (`Term`, `TermSet`)
//! - normal equations (`NormalSystem`)
//! - search inputs/outputs (`Variable`, `Candidate`, `SelectionStep`)
//! - run configuration (`SelectConfig`, `ProbeConfig`, `RowRange`)

pub mod types;

pub use types::*;
