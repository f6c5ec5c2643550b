//! `rgr` library crate.
//!
//! Forward-selection linear regression over interaction terms: every
//! non-empty subset of a few base variables is a candidate predictor, and the
//! search greedily commits whichever candidate most lowers the relative
//! residual of a least-squares fit.
//!
//! The binary (`rgr`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the term algebra and search can be driven from other code

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
