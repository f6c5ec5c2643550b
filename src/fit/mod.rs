//! Term search orchestration.
//!
//! Responsibilities:
//!
//! - enumerate candidate terms (all subsets of the base variables)
//! - greedily commit the best-improving term (forward selection)
//! - check a fitted equation on hold-out rows

pub mod candidates;
pub mod holdout;
pub mod selection;

pub use candidates::*;
pub use holdout::*;
pub use selection::*;
