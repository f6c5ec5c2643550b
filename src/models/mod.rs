//! Linear equation model.
//!
//! The equation owns its response and active terms; fitting and probing are
//! pure functions over borrowed term lists so search code can stay generic.

pub mod equation;

pub use equation::*;
