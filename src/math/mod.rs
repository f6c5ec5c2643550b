//! Mathematical utilities: product sums over terms and the pseudo-inverse solver.

pub mod pinv;
pub mod product_sum;

pub use pinv::*;
pub use product_sum::*;
