//! Rate and weight matrices for a single tick.
//!
//! A tick delivers an `N x N` `RateMatrix`. The weight transform turns each
//! multiplicative rate into an additive `-ln(rate)` weight so that a
//! profitable trading loop becomes a negative-weight cycle. Absent markets are
//! carried as `None` rather than overloading a zero weight.

pub mod rate;
pub mod weight;

pub use rate::RateMatrix;
pub use weight::{negative_log, WeightMatrix};
