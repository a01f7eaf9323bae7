//! Exact arithmetic for reserve and fee math.
//!
//! Token reserves are carried as 18-decimal fixed-point integers and routinely
//! exceed the 2^53 range where `f64` stays exact. Everything that combines
//! reserves or fees before a cycle is accepted goes through these types
//! instead of floating point.

pub mod rate;
pub mod signed;

pub use rate::ExactRate;
pub use signed::SignedBigInt;
