//! Negative-cycle search over a `WeightMatrix`.
//!
//! `BellmanFord` is the production search. `BoundedDfs` enumerates simple
//! cycles up to a depth bound and serves as its correctness oracle. Both sit
//! behind the `CycleFinder` trait so the engine can swap or combine them.

pub mod acceptance;
pub mod bellman_ford;
pub mod cycle;
pub mod dfs;

pub use acceptance::{AcceptancePolicy, Rejection, MIN_CYCLE_LENGTH};
pub use bellman_ford::BellmanFord;
pub use cycle::Cycle;
pub use dfs::{BoundedDfs, ValidationOutcome, DEFAULT_MAX_PATH_LENGTH};

use crate::matrix::WeightMatrix;
use crate::SearchResult;

/// A strategy that finds the best negative cycle through `source`.
pub trait CycleFinder: Send + Sync {
    fn find_cycle(&self, weights: &WeightMatrix, source: usize) -> SearchResult<Option<Cycle>>;
}
