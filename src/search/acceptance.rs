//! Gate deciding whether a found cycle is worth acting on.

use super::Cycle;
use std::fmt;

/// Minimum vertex count (repeated source included) of an accepted cycle.
pub const MIN_CYCLE_LENGTH: usize = 4;

/// Reason a cycle was turned down.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    NotProfitable { weight: f64 },
    TooShort { length: usize, min_length: usize },
    WrongEndpoints { source_vertex: usize, first: Option<usize>, last: Option<usize> },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotProfitable { weight } => {
                write!(f, "cycle weight {weight} is not negative")
            }
            Rejection::TooShort { length, min_length } => {
                write!(f, "cycle has {length} vertices, need at least {min_length}")
            }
            Rejection::WrongEndpoints {
                source_vertex,
                first,
                last,
            } => write!(
                f,
                "cycle runs {first:?} -> {last:?}, expected to start and end at {source_vertex}"
            ),
        }
    }
}

/// Accepts a cycle only if it is profitable, long enough and anchored at the
/// source on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptancePolicy {
    min_length: usize,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_CYCLE_LENGTH,
        }
    }
}

impl AcceptancePolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Check `cycle` against the policy for a search rooted at `source`.
    pub fn evaluate(&self, cycle: &Cycle, source: usize) -> Result<(), Rejection> {
        if cycle.weight() >= 0.0 || cycle.weight().is_nan() {
            return Err(Rejection::NotProfitable {
                weight: cycle.weight(),
            });
        }

        if cycle.len() < self.min_length {
            return Err(Rejection::TooShort {
                length: cycle.len(),
                min_length: self.min_length,
            });
        }

        if cycle.first() != Some(source) || cycle.last() != Some(source) {
            return Err(Rejection::WrongEndpoints {
                source_vertex: source,
                first: cycle.first(),
                last: cycle.last(),
            });
        }

        Ok(())
    }

    pub fn accepts(&self, cycle: &Cycle, source: usize) -> bool {
        match self.evaluate(cycle, source) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(source, cycle = %cycle, %reason, "Cycle rejected");
                false
            }
        }
    }
}
