//! Bounded depth-first enumeration of simple cycles through a source.
//!
//! Used to cross-check the relaxation search on small graphs. The walk keeps
//! an explicit stack so deep bounds cannot overflow the call stack.

use super::{Cycle, CycleFinder};
use crate::errors::SearchError;
use crate::matrix::WeightMatrix;
use crate::SearchResult;

/// Default maximum number of vertices on an open path.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 10;

/// Result of an exhaustive bounded search.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Most negative simple cycle through the source within the bound.
    Found(Cycle),
    /// Every simple path was explored and none closes with negative weight.
    NoCycle,
    /// Nothing negative found, but some paths were cut off by the bound.
    NoCycleWithinBound,
}

impl ValidationOutcome {
    pub fn cycle(&self) -> Option<&Cycle> {
        match self {
            ValidationOutcome::Found(cycle) => Some(cycle),
            _ => None,
        }
    }

    pub fn into_cycle(self) -> Option<Cycle> {
        match self {
            ValidationOutcome::Found(cycle) => Some(cycle),
            _ => None,
        }
    }

    /// Whether the search was exhaustive over all simple cycles.
    pub fn is_exhaustive(&self) -> bool {
        !matches!(self, ValidationOutcome::NoCycleWithinBound)
    }
}

#[derive(Debug)]
struct Frame {
    vertex: usize,
    next: usize,
    weight: f64,
}

/// Depth-bounded DFS over simple paths from a source.
#[derive(Debug, Clone, Copy)]
pub struct BoundedDfs {
    max_path_length: usize,
}

impl Default for BoundedDfs {
    fn default() -> Self {
        Self {
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
        }
    }
}

impl BoundedDfs {
    /// # Errors
    ///
    /// `SearchError::ZeroDepthBound` if `max_path_length` is zero.
    pub fn new(max_path_length: usize) -> SearchResult<Self> {
        if max_path_length == 0 {
            return Err(SearchError::ZeroDepthBound);
        }
        Ok(Self { max_path_length })
    }

    pub fn max_path_length(&self) -> usize {
        self.max_path_length
    }

    /// Enumerate simple paths from `source` of at most `max_path_length`
    /// vertices and keep the most negative one that closes back to `source`.
    ///
    /// When the bound is at least the vertex count the search is exhaustive.
    pub fn search(&self, weights: &WeightMatrix, source: usize) -> SearchResult<ValidationOutcome> {
        weights.check_source(source)?;

        let size = weights.dimension();
        let mut on_path = vec![false; size];
        let mut stack = vec![Frame {
            vertex: source,
            next: 0,
            weight: 0.0,
        }];
        on_path[source] = true;

        let mut best: Option<Cycle> = None;
        let mut truncated = false;
        let mut explored = 0usize;

        while let Some(frame) = stack.last_mut() {
            if frame.next == size {
                on_path[frame.vertex] = false;
                stack.pop();
                continue;
            }

            let (current, candidate, weight_so_far) = (frame.vertex, frame.next, frame.weight);
            frame.next += 1;

            let Some(edge) = weights.weight(current, candidate) else {
                continue;
            };
            let total = weight_so_far + edge;

            if candidate == source {
                if total < best.as_ref().map_or(0.0, Cycle::weight) {
                    let mut vertices: Vec<usize> = stack.iter().map(|f| f.vertex).collect();
                    vertices.push(source);
                    best = Some(Cycle::new(vertices, total));
                }
            } else if !on_path[candidate] {
                if stack.len() < self.max_path_length {
                    on_path[candidate] = true;
                    explored += 1;
                    stack.push(Frame {
                        vertex: candidate,
                        next: 0,
                        weight: total,
                    });
                } else {
                    truncated = true;
                }
            }
        }

        tracing::debug!(
            source,
            max_path_length = self.max_path_length,
            explored,
            truncated,
            found = best.is_some(),
            "Bounded DFS completed"
        );

        Ok(match best {
            Some(cycle) => ValidationOutcome::Found(cycle),
            None if truncated => ValidationOutcome::NoCycleWithinBound,
            None => ValidationOutcome::NoCycle,
        })
    }
}

impl CycleFinder for BoundedDfs {
    fn find_cycle(&self, weights: &WeightMatrix, source: usize) -> SearchResult<Option<Cycle>> {
        Ok(self.search(weights, source)?.into_cycle())
    }
}
