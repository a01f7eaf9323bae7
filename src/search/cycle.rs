//! Closed trading loops found by the searches.

use crate::matrix::WeightMatrix;
use itertools::Itertools;
use std::fmt;

/// An ordered loop of token indices `[src, v1, ..., src]` and its total weight.
///
/// The weight is the sum of `-ln(rate)` over consecutive hops, so a negative
/// weight means the compounded rate around the loop exceeds 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    vertices: Vec<usize>,
    weight: f64,
}

impl Cycle {
    pub(crate) fn new(vertices: Vec<usize>, weight: f64) -> Self {
        Self { vertices, weight }
    }

    /// Build a cycle from its vertex sequence, summing weights hop by hop.
    ///
    /// Returns `None` if any consecutive pair has no edge or names a vertex
    /// outside the matrix.
    pub fn from_vertices(weights: &WeightMatrix, vertices: Vec<usize>) -> Option<Self> {
        let weight = vertices
            .iter()
            .tuple_windows()
            .map(|(&from, &to)| weights.weight(from, to))
            .sum::<Option<f64>>()?;

        Some(Self { vertices, weight })
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Vertex count, including the repeated source at the end.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of trades in the loop.
    pub fn hop_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<usize> {
        self.vertices.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.vertices.last().copied()
    }

    /// Compounded rate around the loop (`exp(-weight)`).
    pub fn expected_return(&self) -> f64 {
        (-self.weight).exp()
    }

    pub fn profit_percentage(&self) -> f64 {
        (self.expected_return() - 1.0) * 100.0
    }

    /// Consecutive `(from, to)` hops.
    pub fn hops(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.vertices.iter().copied().tuple_windows()
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.6})", self.vertices.iter().join(" -> "), self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vertices_sums_hops() {
        let weights = WeightMatrix::from_rows(vec![
            vec![None, Some(0.5), None],
            vec![None, None, Some(0.25)],
            vec![Some(-1.0), None, None],
        ])
        .unwrap();

        let cycle = Cycle::from_vertices(&weights, vec![0, 1, 2, 0]).unwrap();
        assert_eq!(cycle.weight(), -0.25);
        assert_eq!(cycle.len(), 4);
        assert_eq!(cycle.hop_count(), 3);
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.expected_return() > 1.0);
        assert_eq!(cycle.hops().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 0)]);
        assert_eq!(cycle.to_string(), "0 -> 1 -> 2 -> 0 (-0.250000)");

        assert!(Cycle::from_vertices(&weights, vec![0, 2, 0]).is_none());
    }

    #[test]
    fn test_from_vertices_out_of_range() {
        let weights = WeightMatrix::from_rows(vec![vec![None, Some(0.1)], vec![Some(0.1), None]]).unwrap();

        assert!(Cycle::from_vertices(&weights, vec![0, 1, 0]).is_some());
        assert!(Cycle::from_vertices(&weights, vec![0, 5, 0]).is_none());
        assert!(Cycle::from_vertices(&weights, vec![7, 0]).is_none());
    }
}
