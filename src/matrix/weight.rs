//! Negative-log weight transform.

use super::RateMatrix;
use crate::errors::SearchError;
use crate::SearchResult;

/// Map a single rate to its additive edge weight.
///
/// Only finite, strictly positive rates form an edge. Zero, negative, NaN and
/// infinite rates map to `None` so they can never be mistaken for a real
/// market. A 1:1 rate yields `Some(0.0)`, a valid zero-cost edge.
pub fn negative_log(rate: f64) -> Option<f64> {
    if rate.is_finite() && rate > 0.0 {
        Some(-rate.ln())
    } else {
        None
    }
}

/// Additive edge weights derived from a `RateMatrix`.
///
/// `weight(i, j) == None` means "no edge". A profitable trading loop is a
/// cycle whose weights sum to a negative number.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    dimension: usize,
    cells: Vec<Option<f64>>,
}

impl WeightMatrix {
    /// Apply the `-ln(rate)` transform to every off-diagonal cell.
    ///
    /// The diagonal never carries an edge: a token is not traded for itself.
    pub fn from_rates(rates: &RateMatrix) -> Self {
        let dimension = rates.dimension();
        let cells = rates
            .as_flat()
            .iter()
            .enumerate()
            .map(|(cell, &rate)| {
                if cell / dimension == cell % dimension {
                    None
                } else {
                    negative_log(rate)
                }
            })
            .collect();

        Self { dimension, cells }
    }

    /// Build directly from weight rows, `None` marking absent edges.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> SearchResult<Self> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(SearchError::EmptyMatrix);
        }

        let mut cells = Vec::with_capacity(dimension * dimension);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dimension {
                return Err(SearchError::RaggedRow {
                    row,
                    expected: dimension,
                    actual: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self { dimension, cells })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Weight of the edge `from -> to`, or `None` when there is no edge or
    /// either vertex is out of range.
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.dimension || to >= self.dimension {
            return None;
        }
        self.cells[from * self.dimension + to]
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.weight(from, to).is_some()
    }

    /// All existing edges as `(from, to, weight)` in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let dimension = self.dimension;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(cell, weight)| weight.map(|w| (cell / dimension, cell % dimension, w)))
    }

    /// Sum of edge weights along `vertices`, or `None` if a hop has no edge.
    pub fn path_weight(&self, vertices: &[usize]) -> Option<f64> {
        vertices
            .windows(2)
            .map(|hop| self.weight(hop[0], hop[1]))
            .sum()
    }

    /// Fail fast when `source` does not name a vertex of this matrix.
    pub fn check_source(&self, source: usize) -> SearchResult<()> {
        if source >= self.dimension {
            return Err(SearchError::SourceOutOfRange {
                source_vertex: source,
                size: self.dimension,
            });
        }
        Ok(())
    }
}

impl From<&RateMatrix> for WeightMatrix {
    fn from(rates: &RateMatrix) -> Self {
        Self::from_rates(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_log_of_valid_rates() {
        assert!((negative_log(0.5).unwrap() - 0.5_f64.ln().abs()).abs() < 1e-12);
        assert!(negative_log(6.0).unwrap() < 0.0);
        assert_eq!(negative_log(1.0), Some(0.0));
    }

    #[test]
    fn test_negative_log_rejects_non_markets() {
        assert_eq!(negative_log(0.0), None);
        assert_eq!(negative_log(-2.0), None);
        assert_eq!(negative_log(f64::NAN), None);
        assert_eq!(negative_log(f64::INFINITY), None);
    }

    #[test]
    fn test_transform_keeps_shape_and_drops_diagonal() {
        let rates = RateMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.0],
            vec![2.0, 1.0, 1.0],
            vec![f64::NAN, 4.0, 1.0],
        ])
        .unwrap();
        let weights = WeightMatrix::from_rates(&rates);

        assert_eq!(weights.dimension(), 3);
        assert_eq!(weights.weight(0, 0), None);
        assert_eq!(weights.weight(0, 2), None);
        assert_eq!(weights.weight(2, 0), None);
        // a 1:1 market is a real zero-cost edge
        assert_eq!(weights.weight(1, 2), Some(0.0));
        assert!((weights.weight(2, 1).unwrap() + 4.0_f64.ln()).abs() < 1e-12);
        assert_eq!(weights.edges().count(), 4);
    }

    #[test]
    fn test_path_weight() {
        let weights = WeightMatrix::from_rows(vec![
            vec![None, Some(1.0), None],
            vec![None, None, Some(2.0)],
            vec![Some(-4.0), None, None],
        ])
        .unwrap();

        assert_eq!(weights.path_weight(&[0, 1, 2, 0]), Some(-1.0));
        assert_eq!(weights.path_weight(&[0, 2, 0]), None);
    }

    #[test]
    fn test_check_source() {
        let weights = WeightMatrix::from_rows(vec![vec![None, None], vec![None, None]]).unwrap();
        assert!(weights.check_source(1).is_ok());
        assert_eq!(
            weights.check_source(2),
            Err(SearchError::SourceOutOfRange { source_vertex: 2, size: 2 })
        );
    }
}
