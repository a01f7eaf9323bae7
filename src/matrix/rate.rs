//! Square exchange-rate grid for a single tick.

use crate::errors::SearchError;
use crate::SearchResult;
use serde::{Deserialize, Serialize};

/// Row-major `N x N` grid where `rate(i, j)` is the units of token `j`
/// obtained per unit of token `i`. Zero means no direct market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct RateMatrix {
    dimension: usize,
    cells: Vec<f64>,
}

impl RateMatrix {
    /// Build from a flat row-major buffer whose length must be a perfect square.
    pub fn from_flat(cells: Vec<f64>) -> SearchResult<Self> {
        if cells.is_empty() {
            return Err(SearchError::EmptyMatrix);
        }

        let dimension = (cells.len() as f64).sqrt().round() as usize;
        if dimension * dimension != cells.len() {
            return Err(SearchError::NonSquareMatrix { len: cells.len() });
        }

        Ok(Self { dimension, cells })
    }

    /// Build from rows; every row must have as many columns as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> SearchResult<Self> {
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

    /// Number of tokens (rows/columns).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Rate from token `from` to token `to`. Panics if either index is out of range.
    pub fn rate(&self, from: usize, to: usize) -> f64 {
        self.cells[from * self.dimension + to]
    }

    /// Overwrite a single rate. Panics if either index is out of range.
    pub fn set_rate(&mut self, from: usize, to: usize, rate: f64) {
        self.cells[from * self.dimension + to] = rate;
    }

    pub fn as_flat(&self) -> &[f64] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.dimension)
    }
}

impl TryFrom<Vec<Vec<f64>>> for RateMatrix {
    type Error = SearchError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<RateMatrix> for Vec<Vec<f64>> {
    fn from(matrix: RateMatrix) -> Self {
        matrix.rows().map(<[f64]>::to_vec).collect()
    }
}
