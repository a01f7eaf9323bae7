//! Malformed search input errors.

/// Errors raised when a rate/weight matrix or search parameter violates the
/// caller contract. The engine fails fast on these instead of attempting a
/// partial search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("Matrix is not square: {len} cells cannot form an N x N grid")]
    NonSquareMatrix { len: usize },

    #[error("Matrix row {row} has {actual} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },

    #[error("Token count {tokens} does not match matrix dimension {dimension}")]
    TokenCountMismatch { tokens: usize, dimension: usize },

    #[error("Token at position {position} carries index {index}")]
    TokenIndexMismatch { position: usize, index: usize },

    #[error("Source vertex {source_vertex} out of range for {size} tokens")]
    SourceOutOfRange { source_vertex: usize, size: usize },

    #[error("Empty matrix: no tokens in this tick")]
    EmptyMatrix,

    #[error("Depth bound must be at least 1")]
    ZeroDepthBound,
}
