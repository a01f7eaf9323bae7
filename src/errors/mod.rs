//! Error handling for the cycle arbitrage engine.
//!
//! Errors are split by the component that raises them:
//!
//! - **`SearchError`**: malformed inputs handed to the weight transform or the cycle searches
//! - **`GraphError`**: reserve/fee store lookups and pool-rate derivation
//! - **`UtilityError`**: fixed-point parsing and numeric conversions
//! - **`ConfigError`**: invalid engine configuration values
//!
//! `ArbitrageError` wraps all of them so callers can use `?` across module
//! boundaries. Finding no cycle on a tick is a normal outcome and is never
//! represented as an error.

pub mod config;
pub mod graph;
pub mod search;
pub mod utility;

pub use config::ConfigError;
pub use graph::GraphError;
pub use search::SearchError;
pub use utility::UtilityError;

/// Main result type for the library
pub type Result<T> = std::result::Result<T, ArbitrageError>;

/// Top-level error enum that encompasses all possible errors in the engine.
#[derive(Debug, thiserror::Error)]
pub enum ArbitrageError {
    /// Caller contract violation on a search or transform input.
    ///
    /// Raised before any work is done: non-square matrices, token lists that
    /// do not match the matrix dimension, and out-of-range source vertices.
    #[error("Invalid input: {0}")]
    Search(#[from] SearchError),

    /// Error in reserve/fee store operations.
    #[error("Graph operation failed: {0}")]
    Graph(#[from] GraphError),

    /// Error in fixed-point parsing or numeric conversion.
    #[error("Utility error: {0}")]
    Utility(#[from] UtilityError),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization or deserialization error for tick snapshots.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while reading a tick snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for cases not covered by specific error types.
    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}

impl ArbitrageError {
    /// Whether this error is a caller contract violation on search input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ArbitrageError::Search(_))
    }
}
