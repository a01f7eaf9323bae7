//! Per-tick input: token set, rate matrix and timestamp.

use crate::errors::{Result, SearchError};
use crate::matrix::RateMatrix;
use crate::SearchResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A token participating in one tick.
///
/// `index` is dense in `0..N` for the tick only; `address` identifies the
/// token for name lookup and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    #[serde(with = "crate::utils::hex_address")]
    pub address: Vec<u8>,
}

impl Token {
    pub fn new(index: usize, address: impl Into<Vec<u8>>) -> Self {
        Self {
            index,
            address: address.into(),
        }
    }
}

/// Immutable snapshot handed to the engine once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub timestamp: u64,
    pub tokens: Vec<Token>,
    pub rates: RateMatrix,
}

impl TickSnapshot {
    pub fn new(timestamp: u64, tokens: Vec<Token>, rates: RateMatrix) -> Self {
        Self {
            timestamp,
            tokens,
            rates,
        }
    }

    /// Decode a JSON snapshot.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a JSON snapshot from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Loading tick snapshot");
        Self::from_reader(BufReader::new(file))
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Check that the token list matches the matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token count differs from the matrix dimension
    /// - A token's index does not equal its position
    pub fn validate(&self) -> SearchResult<()> {
        if self.tokens.len() != self.rates.dimension() {
            return Err(SearchError::TokenCountMismatch {
                tokens: self.tokens.len(),
                dimension: self.rates.dimension(),
            });
        }

        if let Some((position, token)) = self
            .tokens
            .iter()
            .enumerate()
            .find(|(position, token)| token.index != *position)
        {
            return Err(SearchError::TokenIndexMismatch {
                position,
                index: token.index,
            });
        }

        Ok(())
    }
}
