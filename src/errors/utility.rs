//! Utility function errors

use thiserror::Error;

/// Errors that can occur in utility functions
#[derive(Debug, Error)]
pub enum UtilityError {
    #[error("Failed to parse fixed-point value from '{input}': {reason}")]
    FixedPointParsingFailed { input: String, reason: String },

    #[error("Value '{input}' has {actual} fractional digits, at most {max} supported")]
    TooManyDecimals { input: String, max: u32, actual: usize },

    #[error("Failed to parse address from string '{input}': {source}")]
    AddressParsingFailed {
        input: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Value is not representable as a finite f64")]
    NotRepresentable,
}
