//! Reserve/fee store errors.

/// Errors that can occur during reserve/fee store operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid ticker index: {index} (store holds {size} tokens)")]
    InvalidTickerIndex { index: usize, size: usize },

    #[error("No reserve record for {ticker_in} -> {ticker_out} on exchange {exchange_id}")]
    RecordNotFound {
        ticker_in: usize,
        ticker_out: usize,
        exchange_id: u32,
    },

    #[error("No reserve records between {ticker_in} -> {ticker_out}")]
    PairNotFound { ticker_in: usize, ticker_out: usize },

    #[error("Pool on exchange {exchange_id} has an empty input reserve")]
    EmptyReserve { exchange_id: u32 },

    #[error("Fee {fee} on exchange {exchange_id} exceeds 100%")]
    FeeOutOfRange { exchange_id: u32, fee: String },
}
