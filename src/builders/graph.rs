//! Builder pattern for ReserveFeeGraph

use crate::errors::Result;
use crate::graph::{ReserveFeeGraph, ReserveFeeRecord, TickerId};

/// Builder for creating ReserveFeeGraph instances with a fluent API
pub struct ReserveFeeGraphBuilder {
    token_count: usize,
    records: Vec<(TickerId, TickerId, ReserveFeeRecord)>,
}

impl ReserveFeeGraphBuilder {
    /// Create a new ReserveFeeGraphBuilder
    pub fn new() -> Self {
        Self {
            token_count: 0,
            records: Vec::new(),
        }
    }

    /// Set the number of tokens (buckets) in the store
    ///
    /// # Arguments
    ///
    /// * `token_count` - Number of tokens the store indexes
    pub fn token_count(mut self, token_count: usize) -> Self {
        self.token_count = token_count;
        self
    }

    /// Add a pool record for a directed pair
    ///
    /// # Arguments
    ///
    /// * `ticker_in` - Index of the token sold into the pool
    /// * `ticker_out` - Index of the token bought from the pool
    /// * `record` - Reserves and fee of the pool
    pub fn add_record(mut self, ticker_in: TickerId, ticker_out: TickerId, record: ReserveFeeRecord) -> Self {
        self.records.push((ticker_in, ticker_out, record));
        self
    }

    /// Add multiple pool records
    ///
    /// # Arguments
    ///
    /// * `records` - Iterator of (ticker_in, ticker_out, record) triples
    pub fn add_records<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = (TickerId, TickerId, ReserveFeeRecord)>,
    {
        self.records.extend(records);
        self
    }

    /// Build the ReserveFeeGraph
    ///
    /// Records are inserted in the order they were added, so a later record
    /// for the same exchange shadows an earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if any record references a ticker outside `token_count`
    pub fn build(self) -> Result<ReserveFeeGraph> {
        let mut graph = ReserveFeeGraph::new(self.token_count);

        for (ticker_in, ticker_out, record) in self.records {
            graph.insert(ticker_in, ticker_out, record)?;
        }

        tracing::debug!(
            token_count = graph.token_count(),
            records = graph.len(),
            "Reserve/fee store built"
        );

        Ok(graph)
    }
}

impl Default for ReserveFeeGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(exchange_id: u32, reserve1: &str) -> ReserveFeeRecord {
        ReserveFeeRecord::from_decimals(exchange_id, "100", reserve1, "0").unwrap()
    }

    #[test]
    fn test_build_inserts_in_order() {
        let graph = ReserveFeeGraphBuilder::new()
            .token_count(2)
            .add_record(0, 1, pool(1, "150"))
            .add_records([(0, 1, pool(1, "175")), (1, 0, pool(2, "60"))])
            .build()
            .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.lookup(0, 1, 1).unwrap(), &pool(1, "175"));
    }

    #[test]
    fn test_build_rejects_out_of_range_ticker() {
        let result = ReserveFeeGraphBuilder::default()
            .token_count(2)
            .add_record(0, 3, pool(1, "1"))
            .build();
        assert!(result.is_err());
    }
}
