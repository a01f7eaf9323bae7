//! Core reserve/fee store implementation.
//!
//! This module contains the `ReserveFeeGraph` struct, which keeps per-exchange
//! pool records for every directed token pair, and `SharedReserveFeeGraph`,
//! the lock-guarded handle used when an aggregator updates the store while
//! searches read from it.

use super::types::{CycleVerification, ExchangeId, HopQuote, ReserveFeeRecord, TickerId};
use crate::errors::GraphError;
use crate::numeric::ExactRate;
use crate::search::Cycle;
use crate::GraphResult;
use itertools::Itertools;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ReserveEdge {
    ticker_out: TickerId,
    record: ReserveFeeRecord,
}

/// Sparse adjacency store of pool records keyed by `(ticker_in, ticker_out, exchange_id)`.
///
/// Each input ticker owns a bucket of outgoing records. Inserting never
/// deduplicates: a later record for the same key shadows earlier ones on
/// lookup, while the earlier ones stay stored.
#[derive(Debug, Clone, Default)]
pub struct ReserveFeeGraph {
    buckets: Vec<Vec<ReserveEdge>>,
}

impl ReserveFeeGraph {
    /// Create a store with `size` empty buckets
    pub fn new(size: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); size],
        }
    }

    // ================================
    // Construction Methods
    // ================================

    /// Add a pool record for the directed pair `ticker_in -> ticker_out`.
    ///
    /// # Arguments
    ///
    /// * `ticker_in` - Index of the token sold into the pool
    /// * `ticker_out` - Index of the token bought from the pool
    /// * `record` - Reserves and fee of the pool on one exchange
    ///
    /// # Errors
    ///
    /// Returns an error if either ticker index is outside the store
    pub fn insert(
        &mut self,
        ticker_in: TickerId,
        ticker_out: TickerId,
        record: ReserveFeeRecord,
    ) -> GraphResult<()> {
        self.check_ticker(ticker_in)?;
        self.check_ticker(ticker_out)?;

        tracing::trace!(
            ticker_in,
            ticker_out,
            exchange_id = record.exchange_id(),
            "Inserting reserve record"
        );

        self.buckets[ticker_in].push(ReserveEdge { ticker_out, record });
        Ok(())
    }

    /// Drop every record, keeping the bucket table.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
    }

    // ================================
    // Query Methods
    // ================================

    /// Number of tokens (buckets) in the store
    pub fn token_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored records, shadowed ones included
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Most recently inserted record for `(ticker_in, ticker_out, exchange_id)`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ticker_in` is outside the store
    /// - No record matches the key
    pub fn lookup(
        &self,
        ticker_in: TickerId,
        ticker_out: TickerId,
        exchange_id: ExchangeId,
    ) -> GraphResult<&ReserveFeeRecord> {
        self.check_ticker(ticker_in)?;

        self.buckets[ticker_in]
            .iter()
            .rev()
            .find(|edge| edge.ticker_out == ticker_out && edge.record.exchange_id() == exchange_id)
            .map(|edge| &edge.record)
            .ok_or(GraphError::RecordNotFound {
                ticker_in,
                ticker_out,
                exchange_id,
            })
    }

    /// Visible records between two tokens, newest first, one per exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if `ticker_in` is outside the store
    pub fn records_between(
        &self,
        ticker_in: TickerId,
        ticker_out: TickerId,
    ) -> GraphResult<Vec<&ReserveFeeRecord>> {
        self.check_ticker(ticker_in)?;

        Ok(self.buckets[ticker_in]
            .iter()
            .rev()
            .filter(|edge| edge.ticker_out == ticker_out)
            .map(|edge| &edge.record)
            .unique_by(|record| record.exchange_id())
            .collect())
    }

    // ================================
    // Rate Methods
    // ================================

    /// Exact pool-implied rate for one exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is missing or its reserves/fee are unusable
    pub fn implied_rate(
        &self,
        ticker_in: TickerId,
        ticker_out: TickerId,
        exchange_id: ExchangeId,
    ) -> GraphResult<ExactRate> {
        self.lookup(ticker_in, ticker_out, exchange_id)?.implied_rate()
    }

    /// Best exact rate across all exchanges quoting the pair.
    ///
    /// Records with an empty reserve or an out-of-range fee are skipped. Ties
    /// keep the most recently inserted exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ticker_in` is outside the store
    /// - No usable record exists for the pair
    pub fn best_rate(
        &self,
        ticker_in: TickerId,
        ticker_out: TickerId,
    ) -> GraphResult<(ExchangeId, ExactRate)> {
        let mut best: Option<(ExchangeId, ExactRate)> = None;

        for record in self.records_between(ticker_in, ticker_out)? {
            let rate = match record.implied_rate() {
                Ok(rate) => rate,
                Err(e) => {
                    tracing::debug!(ticker_in, ticker_out, error = %e, "Skipping unusable pool");
                    continue;
                }
            };

            if best.as_ref().map_or(true, |(_, current)| rate > *current) {
                best = Some((record.exchange_id(), rate));
            }
        }

        best.ok_or(GraphError::PairNotFound {
            ticker_in,
            ticker_out,
        })
    }

    /// Re-evaluate a cycle with exact pool rates.
    ///
    /// Each hop uses the best exchange for its pair. Returns `Ok(None)` when
    /// some hop has no usable pool.
    ///
    /// # Errors
    ///
    /// Returns an error if a cycle vertex is outside the store
    pub fn verify_cycle(&self, cycle: &Cycle) -> GraphResult<Option<CycleVerification>> {
        let mut hops = Vec::with_capacity(cycle.hop_count());

        for (ticker_in, ticker_out) in cycle.hops() {
            self.check_ticker(ticker_out)?;
            match self.best_rate(ticker_in, ticker_out) {
                Ok((exchange_id, rate)) => hops.push(HopQuote {
                    ticker_in,
                    ticker_out,
                    exchange_id,
                    rate,
                }),
                Err(GraphError::PairNotFound { .. }) => {
                    tracing::debug!(ticker_in, ticker_out, "No pool to verify hop");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        }

        let verification = CycleVerification::new(hops);
        tracing::debug!(
            cycle = %cycle,
            profitable = verification.is_profitable(),
            approximate_return = verification.approximate_return(),
            "Verified cycle against reserves"
        );
        Ok(Some(verification))
    }

    fn check_ticker(&self, index: TickerId) -> GraphResult<()> {
        if index >= self.buckets.len() {
            return Err(GraphError::InvalidTickerIndex {
                index,
                size: self.buckets.len(),
            });
        }
        Ok(())
    }
}

/// Shared handle enforcing a reader/writer discipline on the store.
///
/// Store updates take the write lock; a search takes a `snapshot` under the
/// read lock and works on that copy for the whole tick.
#[derive(Debug, Clone, Default)]
pub struct SharedReserveFeeGraph {
    inner: Arc<RwLock<ReserveFeeGraph>>,
}

impl SharedReserveFeeGraph {
    pub fn new(graph: ReserveFeeGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Mutate the store under the write lock.
    pub fn update<T>(&self, f: impl FnOnce(&mut ReserveFeeGraph) -> T) -> T {
        f(&mut self.inner.write())
    }

    /// Read from the store under the read lock without copying.
    pub fn read<T>(&self, f: impl FnOnce(&ReserveFeeGraph) -> T) -> T {
        f(&self.inner.read())
    }

    /// Consistent copy of the store for one search.
    pub fn snapshot(&self) -> ReserveFeeGraph {
        self.inner.read().clone()
    }
}

impl From<ReserveFeeGraph> for SharedReserveFeeGraph {
    fn from(graph: ReserveFeeGraph) -> Self {
        Self::new(graph)
    }
}
