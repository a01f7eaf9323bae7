//! Core types for the reserve/fee store.
//!
//! This module contains:
//! - Type aliases for ticker and exchange identifiers
//! - The per-exchange pool record
//! - The exact verification result for a candidate cycle

use crate::errors::GraphError;
use crate::numeric::{ExactRate, SignedBigInt};
use crate::utils::{self, WAD_DECIMALS};
use crate::GraphResult;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Type alias for token indices within a tick
pub type TickerId = usize;

/// Type alias for exchange identifiers
pub type ExchangeId = u32;

/// Pool state for one exchange on a directed token pair.
///
/// Reserves and fee are `WAD` fixed-point integers: a fee of `3e15` is 0.3%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveFeeRecord {
    exchange_id: ExchangeId,
    reserve0: BigUint,
    reserve1: BigUint,
    fee: BigUint,
}

impl ReserveFeeRecord {
    pub fn new(exchange_id: ExchangeId, reserve0: BigUint, reserve1: BigUint, fee: BigUint) -> Self {
        Self {
            exchange_id,
            reserve0,
            reserve1,
            fee,
        }
    }

    /// Build a record from decimal strings such as `"1500.25"`.
    ///
    /// # Errors
    ///
    /// Returns a utility error if any amount is not a valid 18-decimal value.
    pub fn from_decimals(
        exchange_id: ExchangeId,
        reserve0: &str,
        reserve1: &str,
        fee: &str,
    ) -> crate::Result<Self> {
        Ok(Self::new(
            exchange_id,
            utils::parse_fixed_point(reserve0, WAD_DECIMALS)?,
            utils::parse_fixed_point(reserve1, WAD_DECIMALS)?,
            utils::parse_fixed_point(fee, WAD_DECIMALS)?,
        ))
    }

    pub fn exchange_id(&self) -> ExchangeId {
        self.exchange_id
    }

    /// Reserve of the input token
    pub fn reserve0(&self) -> &BigUint {
        &self.reserve0
    }

    /// Reserve of the output token
    pub fn reserve1(&self) -> &BigUint {
        &self.reserve1
    }

    pub fn fee(&self) -> &BigUint {
        &self.fee
    }

    /// Exact marginal rate implied by the pool after fees.
    ///
    /// `reserve1 * (WAD - fee) / (reserve0 * WAD)`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `reserve0` is zero
    /// - `fee` is larger than `WAD` (more than 100%)
    pub fn implied_rate(&self) -> GraphResult<ExactRate> {
        if self.reserve0.is_zero() {
            return Err(GraphError::EmptyReserve {
                exchange_id: self.exchange_id,
            });
        }

        let kept = SignedBigInt::positive(utils::wad()) - SignedBigInt::positive(self.fee.clone());
        if kept.is_negative() {
            return Err(GraphError::FeeOutOfRange {
                exchange_id: self.exchange_id,
                fee: utils::format_fixed_point(&self.fee, WAD_DECIMALS),
            });
        }

        let numerator = &self.reserve1 * kept.into_magnitude();
        let denominator = &self.reserve0 * utils::wad();

        ExactRate::new(numerator, denominator).ok_or(GraphError::EmptyReserve {
            exchange_id: self.exchange_id,
        })
    }
}

/// The pool chosen for one hop of a verified cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct HopQuote {
    pub ticker_in: TickerId,
    pub ticker_out: TickerId,
    pub exchange_id: ExchangeId,
    pub rate: ExactRate,
}

/// Exact re-evaluation of a cycle against pool reserves.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleVerification {
    hops: Vec<HopQuote>,
    rate: ExactRate,
    surplus: SignedBigInt,
}

impl CycleVerification {
    pub(crate) fn new(hops: Vec<HopQuote>) -> Self {
        let rate = hops
            .iter()
            .fold(ExactRate::one(), |acc, hop| acc.compound(&hop.rate));
        let surplus = rate.surplus();
        Self { hops, rate, surplus }
    }

    pub fn hops(&self) -> &[HopQuote] {
        &self.hops
    }

    /// Compounded exact rate around the cycle.
    pub fn rate(&self) -> &ExactRate {
        &self.rate
    }

    /// `numerator - denominator` of the compounded rate.
    pub fn surplus(&self) -> &SignedBigInt {
        &self.surplus
    }

    pub fn is_profitable(&self) -> bool {
        self.surplus.is_positive()
    }

    pub fn approximate_return(&self) -> f64 {
        self.rate.to_f64()
    }
}
