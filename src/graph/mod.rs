//! Reserve/fee store for exact rate recomputation.
//!
//! This module keeps the per-exchange pool state (reserves and fee) behind
//! every directed token pair. The floating-point rate matrix drives the cycle
//! search; this store lets a candidate cycle be re-priced exactly before it is
//! reported.

pub mod core;
pub mod types;

// Re-export all public types for convenience
pub use core::{ReserveFeeGraph, SharedReserveFeeGraph};
pub use types::{CycleVerification, ExchangeId, HopQuote, ReserveFeeRecord, TickerId};
