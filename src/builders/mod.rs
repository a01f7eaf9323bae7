//! Builder patterns for engine and store construction.
//!
//! This module provides fluent builders for the objects callers assemble once
//! and reuse across ticks. Builders consume themselves on `build` and validate
//! the assembled configuration there.
//!
//! # Available Builders
//!
//! - **`ArbitrageEngineBuilder`**: Constructs the per-tick engine with its collaborators
//! - **`ReserveFeeGraphBuilder`**: Builds a reserve/fee store from pool records

pub mod engine;
pub mod graph;

// Re-export builders for convenience
pub use engine::ArbitrageEngineBuilder;
pub use graph::ReserveFeeGraphBuilder;
