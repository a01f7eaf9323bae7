//! Cycle Arbitrage Library
//!
//! A library for detecting multi-hop arbitrage loops in per-tick exchange-rate
//! snapshots. Each tick's rate matrix is turned into a graph of `-ln(rate)`
//! edge weights, where a profitable trading loop is a negative-weight cycle.
//! The best such cycle through a source token is found, gated, optionally
//! re-priced exactly against pool reserves, and handed to an external
//! opportunity queue.
//!
//! # Architecture Overview
//!
//! The library is organized into several key modules:
//!
//! - **`matrix`**: Rate matrices and the negative-log weight transform
//! - **`search`**: Bellman-Ford negative-cycle search, the bounded DFS oracle and the acceptance policy
//! - **`graph`**: Reserve/fee store for exact pool-implied rates
//! - **`numeric`**: Signed arbitrary-precision integers and exact rate fractions
//! - **`engine`**: Per-tick orchestration and the collaborator traits
//! - **`tick`**: Tick snapshot and token types with JSON loading
//! - **`config`**: Environment-based configuration and validation
//! - **`builders`**: Builder patterns for the engine and the reserve store
//! - **`errors`**: Error types for every component
//! - **`utils`**: Fixed-point and address conversions
//!
//! # Core Concepts
//!
//! - **Weight Matrix**: `weight[i][j] = -ln(rate[i][j])`, with absent markets
//!   carried as `None` so a 1:1 rate remains a real zero-cost edge
//! - **Cycle**: a loop `[src, v1, ..., src]` whose summed weight is negative
//!   exactly when the compounded rate around it exceeds 1
//! - **Acceptance**: only cycles that are profitable, have at least one
//!   intermediate token beyond a round trip, and start and end at the source
//!   are reported
//!
//! # Thread Safety
//!
//! Searches work on immutable snapshots and are safe to run in parallel. The
//! reserve store is shared through `SharedReserveFeeGraph`, which serializes
//! writers against readers.

pub mod builders;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod matrix;
pub mod numeric;
pub mod search;
pub mod tick;
pub mod utils;

// Re-export the main Result type and error enum for convenience
pub use errors::{ArbitrageError, Result};

// Re-export builder patterns for convenience
pub use builders::{ArbitrageEngineBuilder, ReserveFeeGraphBuilder};

pub use config::{EngineConfig, SearchStrategy, SourceSelection};
pub use engine::{ArbitrageEngine, NameLookup, OpportunityQueue, TickOutcome};
pub use search::{Cycle, CycleFinder};
pub use tick::{TickSnapshot, Token};

// Module-specific result types for better ergonomics
pub type SearchResult<T> = std::result::Result<T, errors::SearchError>;
pub type GraphResult<T> = std::result::Result<T, errors::GraphError>;
pub type UtilityResult<T> = std::result::Result<T, errors::UtilityError>;
