//! Builder pattern for ArbitrageEngine

use crate::config::{EngineConfig, SearchStrategy, SourceSelection};
use crate::engine::{ArbitrageEngine, InMemoryQueue, NameLookup, OpportunityQueue, StaticNames};
use crate::errors::Result;
use crate::graph::SharedReserveFeeGraph;
use std::sync::Arc;

/// Builder for creating ArbitrageEngine instances with a fluent API.
///
/// Unset collaborators default to an `InMemoryQueue` and an empty
/// `StaticNames` table.
pub struct ArbitrageEngineBuilder {
    config: EngineConfig,
    queue: Option<Arc<dyn OpportunityQueue>>,
    names: Option<Arc<dyn NameLookup>>,
    reserves: Option<SharedReserveFeeGraph>,
}

impl ArbitrageEngineBuilder {
    /// Create a new ArbitrageEngineBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            queue: None,
            names: None,
            reserves: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Search from a single source token
    pub fn source(mut self, source: usize) -> Self {
        self.config.source = SourceSelection::Vertex(source);
        self
    }

    /// Search from every token of each tick
    pub fn all_sources(mut self) -> Self {
        self.config.source = SourceSelection::AllVertices;
        self
    }

    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn validation_depth(mut self, depth: usize) -> Self {
        self.config.validation_depth = depth;
        self
    }

    pub fn min_cycle_length(mut self, length: usize) -> Self {
        self.config.min_cycle_length = length;
        self
    }

    pub fn weight_tolerance(mut self, tolerance: f64) -> Self {
        self.config.weight_tolerance = tolerance;
        self
    }

    /// Set the opportunity queue
    ///
    /// # Arguments
    ///
    /// * `queue` - Consumer receiving accepted cycles and the per-tick trigger
    pub fn queue(mut self, queue: Arc<dyn OpportunityQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the name lookup used for route display
    pub fn names(mut self, names: Arc<dyn NameLookup>) -> Self {
        self.names = Some(names);
        self
    }

    /// Attach a reserve/fee store and turn on exact verification
    pub fn reserves(mut self, reserves: SharedReserveFeeGraph) -> Self {
        self.reserves = Some(reserves);
        self.config.verify_with_reserves = true;
        self
    }

    /// Build the ArbitrageEngine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn build(self) -> Result<ArbitrageEngine> {
        let queue = self
            .queue
            .unwrap_or_else(|| Arc::new(InMemoryQueue::new()) as Arc<dyn OpportunityQueue>);
        let names = self
            .names
            .unwrap_or_else(|| Arc::new(StaticNames::new()) as Arc<dyn NameLookup>);

        ArbitrageEngine::new(self.config, queue, names, self.reserves)
    }
}

impl Default for ArbitrageEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ReserveFeeGraph;

    #[test]
    fn test_builder_sets_config() {
        let engine = ArbitrageEngineBuilder::new()
            .all_sources()
            .strategy(SearchStrategy::CrossValidated)
            .validation_depth(6)
            .min_cycle_length(5)
            .weight_tolerance(1e-6)
            .reserves(SharedReserveFeeGraph::new(ReserveFeeGraph::new(3)))
            .build()
            .unwrap();

        let config = engine.config();
        assert_eq!(config.source, SourceSelection::AllVertices);
        assert_eq!(config.strategy, SearchStrategy::CrossValidated);
        assert_eq!(config.validation_depth, 6);
        assert_eq!(config.min_cycle_length, 5);
        assert!(config.verify_with_reserves);
    }

    #[test]
    fn test_builder_validates() {
        assert!(ArbitrageEngineBuilder::new().min_cycle_length(1).build().is_err());
        assert!(ArbitrageEngineBuilder::default().source(2).build().is_ok());
    }
}
