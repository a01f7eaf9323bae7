//! Per-tick orchestration.
//!
//! `ArbitrageEngine::on_tick` runs the whole pipeline for one snapshot:
//! shape validation, weight transform, cycle search from each configured
//! source, acceptance gating, optional exact re-pricing against pool reserves,
//! and hand-off of the best cycle to the opportunity queue. The queue's
//! `process` trigger fires exactly once per successfully validated tick,
//! whether or not anything was queued.

pub mod collaborators;

pub use collaborators::{InMemoryQueue, NameLookup, OpportunityQueue, QueuedOpportunity, StaticNames};

use crate::config::{EngineConfig, SearchStrategy, SourceSelection};
use crate::errors::Result;
use crate::graph::{CycleVerification, SharedReserveFeeGraph};
use crate::matrix::WeightMatrix;
use crate::search::{AcceptancePolicy, BellmanFord, BoundedDfs, Cycle, ValidationOutcome};
use crate::tick::TickSnapshot;
use crate::utils::format_address;
use itertools::Itertools;
use rayon::prelude::*;
use std::sync::Arc;

/// A cycle that passed every gate on a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub source: usize,
    pub cycle: Cycle,
    /// Human-readable route such as `WETH -> USDC -> DAI -> WETH`
    pub route: String,
    /// Exact re-pricing, when reserve verification ran for this cycle
    pub verification: Option<CycleVerification>,
}

/// What happened on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub timestamp: u64,
    pub sources_searched: usize,
    pub candidates_found: usize,
    pub rejected: usize,
    pub opportunity: Option<Opportunity>,
}

/// Cycle detection engine driven once per tick.
pub struct ArbitrageEngine {
    config: EngineConfig,
    policy: AcceptancePolicy,
    oracle: BoundedDfs,
    queue: Arc<dyn OpportunityQueue>,
    names: Arc<dyn NameLookup>,
    reserves: Option<SharedReserveFeeGraph>,
}

impl std::fmt::Debug for ArbitrageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrageEngine")
            .field("config", &self.config)
            .field("has_reserves", &self.reserves.is_some())
            .finish()
    }
}

impl ArbitrageEngine {
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(
        config: EngineConfig,
        queue: Arc<dyn OpportunityQueue>,
        names: Arc<dyn NameLookup>,
        reserves: Option<SharedReserveFeeGraph>,
    ) -> Result<Self> {
        config.validate()?;

        if config.verify_with_reserves && reserves.is_none() {
            tracing::warn!("Reserve verification enabled without a reserve store; cycles will pass unverified");
        }

        Ok(Self {
            policy: AcceptancePolicy::new(config.min_cycle_length),
            oracle: BoundedDfs::new(config.validation_depth)?,
            config,
            queue,
            names,
            reserves,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one tick.
    ///
    /// # Errors
    ///
    /// Returns an error, without touching the queue, if:
    /// - The token list does not match the rate matrix
    /// - The configured source is not a token of this tick
    pub fn on_tick(&self, tick: &TickSnapshot) -> Result<TickOutcome> {
        tick.validate()?;

        let weights = WeightMatrix::from_rates(&tick.rates);
        let sources = self.config.source.sources(weights.dimension());
        for &source in &sources {
            weights.check_source(source)?;
        }

        // consistent view of the store for the whole tick
        let reserves = if self.config.verify_with_reserves {
            self.reserves.as_ref().map(SharedReserveFeeGraph::snapshot)
        } else {
            None
        };

        let search = |&source: &usize| {
            self.search_from(&weights, source)
                .map(|found| found.map(|cycle| (source, cycle)))
        };
        let per_source: Vec<Option<(usize, Cycle)>> = match self.config.source {
            SourceSelection::AllVertices => sources.par_iter().map(search).collect::<Result<_>>()?,
            SourceSelection::Vertex(_) => sources.iter().map(search).collect::<Result<_>>()?,
        };
        let found: Vec<(usize, Cycle)> = per_source.into_iter().flatten().collect();

        let candidates_found = found.len();
        let mut rejected = 0usize;
        let mut best: Option<(usize, Cycle, Option<CycleVerification>)> = None;

        for (source, cycle) in found {
            if !self.policy.accepts(&cycle, source) {
                rejected += 1;
                continue;
            }

            let verification = match &reserves {
                Some(store) => match store.verify_cycle(&cycle) {
                    Ok(Some(verification)) if !verification.is_profitable() => {
                        tracing::debug!(
                            source,
                            cycle = %cycle,
                            surplus = %verification.surplus(),
                            "Cycle unprofitable against reserves"
                        );
                        rejected += 1;
                        continue;
                    }
                    Ok(verification) => verification,
                    // the store may lag behind the tick's token set
                    Err(e) => {
                        tracing::warn!(source, cycle = %cycle, error = %e, "Cycle not verifiable against reserves");
                        None
                    }
                },
                None => None,
            };

            if best.as_ref().map_or(true, |(_, current, _)| cycle.weight() < current.weight()) {
                best = Some((source, cycle, verification));
            }
        }

        let opportunity = best.map(|(source, cycle, verification)| {
            let route = self.format_route(tick, &cycle);
            self.queue.enqueue(cycle.vertices(), tick.timestamp);
            tracing::info!(
                timestamp = tick.timestamp,
                source,
                route = %route,
                weight = cycle.weight(),
                profit_pct = cycle.profit_percentage(),
                "Arbitrage opportunity queued"
            );
            Opportunity {
                source,
                cycle,
                route,
                verification,
            }
        });

        self.queue.process(tick.timestamp);

        tracing::debug!(
            timestamp = tick.timestamp,
            sources = sources.len(),
            candidates_found,
            rejected,
            queued = opportunity.is_some(),
            "Tick processed"
        );

        Ok(TickOutcome {
            timestamp: tick.timestamp,
            sources_searched: sources.len(),
            candidates_found,
            rejected,
            opportunity,
        })
    }

    /// Run the configured strategy from one source.
    fn search_from(&self, weights: &WeightMatrix, source: usize) -> Result<Option<Cycle>> {
        let cycle = match self.config.strategy {
            SearchStrategy::BellmanFord => BellmanFord.search(weights, source)?,
            SearchStrategy::BoundedDfs => self.oracle.search(weights, source)?.into_cycle(),
            SearchStrategy::CrossValidated => {
                let primary = BellmanFord.search(weights, source)?;
                let oracle = self.oracle.search(weights, source)?;
                self.compare_with_oracle(source, primary.as_ref(), &oracle);
                primary
            }
        };
        Ok(cycle)
    }

    fn compare_with_oracle(&self, source: usize, primary: Option<&Cycle>, oracle: &ValidationOutcome) {
        match (primary, oracle) {
            (Some(found), ValidationOutcome::Found(expected)) => {
                let diff = (found.weight() - expected.weight()).abs();
                if diff > self.config.weight_tolerance {
                    tracing::warn!(
                        source,
                        primary = %found,
                        oracle = %expected,
                        diff,
                        "Primary search and oracle disagree on best cycle weight"
                    );
                }
            }
            (None, ValidationOutcome::Found(expected)) => {
                tracing::warn!(source, oracle = %expected, "Oracle found a cycle the primary search missed");
            }
            (Some(found), ValidationOutcome::NoCycle) => {
                tracing::warn!(source, primary = %found, "Primary search reported a cycle the oracle rules out");
            }
            (Some(found), ValidationOutcome::NoCycleWithinBound) => {
                tracing::debug!(
                    source,
                    primary = %found,
                    depth = self.oracle.max_path_length(),
                    "Oracle bound too small to confirm cycle"
                );
            }
            (None, _) => {}
        }
    }

    /// Display names for the cycle's tokens, falling back to hex addresses.
    fn format_route(&self, tick: &TickSnapshot, cycle: &Cycle) -> String {
        cycle
            .vertices()
            .iter()
            .map(|&vertex| {
                let address = &tick.tokens[vertex].address;
                self.names.name_for(address).unwrap_or_else(|| {
                    tracing::warn!(token = vertex, address = %format_address(address), "Name lookup failed");
                    format_address(address)
                })
            })
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ReserveFeeGraph, ReserveFeeRecord};
    use crate::matrix::RateMatrix;
    use crate::tick::Token;

    fn triangle_tick(timestamp: u64, closing_rate: f64) -> TickSnapshot {
        let rates = RateMatrix::from_rows(vec![
            vec![0.0, 0.5, 0.0],
            vec![0.0, 0.0, 0.4],
            vec![closing_rate, 0.0, 0.0],
        ])
        .unwrap();
        let tokens = (0..3).map(|i| Token::new(i, vec![0xa0 + i as u8])).collect();
        TickSnapshot::new(timestamp, tokens, rates)
    }

    fn names() -> Arc<StaticNames> {
        Arc::new([(vec![0xa0], "A"), (vec![0xa1], "B")].into_iter().collect())
    }

    fn engine(config: EngineConfig, queue: Arc<InMemoryQueue>) -> ArbitrageEngine {
        ArbitrageEngine::new(config, queue, names(), None).unwrap()
    }

    #[test]
    fn test_positive_loop_queues_nothing_but_processes() {
        let queue = Arc::new(InMemoryQueue::new());
        let engine = engine(EngineConfig::default(), queue.clone());

        let outcome = engine.on_tick(&triangle_tick(1, 0.6)).unwrap();

        assert!(outcome.opportunity.is_none());
        assert!(queue.processed().is_empty());
        assert_eq!(queue.process_calls(), vec![1]);
    }

    #[test]
    fn test_profitable_loop_is_queued() {
        let queue = Arc::new(InMemoryQueue::new());
        let engine = engine(EngineConfig::default(), queue.clone());

        let outcome = engine.on_tick(&triangle_tick(7, 6.0)).unwrap();
        let opportunity = outcome.opportunity.unwrap();

        assert_eq!(opportunity.cycle.vertices(), &[0, 1, 2, 0]);
        assert_eq!(opportunity.route, "A -> B -> 0xa2 -> A");
        assert_eq!(
            queue.processed(),
            vec![QueuedOpportunity { order: vec![0, 1, 2, 0], timestamp: 7 }]
        );
        assert_eq!(queue.process_calls(), vec![7]);
    }

    #[test]
    fn test_two_hop_round_trip_never_queued() {
        let rates = RateMatrix::from_rows(vec![vec![0.0, 2.0], vec![0.6, 0.0]]).unwrap();
        let tick = TickSnapshot::new(3, vec![Token::new(0, vec![1]), Token::new(1, vec![2])], rates);

        let queue = Arc::new(InMemoryQueue::new());
        let outcome = engine(EngineConfig::default(), queue.clone()).on_tick(&tick).unwrap();

        assert_eq!(outcome.candidates_found, 1);
        assert_eq!(outcome.rejected, 1);
        assert!(outcome.opportunity.is_none());
        assert!(queue.processed().is_empty());
        assert_eq!(queue.process_calls(), vec![3]);
    }

    #[test]
    fn test_all_vertices_finds_loop_missed_from_vertex_zero() {
        // token 0 only sells into the loop 1 -> 2 -> 3 -> 1, nothing returns to it
        let rates = RateMatrix::from_rows(vec![
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.9, 0.0],
            vec![0.0, 0.0, 0.0, 0.9],
            vec![0.0, 1.5, 0.0, 0.0],
        ])
        .unwrap();
        let tokens = (0..4).map(|i| Token::new(i, vec![i as u8])).collect();
        let tick = TickSnapshot::new(9, tokens, rates);

        let queue = Arc::new(InMemoryQueue::new());
        let outcome = engine(EngineConfig::default(), queue.clone()).on_tick(&tick).unwrap();
        assert!(outcome.opportunity.is_none());

        let config = EngineConfig {
            source: SourceSelection::AllVertices,
            ..EngineConfig::default()
        };
        let outcome = engine(config, queue.clone()).on_tick(&tick).unwrap();
        let opportunity = outcome.opportunity.unwrap();

        assert_eq!(outcome.sources_searched, 4);
        assert_eq!(outcome.candidates_found, 3);
        // every rotation of the loop scores the same up to rounding
        assert!((1..=3).contains(&opportunity.source));
        assert_eq!(opportunity.cycle.len(), 4);
        assert_eq!(opportunity.cycle.first(), Some(opportunity.source));
        assert_eq!(opportunity.cycle.last(), Some(opportunity.source));
        assert_eq!(queue.process_calls(), vec![9, 9]);
    }

    #[test]
    fn test_cross_validated_and_dfs_strategies_agree() {
        for strategy in [SearchStrategy::BoundedDfs, SearchStrategy::CrossValidated] {
            let queue = Arc::new(InMemoryQueue::new());
            let config = EngineConfig {
                strategy,
                ..EngineConfig::default()
            };
            let outcome = engine(config, queue).on_tick(&triangle_tick(1, 6.0)).unwrap();
            assert_eq!(outcome.opportunity.unwrap().cycle.vertices(), &[0, 1, 2, 0]);
        }
    }

    #[test]
    fn test_invalid_input_fails_fast() {
        let queue = Arc::new(InMemoryQueue::new());
        let config = EngineConfig {
            source: SourceSelection::Vertex(5),
            ..EngineConfig::default()
        };
        let err = engine(config, queue.clone()).on_tick(&triangle_tick(1, 6.0)).unwrap_err();
        assert!(err.is_invalid_input());

        let mut tick = triangle_tick(2, 6.0);
        tick.tokens.pop();
        let err = engine(EngineConfig::default(), queue.clone()).on_tick(&tick).unwrap_err();
        assert!(err.is_invalid_input());

        assert!(queue.process_calls().is_empty());
    }

    #[test]
    fn test_reserve_verification_rejects_unprofitable_cycle() {
        let mut store = ReserveFeeGraph::new(3);
        let pool = |id, r0, r1| ReserveFeeRecord::from_decimals(id, r0, r1, "0.003").unwrap();
        store.insert(0, 1, pool(1, "100", "50")).unwrap();
        store.insert(1, 2, pool(1, "100", "40")).unwrap();
        // reserves say the closing leg only pays 0.6
        store.insert(2, 0, pool(1, "10", "6")).unwrap();
        let shared = SharedReserveFeeGraph::new(store);

        let config = EngineConfig {
            verify_with_reserves: true,
            ..EngineConfig::default()
        };
        let queue = Arc::new(InMemoryQueue::new());
        let engine = ArbitrageEngine::new(config, queue.clone(), names(), Some(shared.clone())).unwrap();

        let outcome = engine.on_tick(&triangle_tick(4, 6.0)).unwrap();
        assert!(outcome.opportunity.is_none());
        assert_eq!(outcome.rejected, 1);

        // pools catch up with the rate matrix
        shared.update(|g| g.insert(2, 0, pool(2, "10", "60"))).unwrap();
        let outcome = engine.on_tick(&triangle_tick(5, 6.0)).unwrap();
        let verification = outcome.opportunity.unwrap().verification.unwrap();
        assert!(verification.is_profitable());
        assert_eq!(verification.hops()[2].exchange_id, 2);
        assert_eq!(queue.process_calls(), vec![4, 5]);
    }

    #[test]
    fn test_cycle_outside_reserve_store_passes_unverified() {
        // store only knows tokens 0 and 1, so the second hop leaves it
        let mut store = ReserveFeeGraph::new(2);
        store
            .insert(0, 1, ReserveFeeRecord::from_decimals(1, "100", "50", "0.003").unwrap())
            .unwrap();
        let shared = SharedReserveFeeGraph::new(store);
        let config = EngineConfig {
            verify_with_reserves: true,
            ..EngineConfig::default()
        };
        let queue = Arc::new(InMemoryQueue::new());
        let engine = ArbitrageEngine::new(config, queue.clone(), names(), Some(shared)).unwrap();

        let outcome = engine.on_tick(&triangle_tick(6, 6.0)).unwrap();
        let opportunity = outcome.opportunity.unwrap();

        assert_eq!(opportunity.cycle.vertices(), &[0, 1, 2, 0]);
        assert!(opportunity.verification.is_none());
        assert_eq!(queue.process_calls(), vec![6]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            validation_depth: 0,
            ..EngineConfig::default()
        };
        assert!(ArbitrageEngine::new(config, Arc::new(InMemoryQueue::new()), names(), None).is_err());
    }
}
