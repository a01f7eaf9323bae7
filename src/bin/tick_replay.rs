//! Replay recorded tick snapshots through the engine.
//!
//! Each positional argument is a JSON tick snapshot. Accepted cycles go to an
//! in-memory queue and are summarized at the end.

use clap::Parser;
use cycle_arbitrage::engine::{InMemoryQueue, StaticNames};
use cycle_arbitrage::errors::Result;
use cycle_arbitrage::graph::{ReserveFeeRecord, SharedReserveFeeGraph, TickerId};
use cycle_arbitrage::{utils, ArbitrageEngineBuilder, EngineConfig, TickSnapshot};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(required = true, help = "Tick snapshot JSON files, replayed in order")]
    ticks: Vec<PathBuf>,

    #[clap(long, env = "ARB_SOURCE", help = "Source token index, or 'all' to search from every token")]
    source: Option<String>,

    #[clap(long, env = "ARB_STRATEGY", help = "Search strategy: bellman-ford, bounded-dfs or cross-validated")]
    strategy: Option<String>,

    #[clap(long, env = "ARB_VALIDATION_DEPTH", help = "Maximum path length of the bounded DFS")]
    validation_depth: Option<String>,

    #[clap(long, env = "ARB_MIN_CYCLE_LENGTH", help = "Minimum accepted cycle length, repeated source included")]
    min_cycle_length: Option<String>,

    #[clap(long, env = "ARB_WEIGHT_TOLERANCE", help = "Allowed weight difference when cross-validating")]
    weight_tolerance: Option<String>,

    #[clap(
        long,
        env = "ARB_VERIFY_WITH_RESERVES",
        help = "Re-price accepted cycles against the reserve store (true/false)"
    )]
    verify_with_reserves: Option<String>,

    #[clap(long, help = "JSON object mapping 0x token addresses to display names")]
    names: Option<PathBuf>,

    #[clap(long, help = "JSON reserve/fee store; enables exact verification of accepted cycles")]
    reserves: Option<PathBuf>,
}

impl Args {
    /// Raw value for an `ARB_*` variable; clap already falls back to the
    /// environment when a flag is absent.
    fn value_for(&self, variable: &str) -> Option<String> {
        let value = match variable {
            "ARB_SOURCE" => &self.source,
            "ARB_STRATEGY" => &self.strategy,
            "ARB_VALIDATION_DEPTH" => &self.validation_depth,
            "ARB_MIN_CYCLE_LENGTH" => &self.min_cycle_length,
            "ARB_WEIGHT_TOLERANCE" => &self.weight_tolerance,
            "ARB_VERIFY_WITH_RESERVES" => &self.verify_with_reserves,
            _ => return None,
        };
        value.clone()
    }

    /// Flags layered over the environment, validated once.
    fn engine_config(&self) -> Result<EngineConfig> {
        EngineConfig::from_vars(|variable| self.value_for(variable))
    }
}

#[derive(Debug, Deserialize)]
struct ReserveFile {
    token_count: usize,
    records: Vec<ReserveEntry>,
}

#[derive(Debug, Deserialize)]
struct ReserveEntry {
    ticker_in: TickerId,
    ticker_out: TickerId,
    exchange_id: u32,
    reserve0: String,
    reserve1: String,
    fee: String,
}

fn load_names(path: &Path) -> Result<StaticNames> {
    let raw: HashMap<String, String> = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let mut names = StaticNames::new();
    for (address, name) in raw {
        names.insert(utils::parse_address(&address)?, name);
    }

    tracing::debug!(count = names.len(), "Token names loaded");
    Ok(names)
}

fn load_reserves(path: &Path) -> Result<SharedReserveFeeGraph> {
    let file: ReserveFile = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let mut builder = cycle_arbitrage::ReserveFeeGraphBuilder::new().token_count(file.token_count);
    for entry in file.records {
        let record =
            ReserveFeeRecord::from_decimals(entry.exchange_id, &entry.reserve0, &entry.reserve1, &entry.fee)?;
        let fee = utils::fixed_point_to_f64(record.fee(), utils::WAD_DECIMALS)?;
        tracing::debug!(
            ticker_in = entry.ticker_in,
            ticker_out = entry.ticker_out,
            exchange_id = entry.exchange_id,
            fee,
            "Pool loaded"
        );
        builder = builder.add_record(entry.ticker_in, entry.ticker_out, record);
    }

    Ok(SharedReserveFeeGraph::new(builder.build()?))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tick_replay=info".parse().map_err(|e| anyhow::anyhow!("{e}"))?),
        )
        .compact()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = args.engine_config()?;

    let queue = Arc::new(InMemoryQueue::new());
    let mut builder = ArbitrageEngineBuilder::new().config(config).queue(queue.clone());

    if let Some(path) = &args.names {
        builder = builder.names(Arc::new(load_names(path)?));
    }
    if let Some(path) = &args.reserves {
        builder = builder.reserves(load_reserves(path)?);
    }

    let engine = builder.build()?;

    tracing::info!(ticks = args.ticks.len(), "Starting tick replay");

    let mut failed = 0usize;
    for path in &args.ticks {
        let result = TickSnapshot::load(path).and_then(|tick| engine.on_tick(&tick));
        match result {
            Ok(outcome) => {
                if let Some(opportunity) = &outcome.opportunity {
                    tracing::info!(
                        timestamp = outcome.timestamp,
                        route = %opportunity.route,
                        expected_return = opportunity.cycle.expected_return(),
                        "Opportunity"
                    );
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!(path = %path.display(), error = %e, "Tick failed");
            }
        }
    }

    tracing::info!(
        ticks = args.ticks.len(),
        failed,
        opportunities = queue.processed().len(),
        "Replay finished"
    );

    Ok(())
}
