//! Configuration management for the cycle arbitrage engine.
//!
//! This module provides environment-based configuration loading and
//! validation for the per-tick search: which source vertices to probe, which
//! search strategy to run, and how strictly to gate the cycles it finds.

use crate::errors::{ConfigError, Result};
use crate::search::{DEFAULT_MAX_PATH_LENGTH, MIN_CYCLE_LENGTH};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Default absolute tolerance when comparing the primary search with the oracle
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-9;

/// Which vertices a tick is searched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSelection {
    /// A single source token index
    Vertex(usize),
    /// Every token in the tick, for full coverage
    AllVertices,
}

impl Default for SourceSelection {
    fn default() -> Self {
        SourceSelection::Vertex(0)
    }
}

impl SourceSelection {
    /// Source indices to search for a tick with `token_count` tokens.
    pub fn sources(&self, token_count: usize) -> Vec<usize> {
        match self {
            SourceSelection::Vertex(source) => vec![*source],
            SourceSelection::AllVertices => (0..token_count).collect(),
        }
    }
}

impl FromStr for SourceSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all_vertices" | "all-vertices" => Ok(SourceSelection::AllVertices),
            other => other.parse().map(SourceSelection::Vertex).map_err(|_| ConfigError::InvalidValue {
                variable: "ARB_SOURCE".to_string(),
                message: format!("expected 'all' or a token index, got '{}'", s),
            }),
        }
    }
}

impl fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSelection::Vertex(source) => write!(f, "{}", source),
            SourceSelection::AllVertices => write!(f, "all"),
        }
    }
}

/// Cycle search run on each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Relaxation search only
    #[default]
    BellmanFord,
    /// Bounded exhaustive DFS only (small graphs, offline checks)
    BoundedDfs,
    /// Relaxation search, cross-checked against the bounded DFS
    CrossValidated,
}

impl FromStr for SearchStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bellman-ford" | "bf" => Ok(SearchStrategy::BellmanFord),
            "bounded-dfs" | "dfs" => Ok(SearchStrategy::BoundedDfs),
            "cross-validated" | "cross" => Ok(SearchStrategy::CrossValidated),
            _ => Err(ConfigError::InvalidValue {
                variable: "ARB_STRATEGY".to_string(),
                message: format!(
                    "unknown strategy '{}'. Must be one of: bellman-ford, bounded-dfs, cross-validated",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStrategy::BellmanFord => "bellman-ford",
            SearchStrategy::BoundedDfs => "bounded-dfs",
            SearchStrategy::CrossValidated => "cross-validated",
        };
        f.write_str(name)
    }
}

/// Main configuration structure for the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Source vertex selection
    pub source: SourceSelection,
    /// Search strategy
    pub strategy: SearchStrategy,
    /// Maximum vertices on an open path in the bounded DFS
    pub validation_depth: usize,
    /// Minimum vertex count of an accepted cycle, repeated source included
    pub min_cycle_length: usize,
    /// Allowed weight difference between the primary search and the oracle
    pub weight_tolerance: f64,
    /// Re-price accepted cycles against the reserve/fee store
    pub verify_with_reserves: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source: SourceSelection::default(),
            strategy: SearchStrategy::default(),
            validation_depth: DEFAULT_MAX_PATH_LENGTH,
            min_cycle_length: MIN_CYCLE_LENGTH,
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
            verify_with_reserves: false,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// All optional; missing values fall back to defaults.
    /// - `ARB_SOURCE`: token index or `all` (default: 0)
    /// - `ARB_STRATEGY`: `bellman-ford`, `bounded-dfs` or `cross-validated` (default: bellman-ford)
    /// - `ARB_VALIDATION_DEPTH`: DFS path bound (default: 10)
    /// - `ARB_MIN_CYCLE_LENGTH`: minimum accepted cycle length (default: 4)
    /// - `ARB_WEIGHT_TOLERANCE`: cross-validation tolerance (default: 1e-9)
    /// - `ARB_VERIFY_WITH_RESERVES`: `true`/`false` (default: false)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparsable value or the
    /// resulting configuration fails `validate`
    pub fn from_env() -> Result<Self> {
        tracing::info!("Loading engine configuration from environment");
        Self::from_vars(|variable| env::var(variable).ok())
    }

    /// Build a configuration from `ARB_*` values supplied by `lookup`.
    ///
    /// `from_env` reads the process environment through this; callers that
    /// layer other sources (command-line flags) over the environment pass
    /// their own lookup so validation runs once on the merged values.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is unparsable or the resulting
    /// configuration fails `validate`
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let source = match lookup("ARB_SOURCE") {
            Some(raw) => raw.parse()?,
            None => {
                tracing::debug!(source = %defaults.source, "ARB_SOURCE not set, using default");
                defaults.source
            }
        };

        let strategy = match lookup("ARB_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => {
                tracing::debug!(strategy = %defaults.strategy, "ARB_STRATEGY not set, using default");
                defaults.strategy
            }
        };

        let config = Self {
            source,
            strategy,
            validation_depth: Self::parse_var(&lookup, "ARB_VALIDATION_DEPTH")?
                .unwrap_or(defaults.validation_depth),
            min_cycle_length: Self::parse_var(&lookup, "ARB_MIN_CYCLE_LENGTH")?
                .unwrap_or(defaults.min_cycle_length),
            weight_tolerance: Self::parse_var(&lookup, "ARB_WEIGHT_TOLERANCE")?
                .unwrap_or(defaults.weight_tolerance),
            verify_with_reserves: Self::parse_var(&lookup, "ARB_VERIFY_WITH_RESERVES")?
                .unwrap_or(defaults.verify_with_reserves),
        };

        config.validate()?;

        tracing::info!(
            source = %config.source,
            strategy = %config.strategy,
            validation_depth = config.validation_depth,
            min_cycle_length = config.min_cycle_length,
            weight_tolerance = config.weight_tolerance,
            verify_with_reserves = config.verify_with_reserves,
            "Engine configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `min_cycle_length` is below 2
    /// - `validation_depth` is zero
    /// - `weight_tolerance` is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.min_cycle_length < 2 {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "min_cycle_length must be at least 2, got: {}",
                    self.min_cycle_length
                ),
            }
            .into());
        }

        if self.validation_depth == 0 {
            return Err(ConfigError::InvalidConfiguration {
                message: "validation_depth must be at least 1".to_string(),
            }
            .into());
        }

        if !self.weight_tolerance.is_finite() || self.weight_tolerance < 0.0 {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "weight_tolerance must be a non-negative number, got: {}",
                    self.weight_tolerance
                ),
            }
            .into());
        }

        Ok(())
    }

    /// Parse an optional variable
    fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, variable: &str) -> Result<Option<T>>
    where
        T: FromStr + fmt::Debug,
        T::Err: fmt::Display,
    {
        let Some(raw) = lookup(variable) else {
            tracing::debug!(variable, "Not set, using default");
            return Ok(None);
        };

        match raw.trim().parse::<T>() {
            Ok(value) => {
                tracing::debug!(variable, value = ?value, "Valid value");
                Ok(Some(value))
            }
            Err(e) => Err(ConfigError::InvalidValue {
                variable: variable.to_string(),
                message: format!("'{}': {}", raw, e),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests don't interfere with each other's environment variables
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "ARB_SOURCE",
        "ARB_STRATEGY",
        "ARB_VALIDATION_DEPTH",
        "ARB_MIN_CYCLE_LENGTH",
        "ARB_WEIGHT_TOLERANCE",
        "ARB_VERIFY_WITH_RESERVES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.source, SourceSelection::Vertex(0));
        assert_eq!(config.validation_depth, 10);
        assert_eq!(config.min_cycle_length, 4);
    }

    #[test]
    fn test_config_from_env_valid() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("ARB_SOURCE", "all");
        env::set_var("ARB_STRATEGY", "cross_validated");
        env::set_var("ARB_VALIDATION_DEPTH", "6");
        env::set_var("ARB_VERIFY_WITH_RESERVES", "true");

        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.source, SourceSelection::AllVertices);
        assert_eq!(config.strategy, SearchStrategy::CrossValidated);
        assert_eq!(config.validation_depth, 6);
        assert!(config.verify_with_reserves);

        clear_env();
    }

    #[test]
    fn test_config_from_env_invalid_values() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("ARB_MIN_CYCLE_LENGTH", "four");
        let err = EngineConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("ARB_MIN_CYCLE_LENGTH"));
        clear_env();

        env::set_var("ARB_STRATEGY", "dijkstra");
        assert!(EngineConfig::from_env().unwrap_err().to_string().contains("ARB_STRATEGY"));
        clear_env();

        env::set_var("ARB_VALIDATION_DEPTH", "0");
        assert!(EngineConfig::from_env()
            .unwrap_err()
            .to_string()
            .contains("validation_depth"));
        clear_env();
    }

    #[test]
    fn test_config_from_layered_vars() {
        let env_values = [("ARB_MIN_CYCLE_LENGTH", "1"), ("ARB_STRATEGY", "dfs")];
        let flags = [("ARB_MIN_CYCLE_LENGTH", "5"), ("ARB_VERIFY_WITH_RESERVES", "true")];
        let lookup = |variable: &str| {
            flags
                .iter()
                .chain(env_values.iter())
                .find(|(name, _)| *name == variable)
                .map(|(_, value)| value.to_string())
        };

        // the invalid environment length is shadowed before validation runs
        let config = EngineConfig::from_vars(lookup).unwrap();
        assert_eq!(config.min_cycle_length, 5);
        assert_eq!(config.strategy, SearchStrategy::BoundedDfs);
        assert!(config.verify_with_reserves);
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_ok());

        config.min_cycle_length = 1;
        assert!(config.validate().is_err());

        config = EngineConfig {
            weight_tolerance: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        config.weight_tolerance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_selection() {
        assert_eq!("3".parse::<SourceSelection>().unwrap(), SourceSelection::Vertex(3));
        assert_eq!("ALL".parse::<SourceSelection>().unwrap(), SourceSelection::AllVertices);
        assert!("-1".parse::<SourceSelection>().is_err());
        assert_eq!(SourceSelection::AllVertices.sources(3), vec![0, 1, 2]);
        assert_eq!(SourceSelection::Vertex(2).sources(3), vec![2]);
    }

    #[test]
    fn test_config_serde() {
        let json = r#"{"source":{"vertex":2},"strategy":"bounded_dfs"}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.source, SourceSelection::Vertex(2));
        assert_eq!(config.strategy, SearchStrategy::BoundedDfs);
        assert_eq!(config.min_cycle_length, MIN_CYCLE_LENGTH);
    }
}
