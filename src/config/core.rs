//! Core configuration structures and implementation for Pure Rust XGBoost.
//!
//! This module provides the main configuration structure and builder pattern
//! for setting up boosting and tree-growth hyperparameters.

use crate::core::constants::*;
use crate::core::error::{Result, XGBoostError};
use crate::core::types::*;
use crate::tree::TreeConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main configuration structure for XGBoost training and prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterConfig {
    // Boosting parameters
    /// Number of boosting rounds, one tree per round
    pub n_estimators: usize,
    /// Step size for round updates
    pub learning_rate: f64,
    /// Scale each round's update by `learning_rate` before accumulating it.
    ///
    /// Disabled by default: updates are accumulated unscaled and
    /// `learning_rate` is carried as metadata only.
    pub apply_learning_rate: bool,

    // Tree growth parameters
    /// Minimum number of samples a node needs to be considered for a split
    pub min_samples_split: DataSize,
    /// Minimum number of samples on each side of a split
    pub min_samples_leaf: DataSize,
    /// Minimum split gain; candidates must strictly exceed it
    pub min_impurity: f64,
    /// Maximum depth of each tree (root is depth 0)
    pub max_depth: usize,

    // Runtime parameters
    /// Number of threads for split search (0 = all available cores)
    pub num_threads: usize,
    /// Verbosity level for logging
    pub verbosity: VerbosityLevel,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        BoosterConfig {
            n_estimators: DEFAULT_N_ESTIMATORS,
            learning_rate: DEFAULT_LEARNING_RATE,
            apply_learning_rate: false,

            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            min_impurity: DEFAULT_MIN_IMPURITY,
            max_depth: DEFAULT_MAX_DEPTH,

            num_threads: DEFAULT_NUM_THREADS,
            verbosity: DEFAULT_VERBOSITY,
        }
    }
}

impl BoosterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(XGBoostError::invalid_parameter(
                "n_estimators",
                self.n_estimators.to_string(),
                "must be at least 1",
            ));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(XGBoostError::invalid_parameter(
                "learning_rate",
                self.learning_rate.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        self.tree_config().validate()?;

        if self.num_threads > num_cpus::get() * 2 {
            log::warn!(
                "num_threads ({}) is much larger than available cores ({})",
                self.num_threads,
                num_cpus::get()
            );
        }

        Ok(())
    }

    /// Tree-growth parameters handed to every tree of the ensemble
    pub fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            min_impurity: self.min_impurity,
            max_depth: self.max_depth,
        }
    }

    /// Get the effective number of threads (0 means use all available cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    /// Factor applied to each tree's output when accumulating
    pub fn update_scale(&self) -> f64 {
        if self.apply_learning_rate {
            self.learning_rate
        } else {
            1.0
        }
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| XGBoostError::config(format!("Failed to read config file: {}", e)))?;

        let config: BoosterConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => return Err(crate::config_error!("Unsupported config file format. Use .json or .toml")),
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            _ => return Err(crate::config_error!("Unsupported config file format. Use .json or .toml")),
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from `XGBOOST_*` environment variables
    pub fn load_from_environment() -> Result<Self> {
        let mut config = BoosterConfig::default();
        config.read_environment()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to existing configuration.
    ///
    /// Every variable that is set replaces the configured value, including
    /// values equal to the defaults.
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.read_environment()?;
        self.validate()
    }

    fn read_environment(&mut self) -> Result<()> {
        if let Some(val) = env_value("XGBOOST_N_ESTIMATORS")? {
            self.n_estimators = val;
        }
        if let Some(val) = env_value("XGBOOST_LEARNING_RATE")? {
            self.learning_rate = val;
        }
        if let Some(val) = env_value("XGBOOST_APPLY_LEARNING_RATE")? {
            self.apply_learning_rate = val;
        }
        if let Some(val) = env_value("XGBOOST_MIN_SAMPLES_SPLIT")? {
            self.min_samples_split = val;
        }
        if let Some(val) = env_value("XGBOOST_MIN_SAMPLES_LEAF")? {
            self.min_samples_leaf = val;
        }
        if let Some(val) = env_value("XGBOOST_MIN_IMPURITY")? {
            self.min_impurity = val;
        }
        if let Some(val) = env_value("XGBOOST_MAX_DEPTH")? {
            self.max_depth = val;
        }
        if let Some(val) = env_value("XGBOOST_NUM_THREADS")? {
            self.num_threads = val;
        }
        if let Some(val) = env_value("XGBOOST_VERBOSITY")? {
            self.verbosity = val;
        }
        Ok(())
    }

    /// Get configuration as a parameter map (for logging)
    pub fn as_parameter_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("n_estimators".to_string(), self.n_estimators.to_string());
        map.insert("learning_rate".to_string(), self.learning_rate.to_string());
        map.insert(
            "apply_learning_rate".to_string(),
            self.apply_learning_rate.to_string(),
        );
        map.insert(
            "min_samples_split".to_string(),
            self.min_samples_split.to_string(),
        );
        map.insert(
            "min_samples_leaf".to_string(),
            self.min_samples_leaf.to_string(),
        );
        map.insert("min_impurity".to_string(), self.min_impurity.to_string());
        map.insert("max_depth".to_string(), self.max_depth.to_string());
        map.insert("num_threads".to_string(), self.num_threads.to_string());
        map.insert("verbosity".to_string(), self.verbosity.to_string());

        map
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| crate::config_error!("Invalid {}: {:?}", name, val)),
        Err(_) => Ok(None),
    }
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: BoosterConfig,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: BoosterConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the number of boosting rounds
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        if n_estimators == 0 {
            self.validation_errors
                .push("n_estimators must be at least 1".to_string());
        }
        self.config.n_estimators = n_estimators;
        self
    }

    /// Set the learning rate
    pub fn learning_rate(mut self, rate: f64) -> Self {
        if !(rate > 0.0 && rate <= 1.0) {
            self.validation_errors
                .push("learning_rate must be in range (0.0, 1.0]".to_string());
        }
        self.config.learning_rate = rate;
        self
    }

    /// Scale round updates by the learning rate
    pub fn apply_learning_rate(mut self, apply: bool) -> Self {
        self.config.apply_learning_rate = apply;
        self
    }

    /// Set the minimum number of samples required to split a node
    pub fn min_samples_split(mut self, min_samples: DataSize) -> Self {
        if min_samples < 2 {
            self.validation_errors
                .push("min_samples_split must be at least 2".to_string());
        }
        self.config.min_samples_split = min_samples;
        self
    }

    /// Set the minimum number of samples on each side of a split
    pub fn min_samples_leaf(mut self, min_samples: DataSize) -> Self {
        if min_samples == 0 {
            self.validation_errors
                .push("min_samples_leaf must be at least 1".to_string());
        }
        self.config.min_samples_leaf = min_samples;
        self
    }

    /// Set the minimum gain a split must exceed
    pub fn min_impurity(mut self, min_impurity: f64) -> Self {
        if !(min_impurity >= 0.0) {
            self.validation_errors
                .push("min_impurity must be non-negative".to_string());
        }
        self.config.min_impurity = min_impurity;
        self
    }

    /// Set the maximum tree depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        if depth == 0 {
            self.validation_errors
                .push("max_depth must be at least 1".to_string());
        }
        self.config.max_depth = depth;
        self
    }

    /// Set the number of threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Set verbosity level
    pub fn verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BoosterConfig> {
        if !self.validation_errors.is_empty() {
            return Err(XGBoostError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
