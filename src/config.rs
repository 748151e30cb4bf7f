//! Pipeline configuration: defaults, TOML loading and validation

use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name of the free-text column
    pub text_column: String,
    /// Number of clusters (K); required. Signed so that non-positive requests
    /// reach validation
    pub no_of_clusters: Option<i64>,
    /// Keywords reported per cluster
    pub top_keywords_count: usize,
    /// Placeholder written in place of missing cells
    pub missing_value_fill: String,
    /// Seed for K-Means initialization; drawn at random when absent
    pub seed: Option<u64>,
    /// Iteration cap for a single K-Means run
    pub max_iterations: usize,
    /// Convergence tolerance on total squared centroid shift
    pub tolerance: f64,
    /// Number of independent initializations; the lowest-inertia run wins
    pub n_init: usize,
    /// Field delimiter of the input table
    pub delimiter: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_column: "text".to_string(),
            no_of_clusters: None,
            top_keywords_count: 10,
            missing_value_fill: "NULL".to_string(),
            seed: None,
            max_iterations: 300,
            tolerance: 1e-4,
            n_init: 10,
            delimiter: ',',
        }
    }
}

impl PipelineConfig {
    /// Default configuration requesting `no_of_clusters` clusters
    pub fn new(no_of_clusters: i64) -> Self {
        Self {
            no_of_clusters: Some(no_of_clusters),
            ..Self::default()
        }
    }

    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = column.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_top_keywords(mut self, count: usize) -> Self {
        self.top_keywords_count = count;
        self
    }

    pub fn with_missing_value_fill(mut self, fill: impl Into<String>) -> Self {
        self.missing_value_fill = fill.into();
        self
    }

    /// Requested cluster count, or a configuration error when none was given
    pub fn cluster_count(&self) -> Result<i64> {
        self.no_of_clusters
            .ok_or_else(|| ClusterError::config("no_of_clusters is required"))
    }

    /// Parse a configuration from TOML text; absent optional keys keep their
    /// defaults, `no_of_clusters` must be present
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config = Self::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file without validating it, so that command-line flags can
    /// still fill in missing values
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ClusterError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        Self::parse_toml(&content)
    }

    fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ClusterError::config(format!("invalid TOML: {}", e)))
    }

    /// Check the settings that do not depend on the dataset.
    ///
    /// The cluster count is checked against the document count later, by the
    /// cluster engine, so that it is reported as an invalid cluster count.
    pub fn validate(&self) -> Result<()> {
        self.cluster_count()?;
        if self.text_column.is_empty() {
            return Err(ClusterError::config("text_column must not be empty"));
        }
        if self.top_keywords_count == 0 {
            return Err(ClusterError::config("top_keywords_count must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::config("max_iterations must be at least 1"));
        }
        if self.n_init == 0 {
            return Err(ClusterError::config("n_init must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ClusterError::config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(ClusterError::config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }
}
