//! Command-line interface definitions and argument parsing

use crate::archive::ARCHIVE_FILE_NAME;
use crate::config::PipelineConfig;
use clap::Parser;
use std::path::PathBuf;

/// Cluster the free-text column of a CSV and export a keyword report
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV (or delimited TXT) file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of clusters for K-Means; required unless the config file sets it
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    pub clusters: Option<i64>,

    /// Output path for the report archive
    #[arg(short, long, default_value = ARCHIVE_FILE_NAME)]
    pub output: PathBuf,

    /// TOML file with pipeline settings; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name of the free-text column
    #[arg(long)]
    pub text_column: Option<String>,

    /// Keywords reported per cluster
    #[arg(long)]
    pub top_keywords: Option<usize>,

    /// Placeholder for missing cells
    #[arg(long)]
    pub fill: Option<String>,

    /// Seed for K-Means initialization
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Maximum iterations for a K-Means run
    #[arg(long)]
    pub max_iters: Option<usize>,

    /// Tolerance for K-Means convergence
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Number of K-Means initializations
    #[arg(long)]
    pub n_init: Option<usize>,

    /// Also write the bare workbook next to the archive
    #[arg(long)]
    pub extract: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Overlay command-line flags on a base configuration
    pub fn apply_to(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(k) = self.clusters {
            config.no_of_clusters = Some(k);
        }
        if let Some(ref column) = self.text_column {
            config.text_column = column.clone();
        }
        if let Some(n) = self.top_keywords {
            config.top_keywords_count = n;
        }
        if let Some(ref fill) = self.fill {
            config.missing_value_fill = fill.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_iters) = self.max_iters {
            config.max_iterations = max_iters;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(n_init) = self.n_init {
            config.n_init = n_init;
        }
        config
    }

    /// Path of the extracted workbook when `--extract` is set
    pub fn workbook_path(&self) -> PathBuf {
        self.output.with_extension("xlsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "topicforge",
            "--input",
            "docs.csv",
            "-k",
            "4",
            "--text-column",
            "body",
            "--seed",
            "7",
        ]);

        let config = args.apply_to(PipelineConfig::new(2).with_top_keywords(5));
        assert_eq!(config.no_of_clusters, Some(4));
        assert_eq!(config.text_column, "body");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.top_keywords_count, 5);
        assert_eq!(args.output, PathBuf::from("cluster_output.zip"));
    }

    #[test]
    fn test_negative_cluster_count_parses() {
        let args = Args::parse_from(["topicforge", "-i", "docs.csv", "-k", "-1"]);
        assert_eq!(args.clusters, Some(-1));
        assert_eq!(args.workbook_path(), PathBuf::from("cluster_output.xlsx"));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = Args::parse_from(["topicforge", "-i", "docs.csv"]);
        let base = PipelineConfig::new(3).with_seed(1);
        assert_eq!(args.apply_to(base.clone()), base);
    }

    #[test]
    fn test_missing_cluster_count_is_config_error() {
        let args = Args::parse_from(["topicforge", "-i", "docs.csv"]);
        let config = args.apply_to(PipelineConfig::default());

        assert_eq!(config.no_of_clusters, None);
        assert!(matches!(config.validate(), Err(ClusterError::Config { .. })));
    }
}
