//! topicforge: cluster free-text datasets with K-Means
//!
//! Rows of a CSV are normalized, vectorized into a term-document matrix and
//! partitioned with K-Means. The result is an Excel report (annotated rows,
//! top keywords per cluster, cluster sizes with a chart) packed into a ZIP.

pub mod archive;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod keywords;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod text;
pub mod vectorize;

// Re-export public items for easier access
pub use cli::Args;
pub use config::PipelineConfig;
pub use data::{load_dataset, load_dataset_from_path, Dataset};
pub use error::{ClusterError, Result};
pub use model::{fit_kmeans, KMeansModel, KMeansParams};
pub use pipeline::{run, run_on_dataset, PipelineOutput};
pub use report::Report;
