//! End-to-end clustering run: dataset in, report archive out

use crate::archive::{pack, REPORT_ENTRY_NAME};
use crate::config::PipelineConfig;
use crate::data::{load_dataset, Dataset};
use crate::error::Result;
use crate::keywords::{rank_clusters, Keyword};
use crate::model::{fit_kmeans, validate_cluster_count, KMeansModel, KMeansParams};
use crate::report::{build_report, Report};
use crate::text::normalize_all;
use crate::vectorize::{TermMatrix, Vectorizer};
use std::io::Read;

/// Everything a run produces
#[derive(Debug)]
pub struct PipelineOutput {
    /// Compressed archive holding `cluster_output.xlsx`
    pub archive: Vec<u8>,
    /// The in-memory report that was serialized into the archive
    pub report: Report,
    /// Fitted clustering model
    pub model: KMeansModel,
    /// Term-document matrix the model was fitted on
    pub matrix: TermMatrix,
    /// Ranked keywords per cluster id
    pub keywords: Vec<Vec<Keyword>>,
    /// Seed the clustering ran with
    pub seed: u64,
}

impl PipelineOutput {
    pub fn vocabulary_size(&self) -> usize {
        self.matrix.vocabulary.len()
    }
}

/// Read a dataset from `reader` and run the full pipeline on it
pub fn run<R: Read>(reader: R, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let dataset = load_dataset(reader, config)?;
    run_on_dataset(&dataset, config)
}

/// Cluster an already loaded dataset and package the report
///
/// Checks run before any expensive work: the cluster count is validated
/// against the document count ahead of vectorizing.
pub fn run_on_dataset(dataset: &Dataset, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let requested = config.cluster_count()?;
    validate_cluster_count(requested, dataset.len())?;

    let normalized = normalize_all(&dataset.texts());
    let matrix = Vectorizer::new().fit_transform(&normalized)?;
    tracing::info!(
        documents = matrix.n_documents(),
        vocabulary = matrix.vocabulary.len(),
        "vectorized corpus"
    );

    let params = KMeansParams {
        max_iterations: config.max_iterations,
        tolerance: config.tolerance,
        n_init: config.n_init,
        seed: config.seed,
    };
    let model = fit_kmeans(&matrix.counts, requested, &params)?;

    let keywords = rank_clusters(&matrix.vocabulary, &model.centroids, config.top_keywords_count);
    let labels = model.labels.to_vec();
    let report = build_report(
        dataset,
        &labels,
        &keywords,
        &model.cluster_sizes(),
        config.top_keywords_count,
    )?;

    let workbook = report.to_xlsx_bytes()?;
    let archive = pack(REPORT_ENTRY_NAME, &workbook)?;
    let seed = model.seed;

    Ok(PipelineOutput {
        archive,
        report,
        model,
        matrix,
        keywords,
        seed,
    })
}
