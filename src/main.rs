//! topicforge: text clustering CLI
//!
//! Loads a dataset, clusters its text column and writes the report archive.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;
use topicforge::archive::{unpack_entry, REPORT_ENTRY_NAME};
use topicforge::{load_dataset_from_path, run_on_dataset, Args, PipelineConfig, PipelineOutput};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let base = match &args.config {
        Some(path) => PipelineConfig::read(path)?,
        None => PipelineConfig::default(),
    };
    let config = args.apply_to(base);
    config.validate()?;

    println!("=== Text Clustering Pipeline ===\n");
    let start_time = Instant::now();

    let dataset = load_dataset_from_path(&args.input, &config)
        .with_context(|| format!("loading {:?}", args.input))?;
    println!("✓ Data loaded: {} documents", dataset.len());

    let output = run_on_dataset(&dataset, &config)?;
    println!("✓ Model fitted (seed {})", output.seed);

    std::fs::write(&args.output, &output.archive)
        .with_context(|| format!("writing {:?}", args.output))?;

    if args.extract {
        let workbook = unpack_entry(&output.archive, REPORT_ENTRY_NAME)?;
        let path = args.workbook_path();
        std::fs::write(&path, workbook).with_context(|| format!("writing {:?}", path))?;
        println!("Workbook saved to: {}", path.display());
    }

    print_cluster_statistics(&output, dataset.len());

    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", start_time.elapsed().as_secs_f64());
    println!("Report archive saved to: {}", args.output.display());

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print cluster statistics to console
fn print_cluster_statistics(output: &PipelineOutput, n_documents: usize) {
    let model = &output.model;

    println!("\n=== Cluster Statistics ===");
    println!("Vocabulary size: {}", output.vocabulary_size());
    println!("Within-cluster sum of squares: {:.2}", model.inertia);
    let silhouette = model.compute_silhouette_sample(&output.matrix.counts, 100);
    println!("Silhouette score (sample): {:.3}", silhouette);

    println!("\nCluster sizes:");
    for (i, &size) in model.cluster_sizes().iter().enumerate() {
        let percentage = (size as f64 / n_documents as f64) * 100.0;
        let terms: Vec<&str> = output.keywords[i].iter().map(|k| k.term.as_str()).collect();
        println!(
            "  Cluster {}: {} documents ({:.1}%)  {}",
            i,
            size,
            percentage,
            terms.join(", ")
        );
    }
}
