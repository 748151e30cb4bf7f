//! Dataset loading using Polars

use crate::config::PipelineConfig;
use crate::error::{ClusterError, Result};
use polars::prelude::*;
use std::io::{Cursor, Read};
use std::path::Path;

/// One cell of an original column, kept as parsed
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

/// One dataset row
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Original cells in column order; missing cells hold the fill placeholder
    pub cells: Vec<CellValue>,
    /// Content of the text column, placeholder when missing
    pub text: String,
    /// The text cell was absent in the input
    pub missing: bool,
}

impl Document {
    /// Text fed to the normalizer; a missing cell counts as empty
    pub fn clustering_text(&self) -> &str {
        if self.missing {
            ""
        } else {
            &self.text
        }
    }
}

/// Tabular input held fully in memory
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names in input order
    pub columns: Vec<String>,
    /// Index of the free-text column within `columns`
    pub text_column: usize,
    /// Rows in input order
    pub documents: Vec<Document>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Clustering text of every document, in order
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.clustering_text()).collect()
    }
}

/// Load a dataset from a CSV (or delimited TXT) file
pub fn load_dataset_from_path(path: &Path, config: &PipelineConfig) -> Result<Dataset> {
    let file = std::fs::File::open(path).map_err(|e| ClusterError::Io {
        source: e,
        context: format!("Failed to open dataset: {:?}", path),
    })?;
    load_dataset(file, config)
}

/// Parse a delimited table with a header row and locate the text column
///
/// # Arguments
/// * `reader` - Raw dataset bytes
/// * `config` - Supplies the text column name, delimiter and missing-value fill
///
/// # Returns
/// * `Dataset` with every cell filled and the text column extracted
pub fn load_dataset<R: Read>(mut reader: R, config: &PipelineConfig) -> Result<Dataset> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| ClusterError::Io {
        source: e,
        context: "Failed to read dataset".to_string(),
    })?;
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ClusterError::input_format("dataset is empty"));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_separator(config.delimiter as u8))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let text_column = columns
        .iter()
        .position(|name| name == &config.text_column)
        .ok_or_else(|| {
            ClusterError::input_format(format!(
                "missing text column '{}' (found: {})",
                config.text_column,
                columns.join(", ")
            ))
        })?;

    let fill = config.missing_value_fill.as_str();
    let texts: Vec<Option<String>> = df
        .column(&config.text_column)?
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();

    let series = df.get_columns();
    let mut documents = Vec::with_capacity(df.height());
    for (row, text) in texts.into_iter().enumerate() {
        let cells = series
            .iter()
            .map(|s| s.get(row).map(|value| cell_from(value, fill)))
            .collect::<PolarsResult<Vec<_>>>()?;
        documents.push(Document {
            cells,
            missing: text.is_none(),
            text: text.unwrap_or_else(|| fill.to_string()),
        });
    }

    tracing::info!(
        rows = documents.len(),
        columns = columns.len(),
        text_column = %config.text_column,
        "loaded dataset"
    );

    Ok(Dataset {
        columns,
        text_column,
        documents,
    })
}

fn cell_from(value: AnyValue, fill: &str) -> CellValue {
    if let AnyValue::Null = value {
        return CellValue::Text(fill.to_string());
    }
    if let AnyValue::Boolean(b) = value {
        return CellValue::Bool(b);
    }
    if let Some(s) = value.get_str() {
        return CellValue::Text(s.to_string());
    }
    match value.extract::<f64>() {
        Some(n) => CellValue::Number(n),
        None => CellValue::Text(value.to_string()),
    }
}
