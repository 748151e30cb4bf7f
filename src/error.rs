//! Error taxonomy for the clustering pipeline

use thiserror::Error;

/// Errors surfaced by every pipeline stage
#[derive(Error, Debug)]
pub enum ClusterError {
    /// The dataset could not be read as a table, or lacks the text column
    #[error("Input format error: {context}")]
    InputFormat { context: String },

    /// Requested cluster count is non-positive or exceeds the document count
    #[error("Invalid cluster count {requested}: must be between 1 and the number of documents ({documents})")]
    InvalidClusterCount { requested: i64, documents: usize },

    /// Normalization and stopword filtering left no terms to cluster on
    #[error("Empty vocabulary: no terms survived stopword filtering across {documents} documents")]
    EmptyVocabulary { documents: usize },

    /// Workbook serialization or archive compression failed
    #[error("Packaging error during {stage}: {message}")]
    Packaging { stage: &'static str, message: String },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },
}

impl ClusterError {
    pub(crate) fn input_format(context: impl Into<String>) -> Self {
        Self::InputFormat {
            context: context.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for ClusterError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::input_format(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ClusterError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Packaging {
            stage: "workbook serialization",
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ClusterError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Packaging {
            stage: "archive compression",
            message: err.to_string(),
        }
    }
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offending_value() {
        let err = ClusterError::InvalidClusterCount {
            requested: 0,
            documents: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('0'));
        assert!(msg.contains("(4)"));

        let err = ClusterError::input_format("missing column 'text'");
        assert!(err.to_string().contains("missing column 'text'"));
    }

    #[test]
    fn test_zip_errors_map_to_packaging() {
        let err: ClusterError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(
            err,
            ClusterError::Packaging {
                stage: "archive compression",
                ..
            }
        ));
    }
}
