use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for ingestion, artifact IO, and configuration failures.
#[derive(Debug, Error)]
pub enum MemoriaError {
    #[error("source file '{path}' is unavailable: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("artifact '{name}' not found at {path}")]
    MissingArtifact { name: String, path: PathBuf },
    #[error("artifact failure: {0}")]
    Artifact(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<arrow::error::ArrowError> for MemoriaError {
    fn from(err: arrow::error::ArrowError) -> Self {
        MemoriaError::Artifact(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for MemoriaError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        MemoriaError::Artifact(err.to_string())
    }
}
