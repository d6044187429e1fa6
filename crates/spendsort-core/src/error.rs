//! Error types for spendsort

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    /// Model gateway failed (bad status, empty body, backend-specific errors)
    #[error("Model gateway error: {0}")]
    Gateway(String),

    /// Reply had no blank-line-delimited data block
    #[error("No data block found in model reply | Raw: {0}")]
    Parse(String),

    /// A data-block line is missing the hyphen separator
    #[error("Reply line does not contain a hyphen: {0:?}")]
    Validation(String),

    #[error(transparent)]
    Chunk(#[from] ChunkFailure),
}

/// A chunk that never produced a usable reply within the attempt bound.
///
/// Aborts the whole run; `start..end` is the range of unique-description
/// indexes the chunk covered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Cannot categorise transactions indexes {start} to {end} (chunk {chunk}) after {attempts} attempts: {last_error}"
)]
pub struct ChunkFailure {
    pub chunk: usize,
    pub start: usize,
    pub end: usize,
    pub attempts: u32,
    pub last_error: String,
}

pub type Result<T> = std::result::Result<T, Error>;
