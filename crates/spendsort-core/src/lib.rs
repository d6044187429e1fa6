//! Spendsort Core Library
//!
//! Shared functionality for the spendsort transaction categorizer:
//! - CSV import of bank exports and atomic export of the categorized table
//! - Chunking of unique descriptions into bounded prompts
//! - Pluggable local AI backends (Ollama, mock)
//! - Prompt library for customizable AI prompts
//! - Reply parsing, validation and bounded per-chunk retry
//! - Category normalization and the merge back onto transactions
//! - Yearly spending summaries over categorized data

pub mod ai;
pub mod chunker;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod summary;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, MockReply, OllamaBackend};
pub use config::PipelineConfig;
pub use error::{ChunkFailure, Error, Result};
pub use merge::CanonicalName;
pub use models::{
    CategoryMappingRow, CategoryMappingTable, Direction, MergedRecord, MergedTable,
    TransactionRecord, TransactionTable,
};
pub use normalize::{CategoryNormalizer, CategoryRule};
pub use pipeline::{Categorizer, RunStats};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use summary::{CategoryTotal, MonthlyTotal, YearSummary};
