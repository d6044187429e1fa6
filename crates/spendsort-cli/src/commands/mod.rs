//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `categorize` - Run the full categorization pipeline over a bank export
//! - `config` - Show the effective pipeline configuration
//! - `ollama` - Backend connectivity test
//! - `prompts` - Inspect prompts and the requests they render
//! - `summary` - Yearly spending summary of categorized data

pub mod categorize;
pub mod config;
pub mod ollama;
pub mod prompts;
pub mod summary;

// Re-export command functions for main.rs
pub use categorize::*;
pub use config::*;
pub use ollama::*;
pub use prompts::*;
pub use summary::*;

use std::path::Path;

use anyhow::{Context, Result};
use spendsort_core::ai::DEFAULT_OLLAMA_MODEL;
use spendsort_core::{AIClient, PipelineConfig};

/// Ollama address assumed when `OLLAMA_HOST` is unset
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Descriptions used by `ollama test` and `prompts show` when none are given
pub const SAMPLE_DESCRIPTIONS: &[&str] = &[
    "Spotify AB by Adyen",
    "Beta Boulders Ams Amsterdam Nld",
    "Albert Heijn 1234 Amsterdam",
];

/// Load the pipeline config from `path`, the user override, or the built-in default
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    PipelineConfig::load(path).context("Failed to load pipeline config")
}

/// The backend selected by `AI_BACKEND`, or an error explaining how to configure one
pub fn backend_from_env() -> Result<AIClient> {
    AIClient::from_env().context(
        "No AI backend configured. Set OLLAMA_HOST (and optionally OLLAMA_MODEL), \
         or AI_BACKEND=mock for a dry run",
    )
}

/// The configured backend, falling back to a local Ollama
pub fn backend_or_local() -> AIClient {
    AIClient::from_env()
        .unwrap_or_else(|| AIClient::ollama(DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_MODEL))
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
