//! Pipeline configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/spendsort/config/pipeline.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::merge::{default_canonical_names, CanonicalName};
use crate::normalize::{default_rules, CategoryRule};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/pipeline.toml");

/// Effective settings for one categorization run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Unique descriptions per model request
    pub chunk_size: usize,
    /// Delimiter joining a chunk's descriptions
    pub separator: String,
    /// Attempts per chunk before the run aborts
    pub max_tries: u32,
    /// Per-request timeout for the model gateway
    pub timeout: Duration,
    /// Category normalization rules, in priority order
    pub category_rules: Vec<CategoryRule>,
    /// Description canonicalization rules, in priority order
    pub canonical_names: Vec<CanonicalName>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 30,
            separator: ",".to_string(),
            max_tries: 7,
            timeout: Duration::from_secs(120),
            category_rules: default_rules(),
            canonical_names: default_canonical_names(),
        }
    }
}

impl PipelineConfig {
    /// Load from `path` if given, else the user override, else the embedded default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(p) => fs::read_to_string(p).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", p.display(), e))
            })?,
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => fs::read_to_string(&default_path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// Only the embedded defaults
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Apply CLI overrides on top of the loaded file
    pub fn with_overrides(
        mut self,
        chunk_size: Option<usize>,
        max_tries: Option<u32>,
    ) -> Result<Self> {
        if let Some(size) = chunk_size {
            self.chunk_size = size;
        }
        if let Some(tries) = max_tries {
            self.max_tries = tries;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".into()));
        }
        if self.max_tries == 0 {
            return Err(Error::Config("max_tries must be at least 1".into()));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendsort").join("config").join("pipeline.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    chunking: Option<RawChunking>,
    retry: Option<RawRetry>,
    model: Option<RawModel>,
    category_rules: Option<Vec<CategoryRule>>,
    canonical_names: Option<Vec<CanonicalName>>,
}

#[derive(Debug, Deserialize)]
struct RawChunking {
    chunk_size: Option<usize>,
    separator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRetry {
    max_tries: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    timeout_secs: Option<u64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<PipelineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = PipelineConfig::default();

    if let Some(chunking) = raw.chunking {
        if let Some(size) = chunking.chunk_size {
            config.chunk_size = size;
        }
        if let Some(separator) = chunking.separator {
            config.separator = separator;
        }
    }

    if let Some(tries) = raw.retry.and_then(|r| r.max_tries) {
        config.max_tries = tries;
    }

    if let Some(timeout) = raw.model.and_then(|m| m.timeout_secs) {
        config.timeout = Duration::from_secs(timeout);
    }

    if let Some(rules) = raw.category_rules {
        config.category_rules = rules;
    }

    if let Some(names) = raw.canonical_names {
        config.canonical_names = names;
    }

    config.validate()?;
    Ok(config)
}
