//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendsort - Categorize bank transactions with a local LLM
#[derive(Parser)]
#[command(name = "spendsort")]
#[command(about = "Categorize bank transactions with a local LLM", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pipeline config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize every transaction in a bank export
    Categorize {
        /// Bank export CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the categorized CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Unique descriptions per model request
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Attempts per chunk before giving up
        #[arg(long)]
        max_tries: Option<u32>,
    },

    /// Yearly spending summary of a categorized CSV
    Summary {
        /// Categorized CSV (output of `categorize`)
        #[arg(short, long)]
        file: PathBuf,

        /// Only summarize this year
        #[arg(long)]
        year: Option<i32>,

        /// Print the figures as JSON
        #[arg(long)]
        json: bool,
    },

    /// Test the model backend connection
    Ollama {
        #[command(subcommand)]
        action: OllamaAction,
    },

    /// Inspect prompts and the requests they produce
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Show the effective pipeline configuration
    Config,
}

#[derive(Subcommand)]
pub enum OllamaAction {
    /// Check the backend and categorize a sample description
    Test {
        /// Categorize this description instead of the built-in samples
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List prompts, their source, and whether they are usable
    List,

    /// Show the request a prompt renders for one chunk
    Show {
        /// Prompt ID (e.g., categorize_transactions)
        prompt_id: String,

        /// Description to fill in (repeatable); defaults to built-in samples
        #[arg(long = "description")]
        descriptions: Vec<String>,
    },

    /// Show the file a categorization prompt override is read from
    Path,
}
