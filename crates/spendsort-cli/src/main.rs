//! Spendsort CLI - LLM transaction categorizer
//!
//! Usage:
//!   spendsort categorize --input CSV --output CSV   Categorize a bank export
//!   spendsort summary --file CSV                    Yearly spending summary
//!   spendsort ollama test                           Check the model backend
//!   spendsort prompts list                          Inspect prompt overrides

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Categorize {
            input,
            output,
            chunk_size,
            max_tries,
        } => {
            let config = commands::load_config(cli.config.as_deref())?
                .with_overrides(chunk_size, max_tries)?;
            let client = commands::backend_from_env()?;
            commands::cmd_categorize(&client, config, &input, &output)
                .await
                .map(|_| ())
        }
        Commands::Summary { file, year, json } => commands::cmd_summary(&file, year, json),
        Commands::Ollama { action } => match action {
            OllamaAction::Test { description } => {
                let config = commands::load_config(cli.config.as_deref())?;
                let client = commands::backend_or_local();
                commands::cmd_ollama_test(&client, config, description.as_deref()).await
            }
        },
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show {
                prompt_id,
                descriptions,
            }) => {
                let config = commands::load_config(cli.config.as_deref())?;
                commands::cmd_prompts_show(&prompt_id, &config, &descriptions)
            }
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Config => commands::cmd_config(cli.config.as_deref()),
    }
}
