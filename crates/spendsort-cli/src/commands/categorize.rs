//! Categorize command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendsort_core::{
    AIBackend, AIClient, Categorizer, PipelineConfig, PromptId, PromptLibrary, RunStats,
};
use tracing::debug;

/// Categorize a bank export and write the categorized CSV
///
/// Nothing is written unless every chunk was categorized.
pub async fn cmd_categorize(
    client: &AIClient,
    config: PipelineConfig,
    input: &Path,
    output: &Path,
) -> Result<RunStats> {
    let client = client
        .with_timeout(config.timeout)
        .context("Failed to build HTTP client")?;

    let prompt = PromptLibrary::new()
        .get(PromptId::CategorizeTransactions)?
        .clone();
    if prompt.is_override {
        println!(
            "📝 Using prompt override: {}",
            prompt
                .override_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
    }

    debug!(
        backend = client.kind(),
        host = client.host(),
        model = client.model(),
        chunk_size = config.chunk_size,
        max_tries = config.max_tries,
        "Starting categorize command"
    );

    println!(
        "🤖 Categorizing {} with {} ({})",
        input.display(),
        client.model(),
        client.kind()
    );

    let categorizer = Categorizer::new(client, prompt, config);
    let stats = categorizer
        .run_file(input, output)
        .await
        .with_context(|| format!("Failed to categorize {}", input.display()))?;

    println!();
    println!("✅ Categorization complete");
    println!("   Transactions:        {}", stats.transactions);
    println!("   Unique descriptions: {}", stats.unique_descriptions);
    println!("   Chunks:              {}", stats.chunks);
    println!("   Categorized:         {}", stats.categorized);
    println!("   Uncategorized:       {}", stats.uncategorized);
    println!();
    println!("💾 Written to {}", output.display());

    Ok(stats)
}
