//! Backend connectivity test

use anyhow::{Context, Result};
use spendsort_core::normalize::CategoryNormalizer;
use spendsort_core::{AIBackend, AIClient, Categorizer, PipelineConfig, PromptId, PromptLibrary};

use super::{truncate, SAMPLE_DESCRIPTIONS};

/// Check the configured backend and push a sample through the pipeline
pub async fn cmd_ollama_test(
    client: &AIClient,
    config: PipelineConfig,
    description: Option<&str>,
) -> Result<()> {
    println!("🔍 Testing model backend...\n");
    println!("  Backend: {}", client.kind());
    println!("  Host:    {}", client.host());
    println!("  Model:   {}\n", client.model());

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
        println!("\nTo set up Ollama:");
        println!("  1. Install Ollama: https://ollama.ai/download");
        println!("  2. Start the server: ollama serve");
        println!("  3. Pull the model: ollama pull {}", client.model());
        println!("  4. Set environment variable: export OLLAMA_HOST={}", client.host());
        return Ok(());
    }

    let descriptions: Vec<String> = match description {
        Some(d) => vec![d.to_string()],
        None => SAMPLE_DESCRIPTIONS.iter().map(|d| d.to_string()).collect(),
    };

    let client = client
        .with_timeout(config.timeout)
        .context("Failed to build HTTP client")?;
    let prompt = PromptLibrary::new()
        .get(PromptId::CategorizeTransactions)?
        .clone();
    let normalizer = CategoryNormalizer::new(config.category_rules.clone())?;
    let categorizer = Categorizer::new(client, prompt, config);

    println!("\n📋 Testing categorization...\n");

    match categorizer.categorize(&descriptions).await {
        Ok(table) => {
            for row in &table.rows {
                let label = row.category.as_deref().unwrap_or("(no category)");
                println!(
                    "  \"{}\" → {} → {}",
                    truncate(&row.transaction, 40),
                    label,
                    normalizer.normalize_category(label)
                );
            }
            if table.is_empty() {
                println!("  ⚠️  The model replied with an empty data block");
            }
        }
        Err(failure) => {
            println!("  ❌ {}", failure);
        }
    }

    println!("\n✅ Backend test complete");
    Ok(())
}
