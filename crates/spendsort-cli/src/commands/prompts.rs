//! Prompt inspection commands

use anyhow::{bail, Context, Result};
use spendsort_core::prompts::{default_prompts_dir, Prompt, PromptId, PromptLibrary};
use spendsort_core::PipelineConfig;

use super::SAMPLE_DESCRIPTIONS;

const TRANSACTIONS_PLACEHOLDER: &str = "{{transactions}}";

/// The request one chunk of `descriptions` would send to the model
pub fn render_request(
    prompt: &Prompt,
    config: &PipelineConfig,
    descriptions: &[String],
) -> String {
    prompt.render_transactions(&descriptions.join(&config.separator))
}

/// An override without the placeholder sends the same text for every chunk
fn placeholder_ok(prompt: &Prompt) -> bool {
    prompt
        .user_section()
        .unwrap_or(&prompt.content)
        .contains(TRANSACTIONS_PLACEHOLDER)
}

/// List prompts, where each one is loaded from, and whether it is usable
pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();

    println!("📝 Prompts\n");
    for &id in PromptId::all() {
        let prompt = library.get(id)?;
        let source = match &prompt.override_path {
            Some(path) => format!("override ({})", path.display()),
            None => "built-in".to_string(),
        };
        println!("  {} v{}  {}", id.as_str(), prompt.metadata.version, source);

        if !placeholder_ok(prompt) {
            println!(
                "    ⚠️  missing {} - every chunk would get the same request",
                TRANSACTIONS_PLACEHOLDER
            );
        }
    }

    println!("\nRun `spendsort prompts show <id>` to see the request sent per chunk");
    Ok(())
}

/// Show a prompt as the model receives it, filled with sample descriptions
pub fn cmd_prompts_show(
    prompt_id: &str,
    config: &PipelineConfig,
    descriptions: &[String],
) -> Result<()> {
    let id: PromptId = match prompt_id.parse() {
        Ok(id) => id,
        Err(e) => {
            let known: Vec<&str> = PromptId::all().iter().map(|id| id.as_str()).collect();
            bail!("{} (available: {})", e, known.join(", "));
        }
    };

    let mut library = PromptLibrary::new();
    let prompt = library.get(id)?;

    let descriptions: Vec<String> = if descriptions.is_empty() {
        SAMPLE_DESCRIPTIONS.iter().map(|d| d.to_string()).collect()
    } else {
        descriptions.to_vec()
    };

    match &prompt.override_path {
        Some(path) => println!(
            "📝 {} v{} from {}",
            id.as_str(),
            prompt.metadata.version,
            path.display()
        ),
        None => println!("📝 {} v{} (built-in)", id.as_str(), prompt.metadata.version),
    }
    println!(
        "   {} description(s) joined with {:?}\n",
        descriptions.len(),
        config.separator
    );
    println!("{}", render_request(prompt, config, &descriptions));

    if !placeholder_ok(prompt) {
        println!("\n⚠️  This prompt has no {} placeholder", TRANSACTIONS_PLACEHOLDER);
    }

    Ok(())
}

/// Print the file an override for the categorization prompt is read from
pub fn cmd_prompts_path() -> Result<()> {
    let dir = default_prompts_dir().context("No local data directory on this system")?;
    let path = dir.join(format!("{}.md", PromptId::CategorizeTransactions.as_str()));

    println!("{}", path.display());
    if !path.exists() {
        eprintln!("\nNot present; the built-in prompt is used until this file exists.");
    }

    Ok(())
}
