//! Config command implementation

use std::path::Path;

use anyhow::Result;
use spendsort_core::config::default_config_path;

use super::load_config;

/// Print the effective pipeline configuration and where it came from
pub fn cmd_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;

    let source = match path {
        Some(p) => p.display().to_string(),
        None => match default_config_path() {
            Some(p) if p.exists() => p.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };

    println!("⚙️  Pipeline configuration ({})\n", source);
    println!("  chunk_size:   {}", config.chunk_size);
    println!("  separator:    {:?}", config.separator);
    println!("  max_tries:    {}", config.max_tries);
    println!("  timeout:      {}s", config.timeout.as_secs());

    println!("\n  Category rules (first match wins):");
    for (i, rule) in config.category_rules.iter().enumerate() {
        println!(
            "    {}. {} → {}",
            i + 1,
            rule.contains.join(" | "),
            rule.category
        );
    }

    println!("\n  Canonical names:");
    for name in &config.canonical_names {
        println!("    *{}* → {}", name.contains, name.name);
    }

    println!(
        "\n  Override file: {}",
        default_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    Ok(())
}
