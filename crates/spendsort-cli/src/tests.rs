//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use spendsort_core::{AIClient, MockBackend, MockReply, PipelineConfig, PromptId, PromptLibrary};

use crate::commands::{self, truncate};

const BANK_EXPORT: &str = "\
Date,Name / Description,Amount (EUR),Expense/Income
2023-01-03,Albert Heijn 1234 Amsterdam,24.50,Expense
2023-01-05,Spotify P1A2B3,10.99,Expense
2023-01-25,Acme Salary,2500.00,Income
2023-02-09,Beta Boulders Ams Amsterdam Nld,15.00,Expense
";

fn write_export(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("transactions.csv");
    std::fs::write(&path, BANK_EXPORT).unwrap();
    path
}

// ========== Categorize Command Tests ==========

#[tokio::test]
async fn test_cmd_categorize_with_mock_backend() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(&dir);
    let output = dir.path().join("categorized.csv");

    let client = AIClient::mock();
    let stats = commands::cmd_categorize(&client, PipelineConfig::default(), &input, &output)
        .await
        .unwrap();

    assert_eq!(stats.transactions, 4);
    assert_eq!(stats.chunks, 1);
    assert_eq!(stats.categorized, 4);

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with(
        "Date,Name / Description,Amount (EUR),Expense/Income,Transaction vs category,Transaction,Category"
    ));
    assert!(written.contains("Spotify Ab By Adyen"));
    assert!(written.contains("Sport and Fitness"));
}

#[tokio::test]
async fn test_cmd_categorize_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(&dir);
    let output = dir.path().join("categorized.csv");

    let mock = MockBackend::with_replies(vec![MockReply::fail("connection refused"); 2]);
    let config = PipelineConfig::default()
        .with_overrides(None, Some(2))
        .unwrap();

    let err = commands::cmd_categorize(&AIClient::Mock(mock.clone()), config, &input, &output)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("indexes 0 to 4"));
    assert_eq!(mock.call_count(), 2);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_cmd_categorize_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::cmd_categorize(
        &AIClient::mock(),
        PipelineConfig::default(),
        &dir.path().join("missing.csv"),
        &dir.path().join("out.csv"),
    )
    .await;
    assert!(result.is_err());
}

// ========== Summary Command Tests ==========

#[tokio::test]
async fn test_cmd_summary_after_categorize() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(&dir);
    let output = dir.path().join("categorized.csv");

    commands::cmd_categorize(&AIClient::mock(), PipelineConfig::default(), &input, &output)
        .await
        .unwrap();

    assert!(commands::cmd_summary(&output, None, false).is_ok());
    assert!(commands::cmd_summary(&output, Some(2023), false).is_ok());
    assert!(commands::cmd_summary(&output, Some(1999), false).is_ok());
    assert!(commands::cmd_summary(&output, Some(2023), true).is_ok());
}

#[test]
fn test_cmd_summary_missing_file() {
    let result = commands::cmd_summary(&PathBuf::from("/nonexistent/categorized.csv"), None, false);
    assert!(result.is_err());
}

// ========== Ollama Command Tests ==========

#[tokio::test]
async fn test_cmd_ollama_test_with_mock() {
    let result =
        commands::cmd_ollama_test(&AIClient::mock(), PipelineConfig::default(), None).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_ollama_test_single_description() {
    let mock = MockBackend::new();
    let result = commands::cmd_ollama_test(
        &AIClient::Mock(mock.clone()),
        PipelineConfig::default(),
        Some("Kiosk Centraal"),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(mock.call_count(), 1);
    assert!(mock.prompts()[0].ends_with("Kiosk Centraal"));
}

#[tokio::test]
async fn test_cmd_ollama_test_unhealthy_backend() {
    let mock = MockBackend::unhealthy();
    let result =
        commands::cmd_ollama_test(&AIClient::Mock(mock.clone()), PipelineConfig::default(), None)
            .await;

    assert!(result.is_ok());
    assert_eq!(mock.call_count(), 0);
}

// ========== Prompts Command Tests ==========

#[test]
fn test_cmd_prompts_list() {
    assert!(commands::cmd_prompts_list().is_ok());
}

#[test]
fn test_cmd_prompts_show() {
    let config = PipelineConfig::default();
    assert!(commands::cmd_prompts_show("categorize_transactions", &config, &[]).is_ok());
    assert!(commands::cmd_prompts_show(
        "categorize_transactions",
        &config,
        &["Kiosk Centraal".to_string()]
    )
    .is_ok());
}

#[test]
fn test_cmd_prompts_show_unknown_is_error() {
    let err = commands::cmd_prompts_show("classify_merchant", &PipelineConfig::default(), &[])
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("classify_merchant"));
    assert!(message.contains("categorize_transactions"));
}

#[test]
fn test_render_request_joins_with_separator() {
    let prompt = PromptLibrary::embedded_only()
        .get(PromptId::CategorizeTransactions)
        .unwrap()
        .clone();
    let config = PipelineConfig::default();
    let descriptions = vec!["Kiosk".to_string(), "Albert Heijn".to_string()];

    let request = commands::render_request(&prompt, &config, &descriptions);
    assert!(request.ends_with("Expenses: Kiosk,Albert Heijn"));
    assert!(!request.contains("{{transactions}}"));
}

#[test]
fn test_cmd_prompts_path() {
    assert!(commands::cmd_prompts_path().is_ok());
}

// ========== Config Command Tests ==========

#[test]
fn test_cmd_config_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.toml");
    std::fs::write(&path, "[chunking]\nchunk_size = 10\n").unwrap();

    assert!(commands::cmd_config(Some(&path)).is_ok());
    assert_eq!(commands::load_config(Some(&path)).unwrap().chunk_size, 10);
}

#[test]
fn test_cmd_config_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.toml");
    std::fs::write(&path, "[retry]\nmax_tries = 0\n").unwrap();

    assert!(commands::cmd_config(Some(&path)).is_err());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("Beta Boulders Ams Amsterdam Nld", 10), "Beta Bo...");
    assert_eq!(truncate("Café Ümlaut", 7), "Café...");
}
