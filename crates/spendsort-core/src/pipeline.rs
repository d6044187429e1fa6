//! Categorization pipeline
//!
//! Drives chunks through prompt → gateway → parse → validate, retrying each
//! chunk up to the configured bound, then normalizes the collected rows and
//! joins them back onto the transactions.
//!
//! Chunks run strictly one after another with a single request in flight.
//! A chunk that exhausts its attempts aborts the run and discards every row
//! collected so far.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::ai::parsing::parse_category_reply;
use crate::ai::AIBackend;
use crate::chunker::{chunks, Chunk};
use crate::config::PipelineConfig;
use crate::error::{ChunkFailure, Result};
use crate::export::write_categorized_file;
use crate::import::read_transactions_file;
use crate::merge::merge;
use crate::models::{CategoryMappingRow, CategoryMappingTable, MergedTable, TransactionTable};
use crate::normalize::CategoryNormalizer;
use crate::prompts::Prompt;

/// Counts reported after a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub transactions: usize,
    pub unique_descriptions: usize,
    pub chunks: usize,
    /// Rows kept after normalization
    pub mapping_rows: usize,
    pub categorized: usize,
    pub uncategorized: usize,
}

/// Categorizes transactions with one model backend
pub struct Categorizer<B: AIBackend> {
    backend: B,
    prompt: Prompt,
    config: PipelineConfig,
}

impl<B: AIBackend> Categorizer<B> {
    pub fn new(backend: B, prompt: Prompt, config: PipelineConfig) -> Self {
        Self {
            backend,
            prompt,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// One attempt at one chunk
    async fn attempt(&self, chunk: &Chunk<'_>) -> Result<Vec<CategoryMappingRow>> {
        let prompt = self
            .prompt
            .render_transactions(&chunk.joined(&self.config.separator));
        debug!(chunk = chunk.index, "Prompt: {}", prompt);

        let reply = self.backend.invoke(&prompt).await?;
        debug!(chunk = chunk.index, "Raw reply: {}", reply);

        parse_category_reply(&reply)
    }

    /// Categorize one chunk, retrying up to `max_tries` attempts in total
    pub async fn categorize_chunk(
        &self,
        chunk: &Chunk<'_>,
    ) -> std::result::Result<Vec<CategoryMappingRow>, ChunkFailure> {
        let max_tries = self.config.max_tries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_tries {
            match self.attempt(chunk).await {
                Ok(rows) => {
                    info!(
                        chunk = chunk.index,
                        start = chunk.start,
                        end = chunk.end,
                        rows = rows.len(),
                        attempt,
                        "Categorized chunk"
                    );
                    return Ok(rows);
                }
                Err(e) => {
                    warn!(
                        chunk = chunk.index,
                        start = chunk.start,
                        end = chunk.end,
                        attempt,
                        max_tries,
                        error = %e,
                        "Categorization attempt failed"
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(ChunkFailure {
            chunk: chunk.index,
            start: chunk.start,
            end: chunk.end,
            attempts: max_tries,
            last_error,
        })
    }

    /// Categorize every description, or fail with the first exhausted chunk
    pub async fn categorize(
        &self,
        descriptions: &[String],
    ) -> std::result::Result<CategoryMappingTable, ChunkFailure> {
        let mut table = CategoryMappingTable::new();

        for chunk in chunks(descriptions, self.config.chunk_size) {
            let rows = self.categorize_chunk(&chunk).await?;
            table.extend(rows);
        }

        Ok(table)
    }

    /// Full in-memory run: categorize, normalize, merge
    pub async fn run(&self, transactions: TransactionTable) -> Result<(MergedTable, RunStats)> {
        let descriptions = transactions.unique_descriptions();
        let chunk_count = chunks(&descriptions, self.config.chunk_size).count();

        info!(
            transactions = transactions.len(),
            unique = descriptions.len(),
            chunks = chunk_count,
            model = self.backend.model(),
            "Starting categorization"
        );

        let mapping = self.categorize(&descriptions).await?;

        let normalizer = CategoryNormalizer::new(self.config.category_rules.clone())?;
        let mapping = normalizer.normalize(mapping);

        let transaction_count = transactions.len();
        let merged = merge(transactions, &mapping, &self.config.canonical_names);

        let categorized = merged.categorized_count();
        let stats = RunStats {
            transactions: transaction_count,
            unique_descriptions: descriptions.len(),
            chunks: chunk_count,
            mapping_rows: mapping.len(),
            categorized,
            uncategorized: merged.len() - categorized,
        };

        info!(
            categorized = stats.categorized,
            uncategorized = stats.uncategorized,
            "Categorization complete"
        );

        Ok((merged, stats))
    }

    /// Read `input`, run the pipeline, write `output` only if everything succeeded
    pub async fn run_file(&self, input: &Path, output: &Path) -> Result<RunStats> {
        let transactions = read_transactions_file(input)?;
        let (merged, stats) = self.run(transactions).await?;
        write_categorized_file(output, &merged)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockBackend, MockReply};
    use crate::error::Error;
    use crate::models::{Direction, TransactionRecord};
    use crate::prompts::{PromptId, PromptLibrary};

    fn prompt() -> Prompt {
        PromptLibrary::embedded_only()
            .get(PromptId::CategorizeTransactions)
            .unwrap()
            .clone()
    }

    fn categorizer(mock: MockBackend, chunk_size: usize) -> Categorizer<MockBackend> {
        let config = PipelineConfig::default()
            .with_overrides(Some(chunk_size), None)
            .unwrap();
        Categorizer::new(mock, prompt(), config)
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Shop {}", i)).collect()
    }

    fn table(descriptions: &[&str]) -> TransactionTable {
        TransactionTable {
            headers: vec!["Name / Description".into()],
            description_column: 0,
            records: descriptions
                .iter()
                .map(|d| TransactionRecord {
                    date: "2023-03-01".into(),
                    description: d.to_string(),
                    amount: Some(10.0),
                    direction: Some(Direction::Expense),
                    columns: vec![d.to_string()],
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_example() {
        let mock = MockBackend::with_replies([MockReply::text(
            "Sure!\n\nSpotify AB by Adyen - Entertainment\nBeta Boulders Ams Amsterdam Nld - Sport\n\nHope this helps!",
        )]);
        let c = categorizer(mock.clone(), 30);

        let (merged, stats) = c
            .run(table(&["Spotify AB by Adyen", "Beta Boulders Ams Amsterdam Nld"]))
            .await
            .unwrap();

        let categories: Vec<Option<&str>> = merged.records.iter().map(|r| r.category()).collect();
        assert_eq!(
            categories,
            vec![Some("Entertainment"), Some("Sport and Fitness")]
        );
        assert_eq!(merged.records[0].record.description, "Spotify Ab By Adyen");
        assert_eq!(stats.chunks, 1);
        assert_eq!(stats.categorized, 2);
        assert!(mock.prompts()[0]
            .ends_with("Spotify AB by Adyen,Beta Boulders Ams Amsterdam Nld"));
    }

    #[tokio::test]
    async fn test_always_failing_chunk_makes_exactly_max_tries_calls() {
        let mock = MockBackend::with_replies(vec![MockReply::fail("connection refused"); 7]);
        let c = categorizer(mock.clone(), 30);

        let failure = c.categorize(&names(5)).await.unwrap_err();
        assert_eq!(mock.call_count(), 7);
        assert_eq!(
            failure,
            ChunkFailure {
                chunk: 0,
                start: 0,
                end: 5,
                attempts: 7,
                last_error: "Model gateway error: connection refused".into(),
            }
        );
        assert!(failure.to_string().contains("indexes 0 to 5"));
    }

    #[tokio::test]
    async fn test_failure_in_later_chunk_reports_its_range() {
        let mut replies = vec![MockReply::text("Intro\n\nShop 0 - Food\nShop 1 - Food\n\nBye")];
        replies.extend(vec![MockReply::text("no data block"); 3]);
        let mock = MockBackend::with_replies(replies);
        let config = PipelineConfig::default()
            .with_overrides(Some(2), Some(3))
            .unwrap();
        let c = Categorizer::new(mock.clone(), prompt(), config);

        let failure = c.categorize(&names(3)).await.unwrap_err();
        assert_eq!((failure.chunk, failure.start, failure.end), (1, 2, 3));
        assert_eq!(failure.attempts, 3);
        assert!(failure.last_error.contains("No data block"));
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_recovers_after_mixed_failures() {
        let mock = MockBackend::with_replies([
            MockReply::fail("timeout"),
            MockReply::text("no blank line"),
            MockReply::text("Intro\n\nShop 0 Food\n\nBye"),
        ]);
        let c = categorizer(mock.clone(), 30);

        let table = c.categorize(&names(2)).await.unwrap();
        assert_eq!(mock.call_count(), 4);
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_chunks_are_sent_in_order() {
        let mock = MockBackend::new();
        let c = categorizer(mock.clone(), 2);

        let table = c.categorize(&names(5)).await.unwrap();
        assert_eq!(table.len(), 5);

        let prompts = mock.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].ends_with("Shop 0,Shop 1"));
        assert!(prompts[1].ends_with("Shop 2,Shop 3"));
        assert!(prompts[2].ends_with("Shop 4"));
    }

    #[tokio::test]
    async fn test_run_aborts_without_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(
            &input,
            "Date,Name / Description,Amount (EUR),Expense/Income\n2023-01-02,Kiosk,3.50,Expense\n",
        )
        .unwrap();

        let mock = MockBackend::with_replies(vec![MockReply::fail("down"); 7]);
        let c = categorizer(mock, 30);

        let err = c.run_file(&input, &output).await.unwrap_err();
        assert!(matches!(err, Error::Chunk(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_empty_table_makes_no_calls() {
        let mock = MockBackend::new();
        let c = categorizer(mock.clone(), 30);

        let (merged, stats) = c.run(TransactionTable::default()).await.unwrap();
        assert!(merged.is_empty());
        assert_eq!(stats.chunks, 0);
        assert_eq!(mock.call_count(), 0);
    }
}
