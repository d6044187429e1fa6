//! Mock backend for testing
//!
//! Replays scripted replies in order, then falls back to a well-formed
//! categorization reply built from the prompt. Useful for unit tests and
//! development without a running LLM server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

/// Marker the default prompt puts in front of the joined descriptions
const EXPENSES_MARKER: &str = "Expenses: ";

/// One scripted gateway outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text as the model reply
    Text(String),
    /// Fail the call with a gateway error
    Fail(String),
}

impl MockReply {
    pub fn text(reply: &str) -> Self {
        MockReply::Text(reply.to_string())
    }

    pub fn fail(message: &str) -> Self {
        MockReply::Fail(message.to_string())
    }
}

/// Mock AI backend for testing
///
/// Clones share the reply queue and the call log, so a test can hand one
/// copy to the pipeline and inspect the other afterwards.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    model: String,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            model: "mock".to_string(),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a mock that plays `replies` before falling back to the default
    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let mock = Self::new();
        for reply in replies {
            mock.push_reply(reply);
        }
        mock
    }

    /// Queue another scripted reply
    pub fn push_reply(&self, reply: MockReply) {
        if let Ok(mut queue) = self.replies.lock() {
            queue.push_back(reply);
        }
    }

    /// Create a new instance with a different model name
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Number of `invoke` calls so far (across clones)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// A well-formed reply categorizing the descriptions found in `prompt`
    pub fn reply_for_prompt(prompt: &str) -> String {
        let descriptions = prompt
            .rfind(EXPENSES_MARKER)
            .map(|i| &prompt[i + EXPENSES_MARKER.len()..])
            .unwrap_or("");

        let lines: Vec<String> = descriptions
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .enumerate()
            .map(|(i, d)| format!("{}. {} - {}", i + 1, d, guess_category(d)))
            .collect();

        format!(
            "Sure! Here are the categories:\n\n{}\n\nLet me know if you need anything else.",
            lines.join("\n")
        )
    }
}

/// Keyword heuristic standing in for a real model
pub fn guess_category(description: &str) -> &'static str {
    let d = description.to_uppercase();
    if d.contains("SPOTIFY") || d.contains("NETFLIX") || d.contains("CINEMA") {
        "Entertainment"
    } else if d.contains("BOULDERS") || d.contains("GYM") || d.contains("FITNESS") {
        "Sport"
    } else if d.contains("ALBERT HEIJN") || d.contains("JUMBO") || d.contains("CAFE") {
        "Food"
    } else if d.contains("ZARA") || d.contains("H&M") || d.contains("UNIQLO") {
        "Clothing"
    } else if d.contains("APOTHEEK") || d.contains("PHARMACY") || d.contains("DOCTOR") {
        "Health"
    } else if d.contains("KLM") || d.contains("NS GROEP") || d.contains("HOTEL") {
        "Travel"
    } else {
        "Services"
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let scripted = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        match scripted {
            Some(MockReply::Text(reply)) => Ok(reply),
            Some(MockReply::Fail(message)) => Err(Error::Gateway(message)),
            None => Ok(Self::reply_for_prompt(prompt)),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
