//! Web search agent

use async_trait::async_trait;
use std::sync::Arc;

use super::SearchCapability;
use crate::error::{CoinbriefError, Result};
use crate::llm::{LLMProvider, LLMRequest};

/// Instructions for the search agent
pub const SEARCH_INSTRUCTIONS: &str = "You are a research assistant. You will be given a search \
term. Search the web for it and summarize what you find in 2-3 short paragraphs, under 300 \
words. Keep only the substance: facts, figures, dates and named sources. Terse notes are fine; \
full sentences are not required. Your summary will be read by an analyst writing a market \
report, so leave out filler and do not add any commentary beyond the summary itself.";

/// Search agent backed by a web-search-capable LLM provider
pub struct SearchAgent {
    name: String,
    instructions: String,
    provider: Arc<dyn LLMProvider>,
}

impl SearchAgent {
    /// Create a search agent with the default instructions
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: "SearchAgent".to_string(),
            instructions: SEARCH_INSTRUCTIONS.to_string(),
            provider,
        }
    }

    /// Replace the instructions
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Agent name
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl SearchCapability for SearchAgent {
    async fn search(&self, query: &str) -> Result<String> {
        let request = LLMRequest::with_system_prompt(&self.instructions, query);
        let response = self
            .provider
            .generate_request(&request)
            .await
            .map_err(|e| CoinbriefError::Agent(format!("{} failed: {}", self.name, e)))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                agent = %self.name,
                total_tokens = usage.total_tokens,
                "Search completed"
            );
        }

        Ok(response.content)
    }
}
