//! Report-writing agent and its structured output

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ReportWriter, StreamedRun};
use crate::error::{CoinbriefError, Result};
use crate::llm::{LLMProvider, LLMRequest};

/// Instructions for the report writer
pub const WRITER_INSTRUCTIONS: &str = "You are a crypto market analyst writing a concise report on \
current events in the Ethereum and Bitcoin markets. You will receive search summaries for ETH \
and BTC. Produce a short 2-3 sentence overview, then a longer markdown report covering notable \
trends, price movements, and any significant regulatory or adoption news. Finish with two or \
three follow-up questions worth investigating. Respond with a single JSON object with the keys \
\"short_summary\" (string), \"markdown_report\" (string) and \"follow_up_questions\" (array of \
strings), and nothing else.";

/// Structured result of the report writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoReport {
    /// 2-3 sentence overview
    pub short_summary: String,
    /// Full report body in markdown
    pub markdown_report: String,
    /// Suggested follow-up questions, in order
    pub follow_up_questions: Vec<String>,
}

impl CryptoReport {
    /// JSON schema describing this type, for strict structured output
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "short_summary": { "type": "string" },
                "markdown_report": { "type": "string" },
                "follow_up_questions": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["short_summary", "markdown_report", "follow_up_questions"],
            "additionalProperties": false
        })
    }
}

/// Report writer backed by a streaming LLM provider
pub struct WriterAgent {
    name: String,
    instructions: String,
    provider: Arc<dyn LLMProvider>,
}

impl WriterAgent {
    /// Create a writer with the default instructions
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: "CryptoWriterAgent".to_string(),
            instructions: WRITER_INSTRUCTIONS.to_string(),
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

    fn request(&self, input: &str) -> LLMRequest {
        LLMRequest::with_system_prompt(&self.instructions, input)
            .with_response_schema("crypto_report", CryptoReport::json_schema())
    }
}

#[async_trait]
impl ReportWriter for WriterAgent {
    async fn run_streamed(&self, input: &str) -> Result<StreamedRun> {
        let model = self.provider.model_info();
        tracing::debug!(
            agent = %self.name,
            provider = %model.provider,
            model = %model.model_name,
            "Starting streamed report run"
        );

        let stream = self
            .provider
            .generate_stream(&self.request(input))
            .await
            .map_err(|e| CoinbriefError::Agent(format!("{} failed: {}", self.name, e)))?;

        Ok(StreamedRun::new(stream))
    }
}
