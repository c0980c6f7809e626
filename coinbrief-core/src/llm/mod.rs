//! Language-model provider seam.
//!
//! Agents never talk to a vendor API directly; they hold an
//! `Arc<dyn LLMProvider>` built by [`LLMProviderFactory`].

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::{CoinbriefError, Result};

/// Stream of text deltas produced by a streamed completion
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// JSON schema the response must conform to
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    /// Schema name reported to the provider
    pub name: String,
    /// JSON schema document
    pub schema: serde_json::Value,
}

/// Request to an LLM provider
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Temperature for generation (0.0-2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,

    /// Stop sequences
    pub stop_sequences: Vec<String>,

    /// Structured output contract, if any
    pub response_schema: Option<ResponseSchema>,
}

impl LLMRequest {
    /// Create a simple request from a single prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message {
                role: MessageRole::User,
                content: prompt.into(),
            }],
            temperature: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
            response_schema: None,
        }
    }

    /// Create a request with system prompt
    pub fn with_system_prompt(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            messages: vec![
                Message {
                    role: MessageRole::System,
                    content: system_prompt.into(),
                },
                Message {
                    role: MessageRole::User,
                    content: user_prompt.into(),
                },
            ],
            temperature: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
            response_schema: None,
        }
    }

    /// Require the response to match a JSON schema
    pub fn with_response_schema(
        mut self,
        name: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        self.response_schema = Some(ResponseSchema {
            name: name.into(),
            schema,
        });
        self
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,

    /// Token usage information
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Trait for LLM provider implementations.
///
/// Implementors handle the actual vendor calls. Only
/// [`generate_request`](LLMProvider::generate_request) is required;
/// providers that can stream override
/// [`generate_stream`](LLMProvider::generate_stream).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a complete response for a request.
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse>;

    /// Generate with streaming response.
    ///
    /// # Returns
    ///
    /// Stream of text chunks, finite, ending when the completion is done
    async fn generate_stream(&self, _request: &LLMRequest) -> Result<TextStream> {
        Err(CoinbriefError::Configuration(format!(
            "Streaming not supported by provider '{}'",
            self.model_info().provider
        )))
    }

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

/// Model information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

pub mod factory;
pub mod providers;

pub use factory::LLMProviderFactory;
