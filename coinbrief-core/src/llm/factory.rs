//! Factory for creating LLM providers from configuration

use crate::config::LLMProviderConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use std::sync::Arc;

#[cfg(feature = "llm-openai")]
use crate::llm::providers::openai::OpenAIProvider;

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created (e.g., missing API key)
    #[cfg(feature = "llm-openai")]
    pub fn create(config: &LLMProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        let provider = match &config.api_key {
            Some(api_key) => match &config.base_url {
                Some(base_url) => OpenAIProvider::with_base_url(
                    api_key.clone(),
                    config.model.clone(),
                    base_url.clone(),
                ),
                None => OpenAIProvider::new(api_key.clone(), config.model.clone()),
            },
            None => {
                let provider = OpenAIProvider::from_env(Some(config.model.clone()))?;
                match &config.base_url {
                    Some(base_url) => provider.base_url_override(base_url.clone()),
                    None => provider,
                }
            }
        };

        tracing::debug!(
            model = %config.model,
            web_search = config.web_search,
            "Created OpenAI provider"
        );

        Ok(Arc::new(provider.with_web_search(config.web_search)))
    }

    /// Create an LLM provider from configuration
    ///
    /// # Errors
    ///
    /// Always fails: no provider backend was compiled in
    #[cfg(not(feature = "llm-openai"))]
    pub fn create(_config: &LLMProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        Err(crate::error::CoinbriefError::Configuration(
            "OpenAI provider requires 'llm-openai' feature".to_string(),
        ))
    }
}
