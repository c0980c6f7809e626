//! Configuration types for the briefing pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CoinbriefError, Result};

/// Default report destination
pub const DEFAULT_OUTPUT_PATH: &str = "latest_crypto_report.md";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoinbriefConfig {
    /// Report generation settings
    pub report: ReportConfig,

    /// Continuous monitoring settings
    pub monitor: MonitorConfig,

    /// Provider for the search agent
    pub search: LLMProviderConfig,

    /// Provider for the report writer
    pub writer: LLMProviderConfig,

    /// Trace export settings
    pub trace: TraceConfig,
}

impl Default for CoinbriefConfig {
    fn default() -> Self {
        Self {
            report: ReportConfig::default(),
            monitor: MonitorConfig::default(),
            search: LLMProviderConfig::search_default(),
            writer: LLMProviderConfig::writer_default(),
            trace: TraceConfig::default(),
        }
    }
}

/// Report generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Output path; `{timestamp}` is replaced with the UTC run time
    pub output_path: String,

    /// One search per tracked asset
    pub search_terms: Vec<String>,

    /// Phrases cycled through while the report is being written
    pub status_messages: Vec<String>,

    /// Minimum quiet time before the next status phrase is shown
    #[serde(with = "humantime_serde")]
    pub status_interval: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            search_terms: vec![
                "latest Ethereum market news".to_string(),
                "latest Bitcoin market news".to_string(),
            ],
            status_messages: vec![
                "Compiling report...".to_string(),
                "Writing analysis...".to_string(),
                "Finalizing...".to_string(),
            ],
            status_interval: Duration::from_secs(5),
        }
    }
}

/// Continuous monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between the end of one run and the start of the next
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LLMProviderConfig {
    /// Model name
    pub model: String,

    /// API key (if needed, prefer env vars)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL (for compatible endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Ground responses in live web search results
    pub web_search: bool,
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            api_key: None,
            base_url: None,
            web_search: false,
        }
    }
}

impl LLMProviderConfig {
    /// Defaults for the search agent
    pub fn search_default() -> Self {
        Self {
            model: "gpt-4o-mini-search-preview".to_string(),
            web_search: true,
            ..Default::default()
        }
    }

    /// Defaults for the report writer
    pub fn writer_default() -> Self {
        Self {
            model: "o3-mini".to_string(),
            ..Default::default()
        }
    }
}

/// Trace export configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TraceConfig {
    /// Directory for `<trace_id>.json` reports; disabled when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl CoinbriefConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. `coinbrief.toml` in the working directory
    /// 3. File named by `COINBRIEF_CONFIG_PATH`
    /// 4. `COINBRIEF_` environment variables (`__` separates nested keys,
    ///    e.g. `COINBRIEF_REPORT__OUTPUT_PATH`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is invalid.
    pub fn load() -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(CoinbriefConfig::default()))
            .merge(Toml::file("coinbrief.toml"));

        if let Ok(path) = std::env::var("COINBRIEF_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let config: CoinbriefConfig = figment
            .merge(Env::prefixed("COINBRIEF_").split("__"))
            .extract()
            .map_err(|e| {
                CoinbriefError::Configuration(format!("Failed to load configuration: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// The file is layered over the defaults and `COINBRIEF_` environment
    /// variables still override it. `coinbrief.toml` is not read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let path = path.as_ref();
        if !path.exists() {
            return Err(CoinbriefError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: CoinbriefConfig =
            Figment::from(Serialized::defaults(CoinbriefConfig::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed("COINBRIEF_").split("__"))
                .extract()
                .map_err(|e| {
                    CoinbriefError::Configuration(format!(
                        "Failed to load configuration file: {}",
                        e
                    ))
                })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.report.output_path.trim().is_empty() {
            return Err(CoinbriefError::Configuration(
                "report.output_path must not be empty".to_string(),
            ));
        }

        if self.report.search_terms.iter().any(|t| t.trim().is_empty()) {
            return Err(CoinbriefError::Configuration(
                "report.search_terms must not contain empty terms".to_string(),
            ));
        }

        if self.report.status_messages.is_empty() {
            return Err(CoinbriefError::Configuration(
                "report.status_messages must not be empty".to_string(),
            ));
        }

        if self.monitor.interval.is_zero() {
            return Err(CoinbriefError::Configuration(
                "monitor.interval must be greater than zero".to_string(),
            ));
        }

        for (section, provider) in [("search", &self.search), ("writer", &self.writer)] {
            if provider.model.trim().is_empty() {
                return Err(CoinbriefError::Configuration(format!(
                    "{}.model must not be empty",
                    section
                )));
            }
        }

        Ok(())
    }
}
