//! Extraction backend selection.
//!
//! The provider is read from configuration once; the concrete extractor is
//! resolved when a job asks for it, so a misconfigured live provider fails
//! that job with a configuration error instead of silently falling back to
//! the stub.

use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use insight_core::defaults::LLM_PROVIDER;
use insight_core::{Error, ExtractorProvider, Result, TaskExtractor};

use crate::openai::{OpenAIConfig, OpenAIExtractor};
use crate::stub::StubExtractor;

/// Which extraction backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Deterministic line-based extractor (`mock` or `stub`).
    Stub,
    /// OpenAI-compatible chat completions.
    OpenAI,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Stub => "stub",
            LlmProvider::OpenAI => "openai",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" | "stub" => Ok(LlmProvider::Stub),
            "openai" => Ok(LlmProvider::OpenAI),
            other => Err(Error::Config(format!("unknown LLM provider: {}", other))),
        }
    }
}

/// Extraction settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub provider: LlmProvider,
    pub openai: OpenAIConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Stub,
            openai: OpenAIConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Create config from environment variables.
    ///
    /// `LLM_PROVIDER` selects the backend (default `mock`). An unrecognized
    /// value is a configuration error. OpenAI settings are read through
    /// [`OpenAIConfig::from_env`] regardless of provider.
    pub fn from_env() -> Result<Self> {
        let provider = std::env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| LLM_PROVIDER.to_string())
            .parse()?;

        Ok(Self {
            provider,
            openai: OpenAIConfig::from_env(),
        })
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_openai(mut self, openai: OpenAIConfig) -> Self {
        self.openai = openai;
        self
    }
}

/// [`ExtractorProvider`] driven by an [`ExtractorConfig`].
///
/// The extractor is built on first successful resolution and reused after
/// that. Failed resolutions are not cached.
pub struct ConfiguredExtractors {
    config: ExtractorConfig,
    resolved: OnceCell<Arc<dyn TaskExtractor>>,
}

impl ConfiguredExtractors {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            resolved: OnceCell::new(),
        }
    }

    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ExtractorConfig::from_env()?))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn build(&self) -> Result<Arc<dyn TaskExtractor>> {
        debug!(
            subsystem = "inference",
            component = "provider",
            op = "resolve",
            provider = self.config.provider.as_str(),
            "Resolving task extractor"
        );
        let extractor: Arc<dyn TaskExtractor> = match self.config.provider {
            LlmProvider::Stub => Arc::new(StubExtractor::new()),
            LlmProvider::OpenAI => Arc::new(OpenAIExtractor::new(self.config.openai.clone())?),
        };
        Ok(extractor)
    }
}

impl ExtractorProvider for ConfiguredExtractors {
    fn extractor(&self) -> Result<Arc<dyn TaskExtractor>> {
        self.resolved.get_or_try_init(|| self.build()).cloned()
    }
}
