//! LLM integration
//!
//! Provides the [`Embedder`] and [`Generator`] capabilities and their HTTP
//! implementations (OpenAI-compatible and Google Gemini). The vendor is picked
//! once, at composition time, by [`providers_from_config`].

mod gemini;
mod openai;
mod traits;

pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use traits::*;

use crate::config::LLMServiceConfig;
use crate::error::{DocQaError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Supported inference vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    OpenAI,
    Google,
}

impl Vendor {
    /// Pick the vendor whose credentials are configured (OpenAI first)
    pub fn select(config: &LLMServiceConfig) -> Result<Self> {
        let has_key = |key: &Option<String>| key.as_deref().is_some_and(|k| !k.trim().is_empty());

        if has_key(&config.openai.api_key) {
            Ok(Vendor::OpenAI)
        } else if has_key(&config.google.api_key) {
            Ok(Vendor::Google)
        } else {
            Err(DocQaError::Config(
                "set OPENAI_API_KEY or GOOGLE_API_KEY (environment or config file)".to_string(),
            ))
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vendor::OpenAI => write!(f, "openai"),
            Vendor::Google => write!(f, "google"),
        }
    }
}

/// Embedder/generator pair from one vendor
#[derive(Clone)]
pub struct Providers {
    pub vendor: Vendor,
    pub embedder: Arc<dyn Embedder>,
    pub generator: Arc<dyn Generator>,
}

/// Build the embedder and generator for the configured vendor.
///
/// Fails with a configuration error when no credentials are present.
pub fn providers_from_config(config: &LLMServiceConfig) -> Result<Providers> {
    let vendor = Vendor::select(config)?;
    let providers = match vendor {
        Vendor::OpenAI => {
            let client = Arc::new(OpenAIClient::new(config)?);
            Providers {
                vendor,
                embedder: client.clone(),
                generator: client,
            }
        }
        Vendor::Google => {
            let client = Arc::new(GeminiClient::new(config)?);
            Providers {
                vendor,
                embedder: client.clone(),
                generator: client,
            }
        }
    };

    tracing::info!(
        "Using {} (embedding: {}, chat: {})",
        vendor,
        providers.embedder.model_name(),
        providers.generator.model_name()
    );
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_credentials_is_config_error() {
        let config = LLMServiceConfig::default();
        assert!(matches!(
            providers_from_config(&config),
            Err(DocQaError::Config(_))
        ));
    }

    #[test]
    fn test_openai_preferred() {
        let mut config = LLMServiceConfig::default();
        config.openai.api_key = Some("sk-test".to_string());
        config.google.api_key = Some("g-test".to_string());
        let providers = providers_from_config(&config).unwrap();
        assert_eq!(providers.vendor, Vendor::OpenAI);
        assert_eq!(providers.embedder.model_name(), "text-embedding-3-small");
    }

    #[test]
    fn test_google_fallback() {
        let mut config = LLMServiceConfig::default();
        config.openai.api_key = Some("  ".to_string());
        config.google.api_key = Some("g-test".to_string());
        let providers = providers_from_config(&config).unwrap();
        assert_eq!(providers.vendor, Vendor::Google);
        assert_eq!(providers.generator.model_name(), "models/gemini-2.0-flash");
    }
}
