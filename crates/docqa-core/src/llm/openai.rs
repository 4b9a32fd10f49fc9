//! OpenAI (and OpenAI-compatible) HTTP client

use super::{ChatMessage, Embedder, Generator};
use crate::config::{LLMServiceConfig, OpenAIConfig};
use crate::error::{DocQaError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the OpenAI embeddings and chat completions endpoints
pub struct OpenAIClient {
    http_client: reqwest::Client,
    config: OpenAIConfig,
    api_key: String,
    embedding_dimensions: usize,
}

impl OpenAIClient {
    /// Create a client from configuration; requires an API key
    pub fn new(config: &LLMServiceConfig) -> Result<Self> {
        let openai = config.openai.clone();
        let api_key = openai
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DocQaError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let embedding_dimensions = openai
            .embedding_dimensions
            .unwrap_or_else(|| default_dimensions(&openai.embedding_model));

        Ok(Self {
            http_client,
            config: openai,
            api_key,
            embedding_dimensions,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> std::result::Result<String, String> {
        let response = self
            .http_client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("failed to read response: {}", e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(format!("OpenAI returned HTTP {}: {}", status, detail));
        }
        Ok(text)
    }
}

/// Native embedding size for well-known OpenAI models
fn default_dimensions(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        _ => 1536,
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn parse_embeddings(body: &str, expected: usize) -> std::result::Result<Vec<Vec<f32>>, String> {
    let mut response: EmbedResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid embeddings response: {}", e))?;
    if response.data.len() != expected {
        return Err(format!(
            "expected {} embeddings, got {}",
            expected,
            response.data.len()
        ));
    }
    response.data.sort_by_key(|d| d.index);
    Ok(response.data.into_iter().map(|d| d.embedding).collect())
}

fn parse_chat(body: &str) -> std::result::Result<String, String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid chat response: {}", e))?;
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| "no choices in chat response".to_string())
}

#[async_trait]
impl Embedder for OpenAIClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| DocQaError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            model = %self.config.embedding_model,
            batch_size = texts.len(),
            "OpenAI embedding batch"
        );

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: texts,
            dimensions: self.config.embedding_dimensions,
        };

        let body = self
            .post("embeddings", &request)
            .await
            .map_err(DocQaError::Embedding)?;
        parse_embeddings(&body, texts.len()).map_err(DocQaError::Embedding)
    }

    fn dimensions(&self) -> usize {
        self.embedding_dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }
}

#[async_trait]
impl Generator for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(
            model = %self.config.llm_model,
            prompt_len = prompt.len(),
            "OpenAI chat completion"
        );

        let request = ChatRequest {
            model: &self.config.llm_model,
            messages: vec![ChatMessage::user(prompt)],
        };

        let body = self
            .post("chat/completions", &request)
            .await
            .map_err(DocQaError::Generation)?;
        parse_chat(&body).map_err(DocQaError::Generation)
    }

    fn model_name(&self) -> &str {
        &self.config.llm_model
    }
}
