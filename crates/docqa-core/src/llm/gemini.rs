//! Google Gemini REST client
//!
//! Talks to the Generative Language API directly over `reqwest`:
//! `embedContent` / `batchEmbedContents` for embeddings and
//! `generateContent` for answers.

use super::{Embedder, Generator};
use crate::config::{GoogleConfig, LLMServiceConfig};
use crate::error::{DocQaError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the Gemini embedding and generation endpoints
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: GoogleConfig,
    api_key: String,
    embedding_model: String,
    llm_model: String,
}

impl GeminiClient {
    /// Create a client from configuration; requires an API key
    pub fn new(config: &LLMServiceConfig) -> Result<Self> {
        let google = config.google.clone();
        let api_key = google
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DocQaError::Config("GOOGLE_API_KEY is not set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let embedding_model = qualified_model(&google.embedding_model);
        let llm_model = qualified_model(&google.llm_model);

        Ok(Self {
            http_client,
            config: google,
            api_key,
            embedding_model,
            llm_model,
        })
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn post<T: Serialize>(
        &self,
        url: String,
        body: &T,
    ) -> std::result::Result<String, String> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
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
            return Err(format!("Gemini returned HTTP {}: {}", status, detail));
        }
        Ok(text)
    }
}

/// Gemini resource names carry a `models/` prefix
fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Native embedding size for well-known Gemini models
fn default_dimensions(model: &str) -> usize {
    match model {
        "models/gemini-embedding-001" => 3072,
        _ => 768,
    }
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Embedding,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<Embedding>,
}

#[derive(Deserialize)]
struct Embedding {
    values: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<UserContent<'a>>,
}

#[derive(Serialize)]
struct UserContent<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn parse_batch_embeddings(
    body: &str,
    expected: usize,
) -> std::result::Result<Vec<Vec<f32>>, String> {
    let response: BatchEmbedResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid embeddings response: {}", e))?;
    if response.embeddings.len() != expected {
        return Err(format!(
            "expected {} embeddings, got {}",
            expected,
            response.embeddings.len()
        ));
    }
    Ok(response.embeddings.into_iter().map(|e| e.values).collect())
}

fn parse_generation(body: &str) -> std::result::Result<String, String> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid generation response: {}", e))?;
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| "no candidates in generation response".to_string())?;
    Ok(content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join(""))
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        tracing::debug!(model = %self.embedding_model, text_len = text.len(), "Gemini embedding");

        let request = EmbedRequest {
            model: &self.embedding_model,
            content: Content::text(text),
        };
        let body = self
            .post(self.url(&self.embedding_model, "embedContent"), &request)
            .await
            .map_err(DocQaError::Embedding)?;

        let response: EmbedResponse = serde_json::from_str(&body)
            .map_err(|e| DocQaError::Embedding(format!("invalid embedding response: {}", e)))?;
        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            model = %self.embedding_model,
            batch_size = texts.len(),
            "Gemini embedding batch"
        );

        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: &self.embedding_model,
                    content: Content::text(text),
                })
                .collect(),
        };
        let body = self
            .post(self.url(&self.embedding_model, "batchEmbedContents"), &request)
            .await
            .map_err(DocQaError::Embedding)?;
        parse_batch_embeddings(&body, texts.len()).map_err(DocQaError::Embedding)
    }

    fn dimensions(&self) -> usize {
        default_dimensions(&self.embedding_model)
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.llm_model, prompt_len = prompt.len(), "Gemini generation");

        let request = GenerateRequest {
            contents: vec![UserContent {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };
        let body = self
            .post(self.url(&self.llm_model, "generateContent"), &request)
            .await
            .map_err(DocQaError::Generation)?;
        parse_generation(&body).map_err(DocQaError::Generation)
    }

    fn model_name(&self) -> &str {
        &self.llm_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        let mut config = LLMServiceConfig::default();
        config.google.api_key = Some("test-key".to_string());
        GeminiClient::new(&config).unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let config = LLMServiceConfig::default();
        assert!(matches!(
            GeminiClient::new(&config),
            Err(DocQaError::Config(_))
        ));
    }

    #[test]
    fn test_model_names_are_qualified() {
        assert_eq!(qualified_model("gemini-2.0-flash"), "models/gemini-2.0-flash");
        assert_eq!(qualified_model("models/embedding-001"), "models/embedding-001");

        let client = client();
        assert_eq!(Generator::model_name(&client), "models/gemini-2.0-flash");
        assert_eq!(Embedder::dimensions(&client), 768);
        assert_eq!(
            client.url("models/embedding-001", "embedContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/embedding-001:embedContent"
        );
    }

    #[test]
    fn test_batch_request_shape() {
        let request = BatchEmbedRequest {
            requests: vec![EmbedRequest {
                model: "models/embedding-001",
                content: Content::text("hello"),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["requests"][0]["model"], "models/embedding-001");
        assert_eq!(json["requests"][0]["content"]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_parse_batch_embeddings() {
        let body = r#"{"embeddings":[{"values":[0.1,0.2]},{"values":[0.3,0.4]}]}"#;
        let vectors = parse_batch_embeddings(body, 2).unwrap();
        assert_eq!(vectors[1], vec![0.3, 0.4]);
        assert!(parse_batch_embeddings(body, 3).is_err());
    }

    #[test]
    fn test_parse_generation_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"The sky "},{"text":"is blue."}]}}]}"#;
        assert_eq!(parse_generation(body).unwrap(), "The sky is blue.");
        assert!(parse_generation(r#"{"candidates":[]}"#).is_err());
    }
}
