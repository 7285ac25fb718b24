use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use stocklytic_common::{Result, StocklyticError};
use tracing::{debug, info};

use crate::encoder_trait::QueryEncoder;
use crate::types::{EmbedRequest, EmbedResponse};

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Ollama-backed query encoder
#[derive(Debug, Clone)]
pub struct OllamaEncoder {
    base_url: String,
    model: String,
    dimension: Option<usize>,
    retry_delay: Duration,
    client: Client,
}

impl OllamaEncoder {
    /// Create new Ollama encoder
    ///
    /// `dimension`, when set, is checked against every embedding returned.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: Option<usize>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // model load can be slow on first call
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama encoder initialized: {} (model: {})", base_url, model);
        Ok(Self {
            base_url,
            model,
            dimension,
            retry_delay: RETRY_BASE_DELAY,
            client,
        })
    }

    /// Override the first backoff delay (doubled on every further attempt)
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Test connection to Ollama
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StocklyticError::network(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }

    /// Generate embedding with custom retry count
    async fn embed_with_retry(&self, text: &str, max_retries: u32) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            self.model,
            text.len()
        );

        let request = EmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request).await {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                // A wrong dimension will not fix itself on retry
                Err(e @ StocklyticError::Encoder(_)) => return Err(e),
                Err(e) => {
                    if attempt < max_retries {
                        let delay = self.retry_delay * 2u32.pow(attempt - 1);
                        tracing::warn!(
                            "Embedding request failed (attempt {}/{}): {}. Retrying in {:?}...",
                            attempt,
                            max_retries,
                            e,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| StocklyticError::encoder("All retries failed")))
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                StocklyticError::network(format!("Failed to send embedding request: {}", e))
            })?
            .error_for_status()
            .map_err(|e| StocklyticError::network(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response.json().await.map_err(|e| {
            StocklyticError::serialization(format!("Failed to parse embedding response: {}", e))
        })?;

        if result.embedding.is_empty() {
            return Err(StocklyticError::network("Empty embedding from Ollama"));
        }

        if let Some(expected) = self.dimension {
            if result.embedding.len() != expected {
                return Err(StocklyticError::encoder(format!(
                    "Embedding dimension mismatch: expected {}, got {}",
                    expected,
                    result.embedding.len()
                )));
            }
        }

        Ok(result.embedding)
    }
}

#[async_trait]
impl QueryEncoder for OllamaEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_retry(text, MAX_RETRIES).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_encode_sends_model_and_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/embeddings")
            .match_body(Matcher::Json(json!({
                "model": "nomic-embed-text",
                "prompt": "electric vehicles"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embedding":[0.1,0.2,0.3]}"#)
            .create_async()
            .await;

        let encoder = OllamaEncoder::new(server.url(), "nomic-embed-text", Some(3)).unwrap();
        let embedding = encoder.encode("electric vehicles").await.unwrap();

        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(encoder.model(), "nomic-embed-text");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embedding":[0.1,0.2]}"#)
            .expect(1)
            .create_async()
            .await;

        let encoder = OllamaEncoder::new(server.url(), "nomic-embed-text", Some(768)).unwrap();
        let err = encoder.encode("banks").await.unwrap_err();

        assert!(matches!(err, StocklyticError::Encoder(_)));
        mock.assert_async().await;
    }

    fn fast_encoder(url: String) -> OllamaEncoder {
        OllamaEncoder::new(url, "nomic-embed-text", None)
            .unwrap()
            .with_retry_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", "/api/embeddings")
            .with_status(500)
            .with_body("model is loading")
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("POST", "/api/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embedding":[0.5,0.25]}"#)
            .expect(1)
            .create_async()
            .await;

        let embedding = fast_encoder(server.url()).encode("banks").await.unwrap();

        assert_eq!(embedding, vec![0.5, 0.25]);
        failing.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/embeddings")
            .with_status(503)
            .expect(MAX_RETRIES as usize)
            .create_async()
            .await;

        let err = fast_encoder(server.url()).encode("banks").await.unwrap_err();

        assert!(matches!(err, StocklyticError::Network(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_embedding_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embedding":[]}"#)
            .expect(MAX_RETRIES as usize)
            .create_async()
            .await;

        let err = fast_encoder(server.url()).encode("banks").await.unwrap_err();

        assert!(err.to_string().contains("Empty embedding"));
        mock.assert_async().await;
    }

    #[test]
    fn test_default_backoff_starts_at_one_second() {
        let encoder = OllamaEncoder::new("http://localhost:11434", "nomic-embed-text", None).unwrap();
        assert_eq!(encoder.retry_delay, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_test_connection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[]}"#)
            .create_async()
            .await;

        let encoder = OllamaEncoder::new(server.url(), "nomic-embed-text", None).unwrap();
        assert!(encoder.test_connection().await.unwrap());
    }
}
