use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use stocklytic_common::{AppConfig, Result, StocklyticError};
use tracing::{debug, info};

use crate::index_trait::VectorIndex;
use crate::types::{IndexStats, QueryRequest, QueryResponse};

/// Pinecone REST API version sent with every request
pub const API_VERSION: &str = "2024-07";

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}

/// Pinecone data-plane client bound to one index
///
/// No request timeout is configured: a slow query blocks until the service
/// answers or fails.
#[derive(Debug, Clone)]
pub struct PineconeClient {
    host_url: String,
    api_key: String,
    client: Client,
}

impl PineconeClient {
    /// Create client for a known index host
    pub fn new(api_key: impl Into<String>, host: &str) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StocklyticError::config("Pinecone API key cannot be empty"));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let host_url = normalize_host(host);
        info!("Pinecone client initialized: {}", host_url);

        Ok(Self {
            host_url,
            api_key,
            client,
        })
    }

    /// Create client from configuration, resolving the index host if needed
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let host = match &config.pinecone_index_host {
            Some(host) => host.clone(),
            None => {
                Self::resolve_host(
                    &config.pinecone_control_url,
                    &config.pinecone_api_key,
                    &config.pinecone_index_name,
                )
                .await?
            }
        };

        Self::new(config.pinecone_api_key.clone(), &host)
    }

    /// Look up the data-plane host of an index via the control plane
    pub async fn resolve_host(control_url: &str, api_key: &str, index_name: &str) -> Result<String> {
        let url = format!(
            "{}/indexes/{}",
            control_url.trim_end_matches('/'),
            index_name
        );
        debug!("Resolving Pinecone index host: {}", url);

        let client = Client::new();
        let response = send(with_headers(client.get(&url), api_key)).await?;
        let response = check_status(response, &format!("index '{}'", index_name)).await?;

        let description: IndexDescription = response.json().await.map_err(|e| {
            StocklyticError::serialization(format!("Failed to parse index description: {}", e))
        })?;

        info!("Resolved index '{}' to host {}", index_name, description.host);
        Ok(description.host)
    }

    /// Base URL of the index data plane
    pub fn host_url(&self) -> &str {
        &self.host_url
    }
}

#[async_trait]
impl VectorIndex for PineconeClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let url = format!("{}/query", self.host_url);

        debug!(
            "Querying index - namespace: {}, top_k: {}, filter fields: {}",
            request.namespace,
            request.top_k,
            request.filter.len()
        );

        let response = send(with_headers(self.client.post(&url), &self.api_key).json(request)).await?;
        let response = check_status(response, "query").await?;

        let result: QueryResponse = response.json().await.map_err(|e| {
            StocklyticError::serialization(format!("Failed to parse query response: {}", e))
        })?;

        debug!("Query returned {} matches", result.matches.len());
        Ok(result)
    }

    async fn stats(&self) -> Result<IndexStats> {
        let url = format!("{}/describe_index_stats", self.host_url);

        let response = send(
            with_headers(self.client.post(&url), &self.api_key).json(&serde_json::json!({})),
        )
        .await?;
        let response = check_status(response, "describe_index_stats").await?;

        response.json().await.map_err(|e| {
            StocklyticError::serialization(format!("Failed to parse index stats: {}", e))
        })
    }
}

fn with_headers(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
    builder
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
}

async fn send(builder: RequestBuilder) -> Result<Response> {
    builder
        .send()
        .await
        .map_err(|e| StocklyticError::network(format!("Failed to reach Pinecone: {}", e)))
}

async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StocklyticError::config(format!(
            "Pinecone rejected the API key ({}): {}",
            status, body
        )),
        StatusCode::NOT_FOUND => {
            StocklyticError::not_found(format!("Pinecone {} not found: {}", what, body))
        }
        _ => StocklyticError::vector_search(format!(
            "Pinecone {} failed with {}: {}",
            what, status, body
        )),
    })
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
