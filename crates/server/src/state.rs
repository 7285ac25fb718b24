use std::sync::Arc;
use stocklytic_common::{AppConfig, Result};
use stocklytic_encoder::OllamaEncoder;
use stocklytic_search::{Presenter, Searcher};
use stocklytic_vector::PineconeClient;
use tracing::{info, warn};

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Search orchestration over the shared encoder and index clients
    pub searcher: Searcher,
}

impl AppState {
    /// Build encoder and index clients once for the whole process
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let encoder = OllamaEncoder::new(
            &config.ollama_base_url,
            &config.embedding_model,
            config.embedding_dim,
        )?;
        match encoder.test_connection().await {
            Ok(true) => info!("Ollama reachable at {}", config.ollama_base_url),
            Ok(false) | Err(_) => warn!(
                "Ollama not reachable at {}; searches will fail until it is",
                config.ollama_base_url
            ),
        }

        let index = PineconeClient::connect(&config).await?;

        let searcher = Searcher::new(
            Arc::new(encoder),
            Arc::new(index),
            config.namespace.clone(),
            Presenter::new(&config.quote_base_url),
        );

        Ok(Self::new(config, searcher))
    }

    /// Create application state from an already built searcher
    pub fn new(config: AppConfig, searcher: Searcher) -> Self {
        Self { config, searcher }
    }
}
