use crate::error::StocklyticError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentence-transformers model the `stocks` index was built with
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-mpnet-base-v2";

/// Output size of [`DEFAULT_EMBEDDING_MODEL`]
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Stocklytic application configuration
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pinecone API key (required)
    pub pinecone_api_key: String,

    /// Pinecone index name
    pub pinecone_index_name: String,

    /// Pinecone index data-plane host; resolved from the control plane when unset
    pub pinecone_index_host: Option<String>,

    /// Pinecone control plane URL
    pub pinecone_control_url: String,

    /// Namespace holding the stock description vectors
    pub namespace: String,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name; must be the model the index was built with
    pub embedding_model: String,

    /// Expected embedding dimension
    pub embedding_dim: Option<usize>,

    /// Base URL of the external quote page used when a record has no website
    pub quote_base_url: String,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory (console only when unset)
    pub log_dir: Option<PathBuf>,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pinecone_api_key: String::new(),
            pinecone_index_name: "stocks".to_string(),
            pinecone_index_host: None,
            pinecone_control_url: "https://api.pinecone.io".to_string(),
            namespace: "stock-descriptions".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: Some(DEFAULT_EMBEDDING_DIM),
            quote_base_url: "https://www.finviz.com".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, StocklyticError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Fails fast when the Pinecone API key is missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StocklyticError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let pinecone_api_key = get("PINECONE_API_KEY").ok_or_else(|| {
            StocklyticError::config("PINECONE_API_KEY is not set; export it or add it to .env")
        })?;

        let server_port = match get("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|_| {
                StocklyticError::config(format!("SERVER_PORT is not a valid port: {}", raw))
            })?,
            None => defaults.server_port,
        };

        let embedding_dim = match get("EMBEDDING_DIM") {
            Some(raw) => Some(raw.parse().map_err(|_| {
                StocklyticError::config(format!("EMBEDDING_DIM is not a valid size: {}", raw))
            })?),
            None => defaults.embedding_dim,
        };

        let config = Self {
            pinecone_api_key,
            pinecone_index_name: get("PINECONE_INDEX_NAME")
                .unwrap_or(defaults.pinecone_index_name),
            pinecone_index_host: get("PINECONE_INDEX_HOST"),
            pinecone_control_url: get("PINECONE_CONTROL_URL")
                .unwrap_or(defaults.pinecone_control_url),
            namespace: get("PINECONE_NAMESPACE").unwrap_or(defaults.namespace),
            ollama_base_url: get("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            embedding_model: get("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embedding_dim,
            quote_base_url: get("QUOTE_BASE_URL").unwrap_or(defaults.quote_base_url),
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            log_dir: get("LOG_DIR").map(PathBuf::from),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), StocklyticError> {
        if self.pinecone_api_key.trim().is_empty() {
            return Err(StocklyticError::config("Pinecone API key cannot be empty"));
        }

        if self.namespace.is_empty() {
            return Err(StocklyticError::config("Pinecone namespace cannot be empty"));
        }

        for (name, url) in [
            ("Ollama base URL", &self.ollama_base_url),
            ("Pinecone control URL", &self.pinecone_control_url),
            ("Quote base URL", &self.quote_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(StocklyticError::config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.embedding_dim == Some(0) {
            return Err(StocklyticError::config("Embedding dimension cannot be 0"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(StocklyticError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, StocklyticError::Config(_)));
        assert!(err.to_string().contains("PINECONE_API_KEY"));

        let err = AppConfig::from_lookup(lookup(&[("PINECONE_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, StocklyticError::Config(_)));
    }

    #[test]
    fn test_defaults_with_api_key() {
        let config = AppConfig::from_lookup(lookup(&[("PINECONE_API_KEY", "pk-test")])).unwrap();
        assert_eq!(config.pinecone_api_key, "pk-test");
        assert_eq!(config.pinecone_index_name, "stocks");
        assert_eq!(config.namespace, "stock-descriptions");
        assert_eq!(config.pinecone_index_host, None);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.quote_base_url, "https://www.finviz.com");
        assert_eq!(config.embedding_model, "all-mpnet-base-v2");
        assert_eq!(config.embedding_dim, Some(768));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PINECONE_API_KEY", "pk-test"),
            ("PINECONE_INDEX_HOST", "stocks-abc.svc.pinecone.io"),
            ("PINECONE_NAMESPACE", "other"),
            ("EMBEDDING_MODEL", "all-minilm"),
            ("EMBEDDING_DIM", "384"),
            ("SERVER_PORT", "9000"),
            ("LOG_DIR", "/tmp/stocklytic"),
        ]))
        .unwrap();
        assert_eq!(
            config.pinecone_index_host.as_deref(),
            Some("stocks-abc.svc.pinecone.io")
        );
        assert_eq!(config.namespace, "other");
        assert_eq!(config.embedding_model, "all-minilm");
        assert_eq!(config.embedding_dim, Some(384));
        assert_eq!(config.server_bind_address(), "0.0.0.0:9000");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/stocklytic")));
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[
            ("PINECONE_API_KEY", "pk-test"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig {
            pinecone_api_key: "pk-test".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());

        config.ollama_base_url = "localhost:11434".to_string();
        assert!(config.validate().is_err());

        let invalid_config = AppConfig::default();
        assert!(invalid_config.validate().is_err());
    }
}
