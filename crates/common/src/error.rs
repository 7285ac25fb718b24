/// Stocklytic error types
#[derive(Debug, thiserror::Error)]
pub enum StocklyticError {
    /// Query encoder (embedding backend) error
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Vector index query error
    #[error("Vector search error: {0}")]
    VectorSearch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StocklyticError {
    /// Create encoder error
    pub fn encoder<S: Into<String>>(msg: S) -> Self {
        Self::Encoder(msg.into())
    }

    /// Create vector search error
    pub fn vector_search<S: Into<String>>(msg: S) -> Self {
        Self::VectorSearch(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }
}

// HTTP response conversion
impl StocklyticError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Config(_) => 500,
            Self::Encoder(_) => 500,
            Self::VectorSearch(_) => 500,
            Self::Network(_) => 503,
            Self::Serialization(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StocklyticError::invalid_input("bad count").status_code(), 400);
        assert_eq!(StocklyticError::network("timeout").status_code(), 503);
        assert_eq!(StocklyticError::vector_search("boom").status_code(), 500);
    }

    #[test]
    fn test_display_includes_message() {
        let err = StocklyticError::config("PINECONE_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: PINECONE_API_KEY is not set"
        );
    }
}
