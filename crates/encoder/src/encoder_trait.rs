use async_trait::async_trait;
use stocklytic_common::Result;

/// Maps text to a fixed-length embedding vector
#[async_trait]
pub trait QueryEncoder: Send + Sync {
    /// Encode a non-empty query text
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Name of the embedding model
    fn model(&self) -> &str;
}
