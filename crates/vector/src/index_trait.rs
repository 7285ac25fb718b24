use async_trait::async_trait;
use stocklytic_common::Result;

use crate::types::{IndexStats, QueryRequest, QueryResponse};

/// Remote vector index
///
/// Ordering, distance metric and filter evaluation belong to the service.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Run a filtered top-k query; an empty match list is a valid outcome
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse>;

    /// Index statistics
    async fn stats(&self) -> Result<IndexStats>;
}
