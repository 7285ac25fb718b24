//! Stocklytic vector index client
//!
//! Filtered nearest-neighbour queries against a managed Pinecone index

mod client;
mod index_trait;
mod types;

pub use client::{PineconeClient, API_VERSION};
pub use index_trait::VectorIndex;
pub use types::{
    Condition, IndexStats, Match, Metadata, NamespaceStats, Predicate, QueryRequest,
    QueryResponse,
};
