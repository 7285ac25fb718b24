//! Stocklytic query encoder
//!
//! Turns free-text queries into embeddings through an Ollama embedding model

mod client;
mod encoder_trait;
mod types;

pub use client::OllamaEncoder;
pub use encoder_trait::QueryEncoder;
pub use types::{EmbedRequest, EmbedResponse};
