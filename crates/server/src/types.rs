use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stocklytic_common::Result;
use stocklytic_search::{DisplayRecord, Query, Sector};

/// Search form / query-string parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search query text
    #[serde(default)]
    pub q: String,

    /// Sector name or "Any Sector"
    pub sector: Option<String>,

    /// Market cap lower bound (billions)
    pub cap_min: Option<f64>,

    /// Market cap upper bound (billions)
    pub cap_max: Option<f64>,

    /// Volume lower bound (millions)
    pub vol_min: Option<u64>,

    /// Volume upper bound (millions)
    pub vol_max: Option<u64>,

    /// Number of results
    pub count: Option<usize>,
}

impl SearchParams {
    /// Build a query, filling unset fields with the selector defaults
    pub fn to_query(&self) -> Result<Query> {
        let defaults = Query::default();
        let sector = match &self.sector {
            Some(value) => Sector::parse_choice(value)?,
            None => None,
        };

        Ok(Query::new(self.q.clone())
            .with_sector(sector)
            .with_market_cap(
                self.cap_min.unwrap_or(defaults.market_cap.0),
                self.cap_max.unwrap_or(defaults.market_cap.1),
            )
            .with_volume(
                self.vol_min.unwrap_or(defaults.volume.0),
                self.vol_max.unwrap_or(defaults.volume.1),
            )
            .with_count(self.count.unwrap_or(defaults.count)))
    }
}

/// Search API response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query text as submitted
    pub query: String,

    /// True when the text was blank and nothing was searched
    pub skipped: bool,

    /// Number of results
    pub count: usize,

    /// Cards in index order
    pub results: Vec<DisplayRecord>,

    /// Empty-state notice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// When the search settled
    pub searched_at: DateTime<Utc>,
}

/// Index statistics response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub namespace: String,
    pub namespace_vectors: u64,
    pub total_vectors: u64,
    pub dimension: usize,
    pub embedding_model: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub namespace: String,
    pub embedding_model: String,
}

/// Error body for JSON endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
