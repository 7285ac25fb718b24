use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use stocklytic_search::SearchSession;
use tracing::error;

use crate::routes::error_response;
use crate::state::AppState;
use crate::types::{SearchParams, SearchResponse, StatsResponse};

/// JSON search
#[get("/api/search")]
pub async fn search(
    params: web::Query<SearchParams>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let query = match params.to_query() {
        Ok(query) => query,
        Err(e) => return Ok(error_response(&e)),
    };

    let mut session = SearchSession::new(&state.searcher);
    let response = match session.submit(&query).await {
        Ok(Some(settlement)) => {
            let results = settlement.records().to_vec();
            SearchResponse {
                query: query.text.clone(),
                skipped: false,
                count: results.len(),
                results,
                message: settlement.message().map(str::to_string),
                searched_at: Utc::now(),
            }
        }
        Ok(None) => SearchResponse {
            query: query.text.clone(),
            skipped: true,
            count: 0,
            results: Vec::new(),
            message: None,
            searched_at: Utc::now(),
        },
        Err(e) => {
            error!("Search request failed: {}", e);
            return Ok(error_response(&e));
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Index statistics for the configured namespace
#[get("/api/stats")]
pub async fn search_stats(state: web::Data<Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    let stats = match state.searcher.index().stats().await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to fetch index stats: {}", e);
            return Ok(error_response(&e));
        }
    };

    let namespace = state.searcher.namespace();
    Ok(HttpResponse::Ok().json(StatsResponse {
        namespace: namespace.to_string(),
        namespace_vectors: stats.namespace_count(namespace),
        total_vectors: stats.total_vector_count,
        dimension: stats.dimension,
        embedding_model: state.searcher.embedding_model().to_string(),
    }))
}
