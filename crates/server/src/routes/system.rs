use actix_web::{get, web, HttpResponse};
use std::sync::Arc;
use stocklytic_search::Sector;

use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness check
#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        namespace: state.searcher.namespace().to_string(),
        embedding_model: state.searcher.embedding_model().to_string(),
    }))
}

/// Sector selector options
#[get("/api/sectors")]
pub async fn sectors() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(Sector::options()))
}
