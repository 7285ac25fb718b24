use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use stocklytic_common::StocklyticError;

use crate::types::ErrorResponse;

pub mod page;
pub mod search;
pub mod system;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .service(page::index)
        .service(search::search)
        .service(search::search_stats)
        .service(system::health)
        .service(system::sectors);
}

/// Malformed query strings answer with the JSON error body
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let e = StocklyticError::invalid_input(err.to_string());
        let response = error_response(&e);
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

/// HTTP status for an application error
pub(crate) fn status_of(e: &StocklyticError) -> StatusCode {
    StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// JSON error body with the mapped status
pub(crate) fn error_response(e: &StocklyticError) -> HttpResponse {
    HttpResponse::build(status_of(e)).json(ErrorResponse {
        error: e.to_string(),
    })
}
