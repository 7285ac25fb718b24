//! Stocklytic HTTP server
//!
//! Actix-web search page and JSON API

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use stocklytic_common::Result;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod routes;
pub mod state;
pub mod types;

pub use state::AppState;

/// Run the HTTP server until shutdown
pub async fn start_server(state: AppState) -> Result<()> {
    let bind_addr = state.config.server_bind_address();
    let state = Arc::new(state);

    info!("HTTP server listening on http://{}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET"])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
