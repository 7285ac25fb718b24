use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse};
use askama::Template;
use std::sync::Arc;
use stocklytic_search::query::{
    MARKET_CAP_MAX_BILLIONS, MAX_RESULT_COUNT, MIN_RESULT_COUNT, VOLUME_MAX_MILLIONS,
};
use stocklytic_search::{DisplayRecord, Query, SearchSession, Sector, ANY_SECTOR};
use tracing::error;

use crate::routes::status_of;
use crate::state::AppState;
use crate::types::SearchParams;

struct SectorOption {
    label: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    text: String,
    count: usize,
    min_count: usize,
    max_count: usize,
    cap_min: f64,
    cap_max: f64,
    cap_limit: f64,
    vol_min: u64,
    vol_max: u64,
    vol_limit: u64,
    sectors: Vec<SectorOption>,
    cards: Vec<DisplayRecord>,
    warning: Option<String>,
    error: Option<String>,
}

impl IndexPage {
    /// Form state echoing the submitted parameters
    fn from_params(params: &SearchParams) -> Self {
        let defaults = Query::default();
        let chosen = params.sector.as_deref().unwrap_or(ANY_SECTOR);

        Self {
            text: params.q.clone(),
            count: params.count.unwrap_or(defaults.count),
            min_count: MIN_RESULT_COUNT,
            max_count: MAX_RESULT_COUNT,
            cap_min: params.cap_min.unwrap_or(defaults.market_cap.0),
            cap_max: params.cap_max.unwrap_or(defaults.market_cap.1),
            cap_limit: MARKET_CAP_MAX_BILLIONS,
            vol_min: params.vol_min.unwrap_or(defaults.volume.0),
            vol_max: params.vol_max.unwrap_or(defaults.volume.1),
            vol_limit: VOLUME_MAX_MILLIONS,
            sectors: Sector::options()
                .into_iter()
                .map(|label| SectorOption {
                    label,
                    selected: label.eq_ignore_ascii_case(chosen.trim()),
                })
                .collect(),
            cards: Vec::new(),
            warning: None,
            error: None,
        }
    }
}

/// Search page: form plus result cards
#[get("/")]
pub async fn index(
    params: web::Query<SearchParams>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let mut page = IndexPage::from_params(&params);
    let mut status = StatusCode::OK;

    if !params.q.trim().is_empty() {
        match params.to_query() {
            Ok(query) => {
                let mut session = SearchSession::new(&state.searcher);
                match session.submit(&query).await {
                    Ok(Some(settlement)) => {
                        page.cards = settlement.records().to_vec();
                        page.warning = settlement.message().map(str::to_string);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!("Search failed: {}", e);
                        status = status_of(&e);
                        page.error = Some(e.to_string());
                    }
                }
            }
            Err(e) => {
                status = status_of(&e);
                page.error = Some(e.to_string());
            }
        }
    }

    let body = page
        .render()
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}
