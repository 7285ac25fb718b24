use serde::Serialize;
use std::sync::Arc;
use stocklytic_common::Result;
use stocklytic_encoder::QueryEncoder;
use stocklytic_vector::{QueryRequest, VectorIndex};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::filter::{build_filter, SearchPlan};
use crate::presenter::{DisplayRecord, Presenter};
use crate::query::Query;

/// Shown instead of cards when the index returns nothing
pub const EMPTY_STATE_MESSAGE: &str = "No results found. Please try a different search.";

/// Outcome of a finished search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Settlement {
    /// At least one card to render
    Results(Vec<DisplayRecord>),

    /// The index returned no matches
    Empty,

    /// The search failed; carries the error message
    Failed(String),
}

impl Settlement {
    /// Cards to render (empty unless `Results`)
    pub fn records(&self) -> &[DisplayRecord] {
        match self {
            Self::Results(records) => records,
            _ => &[],
        }
    }

    /// User-facing notice, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Results(_) => None,
            Self::Empty => Some(EMPTY_STATE_MESSAGE),
            Self::Failed(message) => Some(message.as_str()),
        }
    }
}

/// Runs searches against injected encoder and index clients
///
/// Constructed once at startup; holds no per-search state.
pub struct Searcher {
    encoder: Arc<dyn QueryEncoder>,
    index: Arc<dyn VectorIndex>,
    namespace: String,
    presenter: Presenter,
}

impl Searcher {
    pub fn new(
        encoder: Arc<dyn QueryEncoder>,
        index: Arc<dyn VectorIndex>,
        namespace: impl Into<String>,
        presenter: Presenter,
    ) -> Self {
        Self {
            encoder,
            index,
            namespace: namespace.into(),
            presenter,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn embedding_model(&self) -> &str {
        self.encoder.model()
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Filter, encode, query and present
    ///
    /// Returns `Ok(None)` without touching the encoder or the index when the
    /// query text is blank.
    pub async fn run(&self, query: &Query) -> Result<Option<Settlement>> {
        if !query.has_text() {
            debug!("Blank query text, skipping search");
            return Ok(None);
        }

        let plan = build_filter(query)?;
        let search_id = Uuid::new_v4();
        let span = info_span!("search", %search_id, top_k = plan.top_k);

        self.execute(query, plan).instrument(span).await
    }

    async fn execute(&self, query: &Query, plan: SearchPlan) -> Result<Option<Settlement>> {
        info!(
            "Searching: {:?} (sector: {:?}, filter fields: {})",
            query.text,
            query.sector,
            plan.predicate.len()
        );

        let vector = self.encoder.encode(&query.text).await?;

        let request = QueryRequest {
            namespace: self.namespace.clone(),
            vector,
            top_k: plan.top_k,
            filter: plan.predicate,
            include_metadata: true,
        };
        let response = self.index.query(&request).await?;

        if response.matches.is_empty() {
            info!("Search settled with no matches");
            return Ok(Some(Settlement::Empty));
        }

        let records = self.presenter.present_all(&response.matches);
        info!("Search settled with {} results", records.len());
        Ok(Some(Settlement::Results(records)))
    }
}

/// Search flow state
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// Nothing submitted yet
    Idle,

    /// Request in flight
    Searching,

    /// Last search finished
    Settled(Settlement),
}

/// One interactive search surface
///
/// `submit` takes `&mut self`, so a session never has two searches in flight.
pub struct SearchSession<'a> {
    searcher: &'a Searcher,
    state: SearchState,
}

impl<'a> SearchSession<'a> {
    pub fn new(searcher: &'a Searcher) -> Self {
        Self {
            searcher,
            state: SearchState::Idle,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Submit a query
    ///
    /// Blank text is a silent no-op (`Ok(None)`, state unchanged). An invalid
    /// query is rejected before the session starts searching. Once searching,
    /// the session always settles; a failed remote call settles as `Failed`
    /// and the error is returned.
    pub async fn submit(&mut self, query: &Query) -> Result<Option<&Settlement>> {
        if !query.has_text() {
            return Ok(None);
        }
        query.validate()?;

        self.state = SearchState::Searching;

        let settlement = match self.searcher.run(query).await {
            Ok(Some(settlement)) => settlement,
            Ok(None) => Settlement::Empty,
            Err(e) => {
                warn!("Search failed: {}", e);
                self.state = SearchState::Settled(Settlement::Failed(e.to_string()));
                return Err(e);
            }
        };
        self.state = SearchState::Settled(settlement);

        match &self.state {
            SearchState::Settled(settlement) => Ok(Some(settlement)),
            _ => Ok(None),
        }
    }

    /// Latest settlement, if any
    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.state {
            SearchState::Settled(settlement) => Some(settlement),
            _ => None,
        }
    }
}
