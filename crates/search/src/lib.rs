//! Stocklytic search orchestration
//!
//! Builds the metadata filter, encodes the query, queries the index and turns
//! matches into display cards.

pub mod filter;
pub mod presenter;
pub mod query;
pub mod session;

pub use filter::{build_filter, SearchPlan};
pub use presenter::{format_growth, truncate, DisplayRecord, Presenter};
pub use query::{Query, Sector, ANY_SECTOR};
pub use session::{SearchSession, SearchState, Searcher, Settlement, EMPTY_STATE_MESSAGE};
