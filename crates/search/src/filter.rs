//! Query → metadata filter
//!
//! Field names and units follow the index metadata: market cap and volume are
//! stored as raw numbers, the selectors work in billions and millions.

use serde::Serialize;
use stocklytic_common::Result;
use stocklytic_vector::Predicate;

use crate::query::Query;

pub const FIELD_MARKET_CAP: &str = "Market Cap";
pub const FIELD_VOLUME: &str = "Volume";
pub const FIELD_SECTOR: &str = "Sector";
pub const FIELD_TICKER: &str = "Ticker";

/// Placeholder ticker of incomplete records, always excluded
pub const PLACEHOLDER_TICKER: &str = "N/A";

const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Filter and result limit for one search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPlan {
    pub predicate: Predicate,
    pub top_k: usize,
}

/// Build the metadata filter and result limit for a query
///
/// Fails with an invalid-input error when the query's count or ranges are out
/// of bounds. The "Sector" field is only constrained when a sector is chosen.
pub fn build_filter(query: &Query) -> Result<SearchPlan> {
    query.validate()?;

    let (cap_min, cap_max) = query.market_cap;
    let (vol_min, vol_max) = query.volume;

    let mut predicate = Predicate::new()
        .between(FIELD_MARKET_CAP, cap_min * BILLION, cap_max * BILLION)
        .between(FIELD_VOLUME, vol_min as f64 * MILLION, vol_max as f64 * MILLION)
        .not_equal_to(FIELD_TICKER, PLACEHOLDER_TICKER);

    if let Some(sector) = query.sector {
        predicate = predicate.equal_to(FIELD_SECTOR, sector.as_str());
    }

    Ok(SearchPlan {
        predicate,
        top_k: query.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Sector;
    use serde_json::json;
    use stocklytic_common::StocklyticError;
    use stocklytic_vector::Condition;

    #[test]
    fn test_default_ev_query() {
        let plan = build_filter(&Query::new("EV")).unwrap();

        assert_eq!(plan.top_k, 10);
        assert_eq!(
            plan.predicate.get(FIELD_MARKET_CAP),
            Some(&Condition::Range { gte: 0.0, lte: 3.67e12 })
        );
        assert_eq!(
            plan.predicate.get(FIELD_VOLUME),
            Some(&Condition::Range { gte: 0.0, lte: 6.48e8 })
        );
        assert_eq!(
            plan.predicate.get(FIELD_TICKER),
            Some(&Condition::Ne(json!("N/A")))
        );
        assert!(!plan.predicate.contains(FIELD_SECTOR));
        assert_eq!(plan.predicate.len(), 3);
    }

    #[test]
    fn test_sector_adds_single_equality() {
        for sector in Sector::ALL {
            let plan = build_filter(&Query::new("banks").with_sector(Some(sector))).unwrap();
            assert_eq!(
                plan.predicate.get(FIELD_SECTOR),
                Some(&Condition::Eq(json!(sector.as_str())))
            );
            assert_eq!(plan.predicate.len(), 4);
        }
    }

    #[test]
    fn test_unit_conversion() {
        for (min, max) in [(0.0, 0.0), (1.5, 20.0), (250.0, 3670.0)] {
            let plan = build_filter(&Query::new("x").with_market_cap(min, max)).unwrap();
            assert_eq!(
                plan.predicate.get(FIELD_MARKET_CAP),
                Some(&Condition::Range { gte: min * 1e9, lte: max * 1e9 })
            );
        }

        let plan = build_filter(&Query::new("x").with_volume(3, 120)).unwrap();
        assert_eq!(
            plan.predicate.get(FIELD_VOLUME),
            Some(&Condition::Range { gte: 3e6, lte: 1.2e8 })
        );
    }

    #[test]
    fn test_ticker_exclusion_always_present() {
        let queries = [
            Query::new("a"),
            Query::new("b").with_sector(Some(Sector::Energy)),
            Query::new("c").with_market_cap(1.0, 2.0).with_volume(0, 1).with_count(1),
        ];
        for query in &queries {
            let plan = build_filter(query).unwrap();
            assert_eq!(
                plan.predicate.get(FIELD_TICKER),
                Some(&Condition::Ne(json!(PLACEHOLDER_TICKER)))
            );
        }
    }

    #[test]
    fn test_count_out_of_range_fails_fast() {
        for count in [0, 26, 100] {
            let err = build_filter(&Query::new("EV").with_count(count)).unwrap_err();
            assert!(matches!(err, StocklyticError::InvalidInput(_)));
        }
        assert_eq!(build_filter(&Query::new("EV").with_count(25)).unwrap().top_k, 25);
    }
}
