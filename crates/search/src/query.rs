use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stocklytic_common::{Result, StocklyticError};

/// Selector label meaning "no sector constraint"
pub const ANY_SECTOR: &str = "Any Sector";

/// Upper end of the market-cap selector, in billions
pub const MARKET_CAP_MAX_BILLIONS: f64 = 3670.0;

/// Upper end of the volume selector, in millions
pub const VOLUME_MAX_MILLIONS: u64 = 648;

pub const MIN_RESULT_COUNT: usize = 1;
pub const MAX_RESULT_COUNT: usize = 25;
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// Market sector as stored in the index metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "Consumer Defensive")]
    ConsumerDefensive,
    #[serde(rename = "Communication Services")]
    CommunicationServices,
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Basic Materials")]
    BasicMaterials,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Energy")]
    Energy,
    #[serde(rename = "Industrials")]
    Industrials,
    #[serde(rename = "Consumer Cyclical")]
    ConsumerCyclical,
    #[serde(rename = "Financial Services")]
    FinancialServices,
    #[serde(rename = "Technology")]
    Technology,
}

impl Sector {
    /// All sectors in selector order
    pub const ALL: [Sector; 11] = [
        Sector::ConsumerDefensive,
        Sector::CommunicationServices,
        Sector::RealEstate,
        Sector::Healthcare,
        Sector::BasicMaterials,
        Sector::Utilities,
        Sector::Energy,
        Sector::Industrials,
        Sector::ConsumerCyclical,
        Sector::FinancialServices,
        Sector::Technology,
    ];

    /// Name as stored in the "Sector" metadata field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConsumerDefensive => "Consumer Defensive",
            Self::CommunicationServices => "Communication Services",
            Self::RealEstate => "Real Estate",
            Self::Healthcare => "Healthcare",
            Self::BasicMaterials => "Basic Materials",
            Self::Utilities => "Utilities",
            Self::Energy => "Energy",
            Self::Industrials => "Industrials",
            Self::ConsumerCyclical => "Consumer Cyclical",
            Self::FinancialServices => "Financial Services",
            Self::Technology => "Technology",
        }
    }

    /// Parse a selector value; "Any Sector" (or blank) means no constraint
    pub fn parse_choice(value: &str) -> Result<Option<Sector>> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ANY_SECTOR) || value.eq_ignore_ascii_case("any") {
            return Ok(None);
        }
        value.parse().map(Some)
    }

    /// Selector options: "Any Sector" followed by every sector
    pub fn options() -> Vec<&'static str> {
        std::iter::once(ANY_SECTOR)
            .chain(Self::ALL.iter().map(Sector::as_str))
            .collect()
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = StocklyticError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|sector| sector.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StocklyticError::invalid_input(format!("Unknown sector: {}", s)))
    }
}

/// User search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Free-text description of the wanted stocks
    pub text: String,

    /// Sector constraint
    pub sector: Option<Sector>,

    /// Market-cap range in billions, inclusive
    pub market_cap: (f64, f64),

    /// Trading volume range in millions, inclusive
    pub volume: (u64, u64),

    /// Number of results wanted
    pub count: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: String::new(),
            sector: None,
            market_cap: (0.0, MARKET_CAP_MAX_BILLIONS),
            volume: (0, VOLUME_MAX_MILLIONS),
            count: DEFAULT_RESULT_COUNT,
        }
    }
}

impl Query {
    /// Query with the selector defaults
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_sector(mut self, sector: Option<Sector>) -> Self {
        self.sector = sector;
        self
    }

    pub fn with_market_cap(mut self, min_billions: f64, max_billions: f64) -> Self {
        self.market_cap = (min_billions, max_billions);
        self
    }

    pub fn with_volume(mut self, min_millions: u64, max_millions: u64) -> Self {
        self.volume = (min_millions, max_millions);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Whether there is anything to search for
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Check ranges and result count
    pub fn validate(&self) -> Result<()> {
        let (cap_min, cap_max) = self.market_cap;
        if !cap_min.is_finite() || !cap_max.is_finite() || cap_min < 0.0 || cap_max < 0.0 {
            return Err(StocklyticError::invalid_input(
                "Market cap bounds must be non-negative numbers",
            ));
        }
        if cap_min > cap_max {
            return Err(StocklyticError::invalid_input(format!(
                "Market cap lower bound {} exceeds upper bound {}",
                cap_min, cap_max
            )));
        }

        let (vol_min, vol_max) = self.volume;
        if vol_min > vol_max {
            return Err(StocklyticError::invalid_input(format!(
                "Volume lower bound {} exceeds upper bound {}",
                vol_min, vol_max
            )));
        }

        if !(MIN_RESULT_COUNT..=MAX_RESULT_COUNT).contains(&self.count) {
            return Err(StocklyticError::invalid_input(format!(
                "Result count must be between {} and {}, got {}",
                MIN_RESULT_COUNT, MAX_RESULT_COUNT, self.count
            )));
        }

        Ok(())
    }
}
