use crate::domain::week::SLOTS_PER_WEEK;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn exact(price: i64) -> Self {
        Self::new(price, price)
    }

    pub fn contains(&self, price: i64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Fluctuating,
    LargeSpike,
    Decreasing,
    SmallSpike,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pattern::Fluctuating => "fluctuating",
            Pattern::LargeSpike => "large spike",
            Pattern::Decreasing => "decreasing",
            Pattern::SmallSpike => "small spike",
        };
        f.write_str(s)
    }
}

/// One hypothetical full-week price pattern produced by a forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Possibility {
    pub pattern: Pattern,
    pub prices: [PriceRange; SLOTS_PER_WEEK],
    /// Best-case price reachable during the week.
    pub week_max: f64,
    /// Price the week is guaranteed to reach at some point.
    pub week_guaranteed_minimum: f64,
}

impl Possibility {
    /// Builds a possibility from per-slot ranges, deriving both summary
    /// bounds from the selling slots (Monday AM onwards).
    pub fn from_prices(pattern: Pattern, prices: [PriceRange; SLOTS_PER_WEEK]) -> Self {
        let selling = &prices[2..];
        let week_max = selling.iter().map(|p| p.max).max().unwrap_or_default();
        let week_guaranteed_minimum = selling.iter().map(|p| p.min).max().unwrap_or_default();
        Self {
            pattern,
            prices,
            week_max: week_max as f64,
            week_guaranteed_minimum: week_guaranteed_minimum as f64,
        }
    }
}
