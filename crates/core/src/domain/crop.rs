use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical crop identifier: trimmed and uppercased, e.g. `PAPA CRIOLLA`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropId(String);

impl CropId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CropId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    pub fn clamp(&self, price: i64) -> i64 {
        price.clamp(self.min, self.max)
    }
}

/// Static market baseline for one crop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CropProfile {
    pub name: &'static str,
    /// Wholesale reference price per unit of measure.
    pub base_price: f64,
    /// Reference quote for the daily wholesale feed, typically above `base_price`.
    pub market_price: f64,
    pub unit: &'static str,
    pub packaging: &'static str,
    pub price_range: PriceRange,
    /// Daily price volatility as a fraction (0.15 = ±15%).
    pub volatility: f64,
}

impl CropProfile {
    pub fn id(&self) -> CropId {
        CropId::new(self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    Extreme,
}

impl Difficulty {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::VeryLow => 1.25,
            Self::Low => 1.15,
            Self::Medium => 1.00,
            Self::High => 0.85,
            Self::VeryHigh => 0.70,
            Self::Extreme => 0.50,
        }
    }
}

/// Per-hectare production economics for a crop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CostModel {
    pub seed: f64,
    pub fertilizer: f64,
    pub pesticide: f64,
    pub labor: f64,
    pub machinery: f64,
    pub other: f64,
    pub yield_kg_per_hectare: f64,
    pub cycle_months: f64,
    pub risk_factor: f64,
    pub difficulty: Difficulty,
    pub market_volatility: f64,
    /// Anchor return (percent) scaled by the price/cost ratio.
    pub base_profitability: f64,
}

impl CostModel {
    pub fn total_cost(&self) -> f64 {
        self.seed + self.fertilizer + self.pesticide + self.labor + self.machinery + self.other
    }

    pub fn cost_per_kg(&self) -> f64 {
        self.total_cost() / self.yield_kg_per_hectare
    }

    pub fn cycle_speed_factor(&self) -> f64 {
        (3.5 / self.cycle_months).min(1.5)
    }
}
