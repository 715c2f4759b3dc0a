use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::crop::CropId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    /// Classifies the move from `previous` to `current` with a ±5% band.
    pub fn classify(current: i64, previous: i64) -> Self {
        let current = current as f64;
        let previous = previous as f64;
        if current > previous * 1.05 {
            Self::Rising
        } else if current < previous * 0.95 {
            Self::Falling
        } else {
            Self::Stable
        }
    }

    pub fn profitability_multiplier(&self) -> f64 {
        match self {
            Self::Falling => 0.75,
            Self::Stable => 0.95,
            Self::Rising => 1.05,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub crop: CropId,
    pub current_price: i64,
    pub average_price: i64,
    pub trend: Trend,
    pub unit: String,
    pub packaging: String,
    pub last_observation_date: NaiveDate,
    pub profitability_percent: f64,
    pub municipal_factor: f64,
    pub climatic_factor: f64,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_uses_five_percent_band() {
        assert_eq!(Trend::classify(1_060, 1_000), Trend::Rising);
        assert_eq!(Trend::classify(1_050, 1_000), Trend::Stable);
        assert_eq!(Trend::classify(950, 1_000), Trend::Stable);
        assert_eq!(Trend::classify(949, 1_000), Trend::Falling);
    }

    #[test]
    fn rounding_helper_matches_published_precision() {
        assert_eq!(round_to(87.349, 1), 87.3);
        assert_eq!(round_to(1.2345, 2), 1.23);
        assert_eq!(round_to(-12.26, 1), -12.3);
    }
}
