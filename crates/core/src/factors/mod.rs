//! Contextual multipliers applied to crop prices and profitability.
//!
//! All providers are total: unknown municipalities, crops or missing
//! temperatures resolve to [`NEUTRAL_FACTOR`].

mod climatic;
mod municipal;
mod seasonal;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::crop::CropId;

pub use climatic::{climatic_factor, climatic_range, ClimaticRange};
pub use municipal::{municipal_factor, MUNICIPAL_FACTORS};
pub use seasonal::{seasonal_factor, SEASONAL_FACTORS};

pub const NEUTRAL_FACTOR: f64 = 1.0;

/// Factors below this threshold count as unfavourable conditions.
pub const LOW_FACTOR_THRESHOLD: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FactorSet {
    pub municipal: f64,
    pub seasonal: f64,
    pub climatic: f64,
}

impl FactorSet {
    pub fn resolve(
        municipality: &str,
        crop: &CropId,
        date: NaiveDate,
        temperature_celsius: Option<f64>,
    ) -> Self {
        Self {
            municipal: municipal_factor(municipality, crop),
            seasonal: seasonal_factor(crop, date),
            climatic: climatic_factor(crop, temperature_celsius),
        }
    }

    pub fn neutral() -> Self {
        Self { municipal: NEUTRAL_FACTOR, seasonal: NEUTRAL_FACTOR, climatic: NEUTRAL_FACTOR }
    }

    pub fn product(&self) -> f64 {
        self.municipal * self.seasonal * self.climatic
    }

    pub fn mean(&self) -> f64 {
        (self.municipal + self.seasonal + self.climatic) / 3.0
    }

    pub fn low_count(&self) -> usize {
        [self.municipal, self.seasonal, self.climatic]
            .iter()
            .filter(|factor| **factor < LOW_FACTOR_THRESHOLD)
            .count()
    }
}
