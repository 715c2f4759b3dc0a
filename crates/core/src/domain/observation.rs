use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::crop::CropId;

/// Markup applied to wholesale prices when a source has no retail column.
pub const RETAIL_MARKUP: f64 = 1.3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub crop: CropId,
    pub date: NaiveDate,
    pub market: String,
    pub variety: String,
    pub wholesale_price: i64,
    pub retail_price: i64,
    pub unit: String,
    pub packaging: String,
}

impl PriceObservation {
    pub fn is_scorable(&self) -> bool {
        self.wholesale_price > 0
    }
}

pub fn retail_from_wholesale(wholesale: i64, markup: f64) -> i64 {
    (wholesale as f64 * markup) as i64
}
