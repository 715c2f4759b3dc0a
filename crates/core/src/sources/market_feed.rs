use chrono::{Duration, NaiveDate};
use rand::Rng;

use super::{PriceSource, SourceKind};
use crate::catalog::PriceCatalog;
use crate::domain::observation::{retail_from_wholesale, PriceObservation};
use crate::errors::SourceError;
use crate::seed::seeded_rng;

const FEED_DAYS: i64 = 7;
const FEED_MARKET: &str = "Corabastos - SIPSA";
const FEED_VARIETY: &str = "Primera";
const FEED_RETAIL_MARKUP: f64 = 1.35;

/// Daily quotes for the last week, stable for a given reference day and
/// kept inside each crop's plausible wholesale range.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarketFeedSource {
    catalog: PriceCatalog,
}

impl MarketFeedSource {
    pub fn new(catalog: PriceCatalog) -> Self {
        Self { catalog }
    }
}

impl PriceSource for MarketFeedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::MarketFeed
    }

    fn fetch(
        &self,
        reference_date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let mut rng = seeded_rng(&reference_date.format("%Y%m%d").to_string());
        let mut observations = Vec::new();

        for profile in self.catalog.profiles() {
            for day in 0..FEED_DAYS {
                let variation = if profile.volatility > 0.0 {
                    rng.gen_range((1.0 - profile.volatility)..(1.0 + profile.volatility))
                } else {
                    1.0
                };
                let wholesale_price =
                    profile.price_range.clamp((profile.market_price * variation) as i64);

                observations.push(PriceObservation {
                    crop: profile.id(),
                    date: reference_date - Duration::days(day),
                    market: FEED_MARKET.to_string(),
                    variety: FEED_VARIETY.to_string(),
                    wholesale_price,
                    retail_price: retail_from_wholesale(wholesale_price, FEED_RETAIL_MARKUP),
                    unit: profile.unit.to_string(),
                    packaging: profile.packaging.to_string(),
                });
            }
        }

        observations.sort_by(|left, right| right.date.cmp(&left.date));
        observations.truncate(limit);
        Ok(observations)
    }
}
