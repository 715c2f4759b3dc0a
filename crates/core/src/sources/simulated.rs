use chrono::{Duration, NaiveDate};
use rand::Rng;

use super::{PriceSource, SourceKind};
use crate::catalog::PriceCatalog;
use crate::domain::observation::{retail_from_wholesale, PriceObservation, RETAIL_MARKUP};
use crate::errors::SourceError;
use crate::seed::seeded_rng;

const SIMULATED_WEEKS: i64 = 5;
const SIMULATED_MARKET: &str = "Corabastos (Simulado)";
const SIMULATED_VARIETY: &str = "Estándar";

/// Last-resort source: weekly prices within ±20% of each baseline.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedSource {
    catalog: PriceCatalog,
}

impl SimulatedSource {
    pub fn new(catalog: PriceCatalog) -> Self {
        Self { catalog }
    }
}

impl PriceSource for SimulatedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Simulated
    }

    fn fetch(
        &self,
        reference_date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let mut rng = seeded_rng(&format!("simulated|{reference_date}"));
        let mut observations = Vec::new();

        for profile in self.catalog.profiles() {
            for week in 0..SIMULATED_WEEKS {
                let variation: f64 = rng.gen_range(0.8..1.2);
                let wholesale_price = (profile.base_price * variation) as i64;
                observations.push(PriceObservation {
                    crop: profile.id(),
                    date: reference_date - Duration::days(week * 7),
                    market: SIMULATED_MARKET.to_string(),
                    variety: SIMULATED_VARIETY.to_string(),
                    wholesale_price,
                    retail_price: retail_from_wholesale(wholesale_price, RETAIL_MARKUP),
                    unit: profile.unit.to_string(),
                    packaging: profile.packaging.to_string(),
                });
            }
        }

        observations.truncate(limit);
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_prices_stay_near_baseline() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let catalog = PriceCatalog::default();
        let observations = SimulatedSource::default().fetch(date, 1_000).expect("simulated");
        assert_eq!(observations.len(), 75);
        for observation in &observations {
            let base = catalog.find(&observation.crop).expect("catalog crop").base_price;
            assert!(observation.wholesale_price as f64 >= (base * 0.8).floor());
            assert!((observation.wholesale_price as f64) < base * 1.2);
            assert_eq!(observation.market, "Corabastos (Simulado)");
        }
    }

    #[test]
    fn simulated_prices_are_reproducible() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let source = SimulatedSource::default();
        assert_eq!(source.fetch(date, 20).expect("simulated"), source.fetch(date, 20).expect("simulated"));
    }
}
