//! Deterministic synthetic price history for a planting context.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use tracing::debug;

use crate::catalog::PriceCatalog;
use crate::domain::observation::{retail_from_wholesale, PriceObservation, RETAIL_MARKUP};
use crate::factors::FactorSet;
use crate::seed::{context_key, seeded_rng};

pub const SERIES_POINTS: usize = 5;
pub const SERIES_SPACING_DAYS: i64 = 7;
pub const SERIES_MARKET: &str = "Corabastos";
pub const SERIES_VARIETY: &str = "Estándar";

const MIN_VARIATION: f64 = 0.85;
const MAX_VARIATION: f64 = 1.15;

#[derive(Clone, Copy, Debug, Default)]
pub struct SyntheticSeriesGenerator {
    catalog: PriceCatalog,
}

impl SyntheticSeriesGenerator {
    pub fn new(catalog: PriceCatalog) -> Self {
        Self { catalog }
    }

    /// Emits [`SERIES_POINTS`] weekly observations per catalog crop, newest
    /// first, ending at `planting_date`. The generator is reseeded from the
    /// context on every call.
    pub fn generate(
        &self,
        municipality: &str,
        planting_date: NaiveDate,
        temperature_celsius: Option<f64>,
    ) -> Vec<PriceObservation> {
        let key = context_key(municipality, planting_date, temperature_celsius);
        let mut rng = seeded_rng(&key);
        let mut observations = Vec::with_capacity(self.catalog.len() * SERIES_POINTS);

        for profile in self.catalog.profiles() {
            let crop = profile.id();
            let factors =
                FactorSet::resolve(municipality, &crop, planting_date, temperature_celsius);
            let adjusted_base =
                profile.base_price * factors.municipal * factors.seasonal * factors.climatic;

            for point in 0..SERIES_POINTS {
                let date = planting_date - Duration::days(point as i64 * SERIES_SPACING_DAYS);
                let variation: f64 = rng.gen_range(MIN_VARIATION..MAX_VARIATION);
                let wholesale_price = (adjusted_base * variation) as i64;
                if wholesale_price <= 0 {
                    continue;
                }

                observations.push(PriceObservation {
                    crop: crop.clone(),
                    date,
                    market: SERIES_MARKET.to_string(),
                    variety: SERIES_VARIETY.to_string(),
                    wholesale_price,
                    retail_price: retail_from_wholesale(wholesale_price, RETAIL_MARKUP),
                    unit: profile.unit.to_string(),
                    packaging: profile.packaging.to_string(),
                });
            }
        }

        debug!(
            event_name = "series.generated",
            seed_key = %key,
            observations = observations.len(),
            "synthetic price series generated"
        );
        observations
    }
}
