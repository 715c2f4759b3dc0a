//! Caller-side market data access: the fallback chain plus a TTL cache.

mod stats;

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::observation::PriceObservation;
use crate::errors::SourceError;
use crate::sources::cache::TtlCache;
use crate::sources::{FallbackChain, SourcedObservations};

pub use stats::{prices_for_crop, MarketStatistics};

pub const DEFAULT_FETCH_LIMIT: usize = 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PriceQuery {
    pub reference_date: NaiveDate,
    pub limit: usize,
}

pub struct MarketDataService {
    chain: FallbackChain,
    cache: TtlCache<PriceQuery, SourcedObservations>,
}

impl MarketDataService {
    pub fn new(chain: FallbackChain, ttl: Duration) -> Self {
        Self { chain, cache: TtlCache::new(ttl) }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let chain =
            FallbackChain::from_priority(&config.data_source.priority, &config.sipsa_settings());
        Self::new(chain, config.cache_ttl())
    }

    pub fn current_prices(
        &mut self,
        reference_date: NaiveDate,
        limit: usize,
    ) -> Result<SourcedObservations, SourceError> {
        self.current_prices_at(reference_date, limit, Instant::now())
    }

    pub fn current_prices_at(
        &mut self,
        reference_date: NaiveDate,
        limit: usize,
        now: Instant,
    ) -> Result<SourcedObservations, SourceError> {
        let query = PriceQuery { reference_date, limit };
        if let Some(cached) = self.cache.get(&query, now) {
            debug!(
                event_name = "market.cache.hit",
                reference_date = %reference_date,
                limit,
                "serving market prices from cache"
            );
            return Ok(cached);
        }

        let fetched = self.chain.fetch(reference_date, limit)?;
        self.cache.purge_expired(now);
        self.cache.insert(query, fetched.clone(), now);
        Ok(fetched)
    }

    pub fn prices_for_crop(
        &mut self,
        reference_date: NaiveDate,
        name: &str,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let sourced = self.current_prices(reference_date, DEFAULT_FETCH_LIMIT)?;
        Ok(prices_for_crop(&sourced.observations, name))
    }

    pub fn statistics(
        &mut self,
        reference_date: NaiveDate,
    ) -> Result<Option<MarketStatistics>, SourceError> {
        let sourced = self.current_prices(reference_date, DEFAULT_FETCH_LIMIT)?;
        Ok(MarketStatistics::from_observations(&sourced.observations, sourced.kind))
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }
}
