//! Market price sources and the priority-ordered fallback chain over them.

pub mod cache;
mod market_feed;
mod simulated;
mod sipsa;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::observation::PriceObservation;
use crate::errors::SourceError;

pub use market_feed::MarketFeedSource;
pub use simulated::SimulatedSource;
pub use sipsa::{parse_csv, parse_json, SipsaSettings, SipsaSource, RELEVANT_KEYWORDS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    MarketFeed,
    Sipsa,
    Simulated,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::MarketFeed, Self::Sipsa, Self::Simulated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketFeed => "market_feed",
            Self::Sipsa => "sipsa",
            Self::Simulated => "simulated",
        }
    }

    /// Human-readable provenance shown next to market statistics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MarketFeed => "DANE-SIPSA daily market feed",
            Self::Sipsa => "DANE-SIPSA price bulletin",
            Self::Simulated => "Simulated data",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "market_feed" => Ok(Self::MarketFeed),
            "sipsa" => Ok(Self::Sipsa),
            "simulated" => Ok(Self::Simulated),
            other => Err(format!(
                "unknown price source `{other}` (expected market_feed, sipsa or simulated)"
            )),
        }
    }
}

/// A provider of market price observations.
pub trait PriceSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Observations up to `reference_date`, newest first, at most `limit`.
    fn fetch(
        &self,
        reference_date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceObservation>, SourceError>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourcedObservations {
    pub kind: SourceKind,
    pub observations: Vec<PriceObservation>,
}

/// Tries each source in order and returns the first non-empty result.
pub struct FallbackChain {
    sources: Vec<Box<dyn PriceSource>>,
}

impl FallbackChain {
    pub fn new(sources: Vec<Box<dyn PriceSource>>) -> Self {
        Self { sources }
    }

    /// Builds the chain for a configured priority list.
    pub fn from_priority(priority: &[SourceKind], sipsa: &SipsaSettings) -> Self {
        let sources = priority
            .iter()
            .map(|kind| -> Box<dyn PriceSource> {
                match kind {
                    SourceKind::MarketFeed => Box::new(MarketFeedSource::default()),
                    SourceKind::Sipsa => Box::new(SipsaSource::new(sipsa.clone())),
                    SourceKind::Simulated => Box::new(SimulatedSource::default()),
                }
            })
            .collect();
        Self::new(sources)
    }

    pub fn kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|source| source.kind()).collect()
    }

    pub fn fetch(
        &self,
        reference_date: NaiveDate,
        limit: usize,
    ) -> Result<SourcedObservations, SourceError> {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let kind = source.kind();
            match source.fetch(reference_date, limit) {
                Ok(observations) if !observations.is_empty() => {
                    debug!(
                        event_name = "sources.fetch.succeeded",
                        source = %kind,
                        observations = observations.len(),
                        "price source produced observations"
                    );
                    return Ok(SourcedObservations { kind, observations });
                }
                Ok(_) => attempts.push(format!("{kind}: no observations")),
                Err(error) => {
                    warn!(
                        event_name = "sources.fetch.failed",
                        source = %kind,
                        error = %error,
                        "price source failed, trying next"
                    );
                    attempts.push(format!("{kind}: {error}"));
                }
            }
        }

        Err(SourceError::Unavailable { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl PriceSource for Failing {
        fn kind(&self) -> SourceKind {
            SourceKind::Sipsa
        }

        fn fetch(&self, _: NaiveDate, _: usize) -> Result<Vec<PriceObservation>, SourceError> {
            Err(SourceError::Parse("garbled bulletin".to_string()))
        }
    }

    struct Empty;

    impl PriceSource for Empty {
        fn kind(&self) -> SourceKind {
            SourceKind::MarketFeed
        }

        fn fetch(&self, _: NaiveDate, _: usize) -> Result<Vec<PriceObservation>, SourceError> {
            Ok(Vec::new())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 3).expect("valid date")
    }

    #[test]
    fn source_kind_parses_config_spellings() {
        assert_eq!("market-feed".parse::<SourceKind>(), Ok(SourceKind::MarketFeed));
        assert_eq!(" SIPSA ".parse::<SourceKind>(), Ok(SourceKind::Sipsa));
        assert_eq!("simulated".parse::<SourceKind>(), Ok(SourceKind::Simulated));
        assert!("weather".parse::<SourceKind>().is_err());
    }

    #[test]
    fn chain_falls_through_to_first_success() {
        let chain = FallbackChain::new(vec![
            Box::new(Failing),
            Box::new(Empty),
            Box::new(SimulatedSource::default()),
        ]);
        let result = chain.fetch(date(), 1_000).expect("simulated source succeeds");
        assert_eq!(result.kind, SourceKind::Simulated);
        assert!(!result.observations.is_empty());
    }

    #[test]
    fn exhausted_chain_lists_every_attempt() {
        let chain = FallbackChain::new(vec![Box::new(Failing), Box::new(Empty)]);
        let error = chain.fetch(date(), 10).expect_err("nothing succeeds");
        match error {
            SourceError::Unavailable { attempts } => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].starts_with("sipsa: "));
                assert_eq!(attempts[1], "market_feed: no observations");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn priority_list_drives_chain_order() {
        let chain = FallbackChain::from_priority(
            &[SourceKind::Simulated, SourceKind::MarketFeed],
            &SipsaSettings::default(),
        );
        assert_eq!(chain.kinds(), vec![SourceKind::Simulated, SourceKind::MarketFeed]);
    }
}
