pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod factors;
pub mod market;
pub mod profitability;
pub mod ranking;
pub mod seed;
pub mod series;
pub mod sources;
pub mod weather;

pub use catalog::PriceCatalog;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::crop::{CostModel, CropId, CropProfile, Difficulty, PriceRange};
pub use domain::observation::PriceObservation;
pub use domain::recommendation::{Recommendation, Trend};
pub use engine::{RecommendationEngine, RecommendationRequest};
pub use errors::{ApplicationError, DomainError, InterfaceError, SourceError};
pub use factors::FactorSet;
pub use market::{MarketDataService, MarketStatistics};
pub use series::SyntheticSeriesGenerator;
pub use sources::{FallbackChain, PriceSource, SourceKind, SourcedObservations};
pub use weather::{SimulatedClimate, TemperatureSource};
