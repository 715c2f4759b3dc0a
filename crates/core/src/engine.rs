//! Entry point of the scoring core.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::catalog::PriceCatalog;
use crate::domain::observation::PriceObservation;
use crate::domain::recommendation::Recommendation;
use crate::errors::{ApplicationError, DomainError};
use crate::ranking::{rank, RankingContext};
use crate::series::SyntheticSeriesGenerator;

/// A validated planting context.
#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationRequest {
    municipality: String,
    planting_date: NaiveDate,
    temperature_celsius: Option<f64>,
}

impl RecommendationRequest {
    pub fn new(municipality: impl Into<String>, planting_date: NaiveDate) -> Self {
        Self { municipality: municipality.into(), planting_date, temperature_celsius: None }
    }

    pub fn with_temperature(mut self, temperature_celsius: Option<f64>) -> Self {
        self.temperature_celsius = temperature_celsius;
        self
    }

    pub fn municipality(&self) -> &str {
        self.municipality.trim()
    }

    pub fn planting_date(&self) -> NaiveDate {
        self.planting_date
    }

    pub fn temperature_celsius(&self) -> Option<f64> {
        self.temperature_celsius
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.municipality().is_empty() {
            return Err(DomainError::InvalidInput("municipality must not be empty".to_string()));
        }
        if let Some(temperature) = self.temperature_celsius {
            if !temperature.is_finite() {
                return Err(DomainError::InvalidInput(format!(
                    "temperature must be a finite number of degrees Celsius, got {temperature}"
                )));
            }
        }
        Ok(())
    }

    fn context(&self) -> RankingContext<'_> {
        RankingContext {
            municipality: self.municipality(),
            planting_date: self.planting_date,
            temperature_celsius: self.temperature_celsius,
        }
    }
}

/// Stateless recommender over the static crop tables. Holds no mutable
/// state, so one instance can be shared freely between threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecommendationEngine {
    generator: SyntheticSeriesGenerator,
}

impl RecommendationEngine {
    pub fn new(catalog: PriceCatalog) -> Self {
        Self { generator: SyntheticSeriesGenerator::new(catalog) }
    }

    /// Ranks crops for planting in `municipality` on `planting_date` using a
    /// synthetic price history derived from the same context.
    pub fn recommend(
        &self,
        municipality: &str,
        planting_date: NaiveDate,
        temperature_celsius: Option<f64>,
    ) -> Result<Vec<Recommendation>, ApplicationError> {
        let request = RecommendationRequest::new(municipality, planting_date)
            .with_temperature(temperature_celsius);
        self.recommend_for(&request)
    }

    pub fn recommend_for(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Recommendation>, ApplicationError> {
        request.validate()?;
        let observations = self.generator.generate(
            request.municipality(),
            request.planting_date(),
            request.temperature_celsius(),
        );
        self.rank_observations(request, &observations)
    }

    /// Ranks caller-supplied observations, e.g. from a market price source,
    /// under the request's planting context.
    pub fn rank_observations(
        &self,
        request: &RecommendationRequest,
        observations: &[PriceObservation],
    ) -> Result<Vec<Recommendation>, ApplicationError> {
        request.validate()?;
        let recommendations = rank(observations, &request.context());

        if recommendations.is_empty() {
            warn!(
                event_name = "recommendation.empty",
                municipality = request.municipality(),
                planting_date = %request.planting_date(),
                observations = observations.len(),
                "no crop had enough observations to score"
            );
            return Err(ApplicationError::EmptyRecommendation {
                municipality: request.municipality().to_string(),
            });
        }

        info!(
            event_name = "recommendation.ranked",
            municipality = request.municipality(),
            planting_date = %request.planting_date(),
            temperature_celsius = ?request.temperature_celsius(),
            recommendations = recommendations.len(),
            top_crop = %recommendations[0].crop,
            "crop recommendations ranked"
        );
        Ok(recommendations)
    }
}
