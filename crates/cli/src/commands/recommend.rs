use agrosoft_core::{
    Recommendation, RecommendationEngine, RecommendationRequest, SimulatedClimate,
    TemperatureSource,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::commands::{application_failure, load_config, parse_date, to_data, CommandResult};

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Default)]
pub struct RecommendArgs {
    pub municipality: Option<String>,
    pub date: Option<String>,
    pub temperature: Option<f64>,
    pub simulate_climate: bool,
}

#[derive(Debug, Serialize)]
struct RecommendationReport<'a> {
    municipality: &'a str,
    planting_date: NaiveDate,
    temperature_celsius: Option<f64>,
    temperature_simulated: bool,
    recommendations: &'a [Recommendation],
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let planting_date = match parse_date(COMMAND, args.date.as_deref()) {
        Ok(date) => date,
        Err(failure) => return failure,
    };
    let municipality =
        args.municipality.unwrap_or_else(|| config.recommendation.default_municipality.clone());

    let temperature = if args.simulate_climate {
        SimulatedClimate.temperature(&municipality, planting_date)
    } else {
        args.temperature
    };

    let request =
        RecommendationRequest::new(municipality, planting_date).with_temperature(temperature);
    let engine = RecommendationEngine::default();
    let recommendations = match engine.recommend_for(&request) {
        Ok(recommendations) => recommendations,
        Err(error) => return application_failure(COMMAND, error),
    };

    let report = RecommendationReport {
        municipality: request.municipality(),
        planting_date,
        temperature_celsius: temperature,
        temperature_simulated: args.simulate_climate,
        recommendations: &recommendations,
    };
    let data = match to_data(COMMAND, &report) {
        Ok(data) => data,
        Err(failure) => return failure,
    };

    let top = &recommendations[0];
    CommandResult::success(
        COMMAND,
        format!(
            "{} crops ranked for {} on {planting_date}; best: {} at {:.1}%",
            recommendations.len(),
            request.municipality(),
            top.crop,
            top.profitability_percent
        ),
        data,
    )
}
