//! Turns price observations into the ranked recommendation list.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::domain::crop::CropId;
use crate::domain::observation::PriceObservation;
use crate::domain::recommendation::{round_to, Recommendation, Trend};
use crate::factors::FactorSet;
use crate::profitability::{self, MAX_PROFITABILITY};

pub const MIN_OBSERVATIONS: usize = 3;
pub const MAX_RECOMMENDATIONS: usize = 10;
/// Number of most recent observations averaged into the scoring price.
pub const RECENT_WINDOW: usize = 3;
pub const MIN_ADJUSTED_PROFITABILITY: f64 = -40.0;

const LOW_FACTOR_PENALTY: f64 = 0.90;
const COMPOUND_LOW_PENALTY: f64 = 0.85;
const EXCELLENT_BONUS: f64 = 1.05;
const GOOD_BONUS: f64 = 1.02;
const LOSS_DAMPING: f64 = 0.7;
const LOSS_AMPLIFICATION: f64 = 1.2;

/// Planting context shared by every crop in one ranking.
#[derive(Clone, Copy, Debug)]
pub struct RankingContext<'a> {
    pub municipality: &'a str,
    pub planting_date: NaiveDate,
    pub temperature_celsius: Option<f64>,
}

/// Applies municipal, seasonal and climatic conditions to a base estimate.
///
/// Gains are scaled by the factor product and capped at 100. Losses are
/// softened in good conditions, deepened in poor ones and floored at -40.
pub fn adjust_for_context(base: f64, factors: &FactorSet) -> f64 {
    if base > 0.0 {
        let mut combined = factors.product();
        let low = factors.low_count();
        if low >= 1 {
            combined *= LOW_FACTOR_PENALTY;
        }
        if low >= 2 {
            combined *= COMPOUND_LOW_PENALTY;
        }

        let mut adjusted = base * combined;
        let FactorSet { municipal, seasonal, climatic } = *factors;
        if seasonal > 1.15 && municipal > 1.1 && climatic > 1.15 {
            adjusted *= EXCELLENT_BONUS;
        } else if seasonal > 1.1 && municipal > 1.05 && climatic > 1.1 {
            adjusted *= GOOD_BONUS;
        }
        adjusted.min(MAX_PROFITABILITY)
    } else {
        let mean = factors.mean();
        let mut adjusted = base;
        if mean > 1.1 {
            adjusted *= LOSS_DAMPING;
        } else if mean < 0.9 {
            adjusted *= LOSS_AMPLIFICATION;
        }
        adjusted.max(MIN_ADJUSTED_PROFITABILITY)
    }
}

/// Scores every crop with enough history and returns the best
/// [`MAX_RECOMMENDATIONS`], highest published profitability first.
///
/// Crops are considered in order of first appearance; ties on the rounded
/// score keep that order.
pub fn rank(observations: &[PriceObservation], context: &RankingContext<'_>) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = group_by_crop(observations)
        .into_iter()
        .filter_map(|(crop, history)| score_crop(crop, history, context))
        .collect();

    recommendations.sort_by(|left, right| {
        right.profitability_percent.total_cmp(&left.profitability_percent)
    });
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn group_by_crop(observations: &[PriceObservation]) -> Vec<(CropId, Vec<&PriceObservation>)> {
    let mut index: HashMap<&CropId, usize> = HashMap::new();
    let mut groups: Vec<(CropId, Vec<&PriceObservation>)> = Vec::new();

    for observation in observations.iter().filter(|observation| observation.is_scorable()) {
        let slot = *index.entry(&observation.crop).or_insert_with(|| {
            groups.push((observation.crop.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(observation);
    }
    groups
}

fn score_crop(
    crop: CropId,
    mut history: Vec<&PriceObservation>,
    context: &RankingContext<'_>,
) -> Option<Recommendation> {
    if history.len() < MIN_OBSERVATIONS {
        debug!(
            event_name = "ranking.crop_skipped",
            crop = %crop,
            observations = history.len(),
            "not enough observations to score crop"
        );
        return None;
    }

    history.sort_by(|left, right| right.date.cmp(&left.date));
    let latest = history[0];
    let previous = history[1];
    let recent = &history[..RECENT_WINDOW];
    let average =
        recent.iter().map(|observation| observation.wholesale_price as f64).sum::<f64>()
            / recent.len() as f64;

    let trend = Trend::classify(latest.wholesale_price, previous.wholesale_price);
    let factors = FactorSet::resolve(
        context.municipality,
        &crop,
        context.planting_date,
        context.temperature_celsius,
    );

    let base = profitability::estimate(average, &crop, context.planting_date.month());
    let adjusted = adjust_for_context(base, &factors);
    let profitability = (adjusted * trend.profitability_multiplier()).min(MAX_PROFITABILITY);

    Some(Recommendation {
        current_price: latest.wholesale_price,
        average_price: average.round() as i64,
        trend,
        unit: latest.unit.clone(),
        packaging: latest.packaging.clone(),
        last_observation_date: latest.date,
        profitability_percent: round_to(profitability, 1),
        municipal_factor: round_to(factors.municipal, 2),
        climatic_factor: round_to(factors.climatic, 2),
        crop,
    })
}
