//! Percentage return estimate for a crop at an observed average price.
//!
//! The adjustment chain and every constant below are a fixed contract:
//! results must match to the bit for identical inputs.

use rand::Rng;

use crate::catalog::cost_model;
use crate::domain::crop::CropId;
use crate::seed::seeded_rng;

pub const MIN_BASE_PROFITABILITY: f64 = -20.0;
pub const MAX_PROFITABILITY: f64 = 100.0;

const LOSS_SCALE: f64 = 80.0;
const SATURATION_START: f64 = 60.0;
const SATURATION_HEADROOM: f64 = 40.0;
const SATURATION_RATE: f64 = 25.0;
const REALISM_THRESHOLD: f64 = 80.0;
const REALISM_FACTOR: f64 = 0.85;

/// Calendar adjustment applied inside profitability only, January first.
pub const MONTHLY_MULTIPLIERS: [f64; 12] =
    [1.10, 1.05, 1.00, 0.95, 0.98, 1.02, 0.85, 0.90, 0.95, 1.05, 1.12, 1.08];

/// Estimated return in percent, clamped to `[-20, 100]`.
///
/// `month` is the calendar month (1–12) of the planting date. A non-positive
/// or non-finite price yields `0.0`.
pub fn estimate(average_price: f64, crop: &CropId, month: u32) -> f64 {
    if !average_price.is_finite() || average_price <= 0.0 {
        return 0.0;
    }

    let model = cost_model(crop);
    let cost_per_kg = model.cost_per_kg();

    let mut value = if average_price > cost_per_kg {
        let ratio = average_price / cost_per_kg;
        let scale = if ratio > 2.0 {
            0.8
        } else if ratio > 1.5 {
            0.9
        } else {
            1.1
        };
        model.base_profitability * (ratio * scale)
    } else {
        -((cost_per_kg - average_price) / cost_per_kg) * LOSS_SCALE
    };

    value *= model.risk_factor;
    value *= model.difficulty.multiplier();
    value *= model.cycle_speed_factor();
    value *= market_noise(crop, model.market_volatility);
    value *= monthly_multiplier(month);
    value = saturate(value);
    if value > REALISM_THRESHOLD {
        value *= REALISM_FACTOR;
    }

    value.clamp(MIN_BASE_PROFITABILITY, MAX_PROFITABILITY)
}

/// Per-crop deterministic draw in `[1 - volatility, 1 + volatility)`.
pub fn market_noise(crop: &CropId, volatility: f64) -> f64 {
    if volatility <= 0.0 {
        return 1.0;
    }
    seeded_rng(crop.as_str()).gen_range((1.0 - volatility)..(1.0 + volatility))
}

pub fn monthly_multiplier(month: u32) -> f64 {
    match month {
        1..=12 => MONTHLY_MULTIPLIERS[month as usize - 1],
        _ => 1.0,
    }
}

/// Compresses everything above 60 towards an asymptote of 100.
pub fn saturate(value: f64) -> f64 {
    if value <= SATURATION_START {
        return value;
    }
    let excess = value - SATURATION_START;
    SATURATION_START + SATURATION_HEADROOM * (1.0 - (-excess / SATURATION_RATE).exp())
}
