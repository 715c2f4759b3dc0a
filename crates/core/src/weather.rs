//! Planting-day temperature lookup.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::domain::recommendation::round_to;
use crate::seed::seeded_rng;

pub const DEFAULT_BASE_TEMPERATURE: f64 = 15.5;
pub const MIN_TEMPERATURE: f64 = 6.0;
pub const MAX_TEMPERATURE: f64 = 28.0;

/// Mean temperature in °C per municipality of the western savanna.
pub const BASE_TEMPERATURES: &[(&str, f64)] = &[
    ("Facatativá", 16.5),
    ("Madrid", 15.8),
    ("Mosquera", 16.8),
    ("El Rosal", 14.2),
    ("Subachoque", 13.5),
    ("Bojacá", 16.3),
    ("Funza", 16.1),
];

/// Offset in °C by calendar month, January first.
pub const MONTHLY_OFFSETS: [f64; 12] =
    [-2.0, -1.5, 0.0, 1.5, 1.0, -0.5, -1.5, -1.0, 0.0, 0.8, 0.5, -1.8];

const DAILY_SWING: f64 = 2.0;

pub trait TemperatureSource: Send + Sync {
    /// Temperature in °C expected at `place` on `date`, if known.
    fn temperature(&self, place: &str, date: NaiveDate) -> Option<f64>;
}

/// Climatology-based estimate with a reproducible daily swing of ±2 °C.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedClimate;

impl SimulatedClimate {
    pub fn base_temperature(place: &str) -> f64 {
        let place = place.trim();
        BASE_TEMPERATURES
            .iter()
            .find(|(name, _)| name.to_lowercase() == place.to_lowercase())
            .map_or(DEFAULT_BASE_TEMPERATURE, |(_, base)| *base)
    }
}

impl TemperatureSource for SimulatedClimate {
    fn temperature(&self, place: &str, date: NaiveDate) -> Option<f64> {
        let place = place.trim();
        let offset = MONTHLY_OFFSETS[date.month0() as usize];
        let daily: f64 = seeded_rng(&format!("{place}|{date}")).gen_range(-DAILY_SWING..DAILY_SWING);
        let raw = Self::base_temperature(place) + offset + daily;
        Some(round_to(raw.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE), 1))
    }
}
