//! Stable seeding for every pseudo-random draw in the engine.
//!
//! Seeds are the SHA-256 digest of a UTF-8 key, fed directly into a
//! xoshiro256++ generator. Both algorithms are fixed, so identical keys
//! reproduce identical draws across processes, platforms and releases.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use sha2::{Digest, Sha256};

pub type SeededRng = Xoshiro256PlusPlus;

/// Temperature code used when no reading is available (~15 °C).
pub const MISSING_TEMPERATURE_CODE: i64 = 150;

pub fn digest(key: &str) -> [u8; 32] {
    let hash = Sha256::digest(key.as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hash);
    seed
}

pub fn seeded_rng(key: &str) -> SeededRng {
    Xoshiro256PlusPlus::from_seed(digest(key))
}

/// Tenths of a degree, truncated toward zero.
pub fn temperature_code(temperature_celsius: Option<f64>) -> i64 {
    match temperature_celsius {
        Some(value) if value.is_finite() => (value * 10.0) as i64,
        _ => MISSING_TEMPERATURE_CODE,
    }
}

/// Key for a recommendation context: `municipality|YYYY-MM-DD|temperature code`.
pub fn context_key(municipality: &str, date: NaiveDate, temperature_celsius: Option<f64>) -> String {
    format!(
        "{}|{}|{}",
        municipality.trim(),
        date.format("%Y-%m-%d"),
        temperature_code(temperature_celsius)
    )
}
