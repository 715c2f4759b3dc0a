use serde::Serialize;

use crate::domain::crop::CropId;

use super::NEUTRAL_FACTOR;

const PERFECT_ZONE_PEAK: f64 = 1.25;
const PERFECT_ZONE_FLOOR: f64 = 1.20;
const ACCEPTABLE_FLOOR: f64 = 0.75;
const HOSTILE_FLOOR: f64 = 0.60;
const MAX_HOSTILE_PENALTY: f64 = 0.35;
const COLD_PENALTY_PER_DEGREE: f64 = 0.08;
const HEAT_PENALTY_PER_DEGREE: f64 = 0.06;

/// Temperature tolerance of a crop in °C.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClimaticRange {
    pub min: f64,
    pub ideal: f64,
    pub max: f64,
    pub optimal_low: f64,
    pub optimal_high: f64,
}

const fn range(min: f64, ideal: f64, max: f64, optimal_low: f64, optimal_high: f64) -> ClimaticRange {
    ClimaticRange { min, ideal, max, optimal_low, optimal_high }
}

const CLIMATIC_RANGES: &[(&str, ClimaticRange)] = &[
    ("PAPA CRIOLLA", range(8.0, 14.0, 18.0, 12.0, 16.0)),
    ("PAPA PASTUSA", range(6.0, 12.0, 16.0, 10.0, 14.0)),
    ("ZANAHORIA", range(12.0, 18.0, 24.0, 16.0, 20.0)),
    ("CEBOLLA CABEZONA", range(10.0, 16.0, 22.0, 14.0, 18.0)),
    ("CEBOLLA LARGA", range(14.0, 20.0, 26.0, 18.0, 22.0)),
    ("LECHUGA", range(8.0, 14.0, 20.0, 12.0, 16.0)),
    ("REPOLLO", range(6.0, 13.0, 18.0, 11.0, 15.0)),
    ("CILANTRO", range(12.0, 18.0, 25.0, 16.0, 20.0)),
    ("PEREJIL", range(10.0, 16.0, 22.0, 14.0, 18.0)),
    ("APIO", range(8.0, 14.0, 20.0, 12.0, 16.0)),
    ("ACELGA", range(6.0, 13.0, 20.0, 11.0, 15.0)),
    ("ESPINACA", range(4.0, 10.0, 16.0, 8.0, 12.0)),
    ("BRÓCOLI", range(6.0, 13.0, 18.0, 11.0, 15.0)),
    ("COLIFLOR", range(8.0, 14.0, 20.0, 12.0, 16.0)),
    ("REMOLACHA", range(10.0, 16.0, 22.0, 14.0, 18.0)),
];

pub fn climatic_range(crop: &CropId) -> Option<&'static ClimaticRange> {
    CLIMATIC_RANGES.iter().find(|(name, _)| *name == crop.as_str()).map(|(_, range)| range)
}

impl ClimaticRange {
    /// Asymmetric piecewise suitability curve:
    /// a near-flat bonus inside the optimal band, a linear slide from 1.20 to
    /// 0.75 across the acceptable range, and a capped penalty beyond it.
    pub fn factor(&self, temperature: f64) -> f64 {
        if (self.optimal_low..=self.optimal_high).contains(&temperature) {
            let distance = (temperature - self.ideal).abs();
            return (PERFECT_ZONE_PEAK - distance * 0.02).max(PERFECT_ZONE_FLOOR);
        }

        if (self.min..=self.max).contains(&temperature) {
            let (distance, width) = if temperature < self.optimal_low {
                (self.optimal_low - temperature, self.optimal_low - self.min)
            } else {
                (temperature - self.optimal_high, self.max - self.optimal_high)
            };
            let slide = PERFECT_ZONE_FLOOR - ACCEPTABLE_FLOOR;
            return (PERFECT_ZONE_FLOOR - slide * (distance / width)).max(ACCEPTABLE_FLOOR);
        }

        let penalty = if temperature < self.min {
            (self.min - temperature) * COLD_PENALTY_PER_DEGREE
        } else {
            (temperature - self.max) * HEAT_PENALTY_PER_DEGREE
        };
        (ACCEPTABLE_FLOOR - penalty.min(MAX_HOSTILE_PENALTY)).max(HOSTILE_FLOOR)
    }
}

/// Temperature suitability of `crop`. A missing or non-finite reading is
/// neutral so that absent climate data never biases the ranking.
pub fn climatic_factor(crop: &CropId, temperature_celsius: Option<f64>) -> f64 {
    let Some(temperature) = temperature_celsius.filter(|value| value.is_finite()) else {
        return NEUTRAL_FACTOR;
    };
    climatic_range(crop).map(|range| range.factor(temperature)).unwrap_or(NEUTRAL_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn papa_criolla(temperature: f64) -> f64 {
        climatic_factor(&CropId::new("PAPA CRIOLLA"), Some(temperature))
    }

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn missing_temperature_is_neutral_for_every_crop() {
        for (name, _) in CLIMATIC_RANGES {
            assert_eq!(climatic_factor(&CropId::new(name), None), 1.0);
        }
        assert_eq!(papa_criolla(f64::NAN), 1.0);
    }

    #[test]
    fn unknown_crop_is_neutral() {
        assert_eq!(climatic_factor(&CropId::new("QUINUA"), Some(40.0)), 1.0);
    }

    #[test]
    fn optimal_band_is_near_flat() {
        assert_eq!(papa_criolla(14.0), 1.25);
        assert!(close(papa_criolla(13.0), 1.23));
        assert!(close(papa_criolla(16.0), 1.21));
    }

    #[test]
    fn acceptable_range_slides_linearly() {
        assert!(close(papa_criolla(10.0), 0.975));
        assert!(close(papa_criolla(17.0), 0.975));
        assert!(close(papa_criolla(8.0), 0.75));
        assert!(close(papa_criolla(18.0), 0.75));
    }

    #[test]
    fn cold_and_heat_penalties_are_asymmetric() {
        assert!(close(papa_criolla(6.0), 0.60));
        assert!(close(papa_criolla(7.0), 0.67));
        assert!(close(papa_criolla(20.0), 0.63));
        assert!(close(papa_criolla(40.0), 0.60));
        assert!(close(papa_criolla(-10.0), 0.60));
    }

    #[test]
    fn near_minimum_is_well_below_ideal() {
        let cold = papa_criolla(8.0);
        assert!(cold < 0.85);
        assert!(cold < papa_criolla(14.0));
    }

    #[test]
    fn factor_decreases_away_from_ideal() {
        for (name, range) in CLIMATIC_RANGES {
            let crop = CropId::new(name);
            let at = |t: f64| climatic_factor(&crop, Some(t));
            let ideal = range.ideal;
            for side in [-1.0, 1.0] {
                let near = ideal + side * 2.0;
                let far = ideal + side * 6.0;
                assert!(at(ideal) >= at(near), "{name} near side {side}");
                assert!(at(near) >= at(far), "{name} far side {side}");
            }
        }
    }

    #[test]
    fn factors_stay_within_curve_bounds() {
        for (name, _) in CLIMATIC_RANGES {
            let crop = CropId::new(name);
            let mut temperature = -20.0;
            while temperature <= 45.0 {
                let factor = climatic_factor(&crop, Some(temperature));
                assert!((0.60..=1.25).contains(&factor), "{name} at {temperature}");
                temperature += 0.5;
            }
        }
    }
}
