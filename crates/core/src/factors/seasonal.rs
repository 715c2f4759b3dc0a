use chrono::{Datelike, NaiveDate};

use crate::domain::crop::CropId;

use super::NEUTRAL_FACTOR;

/// Harvest-cycle multipliers, January through December.
pub const SEASONAL_FACTORS: &[(&str, [f64; 12])] = &[
    ("PAPA CRIOLLA", [1.2, 1.1, 0.9, 0.8, 0.9, 1.0, 1.1, 1.2, 1.1, 1.0, 1.1, 1.2]),
    ("PAPA PASTUSA", [1.1, 1.0, 0.9, 0.9, 1.0, 1.1, 1.2, 1.1, 1.0, 1.0, 1.1, 1.1]),
    ("ZANAHORIA", [0.9, 1.0, 1.1, 1.2, 1.1, 1.0, 0.9, 0.9, 1.0, 1.1, 1.0, 0.9]),
    ("LECHUGA", [1.0, 1.1, 1.2, 1.1, 1.0, 0.9, 0.8, 0.9, 1.0, 1.1, 1.1, 1.0]),
    ("CILANTRO", [1.1, 1.2, 1.1, 1.0, 0.9, 0.9, 1.0, 1.1, 1.2, 1.1, 1.0, 1.1]),
];

pub fn seasonal_factor(crop: &CropId, date: NaiveDate) -> f64 {
    SEASONAL_FACTORS
        .iter()
        .find(|(name, _)| *name == crop.as_str())
        .map(|(_, months)| months[date.month0() as usize])
        .unwrap_or(NEUTRAL_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_of(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, 1).expect("valid date")
    }

    #[test]
    fn indexes_by_calendar_month() {
        let crop = CropId::new("PAPA CRIOLLA");
        assert_eq!(seasonal_factor(&crop, first_of(1)), 1.2);
        assert_eq!(seasonal_factor(&crop, first_of(4)), 0.8);
        assert_eq!(seasonal_factor(&crop, first_of(12)), 1.2);
    }

    #[test]
    fn unknown_crop_is_neutral_all_year() {
        let crop = CropId::new("REMOLACHA");
        for month in 1..=12 {
            assert_eq!(seasonal_factor(&crop, first_of(month)), 1.0);
        }
    }
}
