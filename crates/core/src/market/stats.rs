use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::observation::PriceObservation;
use crate::sources::SourceKind;

/// Summary of one batch of market observations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarketStatistics {
    pub total_products: usize,
    pub average_wholesale_price: i64,
    pub min_wholesale_price: i64,
    pub max_wholesale_price: i64,
    pub total_records: usize,
    pub latest_date: NaiveDate,
    pub source: String,
}

impl MarketStatistics {
    /// Returns `None` when there is nothing priced to summarise. Daily feeds
    /// are summarised over their most recent day only.
    pub fn from_observations(observations: &[PriceObservation], kind: SourceKind) -> Option<Self> {
        let latest_date = observations.iter().map(|observation| observation.date).max()?;
        let window: Vec<&PriceObservation> = match kind {
            SourceKind::MarketFeed => observations
                .iter()
                .filter(|observation| observation.date == latest_date)
                .collect(),
            SourceKind::Sipsa | SourceKind::Simulated => observations.iter().collect(),
        };

        let prices: Vec<i64> = window
            .iter()
            .map(|observation| observation.wholesale_price)
            .filter(|price| *price > 0)
            .collect();
        let min_wholesale_price = *prices.iter().min()?;
        let max_wholesale_price = *prices.iter().max()?;
        let mean = prices.iter().sum::<i64>() as f64 / prices.len() as f64;

        let products: BTreeSet<&str> =
            window.iter().map(|observation| observation.crop.as_str()).collect();

        Some(Self {
            total_products: products.len(),
            average_wholesale_price: mean.round() as i64,
            min_wholesale_price,
            max_wholesale_price,
            total_records: window.len(),
            latest_date,
            source: kind.label().to_string(),
        })
    }
}

/// Observations whose crop name contains `name`, ignoring case.
pub fn prices_for_crop(observations: &[PriceObservation], name: &str) -> Vec<PriceObservation> {
    let needle = name.trim().to_uppercase();
    observations
        .iter()
        .filter(|observation| observation.crop.as_str().contains(needle.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::crop::CropId;

    fn observation(crop: &str, days_ago: i64, price: i64) -> PriceObservation {
        let today = NaiveDate::from_ymd_opt(2025, 7, 10).expect("valid date");
        PriceObservation {
            crop: CropId::new(crop),
            date: today - Duration::days(days_ago),
            market: "Corabastos".to_string(),
            variety: "Primera".to_string(),
            wholesale_price: price,
            retail_price: price,
            unit: "KILO".to_string(),
            packaging: "BULTO".to_string(),
        }
    }

    #[test]
    fn statistics_cover_every_record_for_bulletins() {
        let observations = vec![
            observation("PAPA CRIOLLA", 0, 2_600),
            observation("PAPA CRIOLLA", 7, 2_400),
            observation("APIO", 7, 2_801),
        ];
        let stats =
            MarketStatistics::from_observations(&observations, SourceKind::Simulated).expect("stats");
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.average_wholesale_price, 2_600);
        assert_eq!(stats.min_wholesale_price, 2_400);
        assert_eq!(stats.max_wholesale_price, 2_801);
        assert_eq!(stats.latest_date, observations[0].date);
        assert_eq!(stats.source, "Simulated data");
    }

    #[test]
    fn daily_feed_statistics_use_latest_day() {
        let observations = vec![
            observation("LECHUGA", 0, 900),
            observation("REPOLLO", 0, 1_100),
            observation("LECHUGA", 1, 5_000),
        ];
        let stats =
            MarketStatistics::from_observations(&observations, SourceKind::MarketFeed).expect("stats");
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.average_wholesale_price, 1_000);
        assert_eq!(stats.max_wholesale_price, 1_100);
    }

    #[test]
    fn empty_input_has_no_statistics() {
        assert_eq!(MarketStatistics::from_observations(&[], SourceKind::Sipsa), None);
    }

    #[test]
    fn crop_filter_is_case_insensitive_substring() {
        let observations = vec![
            observation("PAPA CRIOLLA", 0, 2_600),
            observation("PAPA PASTUSA", 0, 1_800),
            observation("ZANAHORIA", 0, 1_200),
        ];
        let papas = prices_for_crop(&observations, " papa ");
        assert_eq!(papas.len(), 2);
        assert!(prices_for_crop(&observations, "mango").is_empty());
    }
}
