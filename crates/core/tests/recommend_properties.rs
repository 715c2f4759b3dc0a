use agrosoft_core::factors::climatic_factor;
use agrosoft_core::{
    AppConfig, ApplicationError, CropId, MarketDataService, PriceObservation,
    RecommendationEngine, RecommendationRequest, SimulatedClimate, SourceKind, TemperatureSource,
    Trend,
};
use chrono::{Duration, NaiveDate};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

const MUNICIPALITIES: [&str; 8] =
    ["Facatativá", "Madrid", "Mosquera", "El Rosal", "Subachoque", "Bojacá", "Funza", "Tenjo"];

#[test]
fn identical_context_gives_identical_ranking() {
    let engine = RecommendationEngine::default();
    let first = engine.recommend("Subachoque", date(2025, 9, 1), Some(12.3)).expect("ranked");
    let second = engine.recommend("Subachoque", date(2025, 9, 1), Some(12.3)).expect("ranked");
    assert_eq!(first, second);
}

#[test]
fn profitability_and_size_bounds_hold_across_contexts() {
    let engine = RecommendationEngine::default();
    let temperatures = [None, Some(5.0), Some(8.0), Some(14.0), Some(17.5), Some(24.0)];

    for municipality in MUNICIPALITIES {
        for month in [1, 4, 7, 11] {
            for temperature in temperatures {
                let ranked = engine
                    .recommend(municipality, date(2025, month, 15), temperature)
                    .expect("synthetic history always scores");
                assert!(!ranked.is_empty() && ranked.len() <= 10);
                for pair in ranked.windows(2) {
                    assert!(pair[0].profitability_percent >= pair[1].profitability_percent);
                }
                for item in &ranked {
                    assert!(
                        (-40.0..=100.0).contains(&item.profitability_percent),
                        "{municipality} {month} {temperature:?}: {}",
                        item.profitability_percent
                    );
                    assert!(item.current_price > 0);
                    assert_eq!(item.last_observation_date, date(2025, month, 15));
                }
            }
        }
    }
}

#[test]
fn papa_criolla_ranks_high_in_its_home_conditions() {
    let engine = RecommendationEngine::default();
    let ranked = engine.recommend("Facatativá", date(2025, 1, 15), Some(14.0)).expect("ranked");

    let position = ranked
        .iter()
        .position(|item| item.crop == CropId::new("PAPA CRIOLLA"))
        .expect("PAPA CRIOLLA is recommended");
    assert!(position < 5, "PAPA CRIOLLA ranked at {position}");

    let criolla = &ranked[position];
    assert_eq!(criolla.municipal_factor, 1.1);
    assert_eq!(criolla.climatic_factor, 1.25);
    assert_eq!(criolla.unit, "KILO");
}

#[test]
fn cold_planting_day_penalises_papa_criolla() {
    let crop = CropId::new("PAPA CRIOLLA");
    let cold = climatic_factor(&crop, Some(8.0));
    let ideal = climatic_factor(&crop, Some(14.0));
    assert!(cold < 0.85);
    assert!(cold < ideal);
    assert_eq!(climatic_factor(&crop, None), 1.0);
}

/// Three weekly quotes for REPOLLO, oldest first, ending on `last`.
fn repollo_history(last: NaiveDate, oldest_first: [i64; 3]) -> Vec<PriceObservation> {
    oldest_first
        .iter()
        .rev()
        .enumerate()
        .map(|(weeks_back, price)| PriceObservation {
            crop: CropId::new("REPOLLO"),
            date: last - Duration::weeks(weeks_back as i64),
            market: "Corabastos".to_string(),
            variety: "Estándar".to_string(),
            wholesale_price: *price,
            retail_price: (*price as f64 * 1.3) as i64,
            unit: "KILO".to_string(),
            packaging: "BULTO 25KG".to_string(),
        })
        .collect()
}

#[test]
fn trend_orders_series_with_equal_averages() {
    let engine = RecommendationEngine::default();
    let planting = date(2025, 3, 10);
    let request = RecommendationRequest::new("Funza", planting);
    let score = |oldest_first: [i64; 3]| {
        let ranked = engine
            .rank_observations(&request, &repollo_history(planting, oldest_first))
            .expect("three quotes rank");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].average_price, 1_200);
        (ranked[0].profitability_percent, ranked[0].trend)
    };

    let (falling, falling_trend) = score([1_400, 1_200, 1_000]);
    let (stable, stable_trend) = score([1_200, 1_200, 1_200]);
    let (rising, rising_trend) = score([1_000, 1_200, 1_400]);

    assert_eq!(falling_trend, Trend::Falling);
    assert_eq!(stable_trend, Trend::Stable);
    assert_eq!(rising_trend, Trend::Rising);
    assert!(falling < stable && stable < rising, "{falling} {stable} {rising}");
}

#[test]
fn simulated_climate_feeds_the_engine() {
    let engine = RecommendationEngine::default();
    let planting = date(2025, 4, 20);
    let temperature = SimulatedClimate.temperature("Madrid", planting);
    assert!(temperature.is_some());

    let request = RecommendationRequest::new("Madrid", planting).with_temperature(temperature);
    let ranked = engine.recommend_for(&request).expect("ranked");
    assert!(ranked.iter().all(|item| item.climatic_factor > 0.0));
}

#[test]
fn market_observations_can_be_ranked() {
    let mut config = AppConfig::default();
    config.data_source.priority = vec![SourceKind::MarketFeed];
    let mut market = MarketDataService::from_config(&config);
    let planting = date(2025, 6, 2);

    let sourced = market.current_prices(planting, 1_000).expect("market feed");
    assert_eq!(sourced.kind, SourceKind::MarketFeed);

    let engine = RecommendationEngine::default();
    let request = RecommendationRequest::new("Funza", planting);
    let ranked = engine.rank_observations(&request, &sourced.observations).expect("ranked");
    assert_eq!(ranked.len(), 10);
    assert!(ranked.iter().all(|item| item.unit == "KILO" || item.unit == "UNIDAD"));
}

#[test]
fn blank_municipality_is_a_bad_request() {
    let engine = RecommendationEngine::default();
    let error = engine.recommend("", date(2025, 1, 1), None).expect_err("rejected");
    let interface = error.into_interface("req-1");
    assert!(!interface.is_retryable());
}

#[test]
fn empty_history_is_retryable() {
    let engine = RecommendationEngine::default();
    let request = RecommendationRequest::new("Madrid", date(2025, 1, 1));
    let error = engine.rank_observations(&request, &[]).expect_err("empty");
    assert!(matches!(error, ApplicationError::EmptyRecommendation { .. }));
    assert!(error.into_interface("req-2").is_retryable());
}
