use std::env;
use std::sync::{Mutex, OnceLock};

use agrosoft_cli::commands::recommend::RecommendArgs;
use agrosoft_cli::commands::{climate, config, prices, recommend, stats};
use serde_json::Value;

fn recommend_args(municipality: &str, date: &str, temperature: Option<f64>) -> RecommendArgs {
    RecommendArgs {
        municipality: Some(municipality.to_string()),
        date: Some(date.to_string()),
        temperature,
        simulate_climate: false,
    }
}

#[test]
fn recommend_ranks_papa_criolla_in_its_home_conditions() {
    with_env(&[], || {
        let result = recommend::run(recommend_args("Facatativá", "2025-01-15", Some(14.0)));
        assert_eq!(result.exit_code, 0, "expected successful ranking");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["planting_date"], "2025-01-15");

        let recommendations =
            payload["data"]["recommendations"].as_array().expect("recommendations array");
        assert!(!recommendations.is_empty() && recommendations.len() <= 10);
        let top_five: Vec<&str> =
            recommendations.iter().take(5).filter_map(|item| item["crop"].as_str()).collect();
        assert!(top_five.contains(&"PAPA CRIOLLA"), "top five: {top_five:?}");
    });
}

#[test]
fn recommend_is_deterministic_across_runs() {
    with_env(&[], || {
        let first = recommend::run(recommend_args("Madrid", "2025-03-01", None));
        let second = recommend::run(recommend_args("Madrid", "2025-03-01", None));
        assert_eq!(first.exit_code, 0);
        assert_eq!(first.output, second.output);
    });
}

#[test]
fn recommend_uses_default_municipality_and_simulated_climate() {
    with_env(&[("AGROSOFT_DEFAULT_MUNICIPALITY", "Subachoque")], || {
        let result = recommend::run(RecommendArgs {
            municipality: None,
            date: Some("2025-07-04".to_string()),
            temperature: None,
            simulate_climate: true,
        });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["municipality"], "Subachoque");
        assert_eq!(payload["data"]["temperature_simulated"], true);
        let temperature =
            payload["data"]["temperature_celsius"].as_f64().expect("simulated temperature");
        assert!((6.0..=28.0).contains(&temperature));
    });
}

#[test]
fn recommend_rejects_malformed_date() {
    with_env(&[], || {
        let result = recommend::run(recommend_args("Funza", "15/01/2025", None));
        assert_eq!(result.exit_code, 5, "expected bad input exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
    });
}

#[test]
fn recommend_rejects_blank_municipality() {
    with_env(&[], || {
        let result = recommend::run(recommend_args("   ", "2025-01-15", None));
        assert_eq!(result.exit_code, 5);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_input");
    });
}

#[test]
fn invalid_configuration_fails_with_config_exit_code() {
    with_env(&[("AGROSOFT_CACHE_TTL_SECS", "0")], || {
        let result = recommend::run(recommend_args("Funza", "2025-01-15", None));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["error_class"], "config_validation");
        let message = payload["message"].as_str().expect("message");
        assert!(message.starts_with("An unexpected internal error occurred."), "{message}");
        assert!(message.contains("ttl_secs"), "{message}");
    });
}

#[test]
fn prices_filters_market_feed_by_crop() {
    with_env(&[("AGROSOFT_DATA_SOURCE_PRIORITY", "market_feed")], || {
        let result = prices::run(Some("papa"), 5, Some("2025-02-10"));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["source"], "market_feed");
        assert_eq!(payload["data"]["total"], 14);

        let shown = payload["data"]["prices"].as_array().expect("prices array");
        assert_eq!(shown.len(), 5);
        assert!(shown
            .iter()
            .all(|item| item["crop"].as_str().is_some_and(|crop| crop.starts_with("PAPA"))));
    });
}

#[test]
fn prices_report_unavailable_sources() {
    with_env(
        &[
            ("AGROSOFT_DATA_SOURCE_PRIORITY", "sipsa"),
            ("AGROSOFT_SIPSA_CSV_PATH", "/nonexistent/agrosoft/precios.csv"),
            ("AGROSOFT_SIPSA_URLS", "http://127.0.0.1:9/rows.csv"),
            ("AGROSOFT_DATA_SOURCE_TIMEOUT_SECS", "1"),
        ],
        || {
            let result = prices::run(None, 10, Some("2025-02-10"));
            assert_eq!(result.exit_code, 3, "expected source unavailable exit code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["error_class"], "source_unavailable");
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains("/nonexistent/agrosoft/precios.csv"));
        },
    );
}

#[test]
fn stats_summarise_latest_feed_day() {
    with_env(&[("AGROSOFT_DATA_SOURCE_PRIORITY", "market_feed,simulated")], || {
        let result = stats::run(Some("2025-02-10"));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "stats");
        assert_eq!(payload["data"]["total_products"], 15);
        assert_eq!(payload["data"]["total_records"], 15);
        assert_eq!(payload["data"]["latest_date"], "2025-02-10");
    });
}

#[test]
fn climate_reports_cold_penalty() {
    let result = climate::run("papa criolla", 8.0);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["crop"], "PAPA CRIOLLA");
    let factor = payload["data"]["climatic_factor"].as_f64().expect("factor");
    assert!(factor < 0.85);
    assert!(payload["data"]["range"].is_object());
}

#[test]
fn climate_is_neutral_for_unknown_crops() {
    let result = climate::run("quinua", 30.0);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["climatic_factor"], 1.0);
    assert!(payload["data"]["range"].is_null());
}

#[test]
fn config_attributes_env_sources() {
    with_env(&[("AGROSOFT_CACHE_TTL_SECS", "120")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let entries = payload["data"].as_array().expect("config entries");
        let ttl = entries
            .iter()
            .find(|entry| entry["key"] == "cache.ttl_secs")
            .expect("ttl entry present");
        assert_eq!(ttl["value"], "120");
        assert_eq!(ttl["source"], "env (AGROSOFT_CACHE_TTL_SECS)");

        let level = entries
            .iter()
            .find(|entry| entry["key"] == "logging.level")
            .expect("logging entry present");
        assert_eq!(level["source"], "default");
    });
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "AGROSOFT_DATA_SOURCE_PRIORITY",
        "AGROSOFT_SIPSA_CSV_PATH",
        "AGROSOFT_SIPSA_URLS",
        "AGROSOFT_DATA_SOURCE_TIMEOUT_SECS",
        "AGROSOFT_CACHE_TTL_SECS",
        "AGROSOFT_DEFAULT_MUNICIPALITY",
        "AGROSOFT_LOGGING_LEVEL",
        "AGROSOFT_LOGGING_FORMAT",
        "AGROSOFT_LOG_LEVEL",
        "AGROSOFT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}
