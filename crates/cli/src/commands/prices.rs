use agrosoft_core::market::{prices_for_crop, DEFAULT_FETCH_LIMIT};
use agrosoft_core::{MarketDataService, PriceObservation, SourceKind};
use serde::Serialize;

use crate::commands::{load_config, parse_date, source_failure, to_data, CommandResult};

const COMMAND: &str = "prices";

#[derive(Debug, Serialize)]
struct PriceReport<'a> {
    source: SourceKind,
    source_label: &'static str,
    total: usize,
    prices: &'a [PriceObservation],
}

pub fn run(crop: Option<&str>, limit: usize, date: Option<&str>) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let reference_date = match parse_date(COMMAND, date) {
        Ok(date) => date,
        Err(failure) => return failure,
    };

    let mut market = MarketDataService::from_config(&config);
    let sourced = match market.current_prices(reference_date, DEFAULT_FETCH_LIMIT) {
        Ok(sourced) => sourced,
        Err(error) => return source_failure(COMMAND, error),
    };

    let matching = match crop {
        Some(name) => prices_for_crop(&sourced.observations, name),
        None => sourced.observations,
    };
    let shown = &matching[..matching.len().min(limit)];

    let report = PriceReport {
        source: sourced.kind,
        source_label: sourced.kind.label(),
        total: matching.len(),
        prices: shown,
    };
    let data = match to_data(COMMAND, &report) {
        Ok(data) => data,
        Err(failure) => return failure,
    };

    CommandResult::success(
        COMMAND,
        format!("{} of {} price observations from {}", shown.len(), matching.len(), sourced.kind),
        data,
    )
}
