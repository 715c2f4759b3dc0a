use agrosoft_core::MarketDataService;

use crate::commands::{
    load_config, parse_date, source_failure, to_data, CommandResult, EXIT_EMPTY_RESULT,
};

const COMMAND: &str = "stats";

pub fn run(date: Option<&str>) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let reference_date = match parse_date(COMMAND, date) {
        Ok(date) => date,
        Err(failure) => return failure,
    };

    let mut market = MarketDataService::from_config(&config);
    let statistics = match market.statistics(reference_date) {
        Ok(Some(statistics)) => statistics,
        Ok(None) => {
            return CommandResult::failure(
                COMMAND,
                "empty_result",
                "no priced observations to summarise",
                EXIT_EMPTY_RESULT,
            )
        }
        Err(error) => return source_failure(COMMAND, error),
    };

    let data = match to_data(COMMAND, &statistics) {
        Ok(data) => data,
        Err(failure) => return failure,
    };
    CommandResult::success(
        COMMAND,
        format!(
            "{} products, mean wholesale price {} ({})",
            statistics.total_products, statistics.average_wholesale_price, statistics.source
        ),
        data,
    )
}
