use agrosoft_core::factors::{climatic_factor, climatic_range, ClimaticRange};
use agrosoft_core::CropId;
use serde::Serialize;

use crate::commands::{to_data, CommandResult, EXIT_BAD_INPUT};

const COMMAND: &str = "climate";

#[derive(Debug, Serialize)]
struct ClimateReport<'a> {
    crop: &'a CropId,
    temperature_celsius: f64,
    climatic_factor: f64,
    range: Option<&'static ClimaticRange>,
}

pub fn run(crop: &str, temperature: f64) -> CommandResult {
    let crop = CropId::new(crop);
    if crop.as_str().is_empty() {
        return CommandResult::failure(
            COMMAND,
            "invalid_input",
            "crop must not be empty",
            EXIT_BAD_INPUT,
        );
    }
    if !temperature.is_finite() {
        return CommandResult::failure(
            COMMAND,
            "invalid_input",
            "temperature must be a finite number of degrees Celsius",
            EXIT_BAD_INPUT,
        );
    }

    let range = climatic_range(&crop);
    let factor = climatic_factor(&crop, Some(temperature));
    let report = ClimateReport {
        crop: &crop,
        temperature_celsius: temperature,
        climatic_factor: factor,
        range,
    };
    let data = match to_data(COMMAND, &report) {
        Ok(data) => data,
        Err(failure) => return failure,
    };

    let message = match range {
        Some(_) => format!("{crop} at {temperature:.1} °C scores {factor:.3}"),
        None => format!("{crop} has no climate profile; neutral factor {factor:.3}"),
    };
    CommandResult::success(COMMAND, message, data)
}
