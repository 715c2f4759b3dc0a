pub mod climate;
pub mod config;
pub mod prices;
pub mod recommend;
pub mod stats;

use agrosoft_core::config::{AppConfig, LoadOptions};
use agrosoft_core::errors::{ApplicationError, InterfaceError, SourceError};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 3;
pub const EXIT_EMPTY_RESULT: u8 = 4;
pub const EXIT_BAD_INPUT: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, data: Value) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        application_failure(command, ApplicationError::Configuration(error.to_string()))
    })
}

/// Parses `YYYY-MM-DD`, defaulting to the local calendar day.
pub(crate) fn parse_date(command: &str, raw: Option<&str>) -> Result<NaiveDate, CommandResult> {
    match raw {
        None => Ok(Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            CommandResult::failure(
                command,
                "invalid_input",
                format!("date `{raw}` must use the YYYY-MM-DD format"),
                EXIT_BAD_INPUT,
            )
        }),
    }
}

pub(crate) fn to_data(command: &str, value: &impl Serialize) -> Result<Value, CommandResult> {
    serde_json::to_value(value).map_err(|error| {
        CommandResult::failure(command, "serialization", error.to_string(), 1)
    })
}

pub(crate) fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Maps a core failure onto the payload and exit code contract.
pub(crate) fn application_failure(command: &str, error: ApplicationError) -> CommandResult {
    let (error_class, exit_code) = match &error {
        ApplicationError::Domain(_) => ("invalid_input", EXIT_BAD_INPUT),
        ApplicationError::Source(_) => ("source_unavailable", EXIT_SOURCE_UNAVAILABLE),
        ApplicationError::EmptyRecommendation { .. } => ("empty_result", EXIT_EMPTY_RESULT),
        ApplicationError::Configuration(_) => ("config_validation", EXIT_CONFIG),
    };
    let detail = error.to_string();
    let interface: InterfaceError = error.into_interface(correlation_id());

    tracing::warn!(
        event_name = "cli.command.failed",
        command,
        error_class,
        correlation_id = interface.correlation_id(),
        error = %detail,
        "command failed"
    );
    CommandResult::failure(
        command,
        error_class,
        format!("{} ({detail})", interface.user_message()),
        exit_code,
    )
}

pub(crate) fn source_failure(command: &str, error: SourceError) -> CommandResult {
    application_failure(command, ApplicationError::Source(error))
}
