use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use agrosoft_core::config::AppConfig;
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, to_data, CommandResult};

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: Vec<ConfigEntry> = fields(&config)
        .into_iter()
        .map(|field| ConfigEntry {
            key: field.key,
            source: field_source(
                field.key,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
            value: field.value,
        })
        .collect();

    let data = match to_data(COMMAND, &entries) {
        Ok(data) => data,
        Err(failure) => return failure,
    };
    CommandResult::success(
        COMMAND,
        "effective config (source precedence: override > env > file > default)",
        data,
    )
}

struct ConfigField {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

fn field(key: &'static str, env_keys: &'static [&'static str], value: String) -> ConfigField {
    ConfigField { key, env_keys, value }
}

fn fields(config: &AppConfig) -> Vec<ConfigField> {
    let priority = config
        .data_source
        .priority
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let csv_path = config
        .data_source
        .sipsa_csv_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());

    vec![
        field("data_source.priority", &["AGROSOFT_DATA_SOURCE_PRIORITY"], priority),
        field("data_source.sipsa_csv_path", &["AGROSOFT_SIPSA_CSV_PATH"], csv_path),
        field(
            "data_source.sipsa_urls",
            &["AGROSOFT_SIPSA_URLS"],
            config.data_source.sipsa_urls.join(","),
        ),
        field(
            "data_source.timeout_secs",
            &["AGROSOFT_DATA_SOURCE_TIMEOUT_SECS"],
            config.data_source.timeout_secs.to_string(),
        ),
        field("cache.ttl_secs", &["AGROSOFT_CACHE_TTL_SECS"], config.cache.ttl_secs.to_string()),
        field(
            "recommendation.default_municipality",
            &["AGROSOFT_DEFAULT_MUNICIPALITY"],
            config.recommendation.default_municipality.clone(),
        ),
        field(
            "logging.level",
            &["AGROSOFT_LOGGING_LEVEL", "AGROSOFT_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        field(
            "logging.format",
            &["AGROSOFT_LOGGING_FORMAT", "AGROSOFT_LOG_FORMAT"],
            format!("{:?}", config.logging.format).to_lowercase(),
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("agrosoft.toml");
    if root.exists() {
        return Some(root);
    }
    let nested = PathBuf::from("config/agrosoft.toml");
    if nested.exists() {
        return Some(nested);
    }
    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
