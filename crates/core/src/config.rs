use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sources::{SipsaSettings, SourceKind};

pub const DEFAULT_SIPSA_URLS: [&str; 3] = [
    "https://www.datos.gov.co/api/views/wspg-shym/rows.json?$limit=500",
    "https://www.datos.gov.co/api/views/wspg-shym/rows.csv?$limit=500",
    "https://www.datos.gov.co/api/views/wspg-shym/rows.csv?accessType=DOWNLOAD&api_foundry=true",
];

#[derive(Clone, Debug, Serialize)]
pub struct AppConfig {
    pub data_source: DataSourceConfig,
    pub cache: CacheConfig,
    pub recommendation: RecommendationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct DataSourceConfig {
    pub priority: Vec<SourceKind>,
    pub sipsa_csv_path: Option<PathBuf>,
    pub sipsa_urls: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecommendationConfig {
    pub default_municipality: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub priority: Option<Vec<SourceKind>>,
    pub sipsa_csv_path: Option<PathBuf>,
    pub cache_ttl_secs: Option<u64>,
    pub default_municipality: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DataSourceConfig {
                priority: SourceKind::ALL.to_vec(),
                sipsa_csv_path: None,
                sipsa_urls: DEFAULT_SIPSA_URLS.iter().map(|url| url.to_string()).collect(),
                timeout_secs: 15,
            },
            cache: CacheConfig { ttl_secs: 3_600 },
            recommendation: RecommendationConfig {
                default_municipality: "Facatativá".to_string(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("agrosoft.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn sipsa_settings(&self) -> SipsaSettings {
        SipsaSettings {
            csv_path: self.data_source.sipsa_csv_path.clone(),
            urls: self.data_source.sipsa_urls.clone(),
            timeout: Duration::from_secs(self.data_source.timeout_secs),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data_source) = patch.data_source {
            if let Some(priority) = data_source.priority {
                self.data_source.priority = priority;
            }
            if let Some(sipsa_csv_path) = data_source.sipsa_csv_path {
                self.data_source.sipsa_csv_path = Some(sipsa_csv_path);
            }
            if let Some(sipsa_urls) = data_source.sipsa_urls {
                self.data_source.sipsa_urls = sipsa_urls;
            }
            if let Some(timeout_secs) = data_source.timeout_secs {
                self.data_source.timeout_secs = timeout_secs;
            }
        }

        if let Some(cache) = patch.cache {
            if let Some(ttl_secs) = cache.ttl_secs {
                self.cache.ttl_secs = ttl_secs;
            }
        }

        if let Some(recommendation) = patch.recommendation {
            if let Some(default_municipality) = recommendation.default_municipality {
                self.recommendation.default_municipality = default_municipality;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("AGROSOFT_DATA_SOURCE_PRIORITY") {
            self.data_source.priority = parse_priority("AGROSOFT_DATA_SOURCE_PRIORITY", &value)?;
        }
        if let Some(value) = read_env("AGROSOFT_SIPSA_CSV_PATH") {
            self.data_source.sipsa_csv_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("AGROSOFT_SIPSA_URLS") {
            self.data_source.sipsa_urls = split_list(&value);
        }
        if let Some(value) = read_env("AGROSOFT_DATA_SOURCE_TIMEOUT_SECS") {
            self.data_source.timeout_secs =
                parse_u64("AGROSOFT_DATA_SOURCE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("AGROSOFT_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_u64("AGROSOFT_CACHE_TTL_SECS", &value)?;
        }

        if let Some(value) = read_env("AGROSOFT_DEFAULT_MUNICIPALITY") {
            self.recommendation.default_municipality = value;
        }

        let log_level =
            read_env("AGROSOFT_LOGGING_LEVEL").or_else(|| read_env("AGROSOFT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("AGROSOFT_LOGGING_FORMAT").or_else(|| read_env("AGROSOFT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(priority) = overrides.priority {
            self.data_source.priority = priority;
        }
        if let Some(sipsa_csv_path) = overrides.sipsa_csv_path {
            self.data_source.sipsa_csv_path = Some(sipsa_csv_path);
        }
        if let Some(ttl_secs) = overrides.cache_ttl_secs {
            self.cache.ttl_secs = ttl_secs;
        }
        if let Some(default_municipality) = overrides.default_municipality {
            self.recommendation.default_municipality = default_municipality;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_data_source(&self.data_source)?;
        validate_cache(&self.cache)?;
        validate_recommendation(&self.recommendation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("agrosoft.toml"), PathBuf::from("config/agrosoft.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_data_source(data_source: &DataSourceConfig) -> Result<(), ConfigError> {
    if data_source.priority.is_empty() {
        return Err(ConfigError::Validation(
            "data_source.priority must name at least one source (market_feed|sipsa|simulated)"
                .to_string(),
        ));
    }

    for (index, kind) in data_source.priority.iter().enumerate() {
        if data_source.priority[..index].contains(kind) {
            return Err(ConfigError::Validation(format!(
                "data_source.priority lists `{kind}` more than once"
            )));
        }
    }

    if data_source.timeout_secs == 0 || data_source.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "data_source.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if let Some(url) = data_source
        .sipsa_urls
        .iter()
        .find(|url| !url.starts_with("http://") && !url.starts_with("https://"))
    {
        return Err(ConfigError::Validation(format!(
            "data_source.sipsa_urls entry `{url}` must start with http:// or https://"
        )));
    }

    Ok(())
}

fn validate_cache(cache: &CacheConfig) -> Result<(), ConfigError> {
    if cache.ttl_secs == 0 || cache.ttl_secs > 86_400 {
        return Err(ConfigError::Validation(
            "cache.ttl_secs must be in range 1..=86400".to_string(),
        ));
    }
    Ok(())
}

fn validate_recommendation(recommendation: &RecommendationConfig) -> Result<(), ConfigError> {
    if recommendation.default_municipality.trim().is_empty() {
        return Err(ConfigError::Validation(
            "recommendation.default_municipality must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_priority(key: &str, value: &str) -> Result<Vec<SourceKind>, ConfigError> {
    split_list(value)
        .iter()
        .map(|item| {
            item.parse::<SourceKind>().map_err(|_| ConfigError::InvalidEnvOverride {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    data_source: Option<DataSourcePatch>,
    cache: Option<CachePatch>,
    recommendation: Option<RecommendationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DataSourcePatch {
    priority: Option<Vec<SourceKind>>,
    sipsa_csv_path: Option<PathBuf>,
    sipsa_urls: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CachePatch {
    ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    default_municipality: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
