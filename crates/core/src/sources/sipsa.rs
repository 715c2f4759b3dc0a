//! Official SIPSA price bulletins, read from a local export or the open data
//! portal in either CSV or Socrata `rows.json` form.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{PriceSource, SourceKind};
use crate::domain::crop::CropId;
use crate::domain::observation::{retail_from_wholesale, PriceObservation, RETAIL_MARKUP};
use crate::errors::SourceError;

/// Products outside these families are not grown in the region and are
/// dropped from bulletins.
pub const RELEVANT_KEYWORDS: &[&str] = &[
    "PAPA", "ZANAHORIA", "CEBOLLA", "LECHUGA", "REPOLLO", "CILANTRO", "PEREJIL", "APIO",
    "ACELGA", "ESPINACA", "BRÓCOLI", "COLIFLOR", "REMOLACHA",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];

const DEFAULT_MARKET: &str = "Corabastos";
const DEFAULT_VARIETY: &str = "Estándar";
const DEFAULT_UNIT: &str = "KILO";
const DEFAULT_PACKAGING: &str = "BULTO";

const CSV_DATE: &[&str] = &["fecha", "Fecha"];
const CSV_PRODUCT: &[&str] = &["producto", "Producto", "PRODUCTO"];
const CSV_MARKET: &[&str] = &["mercado", "Mercado", "MERCADO"];
const CSV_WHOLESALE: &[&str] =
    &["precio_mayorista", "Precio Mayorista", "PRECIO_MAYORISTA", "precio"];
const CSV_RETAIL: &[&str] = &["precio_minorista", "Precio Minorista", "PRECIO_MINORISTA"];
const CSV_VARIETY: &[&str] = &["variedad", "Variedad"];
const CSV_UNIT: &[&str] = &["unidad", "Unidad"];
const CSV_PACKAGING: &[&str] = &["presentacion", "Presentacion"];

const JSON_PRODUCT: &[&str] = &["producto", "nombre_producto", "item"];
const JSON_PRICE: &[&str] = &["precio", "precio_mayorista", "valor"];
const JSON_DATE: &[&str] = &["fecha", "date", "fecha_registro"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SipsaSettings {
    pub csv_path: Option<PathBuf>,
    pub urls: Vec<String>,
    pub timeout: Duration,
}

pub struct SipsaSource {
    settings: SipsaSettings,
}

impl SipsaSource {
    pub fn new(settings: SipsaSettings) -> Self {
        Self { settings }
    }

    fn read_local(&self, reference_date: NaiveDate) -> Option<Result<Vec<PriceObservation>, SourceError>> {
        let path = self.settings.csv_path.as_ref()?;
        Some(
            fs::read_to_string(path)
                .map_err(|error| SourceError::Io {
                    path: path.display().to_string(),
                    message: error.to_string(),
                })
                .and_then(|text| parse_csv(&text, reference_date)),
        )
    }

    fn download(
        &self,
        client: &Client,
        url: &str,
        reference_date: NaiveDate,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let http_error =
            |error: reqwest::Error| SourceError::Http { url: url.to_string(), message: error.to_string() };
        let body = client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(http_error)?;

        if is_json_endpoint(url) {
            let payload: Value = serde_json::from_str(&body)
                .map_err(|error| SourceError::Parse(format!("{url}: {error}")))?;
            Ok(parse_json(&payload, reference_date))
        } else {
            parse_csv(&body, reference_date)
        }
    }
}

impl PriceSource for SipsaSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Sipsa
    }

    fn fetch(
        &self,
        reference_date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let mut attempts = Vec::new();

        if let Some(result) = self.read_local(reference_date) {
            match result {
                Ok(mut observations) if !observations.is_empty() => {
                    observations.truncate(limit);
                    return Ok(observations);
                }
                Ok(_) => attempts.push("local export: no relevant rows".to_string()),
                Err(error) => attempts.push(error.to_string()),
            }
        }

        if !self.settings.urls.is_empty() {
            let client = Client::builder()
                .timeout(self.settings.timeout)
                .build()
                .map_err(|error| SourceError::Http {
                    url: "<client>".to_string(),
                    message: error.to_string(),
                })?;

            for url in &self.settings.urls {
                match self.download(&client, url, reference_date) {
                    Ok(mut observations) if !observations.is_empty() => {
                        debug!(
                            event_name = "sources.sipsa.downloaded",
                            url = %url,
                            observations = observations.len(),
                            "price bulletin downloaded"
                        );
                        observations.truncate(limit);
                        return Ok(observations);
                    }
                    Ok(_) => attempts.push(format!("{url}: no relevant rows")),
                    Err(error) => {
                        warn!(
                            event_name = "sources.sipsa.endpoint_failed",
                            url = %url,
                            error = %error,
                            "price bulletin endpoint failed"
                        );
                        attempts.push(error.to_string());
                    }
                }
            }
        }

        if attempts.is_empty() {
            attempts.push("no local export or endpoint configured".to_string());
        }
        Err(SourceError::Unavailable { attempts })
    }
}

fn is_json_endpoint(url: &str) -> bool {
    url.split('?').next().is_some_and(|path| path.ends_with(".json"))
}

/// Parses a bulletin CSV export. Rows without a product or a positive
/// wholesale price, and products outside [`RELEVANT_KEYWORDS`], are skipped.
pub fn parse_csv(text: &str, reference_date: NaiveDate) -> Result<Vec<PriceObservation>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: HashMap<String, usize> = reader
        .headers()
        .map_err(|error| SourceError::Parse(error.to_string()))?
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_string(), index))
        .collect();

    let mut observations = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                debug!(event_name = "sources.sipsa.row_skipped", error = %error, "unreadable row");
                continue;
            }
        };
        let field = |aliases: &[&str]| -> Option<String> {
            aliases.iter().find_map(|alias| {
                headers
                    .get(*alias)
                    .and_then(|index| record.get(*index))
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
        };

        let Some(product) = field(CSV_PRODUCT) else { continue };
        let Some(wholesale) = field(CSV_WHOLESALE).as_deref().and_then(clean_price) else {
            continue;
        };
        let retail = field(CSV_RETAIL).as_deref().and_then(clean_price);

        if let Some(observation) = build_observation(RawRow {
            product: &product,
            wholesale,
            retail,
            date: field(CSV_DATE).as_deref().map_or(reference_date, |raw| {
                parse_date(raw).unwrap_or(reference_date)
            }),
            market: field(CSV_MARKET).unwrap_or_else(|| DEFAULT_MARKET.to_string()),
            variety: field(CSV_VARIETY).unwrap_or_else(|| DEFAULT_VARIETY.to_string()),
            unit: field(CSV_UNIT).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            packaging: field(CSV_PACKAGING).unwrap_or_else(|| DEFAULT_PACKAGING.to_string()),
        }) {
            observations.push(observation);
        }
    }
    Ok(observations)
}

/// Parses a Socrata `rows.json` payload; column positions come from
/// `meta.view.columns[].name`.
pub fn parse_json(payload: &Value, reference_date: NaiveDate) -> Vec<PriceObservation> {
    let columns: HashMap<String, usize> = payload
        .pointer("/meta/view/columns")
        .and_then(Value::as_array)
        .map(|columns| {
            columns
                .iter()
                .enumerate()
                .filter_map(|(index, column)| {
                    column.get("name").and_then(Value::as_str).map(|name| (name.to_lowercase(), index))
                })
                .collect()
        })
        .unwrap_or_default();

    let Some(rows) = payload.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(Value::as_array)
        .filter_map(|row| {
            let cell = |aliases: &[&str]| -> Option<String> {
                let index = aliases.iter().find_map(|alias| columns.get(*alias))?;
                row.get(*index).and_then(cell_text)
            };

            let product = cell(JSON_PRODUCT)?;
            let wholesale = cell(JSON_PRICE).as_deref().and_then(clean_price)?;
            let date = cell(JSON_DATE)
                .and_then(|raw| raw.get(..10).and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()))
                .unwrap_or(reference_date);

            build_observation(RawRow {
                product: &product,
                wholesale,
                retail: None,
                date,
                market: DEFAULT_MARKET.to_string(),
                variety: DEFAULT_VARIETY.to_string(),
                unit: DEFAULT_UNIT.to_string(),
                packaging: DEFAULT_PACKAGING.to_string(),
            })
        })
        .collect()
}

struct RawRow<'a> {
    product: &'a str,
    wholesale: f64,
    retail: Option<f64>,
    date: NaiveDate,
    market: String,
    variety: String,
    unit: String,
    packaging: String,
}

fn build_observation(row: RawRow<'_>) -> Option<PriceObservation> {
    let crop = CropId::new(row.product);
    if crop.as_str().is_empty() || !is_relevant(&crop) {
        return None;
    }

    let wholesale_price = row.wholesale as i64;
    if wholesale_price <= 0 {
        return None;
    }
    let retail_price = match row.retail {
        Some(retail) if retail > 0.0 => retail as i64,
        _ => retail_from_wholesale(wholesale_price, RETAIL_MARKUP),
    };

    Some(PriceObservation {
        crop,
        date: row.date,
        market: row.market,
        variety: row.variety,
        wholesale_price,
        retail_price,
        unit: row.unit,
        packaging: row.packaging,
    })
}

fn is_relevant(crop: &CropId) -> bool {
    RELEVANT_KEYWORDS.iter().any(|keyword| crop.as_str().contains(keyword))
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()).filter(|text| !text.is_empty()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Keeps digits and the decimal point; thousands separators are dropped.
fn clean_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let candidates = [Some(raw), raw.get(..10)];
    candidates.into_iter().flatten().find_map(|candidate| {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
    })
}
