use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ApiError, Error, Result};
use crate::model::{IntensityFactors, IntensityIndex, Intensity, NOT_AVAILABLE, Statistics};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, deserialize_with = "text")]
    code: String,
    #[serde(default, deserialize_with = "text")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct IntensityEntry {
    from: String,
    to: String,
    intensity: IntensityFigures,
}

#[derive(Debug, Deserialize)]
struct IntensityFigures {
    #[serde(default = "not_available", deserialize_with = "nullable_int")]
    forecast: i32,
    #[serde(default = "not_available", deserialize_with = "nullable_int")]
    actual: i32,
    index: IntensityIndex,
}

#[derive(Debug, Deserialize)]
struct StatisticsEntry {
    from: String,
    to: String,
    intensity: StatisticsFigures,
}

#[derive(Debug, Deserialize)]
struct StatisticsFigures {
    #[serde(default = "not_available", deserialize_with = "nullable_int")]
    max: i32,
    #[serde(default = "not_available", deserialize_with = "nullable_int")]
    average: i32,
    #[serde(default = "not_available", deserialize_with = "nullable_int")]
    min: i32,
    index: IntensityIndex,
}

#[derive(Debug, Deserialize)]
struct FactorsEntry {
    #[serde(rename = "Biomass", deserialize_with = "int")]
    biomass: i32,
    #[serde(rename = "Coal", deserialize_with = "int")]
    coal: i32,
    #[serde(rename = "Dutch Imports", deserialize_with = "int")]
    dutch_imports: i32,
    #[serde(rename = "French Imports", deserialize_with = "int")]
    french_imports: i32,
    #[serde(rename = "Irish Imports", deserialize_with = "int")]
    irish_imports: i32,
    #[serde(rename = "Gas (Combined Cycle)", deserialize_with = "int")]
    gas_combined_cycle: i32,
    #[serde(rename = "Gas (Open Cycle)", deserialize_with = "int")]
    gas_open_cycle: i32,
    #[serde(rename = "Hydro", deserialize_with = "int")]
    hydro: i32,
    #[serde(rename = "Nuclear", deserialize_with = "int")]
    nuclear: i32,
    #[serde(rename = "Oil", deserialize_with = "int")]
    oil: i32,
    #[serde(rename = "Other", deserialize_with = "int")]
    other: i32,
    #[serde(rename = "Pumped Storage", deserialize_with = "int")]
    pumped_storage: i32,
    #[serde(rename = "Solar", deserialize_with = "int")]
    solar: i32,
    #[serde(rename = "Wind", deserialize_with = "int")]
    wind: i32,
}

fn not_available() -> i32 {
    NOT_AVAILABLE
}

// The API sends whole numbers, but floats are truncated rather than rejected.
fn int<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<i32, D::Error> {
    f64::deserialize(d).map(|v| v as i32)
}

fn nullable_int<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<i32, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.map_or(NOT_AVAILABLE, |v| v as i32))
}

fn text<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Parses the API's minute-precision timestamps (`2018-01-20T12:00Z`,
/// or with a `+01:00` style offset).
pub(crate) fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    if let Some(naive) = s.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M")?;
        return Ok(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z").map(|t| t.with_timezone(&Utc))
}

/// Extracts the success payload, or the failure the body describes.
fn data(body: &str) -> Result<Value> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| Error::malformed(e, body))?;

    match (envelope.data, envelope.error) {
        (Some(data), _) => Ok(data),
        (None, Some(err)) => Err(Error::Api(ApiError {
            code: err.code,
            message: err.message,
        })),
        (None, None) => Err(Error::malformed("neither `data` nor `error` present", body)),
    }
}

/// Decodes `data` as a list of `T`; a lone object counts as a list of one.
fn entries<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let data = data(body)?;
    let decoded = match data {
        Value::Array(_) => serde_json::from_value::<Vec<T>>(data),
        other => serde_json::from_value::<T>(other).map(|v| vec![v]),
    };
    decoded.map_err(|e| Error::malformed(e, body))
}

/// Returns the API error carried by `body`, if it is an error envelope.
pub(crate) fn api_error(body: &str) -> Option<ApiError> {
    match data(body) {
        Err(Error::Api(err)) => Some(err),
        _ => None,
    }
}

pub(crate) fn decode_intensities(body: &str) -> Result<Vec<Intensity>> {
    entries::<IntensityEntry>(body)?
        .into_iter()
        .map(|e| {
            let (from, to) = period(&e.from, &e.to, body)?;
            Ok(Intensity {
                from,
                to,
                forecast: e.intensity.forecast,
                actual: e.intensity.actual,
                index: e.intensity.index,
            })
        })
        .collect()
}

pub(crate) fn decode_statistics(body: &str) -> Result<Vec<Statistics>> {
    entries::<StatisticsEntry>(body)?
        .into_iter()
        .map(|e| {
            let (from, to) = period(&e.from, &e.to, body)?;
            Ok(Statistics {
                from,
                to,
                max: e.intensity.max,
                average: e.intensity.average,
                min: e.intensity.min,
                index: e.intensity.index,
            })
        })
        .collect()
}

pub(crate) fn decode_factors(body: &str) -> Result<IntensityFactors> {
    let f = single(entries::<FactorsEntry>(body)?, body)?;
    Ok(IntensityFactors {
        biomass: f.biomass,
        coal: f.coal,
        dutch_imports: f.dutch_imports,
        french_imports: f.french_imports,
        irish_imports: f.irish_imports,
        gas_combined_cycle: f.gas_combined_cycle,
        gas_open_cycle: f.gas_open_cycle,
        hydro: f.hydro,
        nuclear: f.nuclear,
        oil: f.oil,
        other: f.other,
        pumped_storage: f.pumped_storage,
        solar: f.solar,
        wind: f.wind,
    })
}

/// Unwraps the only entry of a response that must hold exactly one.
pub(crate) fn single<T>(mut entries: Vec<T>, body: &str) -> Result<T> {
    if entries.len() != 1 {
        return Err(Error::UnexpectedEntryCount {
            expected: 1,
            found: entries.len(),
            body: body.to_string(),
        });
    }
    entries.pop().ok_or_else(|| Error::malformed("empty data", body))
}

fn period(from: &str, to: &str, body: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let from = parse_timestamp(from)
        .map_err(|e| Error::malformed(format!("invalid `from` timestamp {from:?}: {e}"), body))?;
    let to = parse_timestamp(to)
        .map_err(|e| Error::malformed(format!("invalid `to` timestamp {to:?}: {e}"), body))?;
    Ok((from, to))
}
