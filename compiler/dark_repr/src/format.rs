//! Text fragments shared by several representations.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{NaiveDateTime, Timelike};
use num_bigint::BigInt;
use serde_json::{Number, Value};

pub(crate) const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// `2020-01-02T03:04:05Z`
pub(crate) fn iso_date(date: &NaiveDateTime) -> String {
    date.format(ISO_FORMAT).to_string()
}

pub(crate) fn parse_iso_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, ISO_FORMAT)
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .map(|dt| dt.with_nanosecond(0).unwrap_or(dt))
}

/// Floats always show a decimal point or exponent, so they never read back
/// as integers. Non-finite values use `NaN`, `Infinity` and `-Infinity`.
pub(crate) fn float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{f:?}")
    }
}

pub(crate) fn base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn decode_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(s)
}

/// `{ k: v,k2: v2 }` with the given separator between headers.
pub(crate) fn headers(headers: &[(String, String)], sep: &str) -> String {
    let joined = headers
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join(sep);
    format!("{{ {joined} }}")
}

/// An integer as a JSON number, without losing precision.
pub(crate) fn int_to_json(n: &BigInt) -> Value {
    let text = n.to_string();
    match text.parse::<Number>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::String(text),
    }
}

/// A finite float as a JSON number. Non-finite floats have no JSON number.
pub(crate) fn float_to_json(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}

pub(crate) enum JsonNumber {
    Int(BigInt),
    Float(f64),
}

/// Integers are numbers written without a fraction or exponent.
pub(crate) fn classify_number(n: &Number) -> Option<JsonNumber> {
    let text = n.to_string();
    if text.contains(['.', 'e', 'E']) {
        text.parse().ok().map(JsonNumber::Float)
    } else {
        text.parse().ok().map(JsonNumber::Int)
    }
}
