//! Internal roundtrippable representation.
//!
//! Lossless JSON for values this runtime stores and reads back itself
//! (traces, recorded function results). Scalars that JSON cannot tell apart
//! from strings or objects are wrapped in a tagged envelope:
//!
//! ```text
//! {"type": "date", "value": "2020-01-02T03:04:05Z"}
//! {"type": "option", "value": null}
//! {"type": "result", "constructor": "Ok", "values": [1]}
//! ```
//!
//! The envelope tags and shapes are read by external consumers. Changing
//! them requires a new representation.

use dark_value::{DHttpResponse, Dval, DvalMap, DvalSource};
use serde_json::{json, Map, Value};

use crate::format::{self, JsonNumber};
use crate::ReprError;

const TYPE: &str = "type";
const VALUE: &str = "value";

fn envelope(tag: &str, value: Value) -> Value {
    json!({ TYPE: tag, VALUE: value })
}

/// Encode any value. Encoding never fails; whether the value reads back
/// unchanged is what [`is_roundtrippable`] decides.
pub fn to_json(dv: &Dval) -> String {
    to_json_value(dv).to_string()
}

pub(crate) fn to_json_value(dv: &Dval) -> Value {
    match dv {
        Dval::Int(n) => format::int_to_json(n),
        Dval::Float(f) => match format::float_to_json(*f) {
            Some(number) => number,
            None => envelope("float", Value::String(format::float(*f))),
        },
        Dval::Bool(b) => Value::Bool(*b),
        Dval::Null => Value::Null,
        Dval::Str(s) => Value::String(s.to_string()),
        Dval::List(items) => Value::Array(items.iter().map(to_json_value).collect()),
        Dval::Obj(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_json_value(v)))
                .collect(),
        ),
        Dval::Char(c) => envelope("character", Value::String(c.to_string())),
        Dval::FnVal(_) => envelope("block", Value::Null),
        Dval::Incomplete(_) => envelope("incomplete", Value::Null),
        Dval::Error(_, msg) => envelope("error", Value::String(msg.to_string())),
        Dval::HttpResponse(resp) => match &**resp {
            DHttpResponse::Redirect(url) => envelope("redirect", Value::String(url.clone())),
            DHttpResponse::Response {
                code,
                headers,
                body,
            } => {
                let headers: Vec<Value> = headers.iter().map(|(k, v)| json!([k, v])).collect();
                envelope(
                    "response",
                    json!([{ "code": code, "headers": headers }, to_json_value(body)]),
                )
            }
        },
        Dval::DB(name) => envelope("datastore", Value::String(name.clone())),
        Dval::Date(date) => envelope("date", Value::String(format::iso_date(date))),
        Dval::Password(pw) => envelope("password", Value::String(format::base64(pw.expose()))),
        Dval::Uuid(uuid) => envelope("uuid", Value::String(uuid.to_string())),
        Dval::OptionNothing => envelope("option", Value::Null),
        Dval::OptionJust(inner) => envelope("option", to_json_value(inner)),
        Dval::ErrorRail(inner) => envelope("errorrail", to_json_value(inner)),
        Dval::ResultOk(inner) => result_envelope("Ok", inner),
        Dval::ResultError(inner) => result_envelope("Error", inner),
        Dval::Bytes(bytes) => envelope("bytes", Value::String(format::base64(bytes))),
    }
}

fn result_envelope(constructor: &str, inner: &Dval) -> Value {
    json!({
        "constructor": constructor,
        TYPE: "result",
        "values": [to_json_value(inner)],
    })
}

/// Decode a value written by [`to_json`].
pub fn of_json(json: &str) -> Result<Dval, ReprError> {
    let value: Value = serde_json::from_str(json)?;
    of_json_value(&value)
}

pub(crate) fn of_json_value(value: &Value) -> Result<Dval, ReprError> {
    match value {
        Value::Null => Ok(Dval::Null),
        Value::Bool(b) => Ok(Dval::Bool(*b)),
        Value::Number(n) => match format::classify_number(n) {
            Some(JsonNumber::Int(i)) => Ok(Dval::Int(i)),
            Some(JsonNumber::Float(f)) => Ok(Dval::Float(f)),
            None => Err(ReprError::UnsupportedValue(format!("number {n}"))),
        },
        Value::String(s) => Ok(Dval::str(s)),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(of_json_value)
                .collect::<Result<Vec<_>, _>>()?;
            // Goes through the error-rail check, so a stored list holding an
            // ErrorRail reads back as that ErrorRail.
            Ok(Dval::list(items))
        }
        Value::Object(fields) => match envelope_tag(fields) {
            Some(tag) => decode_envelope(tag, fields),
            None => fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), of_json_value(v)?)))
                .collect::<Result<DvalMap, ReprError>>()
                .map(Dval::Obj),
        },
    }
}

/// The tag of an object shaped like an envelope: exactly `type` and `value`
/// with a string `type`, or the three keys of a result envelope.
fn envelope_tag(fields: &Map<String, Value>) -> Option<&str> {
    let tag = fields.get(TYPE)?.as_str()?;
    let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    keys.sort_unstable();
    match keys.as_slice() {
        [TYPE, VALUE] => Some(tag),
        ["constructor", TYPE, "values"] if tag == "result" => Some(tag),
        _ => None,
    }
}

fn decode_envelope(tag: &str, fields: &Map<String, Value>) -> Result<Dval, ReprError> {
    let value = fields.get(VALUE).unwrap_or(&Value::Null);
    let string = || {
        value
            .as_str()
            .ok_or_else(|| ReprError::invalid_envelope(tag, "expected a string value"))
    };
    match tag {
        "character" => Ok(Dval::char(string()?)?),
        "block" => Err(ReprError::invalid_envelope(
            tag,
            "functions cannot be deserialized",
        )),
        "incomplete" => Ok(Dval::Incomplete(DvalSource::Unknown)),
        "error" => Ok(Dval::error(DvalSource::Unknown, string()?)),
        "redirect" => Ok(Dval::redirect(string()?)),
        "response" => decode_response(value),
        "datastore" => Ok(Dval::DB(string()?.to_string())),
        "date" => format::parse_iso_date(string()?)
            .map(Dval::date)
            .ok_or_else(|| ReprError::invalid_envelope(tag, "invalid date")),
        "password" => format::decode_base64(string()?)
            .map(Dval::password)
            .map_err(|e| ReprError::invalid_envelope(tag, e.to_string())),
        "uuid" => uuid::Uuid::parse_str(string()?)
            .map(Dval::Uuid)
            .map_err(|e| ReprError::invalid_envelope(tag, e.to_string())),
        // `Just null` is stored the same way as `Nothing`.
        "option" if value.is_null() => Ok(Dval::OptionNothing),
        "option" => Ok(Dval::just(of_json_value(value)?)),
        "errorrail" => Ok(Dval::error_rail(of_json_value(value)?)),
        "result" => decode_result(fields),
        "bytes" => format::decode_base64(string()?)
            .map(Dval::bytes)
            .map_err(|e| ReprError::invalid_envelope(tag, e.to_string())),
        "float" => match string()? {
            "NaN" => Ok(Dval::Float(f64::NAN)),
            "Infinity" => Ok(Dval::Float(f64::INFINITY)),
            "-Infinity" => Ok(Dval::Float(f64::NEG_INFINITY)),
            other => Err(ReprError::invalid_envelope(
                tag,
                format!("unknown float `{other}`"),
            )),
        },
        other => Err(ReprError::UnknownEnvelope(other.to_string())),
    }
}

fn decode_result(fields: &Map<String, Value>) -> Result<Dval, ReprError> {
    let inner = match fields.get("values").and_then(Value::as_array).map(Vec::as_slice) {
        Some([inner]) => of_json_value(inner)?,
        _ => {
            return Err(ReprError::invalid_envelope(
                "result",
                "expected exactly one value",
            ))
        }
    };
    match fields.get("constructor").and_then(Value::as_str) {
        Some("Ok") => Ok(Dval::ok(inner)),
        Some("Error") => Ok(Dval::result_error(inner)),
        _ => Err(ReprError::invalid_envelope(
            "result",
            "constructor must be `Ok` or `Error`",
        )),
    }
}

fn decode_response(value: &Value) -> Result<Dval, ReprError> {
    let bad = |reason: &str| ReprError::invalid_envelope("response", reason);
    let Some([meta, body]) = value.as_array().map(Vec::as_slice) else {
        return Err(bad("expected [metadata, body]"));
    };
    let code = meta
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| bad("missing status code"))?;
    let headers = meta
        .get("headers")
        .and_then(Value::as_array)
        .ok_or_else(|| bad("missing headers"))?
        .iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([Value::String(k), Value::String(v)]) => Ok((k.clone(), v.clone())),
            _ => Err(bad("headers must be [name, value] string pairs")),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dval::response(code, headers, of_json_value(body)?))
}

/// Whether `dv` reads back unchanged from [`to_json`].
///
/// Functions never do. Two historical encodings lose information and are
/// only accepted when `allow_known_buggy` is set: fake values inside lists,
/// and `Just null` (stored like `Nothing`).
pub fn is_roundtrippable(dv: &Dval, allow_known_buggy: bool) -> bool {
    let rec = |dv: &Dval| is_roundtrippable(dv, allow_known_buggy);
    match dv {
        Dval::FnVal(_) => false,
        Dval::Float(f) => f.is_finite(),
        Dval::Date(date) => chrono::Timelike::nanosecond(date) == 0,
        Dval::List(items) => items
            .iter()
            .all(|item| (allow_known_buggy || !item.is_fake()) && rec(item)),
        Dval::Obj(map) => {
            let fields: Map<String, Value> =
                map.iter().map(|(k, v)| (k.clone(), envelope_field(v))).collect();
            envelope_tag(&fields).is_none() && map.values().all(rec)
        }
        Dval::OptionJust(inner) => (allow_known_buggy || **inner != Dval::Null) && rec(inner),
        Dval::ResultOk(inner) | Dval::ResultError(inner) | Dval::ErrorRail(inner) => rec(inner),
        Dval::HttpResponse(resp) => resp.body().map_or(true, rec),
        Dval::Int(_)
        | Dval::Bool(_)
        | Dval::Null
        | Dval::Char(_)
        | Dval::Str(_)
        | Dval::Password(_)
        | Dval::Uuid(_)
        | Dval::Bytes(_)
        | Dval::DB(_)
        | Dval::OptionNothing
        | Dval::Incomplete(_)
        | Dval::Error(..) => true,
    }
}

/// Enough of a field's encoding to recognise envelope-shaped records.
fn envelope_field(dv: &Dval) -> Value {
    match dv {
        Dval::Str(s) => Value::String(s.to_string()),
        _ => Value::Null,
    }
}
