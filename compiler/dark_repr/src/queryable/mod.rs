//! Internal queryable representation, version 1.
//!
//! Used for values stored in an indexed store. The top level is always a
//! record, and only dates, passwords and uuids are wrapped in envelopes so
//! that everything else can be queried as plain JSON.

use dark_value::{Dval, DvalMap};
use serde_json::{json, Map, Value};

use crate::format::{self, JsonNumber};
use crate::ReprError;

const ENVELOPE_TAGS: [&str; 3] = ["date", "password", "uuid"];

/// Whether `dv` can be stored with [`to_json_v1`] (when nested in a record).
pub fn is_queryable(dv: &Dval) -> bool {
    match dv {
        Dval::Int(_)
        | Dval::Bool(_)
        | Dval::Null
        | Dval::Str(_)
        | Dval::Password(_)
        | Dval::Date(_)
        | Dval::Uuid(_) => true,
        Dval::Float(f) => f.is_finite(),
        Dval::List(items) => items.iter().all(is_queryable),
        Dval::Obj(map) => !looks_like_envelope(map) && map.values().all(is_queryable),
        Dval::Char(_)
        | Dval::Bytes(_)
        | Dval::HttpResponse(_)
        | Dval::OptionJust(_)
        | Dval::OptionNothing
        | Dval::ResultOk(_)
        | Dval::ResultError(_)
        | Dval::DB(_)
        | Dval::FnVal(_)
        | Dval::Error(..)
        | Dval::Incomplete(_)
        | Dval::ErrorRail(_) => false,
    }
}

fn looks_like_envelope(map: &DvalMap) -> bool {
    map.len() == 2
        && map.contains_key("value")
        && matches!(map.get("type"), Some(Dval::Str(tag)) if ENVELOPE_TAGS.contains(&tag.as_str()))
}

/// Encode a record for storage.
pub fn to_json_v1(dv: &Dval) -> Result<String, ReprError> {
    match dv {
        Dval::Obj(map) => Ok(encode_map(map)?.to_string()),
        other => Err(ReprError::TopLevelNotObject(other.type_name())),
    }
}

fn encode_map(map: &DvalMap) -> Result<Value, ReprError> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), encode(v)?)))
        .collect::<Result<Map<_, _>, ReprError>>()
        .map(Value::Object)
}

fn encode(dv: &Dval) -> Result<Value, ReprError> {
    let unsupported = || ReprError::UnsupportedValue(dv.type_name());
    match dv {
        Dval::Int(n) => Ok(format::int_to_json(n)),
        Dval::Float(f) => format::float_to_json(*f).ok_or_else(unsupported),
        Dval::Bool(b) => Ok(Value::Bool(*b)),
        Dval::Null => Ok(Value::Null),
        Dval::Str(s) => Ok(Value::String(s.to_string())),
        Dval::List(items) => items
            .iter()
            .map(encode)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Dval::Obj(map) => encode_map(map),
        Dval::Date(date) => Ok(json!({ "type": "date", "value": format::iso_date(date) })),
        Dval::Password(pw) => Ok(json!({ "type": "password", "value": format::base64(pw.expose()) })),
        Dval::Uuid(uuid) => Ok(json!({ "type": "uuid", "value": uuid.to_string() })),
        _ => Err(unsupported()),
    }
}

/// Decode a stored record.
pub fn of_json_v1(json: &str) -> Result<Dval, ReprError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(fields) => decode_map(&fields),
        other => Err(ReprError::TopLevelNotObject(json_kind(&other).to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_map(fields: &Map<String, Value>) -> Result<Dval, ReprError> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode(v)?)))
        .collect::<Result<DvalMap, ReprError>>()
        .map(Dval::Obj)
}

fn decode(value: &Value) -> Result<Dval, ReprError> {
    match value {
        Value::Null => Ok(Dval::Null),
        Value::Bool(b) => Ok(Dval::Bool(*b)),
        Value::Number(n) => match format::classify_number(n) {
            Some(JsonNumber::Int(i)) => Ok(Dval::Int(i)),
            Some(JsonNumber::Float(f)) => Ok(Dval::Float(f)),
            None => Err(ReprError::UnsupportedValue(format!("number {n}"))),
        },
        Value::String(s) => Ok(Dval::str(s)),
        Value::Array(items) => items
            .iter()
            .map(decode)
            .collect::<Result<Vec<_>, _>>()
            .map(Dval::list),
        Value::Object(fields) => match (fields.len(), fields.get("type"), fields.get("value")) {
            (2, Some(Value::String(tag)), Some(Value::String(v))) if ENVELOPE_TAGS.contains(&tag.as_str()) => {
                decode_envelope(tag, v)
            }
            _ => decode_map(fields),
        },
    }
}

fn decode_envelope(tag: &str, value: &str) -> Result<Dval, ReprError> {
    match tag {
        "date" => format::parse_iso_date(value)
            .map(Dval::date)
            .ok_or_else(|| ReprError::invalid_envelope(tag, "invalid date")),
        "password" => format::decode_base64(value)
            .map(Dval::password)
            .map_err(|e| ReprError::invalid_envelope(tag, e.to_string())),
        "uuid" => uuid::Uuid::parse_str(value)
            .map(Dval::Uuid)
            .map_err(|e| ReprError::invalid_envelope(tag, e.to_string())),
        other => Err(ReprError::UnknownEnvelope(other.to_string())),
    }
}
