//! Pretty machine JSON, version 1, for structured API responses.
//!
//! Wrappers are unwrapped rather than enveloped, so this is not reversible.
//! Passwords are always redacted.

use dark_value::{DHttpResponse, Dval, DvalMap};
use serde_json::{json, Map, Value};

use crate::format::{self, JsonNumber};
use crate::ReprError;

pub fn to_pretty_machine_json_v1(dv: &Dval) -> String {
    let value = to_value(dv);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn to_value(dv: &Dval) -> Value {
    match dv {
        Dval::Int(n) => format::int_to_json(n),
        Dval::Float(f) => format::float_to_json(*f).unwrap_or(Value::Null),
        Dval::Bool(b) => Value::Bool(*b),
        Dval::Null | Dval::FnVal(_) | Dval::Incomplete(_) | Dval::OptionNothing => Value::Null,
        Dval::Str(s) | Dval::Char(s) => Value::String(s.to_string()),
        Dval::List(items) => Value::Array(items.iter().map(to_value).collect()),
        Dval::Obj(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), to_value(v))).collect()),
        Dval::Error(_, msg) => json!({ "Error": msg.as_str() }),
        Dval::HttpResponse(resp) => match &**resp {
            DHttpResponse::Redirect(_) => Value::Null,
            DHttpResponse::Response { body, .. } => to_value(body),
        },
        Dval::DB(name) => Value::String(name.clone()),
        Dval::Date(date) => Value::String(format::iso_date(date)),
        Dval::Password(_) => json!({ "Error": "Password is redacted" }),
        Dval::Uuid(uuid) => Value::String(uuid.to_string()),
        Dval::OptionJust(inner) | Dval::ErrorRail(inner) | Dval::ResultOk(inner) => to_value(inner),
        Dval::ResultError(inner) => json!({ "Error": to_value(inner) }),
        Dval::Bytes(bytes) => Value::String(format::base64(bytes)),
    }
}

/// Read arbitrary JSON as plain values: objects become records, no
/// envelopes are recognised.
pub fn of_unknown_json_v1(json: &str) -> Result<Dval, ReprError> {
    let value: Value = serde_json::from_str(json)?;
    of_value(&value)
}

fn of_value(value: &Value) -> Result<Dval, ReprError> {
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
            .map(of_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Dval::list),
        Value::Object(fields) => of_object(fields),
    }
}

fn of_object(fields: &Map<String, Value>) -> Result<Dval, ReprError> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), of_value(v)?)))
        .collect::<Result<DvalMap, ReprError>>()
        .map(Dval::Obj)
}
