//! Developer representation: type-annotated text for error messages and
//! debugging. Deterministic, but not parseable and not stable across
//! versions.

use dark_value::{DHttpResponse, Dval};

use crate::format;

pub fn to_developer_repr(dv: &Dval) -> String {
    repr(0, dv)
}

fn repr(indent: usize, dv: &Dval) -> String {
    let nl = format!("\n{}", " ".repeat(indent));
    let inl = format!("\n{}", " ".repeat(indent + 2));
    let indent = indent + 2;
    let wrap = |text: &str| format!("<{}: {text}>", dv.type_name());

    match dv {
        Dval::Password(_) => "<Password>".to_string(),
        Dval::Str(s) => format!("\"{}\"", s.as_str()),
        Dval::Char(c) => format!("'{}'", c.as_str()),
        Dval::Int(n) => n.to_string(),
        Dval::Bool(b) => b.to_string(),
        Dval::Float(f) => format::float(*f),
        Dval::Null => "null".to_string(),
        Dval::FnVal(_) | Dval::Incomplete(_) => format!("<{}>", dv.type_name()),
        Dval::Error(_, msg) => wrap(msg),
        Dval::Date(date) => wrap(&format::iso_date(date)),
        Dval::DB(name) => wrap(name),
        Dval::Uuid(uuid) => wrap(&uuid.to_string()),
        Dval::HttpResponse(resp) => match &**resp {
            DHttpResponse::Redirect(url) => format!("302 {url}{nl}{}", repr(indent, &Dval::Null)),
            DHttpResponse::Response {
                code,
                headers,
                body,
            } => format!(
                "{code} {}{nl}{}",
                format::headers(headers, ","),
                repr(indent, body)
            ),
        },
        Dval::List(items) if items.is_empty() => "[]".to_string(),
        Dval::List(items) => {
            let elems: Vec<String> = items.iter().map(|item| repr(indent, item)).collect();
            format!("[ {inl}{}{nl}]", elems.join(", "))
        }
        Dval::Obj(map) if map.is_empty() => "{}".to_string(),
        Dval::Obj(map) => {
            let rows: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}: {}", repr(indent, v)))
                .collect();
            format!("{{ {inl}{}{nl}}}", rows.join(&format!(",{inl}")))
        }
        Dval::OptionNothing => "Nothing".to_string(),
        Dval::OptionJust(inner) => format!("Just {}", repr(indent, inner)),
        Dval::ResultOk(inner) => format!("Ok {}", repr(indent, inner)),
        Dval::ResultError(inner) => format!("Error {}", repr(indent, inner)),
        Dval::ErrorRail(inner) => format!("ErrorRail: {}", repr(indent, inner)),
        Dval::Bytes(bytes) => format::base64(bytes),
    }
}
