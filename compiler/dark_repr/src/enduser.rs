//! End-user readable text, shown to the people using a Dark program.

use dark_value::{DHttpResponse, Dval};

use crate::{format, pretty_json};

pub fn to_enduser_readable_text(dv: &Dval) -> String {
    reprfn(dv)
}

/// Strings, characters and uuids are quoted when nested in a container.
fn nested(dv: &Dval) -> String {
    match dv {
        Dval::Str(_) | Dval::Uuid(_) | Dval::Char(_) => format!("\"{}\"", reprfn(dv)),
        _ => reprfn(dv),
    }
}

fn reprfn(dv: &Dval) -> String {
    match dv {
        Dval::Int(n) => n.to_string(),
        Dval::Bool(b) => b.to_string(),
        Dval::Str(s) => s.to_string(),
        Dval::Char(c) => c.to_string(),
        Dval::Float(f) => format::float(*f),
        Dval::Null => "null".to_string(),
        Dval::Date(date) => format::iso_date(date),
        Dval::Uuid(uuid) => uuid.to_string(),
        Dval::DB(name) => format!("<DB: {name}>"),
        Dval::Error(_, msg) => format!("Error: {}", msg.as_str()),
        Dval::Incomplete(_) => "<Incomplete>".to_string(),
        Dval::FnVal(_) => "<Block>".to_string(),
        Dval::Password(_) => "<Password>".to_string(),
        Dval::Obj(_) => pretty_json::to_pretty_machine_json_v1(dv),
        Dval::List(items) if items.is_empty() => "[]".to_string(),
        Dval::List(items) => {
            let elems: Vec<String> = items.iter().map(nested).collect();
            format!("[ {} ]", elems.join(", "))
        }
        Dval::ErrorRail(inner) | Dval::ResultOk(inner) | Dval::OptionJust(inner) => reprfn(inner),
        Dval::HttpResponse(resp) => match &**resp {
            DHttpResponse::Redirect(url) => format!("302 {url}\n{}", nested(&Dval::Null)),
            DHttpResponse::Response {
                code,
                headers,
                body,
            } => format!("{code} {}\n{}", format::headers(headers, ", "), nested(body)),
        },
        Dval::ResultError(inner) => format!("Error: {}", reprfn(inner)),
        Dval::OptionNothing => "Nothing".to_string(),
        Dval::Bytes(bytes) => format::base64(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dark_value::DvalSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn strings_are_quoted_only_when_nested() {
        assert_eq!(to_enduser_readable_text(&Dval::str("hi")), "hi");
        assert_eq!(
            to_enduser_readable_text(&Dval::list(vec![Dval::str("hi"), Dval::int(2)])),
            "[ \"hi\", 2 ]"
        );
    }

    #[test]
    fn wrappers_are_transparent() {
        assert_eq!(to_enduser_readable_text(&Dval::just(Dval::int(1))), "1");
        assert_eq!(to_enduser_readable_text(&Dval::error_rail(Dval::int(1))), "1");
        assert_eq!(
            to_enduser_readable_text(&Dval::result_error(Dval::str("bad"))),
            "Error: bad"
        );
        assert_eq!(to_enduser_readable_text(&Dval::OptionNothing), "Nothing");
        assert_eq!(
            to_enduser_readable_text(&Dval::error(DvalSource::Unknown, "boom")),
            "Error: boom"
        );
    }

    #[test]
    fn http_responses() {
        let dv = Dval::response(
            200,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ],
            Dval::str("body"),
        );
        assert_eq!(to_enduser_readable_text(&dv), "200 { a: 1, b: 2 }\n\"body\"");
    }

    #[test]
    fn records_use_pretty_json() {
        let dv = Dval::obj(vec![("a".to_string(), Dval::Bool(true))]);
        assert_eq!(to_enduser_readable_text(&dv), "{\n  \"a\": true\n}");
    }
}
