//! Hashable representation and the call-argument hash.
//!
//! The byte encoding here keys stored function results. For every existing
//! version the bytes produced for an existing variant must never change;
//! new variants may only add new encodings.
//!
//! - v0 concatenates the encoding of each argument, so `["a", "bc"]` and
//!   `["ab", "c"]` can collide when the arguments are raw bytes.
//! - v1 encodes the whole argument list as one list value.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use dark_value::{DHttpResponse, Dval};
use sha2::{Digest, Sha384};

use crate::{format, ReprError};

/// Versions `hash` accepts.
pub const SUPPORTED_HASH_VERSIONS: [u32; 2] = [0, 1];

/// The version new results should be keyed with.
pub const CURRENT_HASH_VERSION: u32 = 1;

/// Encode one value. `old_bytes` writes `Bytes` payloads verbatim, as v0
/// did for top-level arguments; otherwise they are replaced by their digest.
pub fn to_hashable_repr(dv: &Dval, old_bytes: bool) -> Vec<u8> {
    let mut out = Vec::new();
    write_repr(&mut out, 0, old_bytes, dv);
    out
}

fn write_repr(out: &mut Vec<u8>, indent: usize, old_bytes: bool, dv: &Dval) {
    let nl = format!("\n{}", " ".repeat(indent));
    let inl = format!("\n{}", " ".repeat(indent + 2));
    let indent = indent + 2;

    match dv {
        Dval::DB(name) => push(out, &format!("<datastore: {name}>")),
        Dval::Password(_) => push(out, "<password: <password>>"),
        Dval::Str(s) => push(out, &format!("\"{}\"", s.as_str())),
        Dval::Char(c) => push(out, &format!("'{}'", c.as_str())),
        Dval::Int(n) => push(out, &n.to_string()),
        Dval::Bool(b) => push(out, if *b { "true" } else { "false" }),
        Dval::Float(f) => push(out, &format::float(*f)),
        Dval::Null => push(out, "null"),
        Dval::FnVal(_) => push(out, "<block: <block>>"),
        Dval::Incomplete(_) => push(out, "<incomplete: <incomplete>>"),
        Dval::Error(_, msg) => push(out, &format!("<error: {}>", msg.as_str())),
        Dval::Date(date) => push(out, &format!("<date: {}>", format::iso_date(date))),
        Dval::Uuid(uuid) => push(out, &format!("<uuid: {uuid}>")),
        Dval::HttpResponse(resp) => match &**resp {
            DHttpResponse::Redirect(url) => {
                push(out, &format!("302 {url}{nl}"));
                write_repr(out, indent, false, &Dval::Null);
            }
            DHttpResponse::Response {
                code,
                headers,
                body,
            } => {
                push(out, &format!("{code} {}{nl}", format::headers(headers, ",")));
                write_repr(out, indent, false, body);
            }
        },
        Dval::List(items) if items.is_empty() => push(out, "[]"),
        Dval::List(items) => {
            push(out, &format!("[ {inl}"));
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    push(out, ", ");
                }
                write_repr(out, indent, false, item);
            }
            push(out, &format!("{nl}]"));
        }
        Dval::Obj(map) if map.is_empty() => push(out, "{}"),
        Dval::Obj(map) => {
            push(out, &format!("{{ {inl}"));
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    push(out, &format!(",{inl}"));
                }
                push(out, &format!("{k}: "));
                write_repr(out, indent, false, v);
            }
            push(out, &format!("{nl}}}"));
        }
        Dval::OptionNothing => push(out, "Nothing"),
        Dval::OptionJust(inner) => {
            push(out, "Just ");
            write_repr(out, indent, false, inner);
        }
        Dval::ErrorRail(inner) => {
            push(out, "ErrorRail: ");
            write_repr(out, indent, false, inner);
        }
        Dval::ResultOk(inner) => {
            push(out, "ResultOk ");
            write_repr(out, indent, false, inner);
        }
        Dval::ResultError(inner) => {
            push(out, "ResultError ");
            write_repr(out, indent, false, inner);
        }
        Dval::Bytes(bytes) if old_bytes => out.extend_from_slice(bytes),
        Dval::Bytes(bytes) => push(out, &digest(bytes)),
    }
}

fn push(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
}

/// SHA-384, URL-safe base64 without padding.
fn digest(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha384::digest(bytes))
}

/// Hash a list of call arguments under the given version.
pub fn hash(version: u32, args: &[Dval]) -> Result<String, ReprError> {
    let bytes = match version {
        0 => args
            .iter()
            .flat_map(|arg| to_hashable_repr(arg, true))
            .collect::<Vec<u8>>(),
        1 => to_hashable_repr(&Dval::list_unchecked(args.to_vec()), false),
        other => return Err(ReprError::UnsupportedHashVersion(other)),
    };
    tracing::trace!(version, len = bytes.len(), "hashing arguments");
    Ok(digest(&bytes))
}
