//! The `Dval` tagged union and its helpers.
//!
//! # Construction
//!
//! Heap-backed variants go through factory methods so the invariants hold
//! everywhere:
//!
//! ```text
//! let s = Dval::str("café");            // NFC-normalized
//! let c = Dval::char("é")?;             // exactly one grapheme
//! let l = Dval::list(vec![a, b]);       // an ErrorRail element wins
//! ```
//!
//! # Fake values
//!
//! `Incomplete`, `Error` and `ErrorRail` carry control flow rather than data.
//! Equality is structural, so `ErrorRail(x) != x`; use
//! [`Dval::unwrap_from_error_rail`] to strip the wrapper explicitly.

use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use dark_ir::{DType, Expr, FQFnName, Id, RecordField, Tlid};
use num_bigint::BigInt;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Heap, Password, ValueError};

/// Variable bindings in scope. Persistent, so extending it never copies.
pub type Symtable = im::OrdMap<String, Dval>;

/// Record/dictionary payload.
pub type DvalMap = im::OrdMap<String, Dval>;

/// Where a fake value came from, for editor highlighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DvalSource {
    #[default]
    Unknown,
    Node(Tlid, Id),
}

/// A closure: parameters, the symtable at creation time, and the body.
#[derive(Clone, Debug, PartialEq)]
pub struct LambdaImpl {
    pub parameters: Vec<(Id, String)>,
    pub symtable: Symtable,
    pub body: Arc<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FnValImpl {
    Lambda(Heap<LambdaImpl>),
    FnName(FQFnName),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DHttpResponse {
    Redirect(String),
    Response {
        code: i64,
        headers: Vec<(String, String)>,
        body: Dval,
    },
}

impl DHttpResponse {
    pub fn body(&self) -> Option<&Dval> {
        match self {
            DHttpResponse::Redirect(_) => None,
            DHttpResponse::Response { body, .. } => Some(body),
        }
    }
}

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Dval {
    Int(BigInt),
    Float(f64),
    Bool(bool),
    Null,
    /// A single extended grapheme cluster, NFC-normalized.
    Char(Heap<String>),
    /// NFC-normalized text.
    Str(Heap<String>),
    List(Heap<Vec<Dval>>),
    Obj(DvalMap),
    /// Second-precision UTC timestamp.
    Date(NaiveDateTime),
    Password(Password),
    Uuid(uuid::Uuid),
    Bytes(Heap<Vec<u8>>),
    /// A datastore reference, by name.
    DB(String),
    OptionJust(Heap<Dval>),
    OptionNothing,
    ResultOk(Heap<Dval>),
    ResultError(Heap<Dval>),
    HttpResponse(Heap<DHttpResponse>),
    FnVal(FnValImpl),
    Incomplete(DvalSource),
    Error(DvalSource, Heap<String>),
    ErrorRail(Heap<Dval>),
}

// Factory methods

impl Dval {
    #[inline]
    pub fn int(n: impl Into<BigInt>) -> Self {
        Dval::Int(n.into())
    }

    /// Create a string, normalizing to NFC.
    pub fn str(s: &str) -> Self {
        Dval::Str(Heap::new(s.nfc().collect()))
    }

    /// Create a character. Fails unless `s` is exactly one grapheme cluster.
    pub fn char(s: &str) -> Result<Self, ValueError> {
        let normalized: String = s.nfc().collect();
        let count = normalized.graphemes(true).count();
        if count == 1 {
            Ok(Dval::Char(Heap::new(normalized)))
        } else {
            Err(ValueError::InvalidCharacter {
                text: s.to_string(),
                count,
            })
        }
    }

    /// Create a list. If any element is on the error rail, that element is
    /// returned instead.
    pub fn list(items: Vec<Dval>) -> Self {
        match items.iter().find(|dv| dv.is_error_rail()) {
            Some(rail) => rail.clone(),
            None => Dval::List(Heap::new(items)),
        }
    }

    /// Create a list without the error-rail check.
    ///
    /// Only for decoding stored data and building test fixtures; evaluation
    /// always goes through [`Dval::list`].
    pub fn list_unchecked(items: Vec<Dval>) -> Self {
        Dval::List(Heap::new(items))
    }

    /// Create a record. The first fake field value is returned instead.
    /// Later duplicates of a key overwrite earlier ones.
    pub fn obj(fields: Vec<(String, Dval)>) -> Self {
        if let Some((_, fake)) = fields.iter().find(|(_, dv)| dv.is_fake()) {
            return fake.clone();
        }
        Dval::Obj(fields.into_iter().collect())
    }

    /// Truncates to whole seconds.
    pub fn date(dt: NaiveDateTime) -> Self {
        Dval::Date(dt.with_nanosecond(0).unwrap_or(dt))
    }

    pub fn password(bytes: Vec<u8>) -> Self {
        Dval::Password(Password::new(bytes))
    }

    pub fn bytes(bytes: Vec<u8>) -> Self {
        Dval::Bytes(Heap::new(bytes))
    }

    #[inline]
    pub fn just(dv: Dval) -> Self {
        Dval::OptionJust(Heap::new(dv))
    }

    #[inline]
    pub fn ok(dv: Dval) -> Self {
        Dval::ResultOk(Heap::new(dv))
    }

    #[inline]
    pub fn result_error(dv: Dval) -> Self {
        Dval::ResultError(Heap::new(dv))
    }

    #[inline]
    pub fn error_rail(dv: Dval) -> Self {
        Dval::ErrorRail(Heap::new(dv))
    }

    pub fn option(dv: Option<Dval>) -> Self {
        match dv {
            Some(dv) => Dval::just(dv),
            None => Dval::OptionNothing,
        }
    }

    pub fn error(source: DvalSource, msg: impl Into<String>) -> Self {
        Dval::Error(source, Heap::new(msg.into()))
    }

    pub fn redirect(url: &str) -> Self {
        Dval::HttpResponse(Heap::new(DHttpResponse::Redirect(url.to_string())))
    }

    pub fn response(code: i64, headers: Vec<(String, String)>, body: Dval) -> Self {
        Dval::HttpResponse(Heap::new(DHttpResponse::Response {
            code,
            headers,
            body,
        }))
    }

    pub fn fn_name(name: FQFnName) -> Self {
        Dval::FnVal(FnValImpl::FnName(name))
    }

    pub fn lambda(parameters: Vec<(Id, String)>, symtable: Symtable, body: Arc<Expr>) -> Self {
        Dval::FnVal(FnValImpl::Lambda(Heap::new(LambdaImpl {
            parameters,
            symtable,
            body,
        })))
    }
}

// Predicates and accessors

impl Dval {
    /// `Incomplete`, `Error` or `ErrorRail`.
    pub fn is_fake(&self) -> bool {
        matches!(
            self,
            Dval::Incomplete(_) | Dval::Error(..) | Dval::ErrorRail(_)
        )
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Dval::Incomplete(_))
    }

    pub fn is_error_rail(&self) -> bool {
        matches!(self, Dval::ErrorRail(_))
    }

    /// The `Error` variant specifically.
    pub fn is_dval_error(&self) -> bool {
        matches!(self, Dval::Error(..))
    }

    /// Strip one `ErrorRail` wrapper, if present.
    pub fn unwrap_from_error_rail(self) -> Dval {
        match self {
            Dval::ErrorRail(inner) => inner.into_inner(),
            other => other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dval::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Dval]> {
        match self {
            Dval::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<&DvalMap> {
        match self {
            Dval::Obj(map) => Some(map),
            _ => None,
        }
    }

    /// The declared type this value inhabits.
    ///
    /// Lists take the type of their first element. Empty containers and
    /// unknown halves of `Option`/`Result` use the type variable `'a`.
    pub fn type_of(&self) -> DType {
        match self {
            Dval::Int(_) => DType::TInt,
            Dval::Float(_) => DType::TFloat,
            Dval::Bool(_) => DType::TBool,
            Dval::Null => DType::TNull,
            Dval::Char(_) => DType::TChar,
            Dval::Str(_) => DType::TStr,
            Dval::List(items) => DType::list(items.first().map_or_else(DType::any, Dval::type_of)),
            Dval::Obj(map) => DType::TRecord(
                map.iter()
                    .map(|(k, v)| RecordField::new(k, v.type_of()))
                    .collect(),
            ),
            Dval::FnVal(_) => DType::TFn(vec![], Box::new(DType::any())),
            Dval::Error(..) => DType::TError,
            Dval::Incomplete(_) => DType::TIncomplete,
            Dval::ErrorRail(_) => DType::TErrorRail,
            Dval::HttpResponse(resp) => DType::THttpResponse(Box::new(
                resp.body().map_or(DType::TNull, Dval::type_of),
            )),
            Dval::DB(_) => DType::TDB(Box::new(DType::any())),
            Dval::Date(_) => DType::TDate,
            Dval::Password(_) => DType::TPassword,
            Dval::Uuid(_) => DType::TUuid,
            Dval::OptionNothing => DType::option(DType::any()),
            Dval::OptionJust(dv) => DType::option(dv.type_of()),
            Dval::ResultOk(dv) => DType::result(dv.type_of(), DType::any()),
            Dval::ResultError(dv) => DType::result(DType::any(), dv.type_of()),
            Dval::Bytes(_) => DType::TBytes,
        }
    }

    /// Shorthand for `self.type_of().type_name()`.
    pub fn type_name(&self) -> String {
        self.type_of().type_name()
    }
}
