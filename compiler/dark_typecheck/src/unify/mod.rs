//! Unification of declared types with runtime values.
//!
//! Unlike inference, nothing is solved here: the value is concrete and the
//! type is declared, so unification is a structural walk that collects every
//! mismatch it finds rather than stopping at the first.

use std::collections::BTreeSet;

use dark_ir::{DType, RecordField, UserType, UserTypeName};
use dark_value::{DHttpResponse, Dval, DvalMap};
use rustc_hash::FxHashMap;

use crate::{TypeError, TypeErrorKind};

/// User-defined record types, by name and version.
pub type UserTypes = FxHashMap<UserTypeName, UserType>;

pub fn user_types(types: impl IntoIterator<Item = UserType>) -> UserTypes {
    types.into_iter().map(|t| (t.name.clone(), t)).collect()
}

/// Check `value` against `expected`.
///
/// Type variables accept anything. Fake values (`Incomplete`, `Error`,
/// `ErrorRail`) are accepted everywhere; they are handled by the caller's
/// propagation rules, not reported as type errors.
pub fn unify(user_types: &UserTypes, expected: &DType, value: &Dval) -> Result<(), Vec<TypeError>> {
    let mut errors = Vec::new();
    unify_into(user_types, expected, value, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn unify_into(user_types: &UserTypes, expected: &DType, value: &Dval, errors: &mut Vec<TypeError>) {
    if value.is_fake() {
        return;
    }
    match (expected, value) {
        (DType::TVariable(_), _)
        | (DType::TInt, Dval::Int(_))
        | (DType::TFloat, Dval::Float(_))
        | (DType::TBool, Dval::Bool(_))
        | (DType::TNull, Dval::Null)
        | (DType::TStr, Dval::Str(_))
        | (DType::TChar, Dval::Char(_))
        | (DType::TDate, Dval::Date(_))
        | (DType::TPassword, Dval::Password(_))
        | (DType::TUuid, Dval::Uuid(_))
        | (DType::TBytes, Dval::Bytes(_))
        | (DType::TDB(_), Dval::DB(_))
        | (DType::TFn(..), Dval::FnVal(_))
        | (DType::TOption(_), Dval::OptionNothing) => {}

        (DType::TList(elem), Dval::List(items)) => {
            for item in items.iter() {
                unify_into(user_types, elem, item, errors);
            }
        }
        (DType::TDict(elem), Dval::Obj(map)) => {
            for (key, v) in map {
                let mut inner = Vec::new();
                unify_into(user_types, elem, v, &mut inner);
                errors.extend(inner.into_iter().map(|e| e.within(key)));
            }
        }
        (DType::TRecord(fields), Dval::Obj(map)) => {
            unify_record(user_types, fields, map, errors);
        }
        (DType::TUserType(name), Dval::Obj(map)) => match user_types.get(name) {
            Some(def) => unify_record(user_types, &def.fields, map, errors),
            None => errors.push(TypeError::new(TypeErrorKind::TypeLookupFailure(name.clone()))),
        },
        (DType::TOption(inner), Dval::OptionJust(v)) => unify_into(user_types, inner, v, errors),
        (DType::TResult(ok, _), Dval::ResultOk(v)) => unify_into(user_types, ok, v, errors),
        (DType::TResult(_, err), Dval::ResultError(v)) => unify_into(user_types, err, v, errors),
        (DType::THttpResponse(body_type), Dval::HttpResponse(resp)) => {
            if let DHttpResponse::Response { body, .. } = &**resp {
                unify_into(user_types, body_type, body, errors);
            }
        }

        _ => errors.push(TypeError::new(TypeErrorKind::TypeUnificationFailure {
            expected: expected.clone(),
            actual: value.type_of(),
        })),
    }
}

/// Field names must match exactly; then each field is checked and its
/// errors are prefixed with the field name.
pub(crate) fn unify_record(
    user_types: &UserTypes,
    fields: &[RecordField],
    map: &DvalMap,
    errors: &mut Vec<TypeError>,
) {
    let expected: BTreeSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    let actual: BTreeSet<&str> = map.keys().map(String::as_str).collect();
    if expected != actual {
        errors.push(TypeError::new(TypeErrorKind::MismatchedRecordFields {
            missing: expected.difference(&actual).map(|s| (*s).to_string()).collect(),
            extra: actual.difference(&expected).map(|s| (*s).to_string()).collect(),
        }));
        return;
    }
    for field in fields {
        if let Some(v) = map.get(&field.name) {
            let mut inner = Vec::new();
            unify_into(user_types, &field.typ, v, &mut inner);
            errors.extend(inner.into_iter().map(|e| e.within(&field.name)));
        }
    }
}
