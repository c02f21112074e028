//! Entry points used by function dispatch and record validation.

use dark_ir::{DType, RecordField};
use dark_value::Dval;

use crate::unify::{unify, unify_record, UserTypes};
use crate::{TypeError, TypeErrorKind};

/// Check call arguments against declared parameters, pairwise.
///
/// Arity is checked by the caller; extra arguments or parameters are
/// ignored here. Errors are prefixed with the parameter name.
pub fn check_function_call<'a>(
    user_types: &UserTypes,
    params: impl IntoIterator<Item = (&'a str, &'a DType)>,
    args: &[Dval],
) -> Result<(), Vec<TypeError>> {
    let errors: Vec<TypeError> = params
        .into_iter()
        .zip(args)
        .filter_map(|((name, typ), arg)| unify(user_types, typ, arg).err().map(|errs| (name, errs)))
        .flat_map(|(name, errs)| errs.into_iter().map(move |e| e.within(name)))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "argument type check failed");
        Err(errors)
    }
}

pub fn check_function_return_type(
    user_types: &UserTypes,
    return_type: &DType,
    result: &Dval,
) -> Result<(), Vec<TypeError>> {
    unify(user_types, return_type, result)
}

/// Validate a record against a column list: missing columns, extra columns,
/// and per-column type mismatches.
pub fn check_record(
    user_types: &UserTypes,
    columns: &[RecordField],
    record: &Dval,
) -> Result<(), Vec<TypeError>> {
    let Dval::Obj(map) = record else {
        return Err(vec![TypeError::new(TypeErrorKind::TypeUnificationFailure {
            expected: DType::TRecord(columns.to_vec()),
            actual: record.type_of(),
        })]);
    };
    let mut errors = Vec::new();
    unify_record(user_types, columns, map, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
