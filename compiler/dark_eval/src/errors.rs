//! Error values produced by evaluation.
//!
//! User-visible errors are `Dval::Error` values, not Rust errors: they flow
//! through the program and are shown where they were produced. Every such
//! message is built here so the wording stays consistent.

use dark_ir::FQFnName;
use dark_value::{Dval, DvalSource, ValueError};

pub fn undefined_variable(source: DvalSource, name: &str) -> Dval {
    Dval::error(source, format!("There is no variable named: {name}"))
}

pub fn invalid_character(source: DvalSource, err: &ValueError) -> Dval {
    Dval::error(source, err.to_string())
}

pub fn field_access_on_non_record(source: DvalSource, value: &Dval) -> Dval {
    Dval::error(
        source,
        format!(
            "Attempting to access a field of something that isn't a record or dict, (it's a {}).",
            value.type_name()
        ),
    )
}

pub fn expected_function_value(source: DvalSource, value: &Dval) -> Dval {
    Dval::error(
        source,
        format!(
            "Expected a function value, got something else: {}",
            dark_repr::to_developer_repr(value)
        ),
    )
}

pub fn invalid_constructor(source: DvalSource, name: &str) -> Dval {
    Dval::error(source, format!("Invalid constructor: {name}"))
}

pub fn function_not_found(source: DvalSource, name: &FQFnName) -> Dval {
    Dval::error(source, format!("Function {name} is not found"))
}

pub fn wrong_number_of_args(source: DvalSource, name: &FQFnName, expected: usize, actual: usize) -> Dval {
    Dval::error(
        source,
        format!("{name} has {expected} parameters, but here was called with {actual} arguments."),
    )
}

pub fn lambda_wrong_number_of_args(source: DvalSource, expected: usize, actual: usize) -> Dval {
    Dval::error(
        source,
        format!("Expected {expected} arguments, got {actual}"),
    )
}

/// A built-in rejected its arguments.
pub fn incorrect_args(source: DvalSource, name: &FQFnName, args: &[Dval]) -> Dval {
    let actual: Vec<String> = args.iter().map(Dval::type_name).collect();
    Dval::error(
        source,
        format!("{name} was called with the wrong argument types: ({})", actual.join(", ")),
    )
}

pub fn parameter_type_errors(source: DvalSource, name: &FQFnName, errors: &str) -> Dval {
    Dval::error(source, format!("Type error(s) in parameters of {name}: {errors}"))
}

pub fn return_type_errors(source: DvalSource, errors: &str) -> Dval {
    Dval::error(source, format!("Type error(s) in return type: {errors}"))
}

pub fn expected_option_or_result(source: DvalSource, value: &Dval) -> Dval {
    Dval::error(
        source,
        format!(
            "Expecting the function to return an Option or Result, but it returned a {}",
            value.type_name()
        ),
    )
}

pub fn builtin_failed(source: DvalSource, msg: &str) -> Dval {
    Dval::error(source, msg)
}

/// A panic caught at a call boundary.
pub fn internal_fault(source: DvalSource, msg: &str) -> Dval {
    Dval::error(source, format!("Internal error: {msg}"))
}
