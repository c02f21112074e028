//! Dark type checker.
//!
//! Declared types (`DType`) are checked against runtime values (`Dval`)
//! structurally. Every check returns all the errors it found, each tagged
//! with the parameter, column or field it belongs to; callers decide
//! whether to report all of them or only the first.

mod check;
mod error;
mod unify;

pub use check::{check_function_call, check_function_return_type, check_record};
pub use error::{errors_to_string, TypeError, TypeErrorKind};
pub use unify::{unify, user_types, UserTypes};
