//! The standard library: built-ins every program can call.
//!
//! Each module returns its function records from `fns()`. Most built-ins
//! are synchronous functions over their argument slice, wrapped with
//! [`sync_builtin`]; the few that call back into the interpreter are
//! written as async closures directly.

mod date;
mod dict;
mod int;
mod list;
mod operators;
mod option;
mod result;
mod string;

use std::sync::Arc;

use dark_ir::{DType, FQFnName};
use dark_value::Dval;
use futures_util::FutureExt;

use crate::registry::{BuiltinError, BuiltinFn, Function, Param};

/// Every standard library function.
pub(crate) fn contents() -> Vec<Function> {
    [
        operators::fns(),
        int::fns(),
        string::fns(),
        list::fns(),
        dict::fns(),
        option::fns(),
        result::fns(),
        date::fns(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Wrap a synchronous built-in that only looks at its arguments.
pub fn sync_builtin(f: fn(&[Dval]) -> Result<Dval, BuiltinError>) -> BuiltinFn {
    Arc::new(move |_state, args| futures_util::future::ready(f(&args)).boxed())
}

fn param(name: &str, typ: DType) -> Param {
    Param::new(name, typ, "")
}

/// A pure synchronous stdlib function.
fn pure(
    module: &str,
    function: &str,
    version: u32,
    parameters: Vec<Param>,
    return_type: DType,
    description: &str,
    f: fn(&[Dval]) -> Result<Dval, BuiltinError>,
) -> Function {
    Function::builtin(
        FQFnName::stdlib(module, function, version),
        parameters,
        return_type,
        description,
        sync_builtin(f),
    )
}
