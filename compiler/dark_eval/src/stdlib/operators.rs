//! Infix operators. Their module name is empty, so they render bare.

use dark_ir::DType;
use dark_value::Dval;

use super::{param, pure};
use crate::registry::{BuiltinError, Function};

pub(super) fn fns() -> Vec<Function> {
    vec![
        pure(
            "",
            "+",
            0,
            vec![param("a", DType::TInt), param("b", DType::TInt)],
            DType::TInt,
            "Adds two integers together",
            add,
        ),
        pure(
            "",
            "-",
            0,
            vec![param("a", DType::TInt), param("b", DType::TInt)],
            DType::TInt,
            "Subtracts `b` from `a`",
            subtract,
        ),
        pure(
            "",
            "==",
            0,
            vec![param("a", DType::any()), param("b", DType::any())],
            DType::TBool,
            "Returns true if the two values are equal",
            equals,
        ),
    ]
}

pub(super) fn add(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::Int(a), Dval::Int(b)] => Ok(Dval::Int(a + b)),
        _ => Err(BuiltinError::WrongArgs),
    }
}

fn subtract(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::Int(a), Dval::Int(b)] => Ok(Dval::Int(a - b)),
        _ => Err(BuiltinError::WrongArgs),
    }
}

fn equals(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [a, b] => Ok(Dval::Bool(a == b)),
        _ => Err(BuiltinError::WrongArgs),
    }
}
