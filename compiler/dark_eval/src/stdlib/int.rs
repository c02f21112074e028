use dark_ir::DType;

use super::{operators, param, pure};
use crate::registry::Function;

pub(super) fn fns() -> Vec<Function> {
    vec![pure(
        "Int",
        "add",
        0,
        vec![param("a", DType::TInt), param("b", DType::TInt)],
        DType::TInt,
        "Adds two integers together",
        operators::add,
    )]
}
