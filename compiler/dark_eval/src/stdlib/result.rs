use dark_ir::DType;
use dark_value::Dval;

use super::{param, pure};
use crate::registry::{BuiltinError, Function};

pub(super) fn fns() -> Vec<Function> {
    vec![pure(
        "Result",
        "withDefault",
        0,
        vec![
            param("result", DType::result(DType::any(), DType::any())),
            param("default", DType::any()),
        ],
        DType::any(),
        "If `result` is `Ok value`, returns `value`, otherwise `default`",
        with_default,
    )]
}

fn with_default(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::ResultOk(value), _] => Ok((**value).clone()),
        [Dval::ResultError(_), default] => Ok(default.clone()),
        _ => Err(BuiltinError::WrongArgs),
    }
}
