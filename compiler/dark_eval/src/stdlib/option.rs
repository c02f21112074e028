use dark_ir::DType;
use dark_value::Dval;

use super::{param, pure};
use crate::registry::{BuiltinError, Function};

pub(super) fn fns() -> Vec<Function> {
    vec![pure(
        "Option",
        "withDefault",
        0,
        vec![
            param("option", DType::option(DType::any())),
            param("default", DType::any()),
        ],
        DType::any(),
        "If `option` is `Just value`, returns `value`, otherwise `default`",
        with_default,
    )]
}

fn with_default(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::OptionJust(value), _] => Ok((**value).clone()),
        [Dval::OptionNothing, default] => Ok(default.clone()),
        _ => Err(BuiltinError::WrongArgs),
    }
}
