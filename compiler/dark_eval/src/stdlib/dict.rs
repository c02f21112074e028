use dark_ir::{DType, FQFnName};
use dark_value::Dval;

use super::{param, pure};
use crate::registry::{BuiltinError, Deprecation, Function};

pub(super) fn fns() -> Vec<Function> {
    vec![
        pure(
            "Dict",
            "get",
            0,
            vec![param("dict", DType::dict(DType::any())), param("key", DType::TStr)],
            DType::any(),
            "Looks up `key` in `dict`, returning null if it is missing",
            get_v0,
        )
        .with_deprecation(Deprecation::ReplacedBy(FQFnName::stdlib("Dict", "get", 2))),
        pure(
            "Dict",
            "get",
            2,
            vec![param("dict", DType::dict(DType::any())), param("key", DType::TStr)],
            DType::option(DType::any()),
            "If `dict` contains `key`, returns `Just` its value, otherwise `Nothing`",
            get_v2,
        ),
        pure(
            "Dict",
            "set",
            0,
            vec![
                param("dict", DType::dict(DType::any())),
                param("key", DType::TStr),
                param("val", DType::any()),
            ],
            DType::dict(DType::any()),
            "Returns a copy of `dict` with `key` set to `val`",
            set,
        ),
    ]
}

fn get_v0(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::Obj(map), Dval::Str(key)] => Ok(map.get(key.as_str()).cloned().unwrap_or(Dval::Null)),
        _ => Err(BuiltinError::WrongArgs),
    }
}

fn get_v2(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::Obj(map), Dval::Str(key)] => Ok(Dval::option(map.get(key.as_str()).cloned())),
        _ => Err(BuiltinError::WrongArgs),
    }
}

fn set(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::Obj(map), Dval::Str(key), value] => {
            Ok(Dval::Obj(map.update(key.to_string(), value.clone())))
        }
        _ => Err(BuiltinError::WrongArgs),
    }
}
