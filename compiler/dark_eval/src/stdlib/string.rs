use dark_ir::DType;
use dark_value::Dval;
use unicode_segmentation::UnicodeSegmentation;

use super::{param, pure};
use crate::registry::{BuiltinError, Function};

pub(super) fn fns() -> Vec<Function> {
    vec![
        pure(
            "String",
            "append",
            0,
            vec![param("s1", DType::TStr), param("s2", DType::TStr)],
            DType::TStr,
            "Concatenates two strings",
            append,
        ),
        pure(
            "String",
            "length",
            0,
            vec![param("s", DType::TStr)],
            DType::TInt,
            "Returns the number of characters in the string",
            length,
        ),
    ]
}

fn append(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        // Concatenation can denormalize, so rebuild through `Dval::str`.
        [Dval::Str(a), Dval::Str(b)] => Ok(Dval::str(&format!("{}{}", a.as_str(), b.as_str()))),
        _ => Err(BuiltinError::WrongArgs),
    }
}

/// Length in extended grapheme clusters.
fn length(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::Str(s)] => Ok(Dval::int(s.graphemes(true).count())),
        _ => Err(BuiltinError::WrongArgs),
    }
}
