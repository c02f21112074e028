use std::sync::Arc;

use dark_ir::{DType, FQFnName, IsInPipe, SendToRail};
use dark_value::Dval;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::{param, pure};
use crate::registry::{BuiltinError, Function};
use crate::{interpreter, ExecutionState};

pub(super) fn fns() -> Vec<Function> {
    vec![
        Function::builtin(
            FQFnName::stdlib("List", "map", 0),
            vec![
                param("list", DType::list(DType::any())),
                param("f", DType::TFn(vec![DType::any()], Box::new(DType::any()))),
            ],
            DType::list(DType::any()),
            "Calls `f` on every value in `list`, returning a list of the results",
            Arc::new(map),
        ),
        pure(
            "List",
            "length",
            0,
            vec![param("list", DType::list(DType::any()))],
            DType::TInt,
            "Returns the number of values in `list`",
            length,
        ),
    ]
}

fn map(state: ExecutionState, args: Vec<Dval>) -> BoxFuture<'static, Result<Dval, BuiltinError>> {
    async move {
        let [Dval::List(items), Dval::FnVal(f)] = args.as_slice() else {
            return Err(BuiltinError::WrongArgs);
        };
        // Named functions applied per item report against the `List::map` call.
        let caller_id = state.call_stack().caller_id().unwrap_or_default();
        let mut results = Vec::with_capacity(items.len());
        for item in items.iter() {
            let result = interpreter::apply_fn_val(
                &state,
                caller_id,
                f,
                vec![item.clone()],
                IsInPipe::NotInPipe,
                SendToRail::NoRail,
            )
            .await;
            results.push(result);
        }
        Ok(Dval::list(results))
    }
    .boxed()
}

fn length(args: &[Dval]) -> Result<Dval, BuiltinError> {
    match args {
        [Dval::List(items)] => Ok(Dval::int(items.len())),
        _ => Err(BuiltinError::WrongArgs),
    }
}
