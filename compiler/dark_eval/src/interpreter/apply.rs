//! Applying function values: named functions and lambdas.

use dark_ir::{Id, IsInPipe, SendToRail};
use dark_value::{Dval, FnValImpl, LambdaImpl};

use crate::{dispatch, errors, ExecutionState};

use super::eval;

/// Apply whatever the callee of an `Apply` node evaluated to.
pub(super) async fn apply_fn(
    state: &ExecutionState,
    id: Id,
    callee: Dval,
    args: Vec<Dval>,
    in_pipe: IsInPipe,
    rail: SendToRail,
) -> Dval {
    match callee {
        Dval::FnVal(fn_val) => apply_fn_val(state, id, &fn_val, args, in_pipe, rail).await,
        // A hole in a pipeline lets the piped value through.
        Dval::Incomplete(_) if in_pipe.is_in_pipe() => args.into_iter().next().unwrap_or(callee),
        fake if fake.is_fake() => fake,
        other => errors::expected_function_value(state.source(id), &other),
    }
}

/// Call a function value with already-evaluated arguments.
///
/// Built-ins use this to call lambdas they were given.
pub async fn apply_fn_val(
    state: &ExecutionState,
    id: Id,
    fn_val: &FnValImpl,
    args: Vec<Dval>,
    in_pipe: IsInPipe,
    rail: SendToRail,
) -> Dval {
    match fn_val {
        FnValImpl::Lambda(lambda) => execute_lambda(state, id, lambda, args).await,
        FnValImpl::FnName(name) => dispatch::call_fn(state, name, id, args, in_pipe, rail).await,
    }
}

/// Run a lambda body in its captured symtable extended with the arguments.
async fn execute_lambda(
    state: &ExecutionState,
    id: Id,
    lambda: &LambdaImpl,
    args: Vec<Dval>,
) -> Dval {
    if let Some(marker) = args
        .iter()
        .find(|dv| dv.is_incomplete() || dv.is_error_rail())
    {
        return marker.clone();
    }
    if lambda.parameters.len() != args.len() {
        return errors::lambda_wrong_number_of_args(
            state.source(id),
            lambda.parameters.len(),
            args.len(),
        );
    }
    let mut st = lambda.symtable.clone();
    for ((_, name), arg) in lambda.parameters.iter().zip(args) {
        st.insert(name.clone(), arg);
    }
    eval(state, &st, &lambda.body).await
}
