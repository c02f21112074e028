//! Function dispatch.
//!
//! [`call_fn`] runs the checks shared by every kind of function, then
//! [`exec_fn`] invokes the implementation under the preview and caching
//! policy:
//!
//! | Function | Real | Preview |
//! |---|---|---|
//! | pure built-in | run | recorded result, else run |
//! | impure-previewable built-in | run, store | run, store |
//! | impure built-in | run | recorded result, else `Incomplete` |
//! | user / package | run, store | `Incomplete` if already on the stack, else recorded result, else run |

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dark_ir::{FQFnName, Id, IsInPipe, SendToRail};
use dark_value::{Dval, Symtable};
use futures_util::FutureExt;

use crate::diagnostics::CallFrame;
use crate::registry::{BuiltinError, BuiltinFn, FnImpl, Function, Previewable};
use crate::trace::FnCallSite;
use crate::{errors, interpreter, ExecutionState};

/// Call a named function with evaluated arguments.
#[tracing::instrument(level = "debug", skip_all, fields(function = %name))]
pub(crate) async fn call_fn(
    state: &ExecutionState,
    name: &FQFnName,
    id: Id,
    args: Vec<Dval>,
    in_pipe: IsInPipe,
    rail: SendToRail,
) -> Dval {
    let source = state.source(id);

    if let Some(rail_value) = args.iter().find(|dv| dv.is_error_rail()) {
        return rail_value.clone();
    }

    let Some(function) = state.libraries().resolve(name) else {
        if state.mode().replays_recorded_results() {
            let site = call_site(state, name, id);
            return load_result(state, &site, &args)
                .await
                .unwrap_or(Dval::Incomplete(source));
        }
        return errors::function_not_found(source, name);
    };

    if function.parameters.len() != args.len() {
        return errors::wrong_number_of_args(source, name, function.parameters.len(), args.len());
    }

    if let Some(bad) = args
        .iter()
        .find(|dv| dv.is_incomplete() || dv.is_dval_error())
    {
        return match (in_pipe, bad) {
            (IsInPipe::InPipe(_), Dval::Incomplete(_)) => args[0].clone(),
            _ => bad.clone(),
        };
    }

    let result = exec_fn(state, &function, id, args).await;
    match rail {
        SendToRail::Rail => to_error_rail(state, id, result),
        SendToRail::NoRail => result,
    }
}

/// Invoke a resolved function whose arguments already passed dispatch.
async fn exec_fn(state: &ExecutionState, function: &Arc<Function>, id: Id, args: Vec<Dval>) -> Dval {
    let source = state.source(id);
    let site = call_site(state, &function.name, id);

    // Previews never recurse into user code; real execution has no depth limit.
    if state.is_preview() && !function.is_builtin() {
        if let Some(outer) = state.call_stack().outer_call(&function.name) {
            tracing::debug!(
                function = %function.name,
                first_caller = %outer.caller_id,
                "recursive call in preview"
            );
            return Dval::Incomplete(source);
        }
    }

    let state = state.for_call(CallFrame {
        name: function.name.clone(),
        caller_id: id,
    });

    let result = match &function.implementation {
        FnImpl::Builtin(builtin) => exec_builtin(&state, function, builtin, &site, args).await,
        FnImpl::UserFunction(tlid, body) | FnImpl::PackageFunction(tlid, body) => {
            if let Err(type_errors) =
                dark_typecheck::check_function_call(state.user_types(), function.param_types(), &args)
            {
                return errors::parameter_type_errors(
                    source,
                    &function.name,
                    &dark_typecheck::errors_to_string(&type_errors),
                );
            }
            state.tracing().trace_tlid(*tlid);
            let recorded = if state.mode().replays_recorded_results() {
                load_result(&state, &site, &args).await
            } else {
                None
            };
            let result = match recorded {
                Some(result) => result,
                None => {
                    let st: Symtable = function
                        .parameters
                        .iter()
                        .map(|p| p.name.clone())
                        .zip(args.iter().cloned())
                        .collect();
                    let body_state = state.clone().in_toplevel(*tlid);
                    // The error rail ends at the function boundary.
                    interpreter::eval(&body_state, &st, body)
                        .await
                        .unwrap_from_error_rail()
                }
            };
            store_result(&state, &site, &args, &result).await;
            result
        }
    };

    match dark_typecheck::check_function_return_type(state.user_types(), &function.return_type, &result) {
        Ok(()) => result,
        Err(type_errors) => {
            tracing::debug!(function = %function.name, "return type mismatch");
            errors::return_type_errors(source, &dark_typecheck::errors_to_string(&type_errors))
        }
    }
}

async fn exec_builtin(
    state: &ExecutionState,
    function: &Function,
    builtin: &BuiltinFn,
    site: &FnCallSite,
    args: Vec<Dval>,
) -> Dval {
    let source = state.source(site.caller_id);
    let mode = state.mode();
    match function.previewable {
        Previewable::Pure if mode.replays_recorded_results() => {
            if let Some(result) = load_result(state, site, &args).await {
                return result;
            }
        }
        Previewable::Impure if !mode.allows_impure_calls() => {
            return load_result(state, site, &args)
                .await
                .unwrap_or(Dval::Incomplete(source));
        }
        Previewable::Pure | Previewable::Impure | Previewable::ImpurePreviewable => {}
    }

    let call = async { builtin(state.clone(), args.clone()).await };
    let result = match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(BuiltinError::FakeValue(fake))) => fake,
        Ok(Err(BuiltinError::WrongArgs)) => errors::incorrect_args(source, &function.name, &args),
        Ok(Err(BuiltinError::Runtime(msg))) => errors::builtin_failed(source, &msg),
        Err(panic) => {
            let msg = panic_message(panic.as_ref());
            tracing::warn!(function = %function.name, %msg, "built-in panicked");
            errors::internal_fault(source, &msg)
        }
    };

    // Only impure-previewable results are persisted.
    if function.previewable == Previewable::ImpurePreviewable {
        store_result(state, site, &args, &result).await;
    }
    result
}

/// Apply the error-rail rule to the result of a railed call.
fn to_error_rail(state: &ExecutionState, id: Id, result: Dval) -> Dval {
    match result {
        Dval::OptionJust(inner) | Dval::ResultOk(inner) => inner.into_inner(),
        Dval::OptionNothing | Dval::ResultError(_) | Dval::Incomplete(_) | Dval::Error(..) => {
            Dval::error_rail(result)
        }
        Dval::ErrorRail(_) => result,
        other => errors::expected_option_or_result(state.source(id), &other),
    }
}

fn call_site(state: &ExecutionState, name: &FQFnName, id: Id) -> FnCallSite {
    FnCallSite {
        tlid: state.config().tlid,
        name: name.clone(),
        caller_id: id,
    }
}

/// Argument hash for result caching. `None` turns caching off for the call.
fn arg_hash(state: &ExecutionState, args: &[Dval]) -> Option<String> {
    match dark_repr::hash(state.config().hash_version, args) {
        Ok(hash) => Some(hash),
        Err(err) => {
            tracing::warn!(%err, "cannot hash arguments, skipping result cache");
            None
        }
    }
}

async fn load_result(state: &ExecutionState, site: &FnCallSite, args: &[Dval]) -> Option<Dval> {
    let hash = arg_hash(state, args)?;
    match state.tracing().load_result(site, &hash).await {
        Some((result, recorded_at)) => {
            tracing::debug!(function = %site.name, %recorded_at, "replaying recorded result");
            Some(result)
        }
        None => {
            tracing::debug!(function = %site.name, "no recorded result");
            None
        }
    }
}

async fn store_result(state: &ExecutionState, site: &FnCallSite, args: &[Dval], result: &Dval) {
    if let Some(hash) = arg_hash(state, args) {
        state.tracing().store_result(site, &hash, args, result).await;
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
