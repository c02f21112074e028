//! Entry points: executing expressions and functions, and analysis.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dark_ir::{Expr, FQFnName, Id, IsInPipe, SendToRail};
use dark_value::{Dval, DvalSource, Symtable};
use futures_util::FutureExt;
use rustc_hash::FxHashMap;

use crate::dispatch::{self, panic_message};
use crate::trace::RecordingTraceStore;
use crate::{errors, interpreter, ExecutionState, LiveValue};

/// Evaluate `expr` for real (or in whatever mode `state` is configured for).
pub async fn execute_expr(state: &ExecutionState, symtable: &Symtable, expr: &Expr) -> Dval {
    let source = state.source(expr.id());
    tracing::debug!(tlid = %state.config().tlid, mode = ?state.mode(), "executing expression");
    guard(source, interpreter::eval(state, symtable, expr)).await
}

/// Call a function directly, as if from node `caller_id`.
pub async fn execute_function(
    state: &ExecutionState,
    caller_id: Id,
    name: &FQFnName,
    args: Vec<Dval>,
) -> Dval {
    let source = state.source(caller_id);
    guard(
        source,
        dispatch::call_fn(
            state,
            name,
            caller_id,
            args,
            IsInPipe::NotInPipe,
            SendToRail::NoRail,
        ),
    )
    .await
}

/// Result of a preview run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResults {
    pub result: Dval,
    /// Value of every node evaluated, real or previewed.
    pub live_values: FxHashMap<Id, LiveValue>,
}

/// Preview `expr` and collect its live values.
///
/// Recorded results are read from, and new ones written to, the store in
/// `state`; the live values are also forwarded to it.
pub async fn analyse_expr(state: &ExecutionState, symtable: &Symtable, expr: &Expr) -> AnalysisResults {
    let recording = Arc::new(RecordingTraceStore::new(state.tracing_arc()));
    let preview_state = state
        .clone()
        .with_config(state.config().with_preview())
        .with_tracing(recording.clone());
    let result = execute_expr(&preview_state, symtable, expr).await;
    let live_values = recording.take_live_values();
    tracing::debug!(count = live_values.len(), "analysis finished");
    AnalysisResults {
        result,
        live_values,
    }
}

/// Turn a panic anywhere below an entry point into an `Error` value.
async fn guard(source: DvalSource, run: impl std::future::Future<Output = Dval>) -> Dval {
    match AssertUnwindSafe(run).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let msg = panic_message(panic.as_ref());
            tracing::warn!(%msg, "evaluation panicked");
            errors::internal_fault(source, &msg)
        }
    }
}
