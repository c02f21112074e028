//! Tree-walking evaluation.
//!
//! [`eval`] evaluates one node and reports its value to the trace store.
//! It returns a boxed future so evaluation can recurse through function
//! calls, lambdas and built-ins that call back into the interpreter.
//!
//! # Previews
//!
//! Whenever control flow picks one branch (`if`, `match`, feature flags),
//! the branches not taken are still evaluated in preview so the editor can
//! show their values. Preview evaluation runs with effects suppressed and
//! its result is discarded.

mod apply;
mod pattern_match;

use std::panic::AssertUnwindSafe;

use dark_ir::{Expr, IsInPipe, Pattern};
use dark_value::{Dval, Symtable};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::{errors, ExecutionState};

pub use apply::apply_fn_val;

/// Evaluate `expr` and trace its value under the expression's id.
pub fn eval<'a>(
    state: &'a ExecutionState,
    st: &'a Symtable,
    expr: &'a Expr,
) -> BoxFuture<'a, Dval> {
    async move {
        tracing::trace!(id = %expr.id(), kind = expr.kind_name(), "eval");
        let result = eval_inner(state, st, expr).await;
        state
            .tracing()
            .trace_dval(state.on_execution_path(), expr.id(), &result);
        result
    }
    .boxed()
}

/// Evaluate `expr` for its traces only.
pub(crate) async fn preview(state: &ExecutionState, st: &Symtable, expr: &Expr) {
    let preview_state = state.for_preview();
    let _ = eval(&preview_state, st, expr).await;
}

async fn eval_inner(state: &ExecutionState, st: &Symtable, expr: &Expr) -> Dval {
    let source = state.source(expr.id());
    match expr {
        Expr::Blank(_) => Dval::Incomplete(source),
        Expr::Integer(_, n) => Dval::Int(n.clone()),
        Expr::Float(_, f) => Dval::Float(*f),
        Expr::Bool(_, b) => Dval::Bool(*b),
        Expr::Null(_) => Dval::Null,
        Expr::String(_, s) => Dval::str(s),
        Expr::Character(_, c) => {
            Dval::char(c).unwrap_or_else(|err| errors::invalid_character(source, &err))
        }

        Expr::Let(_, name, rhs, body) => {
            let rhs = eval(state, st, rhs).await;
            if rhs.is_error_rail() {
                return rhs;
            }
            if name.is_empty() {
                eval(state, st, body).await
            } else {
                let st = st.update(name.clone(), rhs);
                eval(state, &st, body).await
            }
        }

        Expr::List(_, exprs) => {
            let mut items = Vec::with_capacity(exprs.len());
            for expr in exprs {
                let item = eval(state, st, expr).await;
                if item.is_error_rail() {
                    return item;
                }
                // Incompletes are holes the user has yet to fill in.
                if !item.is_incomplete() {
                    items.push(item);
                }
            }
            Dval::list(items)
        }

        Expr::Record(_, pairs) => {
            let mut fields = Vec::with_capacity(pairs.len());
            for (key, expr) in pairs {
                if key.is_empty() {
                    continue;
                }
                fields.push((key.clone(), eval(state, st, expr).await));
            }
            Dval::obj(fields)
        }

        Expr::Variable(_, name) => match st.get(name) {
            Some(dv) => dv.clone(),
            None if state.mode().unbound_variable_is_incomplete() => Dval::Incomplete(source),
            None => errors::undefined_variable(source, name),
        },

        Expr::FnValue(_, name) => Dval::fn_name(name.clone()),

        Expr::FieldAccess(_, obj, field) => {
            let obj = eval(state, st, obj).await;
            match obj {
                Dval::Obj(map) => map.get(field).cloned().unwrap_or(Dval::Null),
                fake if fake.is_fake() => fake,
                other => errors::field_access_on_non_record(source, &other),
            }
        }

        Expr::Lambda(_, params, body) => {
            if state.is_preview() {
                // Parameters have no value until the lambda is called.
                for (id, _) in params {
                    state
                        .tracing()
                        .trace_dval(state.on_execution_path(), *id, &Dval::Incomplete(state.source(*id)));
                }
            }
            Dval::lambda(params.clone(), st.clone(), body.clone())
        }

        Expr::If(_, cond, then_branch, else_branch) => {
            let cond = eval(state, st, cond).await;
            match cond {
                Dval::Bool(false) | Dval::Null => {
                    preview(state, st, then_branch).await;
                    eval(state, st, else_branch).await
                }
                fake if fake.is_fake() => {
                    preview(state, st, then_branch).await;
                    preview(state, st, else_branch).await;
                    fake
                }
                // Every other value is truthy.
                _ => {
                    let result = eval(state, st, then_branch).await;
                    preview(state, st, else_branch).await;
                    result
                }
            }
        }

        Expr::FeatureFlag(_, cond, old_code, new_code) => {
            // A failing condition behaves as if the flag were not there.
            let cond = AssertUnwindSafe(eval(state, st, cond)).catch_unwind().await;
            if matches!(cond, Ok(Dval::Bool(true))) {
                preview(state, st, old_code).await;
                eval(state, st, new_code).await
            } else {
                preview(state, st, new_code).await;
                eval(state, st, old_code).await
            }
        }

        Expr::Constructor(_, name, args) => match (name.as_str(), args.as_slice()) {
            ("Nothing", []) => Dval::OptionNothing,
            ("Just", [arg]) => wrap(eval(state, st, arg).await, Dval::just),
            ("Ok", [arg]) => wrap(eval(state, st, arg).await, Dval::ok),
            ("Error", [arg]) => wrap(eval(state, st, arg).await, Dval::result_error),
            ("Nothing" | "Just" | "Ok" | "Error", _) => Dval::Incomplete(source),
            (name, _) => errors::invalid_constructor(source, name),
        },

        Expr::Match(id, scrutinee, cases) => {
            let value = eval(state, st, scrutinee).await;
            eval_match(state, st, *id, value, cases).await
        }

        Expr::Apply(id, callee, args, in_pipe, rail) => {
            let callee = eval(state, st, callee).await;
            let mut arg_values = Vec::with_capacity(args.len());
            for arg in args {
                arg_values.push(eval(state, st, arg).await);
            }
            let result = apply::apply_fn(state, *id, callee, arg_values, *in_pipe, *rail).await;
            if let IsInPipe::InPipe(pipe_id) = in_pipe {
                state
                    .tracing()
                    .trace_dval(state.on_execution_path(), *pipe_id, &result);
            }
            result
        }
    }
}

/// Wrap a constructor argument unless it is fake.
fn wrap(dv: Dval, constructor: fn(Dval) -> Dval) -> Dval {
    if dv.is_fake() {
        dv
    } else {
        constructor(dv)
    }
}

/// Run the first matching case for real and preview all the others.
async fn eval_match(
    state: &ExecutionState,
    st: &Symtable,
    id: dark_ir::Id,
    value: Dval,
    cases: &[(Pattern, Expr)],
) -> Dval {
    let mut result = None;
    for (pattern, body) in cases {
        let checked = pattern_match::check(state, &value, pattern);
        if result.is_none() && checked.matched {
            let bindings = checked.extend(st);
            result = Some(eval(state, &bindings, body).await);
            checked.trace(state, state.on_execution_path());
        } else {
            // Bindings from a failed match still help the preview.
            let bindings = checked.extend(st);
            preview(state, &bindings, body).await;
            checked.trace(state, false);
        }
    }
    match result {
        Some(result) => result,
        None if value.is_fake() => value,
        None => Dval::Incomplete(state.source(id)),
    }
}
