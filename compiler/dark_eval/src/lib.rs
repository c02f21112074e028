//! Dark Eval - interpreter and function dispatch for the Dark runtime.
//!
//! This crate evaluates `dark_ir` expression trees to `Dval`s.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `interpreter::eval`: async tree walk, one boxed future per node
//! - `dispatch`: name resolution, argument checks and preview/caching policy
//! - `FunctionRegistry`: built-in, user and package functions by name
//! - `TraceStore`: live values and recorded function results
//! - `ExecutionState`: configuration, registries and the call stack, cloned
//!   into every child call
//!
//! # Errors
//!
//! Program errors are values (`Dval::Error`, `Incomplete`, `ErrorRail`) and
//! never Rust errors; the entry points here always produce a `Dval`. A panic
//! in a built-in or anywhere below an entry point becomes an `Error` value.

mod diagnostics;
mod dispatch;
pub mod errors;
mod eval_mode;
mod execution;
pub mod interpreter;
mod registry;
mod state;
pub mod stdlib;
mod trace;

pub use diagnostics::{CallFrame, CallStack};
pub use eval_mode::RealOrPreview;
pub use execution::{analyse_expr, execute_expr, execute_function, AnalysisResults};
pub use registry::{
    BuiltinError, BuiltinFn, Deprecation, FnImpl, Function, FunctionRegistry, PackageFn, Param,
    Previewable, UserFn,
};
pub use state::{ExecutionConfig, ExecutionState};
pub use stdlib::sync_builtin;
pub use trace::{FnCallSite, InMemoryTraceStore, LiveValue, NoopTraceStore, TraceStore};

#[cfg(test)]
mod tests;
