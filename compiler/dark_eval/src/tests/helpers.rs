//! Expression builders and test states.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dark_ir::{DType, Expr, FQFnName, Id, IsInPipe, Pattern, SendToRail, Tlid};
use dark_value::{Dval, Symtable};
use futures_util::FutureExt;
use parking_lot::Mutex;

use crate::{
    execute_expr, BuiltinError, ExecutionConfig, ExecutionState, Function, FunctionRegistry,
    InMemoryTraceStore, Param, Previewable,
};
use crate::stdlib::sync_builtin;

pub(crate) const TLID: Tlid = Tlid::new(100);

/// Hands out fresh node ids while building a tree.
#[derive(Default)]
pub(crate) struct Ast {
    next: Cell<u64>,
}

impl Ast {
    pub(crate) fn new() -> Self {
        Ast { next: Cell::new(1) }
    }

    pub(crate) fn id(&self) -> Id {
        let id = self.next.get();
        self.next.set(id + 1);
        Id::new(id)
    }

    pub(crate) fn int(&self, n: i64) -> Expr {
        Expr::Integer(self.id(), n.into())
    }

    pub(crate) fn str(&self, s: &str) -> Expr {
        Expr::String(self.id(), s.to_string())
    }

    pub(crate) fn char(&self, s: &str) -> Expr {
        Expr::Character(self.id(), s.to_string())
    }

    pub(crate) fn bool(&self, b: bool) -> Expr {
        Expr::Bool(self.id(), b)
    }

    pub(crate) fn null(&self) -> Expr {
        Expr::Null(self.id())
    }

    pub(crate) fn blank(&self) -> Expr {
        Expr::Blank(self.id())
    }

    pub(crate) fn var(&self, name: &str) -> Expr {
        Expr::Variable(self.id(), name.to_string())
    }

    pub(crate) fn let_(&self, name: &str, rhs: Expr, body: Expr) -> Expr {
        Expr::Let(self.id(), name.to_string(), Box::new(rhs), Box::new(body))
    }

    pub(crate) fn if_(&self, cond: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
        Expr::If(
            self.id(),
            Box::new(cond),
            Box::new(then_branch),
            Box::new(else_branch),
        )
    }

    pub(crate) fn flag(&self, cond: Expr, old_code: Expr, new_code: Expr) -> Expr {
        Expr::FeatureFlag(
            self.id(),
            Box::new(cond),
            Box::new(old_code),
            Box::new(new_code),
        )
    }

    pub(crate) fn list(&self, items: Vec<Expr>) -> Expr {
        Expr::List(self.id(), items)
    }

    pub(crate) fn record(&self, fields: Vec<(&str, Expr)>) -> Expr {
        Expr::Record(
            self.id(),
            fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        )
    }

    pub(crate) fn field(&self, obj: Expr, name: &str) -> Expr {
        Expr::FieldAccess(self.id(), Box::new(obj), name.to_string())
    }

    pub(crate) fn lambda(&self, params: &[&str], body: Expr) -> Expr {
        let params = params.iter().map(|p| (self.id(), (*p).to_string())).collect();
        Expr::Lambda(self.id(), params, Arc::new(body))
    }

    pub(crate) fn ctor(&self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::Constructor(self.id(), name.to_string(), args)
    }

    pub(crate) fn fn_value(&self, name: FQFnName) -> Expr {
        Expr::FnValue(self.id(), name)
    }

    pub(crate) fn call(&self, name: FQFnName, args: Vec<Expr>) -> Expr {
        let callee = self.fn_value(name);
        self.apply(callee, args, IsInPipe::NotInPipe, SendToRail::NoRail)
    }

    /// A call that sends its result to the error rail.
    pub(crate) fn call_rail(&self, name: FQFnName, args: Vec<Expr>) -> Expr {
        let callee = self.fn_value(name);
        self.apply(callee, args, IsInPipe::NotInPipe, SendToRail::Rail)
    }

    /// One step of a pipeline; `args[0]` is the piped value.
    pub(crate) fn pipe(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        let pipe_id = self.id();
        self.apply(callee, args, IsInPipe::InPipe(pipe_id), SendToRail::NoRail)
    }

    pub(crate) fn apply(
        &self,
        callee: Expr,
        args: Vec<Expr>,
        in_pipe: IsInPipe,
        rail: SendToRail,
    ) -> Expr {
        Expr::Apply(self.id(), Box::new(callee), args, in_pipe, rail)
    }

    pub(crate) fn match_(&self, scrutinee: Expr, cases: Vec<(Pattern, Expr)>) -> Expr {
        Expr::Match(self.id(), Box::new(scrutinee), cases)
    }

    pub(crate) fn p_int(&self, n: i64) -> Pattern {
        Pattern::Integer(self.id(), n.into())
    }

    pub(crate) fn p_var(&self, name: &str) -> Pattern {
        Pattern::Variable(self.id(), name.to_string())
    }

    pub(crate) fn p_blank(&self) -> Pattern {
        Pattern::Blank(self.id())
    }

    pub(crate) fn p_ctor(&self, name: &str, args: Vec<Pattern>) -> Pattern {
        Pattern::Constructor(self.id(), name.to_string(), args)
    }
}

pub(crate) fn op(name: &str) -> FQFnName {
    FQFnName::stdlib("", name, 0)
}

pub(crate) fn stdlib(module: &str, function: &str, version: u32) -> FQFnName {
    FQFnName::stdlib(module, function, version)
}

pub(crate) fn message(dv: &Dval) -> &str {
    match dv {
        Dval::Error(_, msg) => msg.as_str(),
        other => panic!("expected an Error, got {other:?}"),
    }
}

/// A state over the stdlib plus `extra`, tracing into the returned store.
pub(crate) fn state_with(
    extra: Vec<Function>,
    config: ExecutionConfig,
) -> (ExecutionState, Arc<InMemoryTraceStore>) {
    let mut registry = FunctionRegistry::with_stdlib();
    registry.extend(extra);
    let store = Arc::new(InMemoryTraceStore::new());
    let state = ExecutionState::new(Arc::new(registry), config.with_tlid(TLID))
        .with_tracing(store.clone());
    (state, store)
}

pub(crate) fn real_state() -> ExecutionState {
    state_with(vec![], ExecutionConfig::new()).0
}

pub(crate) fn preview_state() -> ExecutionState {
    state_with(vec![], ExecutionConfig::new().with_preview()).0
}

/// Evaluate for real against the stdlib.
pub(crate) async fn run(expr: &Expr) -> Dval {
    execute_expr(&real_state(), &Symtable::new(), expr).await
}

/// A zero-argument built-in that counts its calls and returns `result`.
pub(crate) fn counter(
    name: &str,
    previewable: Previewable,
    result: Dval,
) -> (Function, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let calls = count.clone();
    let function = Function::builtin(
        stdlib("Test", name, 0),
        vec![],
        DType::any(),
        "",
        Arc::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            let result = result.clone();
            async move { Ok(result) }.boxed()
        }),
    )
    .with_previewable(previewable);
    (function, count)
}

/// Calls of `Test::record`: the label and whether the call was on the
/// execution path.
pub(crate) type Recorded = Arc<Mutex<Vec<(String, bool)>>>;

/// `Test::record(label)`, callable during preview.
pub(crate) fn recorder() -> (Function, Recorded) {
    let recorded: Recorded = Arc::default();
    let log = recorded.clone();
    let function = Function::builtin(
        stdlib("Test", "record", 0),
        vec![Param::new("label", DType::TStr, "")],
        DType::TStr,
        "",
        Arc::new(move |state, args| {
            let label = args[0].as_str().unwrap_or_default().to_string();
            log.lock().push((label.clone(), state.on_execution_path()));
            async move { Ok(Dval::str(&label)) }.boxed()
        }),
    )
    .with_previewable(Previewable::ImpurePreviewable);
    (function, recorded)
}

/// `Test::sink(a, b)`: counts calls, returns null.
pub(crate) fn sink() -> (Function, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let calls = count.clone();
    let function = Function::builtin(
        stdlib("Test", "sink", 0),
        vec![
            Param::new("a", DType::any(), ""),
            Param::new("b", DType::any(), ""),
        ],
        DType::TNull,
        "",
        Arc::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Dval::Null) }.boxed()
        }),
    );
    (function, count)
}

/// A built-in that fails in the given way.
pub(crate) fn failing(name: &str, error: BuiltinError) -> Function {
    Function::builtin(
        stdlib("Test", name, 0),
        vec![],
        DType::any(),
        "",
        Arc::new(move |_, _| {
            let error = error.clone();
            async move { Err(error) }.boxed()
        }),
    )
}

pub(crate) fn panicking() -> Function {
    Function::builtin(
        stdlib("Test", "panic", 0),
        vec![],
        DType::any(),
        "",
        sync_builtin(|_| panic!("boom")),
    )
}

pub(crate) fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
