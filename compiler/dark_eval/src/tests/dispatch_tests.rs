//! Tests for function dispatch: argument checks, pipes, the error rail,
//! type checks, and built-in failures.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::Arc;

use dark_ir::{DType, Expr, FQFnName, Id, SendToRail, Tlid};
use dark_value::{Dval, Symtable};

use super::helpers::*;
use crate::{
    execute_expr, execute_function, BuiltinError, ExecutionConfig, Param, Previewable, UserFn,
};

fn user_fn(name: &str, params: &[(&str, DType)], return_type: DType, body: Expr) -> UserFn {
    UserFn {
        tlid: Tlid::new(200),
        name: name.to_string(),
        parameters: params
            .iter()
            .map(|(p, typ)| Param::new(p, typ.clone(), ""))
            .collect(),
        return_type,
        description: String::new(),
        body: Arc::new(body),
    }
}

async fn run_with(extra: Vec<crate::Function>, expr: &Expr) -> Dval {
    let (state, _) = state_with(extra, ExecutionConfig::new());
    execute_expr(&state, &Symtable::new(), expr).await
}

mod argument_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn error_rail_argument_is_returned_without_calling() {
        let ast = Ast::new();
        let (sink_fn, sink_calls) = sink();
        let (count_fn, count_calls) = counter("count", Previewable::Impure, Dval::int(1));
        let railed = ast.call_rail(
            stdlib("Dict", "get", 2),
            vec![ast.record(vec![]), ast.str("k")],
        );
        let expr = ast.call(
            stdlib("Test", "sink", 0),
            vec![railed, ast.call(stdlib("Test", "count", 0), vec![])],
        );
        let dv = run_with(vec![sink_fn, count_fn], &expr).await;
        assert_eq!(dv, Dval::error_rail(Dval::OptionNothing));
        // Arguments are evaluated in order, but the call itself is skipped.
        assert_eq!(count(&count_calls), 1);
        assert_eq!(count(&sink_calls), 0);
    }

    #[tokio::test]
    async fn incomplete_and_error_arguments_are_returned() {
        let ast = Ast::new();
        let (sink_fn, sink_calls) = sink();
        let with_blank = ast.call(stdlib("Test", "sink", 0), vec![ast.int(1), ast.blank()]);
        let with_error = ast.call(stdlib("Test", "sink", 0), vec![ast.var("nope"), ast.int(1)]);
        assert!(run_with(vec![sink_fn.clone()], &with_blank).await.is_incomplete());
        assert_eq!(
            message(&run_with(vec![sink_fn], &with_error).await),
            "There is no variable named: nope"
        );
        assert_eq!(count(&sink_calls), 0);
    }

    #[tokio::test]
    async fn wrong_number_of_arguments() {
        let ast = Ast::new();
        let expr = ast.call(op("+"), vec![ast.int(1)]);
        assert_eq!(
            message(&run(&expr).await),
            "+ has 2 parameters, but here was called with 1 arguments."
        );
    }

    #[tokio::test]
    async fn missing_function_for_real() {
        let ast = Ast::new();
        let expr = ast.call(stdlib("Nope", "nothing", 0), vec![]);
        assert_eq!(
            message(&run(&expr).await),
            "Function Nope::nothing is not found"
        );
    }

    #[tokio::test]
    async fn builtin_rejecting_its_arguments() {
        let ast = Ast::new();
        let expr = ast.call(op("+"), vec![ast.str("a"), ast.int(1)]);
        assert_eq!(
            message(&run(&expr).await),
            "+ was called with the wrong argument types: (Str, Int)"
        );
    }
}

mod pipe_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn incomplete_step_passes_the_value_through() {
        // 1 |> ___ |> + 2
        let ast = Ast::new();
        let first = ast.pipe(ast.blank(), vec![ast.int(1)]);
        let expr = ast.pipe(ast.fn_value(op("+")), vec![first, ast.int(2)]);
        assert_eq!(run(&expr).await, Dval::int(3));
    }

    #[tokio::test]
    async fn incomplete_argument_in_a_pipe_yields_the_piped_value() {
        let ast = Ast::new();
        let expr = ast.pipe(ast.fn_value(op("+")), vec![ast.int(1), ast.blank()]);
        assert_eq!(run(&expr).await, Dval::int(1));
        let outside = ast.call(op("+"), vec![ast.int(1), ast.blank()]);
        assert!(run(&outside).await.is_incomplete());
    }

    #[tokio::test]
    async fn error_step_propagates() {
        // 1 |> nope |> + 2
        let ast = Ast::new();
        let first = ast.pipe(ast.var("nope"), vec![ast.int(1)]);
        let expr = ast.pipe(ast.fn_value(op("+")), vec![first, ast.int(2)]);
        assert_eq!(
            message(&run(&expr).await),
            "There is no variable named: nope"
        );
    }

    #[tokio::test]
    async fn pipe_results_are_traced_under_the_pipe_id() {
        let ast = Ast::new();
        let expr = ast.pipe(ast.fn_value(op("+")), vec![ast.int(1), ast.int(2)]);
        let Expr::Apply(_, _, _, dark_ir::IsInPipe::InPipe(pipe_id), _) = &expr else {
            unreachable!()
        };
        let (state, store) = state_with(vec![], ExecutionConfig::new());
        execute_expr(&state, &Symtable::new(), &expr).await;
        assert_eq!(store.live_value(*pipe_id).unwrap().dval, Dval::int(3));
    }
}

mod rail_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup(ast: &Ast, key: &str) -> Expr {
        ast.call_rail(
            stdlib("Dict", "get", 2),
            vec![ast.record(vec![("k", ast.int(1))]), ast.str(key)],
        )
    }

    #[tokio::test]
    async fn just_is_unwrapped() {
        let ast = Ast::new();
        assert_eq!(run(&lookup(&ast, "k")).await, Dval::int(1));
    }

    #[tokio::test]
    async fn nothing_goes_to_the_rail() {
        let ast = Ast::new();
        assert_eq!(
            run(&lookup(&ast, "missing")).await,
            Dval::error_rail(Dval::OptionNothing)
        );
    }

    #[tokio::test]
    async fn results_are_unwrapped_or_railed() {
        let ast = Ast::new();
        let ok = ast.call_rail(stdlib("Test", "ok", 0), vec![]);
        let err = ast.call_rail(stdlib("Test", "err", 0), vec![]);
        let (ok_fn, _) = counter("ok", Previewable::Pure, Dval::ok(Dval::int(1)));
        let (err_fn, _) = counter("err", Previewable::Pure, Dval::result_error(Dval::str("e")));
        assert_eq!(run_with(vec![ok_fn.clone(), err_fn.clone()], &ok).await, Dval::int(1));
        assert_eq!(
            run_with(vec![ok_fn, err_fn], &err).await,
            Dval::error_rail(Dval::result_error(Dval::str("e")))
        );
    }

    #[tokio::test]
    async fn other_values_are_errors() {
        let ast = Ast::new();
        let expr = ast.call_rail(op("+"), vec![ast.int(1), ast.int(2)]);
        assert_eq!(
            message(&run(&expr).await),
            "Expecting the function to return an Option or Result, but it returned a Int"
        );
    }

    #[tokio::test]
    async fn the_rail_ends_at_a_function_boundary() {
        let ast = Ast::new();
        let body = lookup(&ast, "missing");
        let function = user_fn("find", &[], DType::option(DType::any()), body);
        let (state, _) = state_with(vec![function.into()], ExecutionConfig::new());
        let dv = execute_function(&state, Id::new(1), &FQFnName::user("find"), vec![]).await;
        assert_eq!(dv, Dval::OptionNothing);
    }

    #[tokio::test]
    async fn railed_fakes_stay_on_the_rail() {
        let ast = Ast::new();
        let (fake_fn, _) = counter("fake", Previewable::Pure, Dval::Incomplete(Default::default()));
        let expr = ast.apply(
            ast.fn_value(stdlib("Test", "fake", 0)),
            vec![],
            dark_ir::IsInPipe::NotInPipe,
            SendToRail::Rail,
        );
        let dv = run_with(vec![fake_fn], &expr).await;
        assert!(matches!(dv, Dval::ErrorRail(inner) if inner.is_incomplete()));
    }
}

mod user_function_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::{FunctionRegistry, InMemoryTraceStore, ExecutionState};

    fn state_for(functions: Vec<UserFn>) -> (ExecutionState, Arc<InMemoryTraceStore>) {
        let mut registry = FunctionRegistry::with_stdlib();
        for f in functions {
            registry.add(f);
        }
        let store = Arc::new(InMemoryTraceStore::new());
        let state = ExecutionState::new(Arc::new(registry), ExecutionConfig::new().with_tlid(TLID))
            .with_tracing(store.clone());
        (state, store)
    }

    fn double(ast: &Ast) -> UserFn {
        user_fn(
            "double",
            &[("x", DType::TInt)],
            DType::TInt,
            ast.call(op("+"), vec![ast.var("x"), ast.var("x")]),
        )
    }

    #[tokio::test]
    async fn calls_run_the_body_with_parameters_bound() {
        let ast = Ast::new();
        let (state, store) = state_for(vec![double(&ast)]);
        let expr = ast.call(FQFnName::user("double"), vec![ast.int(21)]);
        let dv = execute_expr(&state, &Symtable::new(), &expr).await;
        assert_eq!(dv, Dval::int(42));
        assert_eq!(store.traced_tlids(), vec![Tlid::new(200)]);
        // User function results are recorded for later previews.
        assert_eq!(store.stored_result_count(), 1);
    }

    #[tokio::test]
    async fn parameter_types_are_checked() {
        let ast = Ast::new();
        let (state, _) = state_for(vec![double(&ast)]);
        let dv = execute_function(&state, Id::new(1), &FQFnName::user("double"), vec![Dval::str("s")]).await;
        assert_eq!(
            message(&dv),
            "Type error(s) in parameters of double: x: Expected to see a value of type Int but found a Str"
        );
    }

    #[tokio::test]
    async fn return_types_are_checked() {
        let ast = Ast::new();
        let liar = user_fn("liar", &[], DType::TInt, ast.str("not an int"));
        let (state, _) = state_for(vec![liar]);
        let dv = execute_function(&state, Id::new(1), &FQFnName::user("liar"), vec![]).await;
        assert_eq!(
            message(&dv),
            "Type error(s) in return type: Expected to see a value of type Int but found a Str"
        );
    }

    #[tokio::test]
    async fn errors_in_the_body_are_attributed_to_its_toplevel() {
        let ast = Ast::new();
        let broken = user_fn("broken", &[], DType::any(), ast.var("nope"));
        let (state, _) = state_for(vec![broken]);
        let dv = execute_function(&state, Id::new(1), &FQFnName::user("broken"), vec![]).await;
        assert!(matches!(
            dv,
            Dval::Error(dark_value::DvalSource::Node(tlid, _), _) if tlid == Tlid::new(200)
        ));
    }

    #[tokio::test]
    async fn recursion_runs_for_real() {
        // countdown(n) = if n == 0 then 0 else countdown(n - 1)
        let ast = Ast::new();
        let body = ast.if_(
            ast.call(op("=="), vec![ast.var("n"), ast.int(0)]),
            ast.int(0),
            ast.call(
                FQFnName::user("countdown"),
                vec![ast.call(op("-"), vec![ast.var("n"), ast.int(1)])],
            ),
        );
        let countdown = user_fn("countdown", &[("n", DType::TInt)], DType::TInt, body);
        let (state, _) = state_for(vec![countdown]);
        let dv = execute_function(&state, Id::new(1), &FQFnName::user("countdown"), vec![Dval::int(5)]).await;
        assert_eq!(dv, Dval::int(0));
    }
}

mod builtin_failure_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn runtime_errors_become_error_values() {
        let ast = Ast::new();
        let fail = failing("fail", BuiltinError::runtime("disk on fire"));
        let expr = ast.call(stdlib("Test", "fail", 0), vec![]);
        assert_eq!(message(&run_with(vec![fail], &expr).await), "disk on fire");
    }

    #[tokio::test]
    async fn fake_values_pass_through() {
        let ast = Ast::new();
        let rail = Dval::error_rail(Dval::OptionNothing);
        let fail = failing("fake", BuiltinError::FakeValue(rail.clone()));
        let expr = ast.call(stdlib("Test", "fake", 0), vec![]);
        assert_eq!(run_with(vec![fail], &expr).await, rail);
    }

    #[tokio::test]
    async fn panics_become_error_values() {
        let ast = Ast::new();
        let expr = ast.call(stdlib("Test", "panic", 0), vec![]);
        assert_eq!(
            message(&run_with(vec![panicking()], &expr).await),
            "Internal error: boom"
        );
    }
}
