//! Tests for `match` evaluation and pattern checking.

use dark_ir::{Expr, Pattern};
use dark_value::{Dval, Symtable};

use super::helpers::*;
use crate::{analyse_expr, execute_expr, ExecutionConfig};

fn label_cases(ast: &Ast, patterns: Vec<Pattern>) -> Vec<(Pattern, Expr)> {
    patterns
        .into_iter()
        .enumerate()
        .map(|(i, p)| (p, ast.str(&format!("case {i}"))))
        .collect()
}

mod selection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_matching_literal_wins() {
        let ast = Ast::new();
        let cases = label_cases(&ast, vec![ast.p_int(1), ast.p_int(2), ast.p_var("other")]);
        let expr = ast.match_(ast.int(2), cases);
        assert_eq!(run(&expr).await, Dval::str("case 1"));
    }

    #[tokio::test]
    async fn variables_bind_the_scrutinee() {
        let ast = Ast::new();
        let expr = ast.match_(
            ast.int(41),
            vec![(
                ast.p_var("n"),
                ast.call(op("+"), vec![ast.var("n"), ast.int(1)]),
            )],
        );
        assert_eq!(run(&expr).await, Dval::int(42));
    }

    #[tokio::test]
    async fn constructors_destructure() {
        let ast = Ast::new();
        let expr = ast.match_(
            ast.ctor("Ok", vec![ast.str("v")]),
            vec![
                (ast.p_ctor("Error", vec![ast.p_var("e")]), ast.var("e")),
                (ast.p_ctor("Ok", vec![ast.p_var("v")]), ast.var("v")),
            ],
        );
        assert_eq!(run(&expr).await, Dval::str("v"));
    }

    #[tokio::test]
    async fn nested_constructors() {
        let ast = Ast::new();
        let scrutinee = ast.ctor("Just", vec![ast.ctor("Just", vec![ast.int(3)])]);
        let pattern = ast.p_ctor("Just", vec![ast.p_ctor("Just", vec![ast.p_int(3)])]);
        let expr = ast.match_(scrutinee, vec![(pattern, ast.bool(true))]);
        assert_eq!(run(&expr).await, Dval::Bool(true));
    }

    #[tokio::test]
    async fn nothing_matches_nothing_only() {
        let ast = Ast::new();
        let cases = || {
            vec![
                (ast.p_ctor("Nothing", vec![]), ast.str("none")),
                (ast.p_ctor("Just", vec![ast.p_var("x")]), ast.str("some")),
            ]
        };
        let nothing = ast.match_(ast.ctor("Nothing", vec![]), cases());
        let just = ast.match_(ast.ctor("Just", vec![ast.int(1)]), cases());
        assert_eq!(run(&nothing).await, Dval::str("none"));
        assert_eq!(run(&just).await, Dval::str("some"));
    }

    #[tokio::test]
    async fn blank_patterns_never_match() {
        let ast = Ast::new();
        let cases = label_cases(&ast, vec![ast.p_blank(), ast.p_var("x")]);
        let expr = ast.match_(ast.int(1), cases);
        assert_eq!(run(&expr).await, Dval::str("case 1"));
    }

    #[tokio::test]
    async fn no_match_is_incomplete() {
        let ast = Ast::new();
        let cases = label_cases(&ast, vec![ast.p_int(1)]);
        let expr = ast.match_(ast.int(2), cases);
        assert!(run(&expr).await.is_incomplete());
    }

    #[tokio::test]
    async fn fake_scrutinees_do_not_bind() {
        let ast = Ast::new();
        let cases = label_cases(&ast, vec![ast.p_var("x")]);
        let expr = ast.match_(ast.var("unbound"), cases);
        assert_eq!(
            message(&run(&expr).await),
            "There is no variable named: unbound"
        );
    }

    #[tokio::test]
    async fn unknown_constructor_patterns_fail() {
        let ast = Ast::new();
        let cases = label_cases(
            &ast,
            vec![ast.p_ctor("Maybe", vec![]), ast.p_var("fallback")],
        );
        let expr = ast.match_(ast.int(1), cases);
        assert_eq!(run(&expr).await, Dval::str("case 1"));
    }
}

mod preview_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A three-way match whose branches record whether they ran for real.
    fn three_way(ast: &Ast, scrutinee: i64) -> Expr {
        let branch = |label: &str| ast.call(stdlib("Test", "record", 0), vec![ast.str(label)]);
        ast.match_(
            ast.int(scrutinee),
            vec![
                (ast.p_int(1), branch("one")),
                (ast.p_int(2), branch("two")),
                (ast.p_var("n"), branch("other")),
            ],
        )
    }

    #[tokio::test]
    async fn one_branch_runs_and_the_others_are_previewed() {
        for (scrutinee, taken) in [(1, "one"), (2, "two"), (7, "other")] {
            let (record_fn, recorded) = recorder();
            let (state, _) = state_with(vec![record_fn], ExecutionConfig::new());
            let ast = Ast::new();
            let dv = execute_expr(&state, &Symtable::new(), &three_way(&ast, scrutinee)).await;
            assert_eq!(dv, Dval::str(taken));

            let recorded = recorded.lock().clone();
            assert_eq!(recorded.len(), 3);
            for (label, on_path) in recorded {
                assert_eq!(on_path, label == taken, "branch {label}");
            }
        }
    }

    #[tokio::test]
    async fn skipped_branches_are_traced_as_not_executed() {
        let (record_fn, _) = recorder();
        let (state, _) = state_with(vec![record_fn], ExecutionConfig::new());
        let ast = Ast::new();
        let expr = three_way(&ast, 2);
        let Expr::Match(_, _, cases) = &expr else {
            unreachable!()
        };
        let analysis = analyse_expr(&state, &Symtable::new(), &expr).await;
        let executed = |e: &Expr| analysis.live_values[&e.id()].executed;
        assert!(!executed(&cases[0].1));
        assert!(executed(&cases[1].1));
        assert!(!executed(&cases[2].1));
        assert_eq!(analysis.result, Dval::str("two"));
    }

    #[tokio::test]
    async fn pattern_nodes_are_traced() {
        let ast = Ast::new();
        let pattern = ast.p_var("n");
        let pattern_id = pattern.id();
        let expr = ast.match_(ast.int(5), vec![(pattern, ast.var("n"))]);
        let analysis = analyse_expr(&real_state(), &Symtable::new(), &expr).await;
        assert_eq!(analysis.live_values[&pattern_id].dval, Dval::int(5));
    }

    #[tokio::test]
    async fn unmatched_literal_patterns_keep_their_own_value() {
        let ast = Ast::new();
        let literal = ast.p_int(1);
        let literal_id = literal.id();
        let expr = ast.match_(
            ast.int(5),
            vec![(literal, ast.str("one")), (ast.p_var("n"), ast.var("n"))],
        );
        let analysis = analyse_expr(&real_state(), &Symtable::new(), &expr).await;
        assert_eq!(analysis.result, Dval::int(5));
        let traced = &analysis.live_values[&literal_id];
        assert_eq!(traced.dval, Dval::int(1));
        assert!(!traced.executed);
    }
}
