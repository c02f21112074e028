//! Tests for the standard library built-ins.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use dark_value::Dval;

use super::helpers::*;
use crate::FunctionRegistry;

mod operator_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn arithmetic_on_big_integers() {
        let ast = Ast::new();
        let big = dark_ir::Expr::Integer(ast.id(), "99999999999999999999".parse().unwrap());
        let expr = ast.call(op("+"), vec![big, ast.int(1)]);
        assert_eq!(
            run(&expr).await,
            Dval::Int("100000000000000000000".parse().unwrap())
        );
        let expr = ast.call(op("-"), vec![ast.int(1), ast.int(3)]);
        assert_eq!(run(&expr).await, Dval::int(-2));
    }

    #[tokio::test]
    async fn equality_is_structural() {
        let ast = Ast::new();
        let list = || ast.list(vec![ast.int(1), ast.str("a")]);
        assert_eq!(
            run(&ast.call(op("=="), vec![list(), list()])).await,
            Dval::Bool(true)
        );
        assert_eq!(
            run(&ast.call(op("=="), vec![ast.int(1), ast.str("1")])).await,
            Dval::Bool(false)
        );
    }

    #[tokio::test]
    async fn int_add_matches_plus() {
        let ast = Ast::new();
        let expr = ast.call(stdlib("Int", "add", 0), vec![ast.int(2), ast.int(2)]);
        assert_eq!(run(&expr).await, Dval::int(4));
    }
}

mod string_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn append_renormalizes() {
        let ast = Ast::new();
        let expr = ast.call(
            stdlib("String", "append", 0),
            vec![ast.str("e"), ast.str("\u{301}")],
        );
        assert_eq!(run(&expr).await.as_str(), Some("\u{e9}"));
    }

    #[tokio::test]
    async fn length_counts_graphemes() {
        let ast = Ast::new();
        let expr = ast.call(
            stdlib("String", "length", 0),
            vec![ast.str("e\u{301}\u{1f44d}\u{1f3fd}")],
        );
        assert_eq!(run(&expr).await, Dval::int(2));
    }
}

mod collection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn list_length() {
        let ast = Ast::new();
        let expr = ast.call(
            stdlib("List", "length", 0),
            vec![ast.list(vec![ast.int(1), ast.int(2)])],
        );
        assert_eq!(run(&expr).await, Dval::int(2));
    }

    #[tokio::test]
    async fn dict_get_returns_an_option() {
        let ast = Ast::new();
        let dict = || ast.record(vec![("a", ast.int(1))]);
        let hit = ast.call(stdlib("Dict", "get", 2), vec![dict(), ast.str("a")]);
        let miss = ast.call(stdlib("Dict", "get", 2), vec![dict(), ast.str("b")]);
        assert_eq!(run(&hit).await, Dval::just(Dval::int(1)));
        assert_eq!(run(&miss).await, Dval::OptionNothing);
    }

    #[tokio::test]
    async fn deprecated_dict_get_still_works() {
        let ast = Ast::new();
        let expr = ast.call(
            stdlib("Dict", "get", 0),
            vec![ast.record(vec![]), ast.str("b")],
        );
        assert_eq!(run(&expr).await, Dval::Null);
        let registry = FunctionRegistry::with_stdlib();
        let function = registry.resolve(&stdlib("Dict", "get", 0)).unwrap();
        assert_eq!(
            function.deprecated,
            crate::Deprecation::ReplacedBy(stdlib("Dict", "get", 2))
        );
    }

    #[tokio::test]
    async fn dict_set_then_get() {
        let ast = Ast::new();
        let set = ast.call(
            stdlib("Dict", "set", 0),
            vec![ast.record(vec![]), ast.str("k"), ast.int(7)],
        );
        let expr = ast.call(stdlib("Dict", "get", 2), vec![set, ast.str("k")]);
        assert_eq!(run(&expr).await, Dval::just(Dval::int(7)));
    }
}

mod option_result_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn with_default() {
        let ast = Ast::new();
        let cases = [
            (stdlib("Option", "withDefault", 0), ast.ctor("Just", vec![ast.int(1)]), 1),
            (stdlib("Option", "withDefault", 0), ast.ctor("Nothing", vec![]), 0),
            (stdlib("Result", "withDefault", 0), ast.ctor("Ok", vec![ast.int(1)]), 1),
            (stdlib("Result", "withDefault", 0), ast.ctor("Error", vec![ast.str("e")]), 0),
        ];
        for (name, value, expected) in cases {
            let expr = ast.call(name, vec![value, ast.int(0)]);
            assert_eq!(run(&expr).await, Dval::int(expected));
        }
    }
}

mod date_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn now_is_a_whole_second_date() {
        let ast = Ast::new();
        let dv = run(&ast.call(stdlib("Date", "now", 0), vec![])).await;
        let Dval::Date(date) = dv else {
            panic!("expected a date, got {dv:?}")
        };
        assert_eq!(chrono::Timelike::nanosecond(&date), 0);
    }
}
