// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)] // test harness asserts and unwraps

use crate::builtins::Func;
use crate::engine::EvalOptions;
use crate::expr::{Expr, ExprVal};
use crate::interpreter::Interpreter;
use crate::node::NodeContext;
use crate::sources::ContextDataSources;
use crate::value::Value;
use crate::ExprError;

use anyhow::Result;

fn sources(json: &str) -> Result<ContextDataSources> {
    Ok(ContextDataSources::with_form_data(Value::from_json_str(json)?))
}

#[test]
fn only_the_outermost_call_recovers() -> Result<()> {
    let sources = sources(r#"{"G": [{"f": 1}]}"#)?;
    let node = NodeContext::component("f").in_row("G", 2);
    let options = EvalOptions::new().default_value("fallback");
    let interp = Interpreter::new(&sources, &node, &options);

    let expr = Expr::from_json_str(r#"["concat", "a", ["dataModel", "G.f"], "b"]"#)?;
    let Expr::Call(call) = &expr else {
        panic!("expected a call");
    };

    // Sub-expressions report the failure; only the root substitutes the default.
    let inner = interp.eval_expr(&call.args[1]).unwrap_err();
    assert_eq!(inner.kind(), "NodeNotFoundWithoutContext");
    assert_eq!(inner.path(), "$[2]");
    assert_eq!(interp.eval_root(&expr)?, Value::from("fallback"));
    Ok(())
}

#[test]
fn default_is_not_coerced() -> Result<()> {
    let sources = sources(r#"{"G": []}"#)?;
    let node = NodeContext::component("f").in_row("G", 0);
    let options = EvalOptions::new()
        .returns(ExprVal::Boolean)
        .default_value("n/a");
    let interp = Interpreter::new(&sources, &node, &options);

    let expr = Expr::from_json_str(r#"["dataModel", "G.f"]"#)?;
    assert_eq!(interp.eval_root(&expr)?, Value::from("n/a"));
    Ok(())
}

#[test]
fn strict_arguments_are_coerced_before_dispatch() -> Result<()> {
    let sources = sources(r#"{"Count": "3"}"#)?;
    let node = NodeContext::default();
    let options = EvalOptions::new();
    let interp = Interpreter::new(&sources, &node, &options);

    let expr = Expr::from_json_str(r#"["lessThan", ["dataModel", "Count"], 10]"#)?;
    assert_eq!(interp.eval_expr(&expr)?, Value::from(true));

    // "3" < "10" would be false as text.
    let Expr::Call(call) = &expr else {
        panic!("expected a call");
    };
    assert_eq!(call.func, Func::LessThan);
    Ok(())
}

#[test]
fn string_results_are_finalized_at_the_root_only() -> Result<()> {
    let sources = ContextDataSources::new();
    let node = NodeContext::default();
    let options = EvalOptions::new().returns(ExprVal::String);
    let interp = Interpreter::new(&sources, &node, &options);

    let expr = Expr::from_json_str(r#"["upperCase", null]"#)?;
    assert_eq!(interp.eval_expr(&expr)?, Value::Null);
    assert_eq!(interp.eval_root(&expr)?, Value::from(""));
    Ok(())
}

#[test]
fn errors_carry_the_failing_location() -> Result<()> {
    let sources = ContextDataSources::new();
    let node = NodeContext::default();
    let options = EvalOptions::new();
    let interp = Interpreter::new(&sources, &node, &options);

    let expr = Expr::from_json_str(r#"["or", false, ["not", ["concat", "x"]]]"#)?;
    let err = interp.eval_root(&expr).unwrap_err();
    assert_eq!(
        err,
        ExprError::TypeCoercion {
            path: "$[2][1]".to_string(),
            expected: "boolean",
            found: "\"x\"".to_string(),
        }
    );
    Ok(())
}

#[test]
fn arity_is_checked_before_arguments_are_evaluated() -> Result<()> {
    let sources = ContextDataSources::new();
    let node = NodeContext::default();
    let options = EvalOptions::new();
    let interp = Interpreter::new(&sources, &node, &options);

    let expr = Expr::from_json_str(r#"["upperCase", ["argv", 0], "extra"]"#)?;
    let err = interp.eval_root(&expr).unwrap_err();
    assert_eq!(err.kind(), "ArityMismatch");
    assert_eq!(err.path(), "$");
    Ok(())
}
