// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use formexpr::*;

fn engine_with(data: &str) -> Result<Engine> {
    Ok(Engine::with_sources(ContextDataSources::with_form_data(
        Value::from_json_str(data)?,
    )))
}

#[test]
fn age_check() -> Result<()> {
    let expr = Expr::from_json_str(r#"["greaterThan", ["dataModel", "Age"], 18]"#)?;
    let node = NodeContext::component("age");
    let options = EvalOptions::new().returns(ExprVal::Boolean);

    let engine = engine_with(r#"{"Age": 20}"#)?;
    assert_eq!(engine.eval(&expr, &node, &options)?, Value::from(true));

    let engine = engine_with(r#"{"Age": "17"}"#)?;
    assert_eq!(engine.eval(&expr, &node, &options)?, Value::from(false));
    Ok(())
}

#[test]
fn short_circuit_skips_failing_operand() -> Result<()> {
    let engine = engine_with(r#"{"G": [{"f": 1}]}"#)?;
    // Row 4 does not exist, so reading `G.f` here fails.
    let node = NodeContext::component("f").in_row("G", 4);
    let poison = r#"["dataModel", "G.f"]"#;
    let options = EvalOptions::new();

    let err = engine
        .eval_json(poison, &node, &options)
        .expect_err("poison must fail on its own");
    assert_eq!(err.kind(), "NodeNotFoundWithoutContext");

    let and = format!(r#"["and", false, {poison}]"#);
    assert_eq!(engine.eval_json(&and, &node, &options)?, Value::from(false));

    let or = format!(r#"["or", true, {poison}]"#);
    assert_eq!(engine.eval_json(&or, &node, &options)?, Value::from(true));

    let if_else = format!(r#"["if", false, {poison}, "else", "ok"]"#);
    assert_eq!(engine.eval_json(&if_else, &node, &options)?, Value::from("ok"));
    Ok(())
}

#[test]
fn row_relative_resolution() -> Result<()> {
    let engine = engine_with(r#"{"G": [{"f": 1}, {"f": 2}]}"#)?;
    let expr = Expr::from_json_str(r#"["dataModel", "G.f"]"#)?;
    let options = EvalOptions::new();

    for (row, want) in [(0, 1i64), (1, 2)] {
        let node = NodeContext::component("f").in_row("G", row);
        assert_eq!(engine.eval(&expr, &node, &options)?, Value::from(want));
    }

    let node = NodeContext::component("f").in_row("G", 5);
    let err = engine.eval(&expr, &node, &options).unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(
        err,
        ExprError::NodeNotFoundWithoutContext {
            path: "$".to_string(),
            reference: "G[5]".to_string()
        }
    );

    let options = EvalOptions::new().default_value("n/a");
    assert_eq!(engine.eval(&expr, &node, &options)?, Value::from("n/a"));
    Ok(())
}

#[test]
fn unknown_operator_is_fatal() {
    let err = Expr::from_json_str(r#"["bogusOp", 1, 2]"#).unwrap_err();
    assert_eq!(err.kind(), "UnknownOperator");
    assert!(!err.is_recoverable());

    let engine = Engine::new();
    let options = EvalOptions::new().default_value("n/a");
    let err = engine
        .eval_json(r#"["bogusOp", 1, 2]"#, &NodeContext::default(), &options)
        .unwrap_err();
    assert_eq!(err.kind(), "UnknownOperator");
}

#[test]
fn referential_transparency() -> Result<()> {
    let engine = engine_with(r#"{"Name": "Kari", "G": [{"f": "x"}, {"f": "y"}]}"#)?;
    let expr = Expr::from_json_str(
        r#"["concat", ["upperCase", ["dataModel", "Name"]], "-", ["dataModel", "G.f"], "-", ["round", 2.5]]"#,
    )?;
    let node = NodeContext::component("f").in_row("G", 1);
    let options = EvalOptions::new().returns(ExprVal::String);

    let first = engine.eval(&expr, &node, &options)?;
    let second = engine.eval(&expr, &node, &options)?;
    assert_eq!(first, Value::from("KARI-y-3"));
    assert_eq!(first, second);
    assert_eq!(first.to_json_str()?, second.to_json_str()?);
    Ok(())
}

#[test]
fn eval_bool_uses_default() -> Result<()> {
    let engine = engine_with(r#"{"G": [], "Flag": "true"}"#)?;
    let node = NodeContext::component("f").in_row("G", 0);

    let hidden = Expr::from_json_str(r#"["dataModel", "G.f"]"#)?;
    assert!(engine.eval_bool(&hidden, &node, true)?);
    assert!(!engine.eval_bool(&hidden, &node, false)?);

    let flag = Expr::from_json_str(r#"["dataModel", "Flag"]"#)?;
    assert!(engine.eval_bool(&flag, &node, false)?);

    let missing = Expr::from_json_str(r#"["dataModel", "Nope"]"#)?;
    assert!(engine.eval_bool(&missing, &node, true)?);
    Ok(())
}

#[test]
fn sources_are_shared_until_modified() -> Result<()> {
    let mut engine = engine_with(r#"{"Name": "Ola"}"#)?;
    let snapshot = engine.clone();

    engine
        .sources_mut()
        .set_data_model("default", Value::from_json_str(r#"{"Name": "Kari"}"#)?);

    let expr = Expr::from_json_str(r#"["dataModel", "Name"]"#)?;
    let node = NodeContext::default();
    let options = EvalOptions::new();
    assert_eq!(engine.eval(&expr, &node, &options)?, Value::from("Kari"));
    assert_eq!(snapshot.eval(&expr, &node, &options)?, Value::from("Ola"));
    Ok(())
}

#[test]
fn components_on_pages_outside_order_are_hidden() -> Result<()> {
    let mut sources = ContextDataSources::with_form_data(Value::from_json_str(r#"{"Step": 2}"#)?);
    sources.layout.order = vec!["page1".to_string(), "page2".to_string()];
    sources.layout.components = serde_json::from_str(
        r#"{
            "step": {"type": "Input", "page": "page2", "simpleBinding": "Step"},
            "old": {"type": "Input", "page": "page3", "simpleBinding": "Step"}
        }"#,
    )?;
    let mut engine = Engine::with_sources(sources);

    let node = NodeContext::page("page2");
    let options = EvalOptions::new();
    let step = Expr::from_json_str(r#"["component", "step"]"#)?;
    let old = Expr::from_json_str(r#"["component", "old"]"#)?;
    assert_eq!(engine.eval(&step, &node, &options)?, Value::from(2i64));
    assert_eq!(engine.eval(&old, &node, &options)?, Value::Null);

    engine.sources_mut().layout.order.push("page3".to_string());
    assert_eq!(engine.eval(&old, &node, &options)?, Value::from(2i64));
    Ok(())
}

#[test]
fn manifest() -> Result<()> {
    let manifest = Value::from_json_str(&Engine::manifest_json()?)?;
    let functions = manifest.as_array()?;
    assert_eq!(functions.len(), 37);

    let round = functions
        .iter()
        .find(|f| f["name"] == Value::from("round"))
        .expect("round is listed");
    assert_eq!(round["returns"], Value::from("string"));
    assert_eq!(round["args"][0]["type"], Value::from("number"));
    assert_eq!(round["args"][1]["variant"], Value::from("optional"));

    let concat = functions
        .iter()
        .find(|f| f["name"] == Value::from("concat"))
        .expect("concat is listed");
    assert_eq!(concat["args"][0]["variant"], Value::from("rest"));

    let format_date = functions
        .iter()
        .find(|f| f["name"] == Value::from("formatDate"))
        .expect("formatDate is listed");
    assert_eq!(format_date["args"][0]["type"], Value::from("date"));
    Ok(())
}

#[test]
fn validate_before_evaluating() -> Result<()> {
    let engine = Engine::new();
    let raw = Value::from_json_str(r#"["if", ["equals", 1], "a", "otherwise", ["bogus"]]"#)?;
    let diagnostics = engine.validate(&raw, ExprVal::String);
    let paths: Vec<&str> = diagnostics.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["$[3]", "$[1]", "$[4]"]);
    Ok(())
}
