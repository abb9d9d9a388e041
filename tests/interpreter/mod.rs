// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use std::env;

use anyhow::{bail, Result};
use formexpr::*;
use serde::{Deserialize, Deserializer};
use test_generator::test_resources;

// A field written as `null` is present, unlike a missing field.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    expression: Value,
    /// Shortcut for sources holding a single default data model.
    data: Option<Value>,
    sources: Option<ContextDataSources>,
    node: Option<NodeContext>,
    returns: Option<ExprVal>,
    #[serde(default, deserialize_with = "present")]
    default: Option<Value>,
    #[serde(default)]
    positional_args: Vec<Value>,
    value_args: Option<TestValueArguments>,
    #[serde(default, deserialize_with = "present")]
    want_result: Option<Value>,
    error: Option<String>,
    error_kind: Option<String>,
    skip: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TestValueArguments {
    data: std::collections::BTreeMap<String, Value>,
    default_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn display_values(c: &Value, e: &Value) -> Result<String> {
    Ok(format!(
        "\nleft  = {}\nright = {}\n",
        serde_json::to_string_pretty(c)?,
        serde_json::to_string_pretty(e)?
    ))
}

fn eval_case(case: &TestCase) -> Result<Value> {
    let mut sources = case.sources.clone().unwrap_or_default();
    if let Some(data) = &case.data {
        sources.set_data_model("default", data.clone());
        sources.form_data.default_data_type = Some("default".to_string());
    }

    let mut options = EvalOptions::new()
        .returns(case.returns.unwrap_or_default())
        .positional_args(case.positional_args.clone());
    if let Some(default) = &case.default {
        options = options.default_value(default.clone());
    }
    if let Some(args) = &case.value_args {
        let mut value_args = ValueArguments::new();
        value_args.data = args.data.clone();
        value_args.default_key = args.default_key.clone();
        options = options.value_args(value_args);
    }

    let node = case.node.clone().unwrap_or_default();
    let expr = Expr::parse(&case.expression)?;
    Ok(eval_expr(&expr, &node, &sources, &options)?)
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    std::println!("running {file}");

    for case in test.cases {
        std::print!("case {} ", case.note);
        if case.skip == Some(true) {
            std::println!("skipped");
            continue;
        }

        match (&case.want_result, &case.error, &case.error_kind) {
            (Some(_), None, None) | (None, Some(_), _) | (None, _, Some(_)) => (),
            _ => panic!("either want_result or error/error_kind must be specified in test case."),
        }

        match eval_case(&case) {
            Ok(actual) => match &case.want_result {
                Some(expected) if &actual == expected => (),
                Some(expected) => bail!("value mismatch: {}", display_values(&actual, expected)?),
                None => bail!("eval succeeded and did not produce any errors"),
            },
            Err(actual) => {
                let kind = actual
                    .downcast_ref::<ExprError>()
                    .map(|e| e.kind())
                    .unwrap_or("<other>");
                let message = actual.to_string();
                if case.want_result.is_some() {
                    return Err(actual);
                }
                if let Some(expected) = &case.error_kind {
                    if kind != expected {
                        bail!("error kind `{kind}` is not `{expected}`: {message}");
                    }
                }
                if let Some(expected) = &case.error {
                    if !message.contains(expected) {
                        bail!("Error message\n`{message}\n`\ndoes not contain `{expected}`");
                    }
                }
                std::println!("{message}");
            }
        }

        std::println!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{e}");
        }
    }
}

#[test]
fn yaml_test_basic() -> Result<()> {
    yaml_test("tests/interpreter/cases/logical/and_or.yaml")
}

#[test]
#[ignore = "intended for running a single yaml file"]
fn one_yaml() -> Result<()> {
    let mut file = String::default();

    for a in env::args() {
        if a.ends_with(".yaml") {
            file = a;
        }
    }

    if file.is_empty() {
        bail!("missing <yaml-file>");
    }

    yaml_test(file.as_str())
}

#[test_resources("tests/interpreter/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
