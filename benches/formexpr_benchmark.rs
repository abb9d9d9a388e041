use std::hint::black_box;

use formexpr::{ContextDataSources, Engine, EvalOptions, Expr, ExprVal, NodeContext, Value};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn engine_with_rows(rows: usize) -> Engine {
    let people: Vec<Value> = (0..rows)
        .map(|i| {
            Value::from_json_str(&format!(r#"{{"Name": "person {i}", "Age": {}}}"#, 10 + i % 50))
                .unwrap()
        })
        .collect();
    let data = Value::from_json_str(r#"{"Applicant": {"Age": "20", "Country": "NO"}}"#).unwrap();
    let mut sources = ContextDataSources::with_form_data(data);
    sources
        .form_data
        .models
        .get_mut("default")
        .unwrap()
        .as_object_mut()
        .unwrap()
        .insert("People".into(), Value::from(people));
    Engine::with_sources(sources)
}

fn simple_visibility(c: &mut Criterion) {
    let engine = engine_with_rows(1);
    let options = EvalOptions::new().returns(ExprVal::Boolean);
    let node = NodeContext::component("age");

    c.bench_function("literal", |b| {
        let expr = Expr::from_json_str("true").unwrap();
        b.iter(|| engine.eval(black_box(&expr), &node, &options).unwrap())
    });

    c.bench_function("compare data model value", |b| {
        let expr = Expr::from_json_str(
            r#"["and",
                ["greaterThanEq", ["dataModel", "Applicant.Age"], 18],
                ["equals", ["dataModel", "Applicant.Country"], "NO"]]"#,
        )
        .unwrap();
        b.iter(|| {
            let result = engine.eval(black_box(&expr), &node, &options).unwrap();
            assert_eq!(result, true.into());
        })
    });
}

fn repeating_group_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate for every row");
    let options = EvalOptions::new().returns(ExprVal::String);
    let expr = Expr::from_json_str(
        r#"["if", ["lessThan", ["dataModel", "People.Age"], 18],
            ["concat", ["dataModel", "People.Name"], " (minor)"],
            "else", ["dataModel", "People.Name"]]"#,
    )
    .unwrap();

    for rows in [10, 100, 1000] {
        let engine = engine_with_rows(rows);
        let nodes: Vec<NodeContext> = (0..rows)
            .map(|i| NodeContext::component("name").in_row("People", i))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(rows), &nodes, |b, nodes| {
            b.iter(|| {
                for node in nodes {
                    black_box(engine.eval(&expr, node, &options).unwrap());
                }
            })
        });
    }
    group.finish();
}

fn parse_expression(c: &mut Criterion) {
    let raw = r#"["or",
        ["equals", ["component", "country"], "NO"],
        ["and", ["authContext", "write"], ["notEquals", ["text", "title"], null]],
        ["commaContains", ["dataModel", "Tags"], "urgent"]]"#;
    c.bench_function("parse expression", |b| {
        b.iter(|| Expr::from_json_str(black_box(raw)).unwrap())
    });
}

criterion_group!(
    benches,
    simple_visibility,
    repeating_group_rows,
    parse_expression
);
criterion_main!(benches);
