// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins;
use crate::error::Result;
use crate::expr::{Expr, ExprVal};
use crate::interpreter::Interpreter;
use crate::node::NodeContext;
use crate::sources::ContextDataSources;
use crate::validation::{self, Diagnostic};
use crate::value::Value;
use crate::Rc;

use std::collections::BTreeMap;

/// Named arguments readable through `["value", key]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueArguments {
    pub data: BTreeMap<String, Value>,
    /// Key read by `["value"]` without an argument.
    pub default_key: Option<String>,
}

impl ValueArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    pub fn default_key(mut self, key: &str) -> Self {
        self.default_key = Some(key.to_string());
        self
    }
}

/// Settings of one call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalOptions {
    /// Declared type of the property the expression is attached to.
    pub returns: ExprVal,
    /// Returned instead of a recoverable failure.
    pub default_value: Option<Value>,
    pub positional_args: Vec<Value>,
    pub value_args: Option<ValueArguments>,
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returns(mut self, returns: ExprVal) -> Self {
        self.returns = returns;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn positional_args(mut self, args: Vec<Value>) -> Self {
        self.positional_args = args;
        self
    }

    pub fn value_args(mut self, args: ValueArguments) -> Self {
        self.value_args = Some(args);
        self
    }
}

/// Evaluate `expr` for `node` against `sources`.
pub fn eval_expr(
    expr: &Expr,
    node: &NodeContext,
    sources: &ContextDataSources,
    options: &EvalOptions,
) -> Result<Value> {
    Interpreter::new(sources, node, options).eval_root(expr)
}

/// The expression engine.
///
/// Holds the data sources of the current render pass. Cloning an engine is
/// cheap and shares the sources.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    sources: Rc<ContextDataSources>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(sources: ContextDataSources) -> Self {
        Self {
            sources: Rc::new(sources),
        }
    }

    /// Replace the data sources, e.g. at the start of a new render pass.
    pub fn set_sources(&mut self, sources: ContextDataSources) {
        self.sources = Rc::new(sources);
    }

    pub fn sources(&self) -> &ContextDataSources {
        &self.sources
    }

    /// Mutable access to the sources. Clones them first if another engine
    /// shares them.
    pub fn sources_mut(&mut self) -> &mut ContextDataSources {
        Rc::make_mut(&mut self.sources)
    }

    pub fn eval(&self, expr: &Expr, node: &NodeContext, options: &EvalOptions) -> Result<Value> {
        eval_expr(expr, node, &self.sources, options)
    }

    /// Parse and evaluate expression JSON.
    pub fn eval_json(
        &self,
        json: &str,
        node: &NodeContext,
        options: &EvalOptions,
    ) -> Result<Value> {
        let expr = Expr::from_json_str(json)?;
        self.eval(&expr, node, options)
    }

    /// Evaluate a boolean property such as `hidden` or `required`.
    pub fn eval_bool(&self, expr: &Expr, node: &NodeContext, default: bool) -> Result<bool> {
        let options = EvalOptions::new()
            .returns(ExprVal::Boolean)
            .default_value(default);
        Ok(match self.eval(expr, node, &options)? {
            Value::Bool(b) => b,
            _ => default,
        })
    }

    /// All problems in `raw`, found without evaluating it.
    pub fn validate(&self, raw: &Value, expected: ExprVal) -> Vec<Diagnostic> {
        validation::validate(raw, expected)
    }

    /// Signatures of all operators as JSON.
    pub fn manifest_json() -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&builtins::manifest())?)
    }
}
