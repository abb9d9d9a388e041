// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::{arg_type, ensure_args_count};
use crate::builtins::Implementation;
use crate::engine::EvalOptions;
use crate::error::{ExprError, Result};
use crate::expr::{coerce, Call, Expr, ExprVal};
use crate::node::NodeContext;
use crate::sources::ContextDataSources;
use crate::value::Value;

use log::{debug, trace};

/// Evaluates expressions for one node against one set of data sources.
///
/// An interpreter only borrows its inputs and holds no state of its own, so
/// evaluating the same expression twice yields the same result.
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'a> {
    sources: &'a ContextDataSources,
    node: &'a NodeContext,
    options: &'a EvalOptions,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        sources: &'a ContextDataSources,
        node: &'a NodeContext,
        options: &'a EvalOptions,
    ) -> Interpreter<'a> {
        Interpreter {
            sources,
            node,
            options,
        }
    }

    pub fn sources(&self) -> &'a ContextDataSources {
        self.sources
    }

    pub fn node(&self) -> &'a NodeContext {
        self.node
    }

    pub fn options(&self) -> &'a EvalOptions {
        self.options
    }

    /// Evaluate the outermost expression.
    ///
    /// The result is coerced to the declared return type, and a `null` string
    /// result becomes the empty string. Recoverable failures anywhere in the
    /// tree are replaced by the configured default value, if any.
    pub fn eval_root(&self, expr: &Expr) -> Result<Value> {
        let returns = self.options.returns;
        let result = self
            .eval_expr(expr)
            .and_then(|v| coerce(v, returns, expr.path()))
            .map(|v| match (v, returns) {
                (Value::Null, ExprVal::String) => Value::from(""),
                (v, _) => v,
            });

        match result {
            Err(err) if err.is_recoverable() => match &self.options.default_value {
                Some(default) => {
                    debug!("using default value {default} instead of: {err}");
                    Ok(default.clone())
                }
                None => Err(err),
            },
            r => r,
        }
    }

    /// Evaluate a sub-expression without final coercion or recovery.
    pub fn eval_expr(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Call(call) => self.eval_call(call),
        }
    }

    fn eval_call(&self, call: &Call) -> Result<Value> {
        ensure_args_count(call)?;
        trace!("{}: calling `{}`", call.path, call.func.name());

        match call.func.implementation() {
            Implementation::Lazy(f) => f(self, call),
            Implementation::Strict(f) => {
                let def = call.func.definition();
                let mut args = Vec::with_capacity(call.args.len());
                for (idx, arg) in call.args.iter().enumerate() {
                    let v = self.eval_expr(arg)?;
                    args.push(coerce(v, arg_type(def, idx), arg.path())?);
                }
                f(self, call, &args)
            }
        }
    }

    /// Evaluate `expr` and coerce it to a boolean. `null` reads as false.
    pub fn eval_bool(&self, expr: &Expr) -> Result<bool> {
        let v = self.eval_expr(expr)?;
        Ok(matches!(
            coerce(v, ExprVal::Boolean, expr.path())?,
            Value::Bool(true)
        ))
    }

    /// The form data model of `data_type`, or of the default data type.
    pub fn data_model(&self, data_type: Option<&str>, path: &str) -> Result<&'a Value> {
        let form_data = &self.sources.form_data;
        let data_type = match data_type.or(form_data.default_data_type.as_deref()) {
            Some(dt) => dt,
            None => return Err(ExprError::runtime(path, "cannot look up dataType undefined")),
        };
        form_data
            .models
            .get(data_type)
            .ok_or_else(|| ExprError::DataModelNotFound {
                path: path.to_string(),
                data_type: data_type.to_string(),
            })
    }
}
