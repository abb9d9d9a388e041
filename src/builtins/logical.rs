// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::opt_bool;
use crate::builtins::Func;
use crate::error::{ExprError, Result};
use crate::expr::Call;
use crate::interpreter::Interpreter;
use crate::value::Value;

use std::collections::HashMap;

pub fn register(m: &mut HashMap<&'static str, Func>) {
    m.insert("and", Func::And);
    m.insert("or", Func::Or);
    m.insert("not", Func::Not);
    m.insert("if", Func::If);
}

/// Stops at the first false operand; later operands are never evaluated.
pub fn and(interp: &Interpreter, call: &Call) -> Result<Value> {
    for arg in &call.args {
        if !interp.eval_bool(arg)? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// Stops at the first true operand.
pub fn or(interp: &Interpreter, call: &Call) -> Result<Value> {
    for arg in &call.args {
        if interp.eval_bool(arg)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

pub fn not(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(!opt_bool(args, 0).unwrap_or(false)))
}

/// `["if", cond, then]` or `["if", cond, then, "else", otherwise]`.
///
/// Only the branch that is taken gets evaluated. Without an else branch a
/// false condition yields `null`.
pub fn if_else(interp: &Interpreter, call: &Call) -> Result<Value> {
    let otherwise = match call.args.len() {
        2 => None,
        4 => {
            let marker = &call.args[2];
            match marker.as_literal() {
                Some(Value::String(s)) if s.as_ref() == "else" => Some(&call.args[3]),
                _ => {
                    return Err(ExprError::MalformedExpression {
                        path: marker.path().to_string(),
                        reason: "expected third argument to be \"else\"".to_string(),
                    })
                }
            }
        }
        got => {
            return Err(ExprError::ArityMismatch {
                path: call.path.to_string(),
                func: "if",
                expected: "2 or 4 arguments".to_string(),
                got,
            })
        }
    };

    if interp.eval_bool(&call.args[0])? {
        interp.eval_expr(&call.args[1])
    } else {
        match otherwise {
            Some(expr) => interp.eval_expr(expr),
            None => Ok(Value::Null),
        }
    }
}
