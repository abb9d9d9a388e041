// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::opt_number;
use crate::builtins::Func;
use crate::error::Result;
use crate::expr::Call;
use crate::interpreter::Interpreter;
use crate::value::Value;

use std::collections::HashMap;

pub fn register(m: &mut HashMap<&'static str, Func>) {
    m.insert("equals", Func::Equals);
    m.insert("notEquals", Func::NotEquals);
    m.insert("greaterThan", Func::GreaterThan);
    m.insert("greaterThanEq", Func::GreaterThanEq);
    m.insert("lessThan", Func::LessThan);
    m.insert("lessThanEq", Func::LessThanEq);
}

// Both operands arrive coerced to strings, so `"1"` equals `1` and `null`
// equals only `null`.
pub fn equals(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args[0] == args[1]))
}

pub fn not_equals(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args[0] != args[1]))
}

/// Compare two numeric operands. Any `null` operand makes the comparison
/// false.
fn compare(args: &[Value], op: fn(f64, f64) -> bool) -> Result<Value> {
    Ok(Value::Bool(match (opt_number(args, 0), opt_number(args, 1)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }))
}

pub fn greater_than(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    compare(args, |a, b| a > b)
}

pub fn greater_than_eq(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    compare(args, |a, b| a >= b)
}

pub fn less_than(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    compare(args, |a, b| a < b)
}

pub fn less_than_eq(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    compare(args, |a, b| a <= b)
}
