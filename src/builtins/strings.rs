// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::opt_string;
use crate::builtins::Func;
use crate::error::Result;
use crate::expr::Call;
use crate::interpreter::Interpreter;
use crate::value::Value;

use std::collections::HashMap;

pub fn register(m: &mut HashMap<&'static str, Func>) {
    m.insert("concat", Func::Concat);
    m.insert("lowerCase", Func::LowerCase);
    m.insert("upperCase", Func::UpperCase);
    m.insert("contains", Func::Contains);
    m.insert("notContains", Func::NotContains);
    m.insert("startsWith", Func::StartsWith);
    m.insert("endsWith", Func::EndsWith);
    m.insert("stringLength", Func::StringLength);
    m.insert("commaContains", Func::CommaContains);
}

/// Join all operands. `null` operands contribute nothing.
pub fn concat(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    let s: String = (0..args.len()).filter_map(|i| opt_string(args, i)).collect();
    Ok(Value::from(s))
}

pub fn lower_case(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(match opt_string(args, 0) {
        Some(s) => Value::from(s.to_lowercase()),
        None => Value::Null,
    })
}

pub fn upper_case(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(match opt_string(args, 0) {
        Some(s) => Value::from(s.to_uppercase()),
        None => Value::Null,
    })
}

/// Apply `test` to two string operands, or yield `if_null` when either is
/// `null`.
fn test_pair(args: &[Value], if_null: bool, test: fn(&str, &str) -> bool) -> Result<Value> {
    Ok(Value::Bool(match (opt_string(args, 0), opt_string(args, 1)) {
        (Some(a), Some(b)) => test(a, b),
        _ => if_null,
    }))
}

pub fn contains(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    test_pair(args, false, |s, needle| s.contains(needle))
}

pub fn not_contains(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    test_pair(args, true, |s, needle| !s.contains(needle))
}

pub fn starts_with(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    test_pair(args, false, |s, prefix| s.starts_with(prefix))
}

pub fn ends_with(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    test_pair(args, false, |s, suffix| s.ends_with(suffix))
}

pub fn string_length(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(Value::from(
        opt_string(args, 0).map(|s| s.chars().count()).unwrap_or(0),
    ))
}

/// Exact match against the trimmed parts of a comma separated list.
pub fn comma_contains(_interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    test_pair(args, false, |list, item| {
        list.split(',').any(|part| part.trim() == item)
    })
}
