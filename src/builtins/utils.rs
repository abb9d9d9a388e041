// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::{ArgVariant, FuncDef};
use crate::error::{ExprError, Result};
use crate::expr::{Call, ExprVal};
use crate::value::Value;

/// Smallest and (when bounded) largest number of arguments `def` accepts.
pub fn arity(def: &FuncDef) -> (usize, Option<usize>) {
    let min = def
        .args
        .iter()
        .filter(|a| a.variant == ArgVariant::Required)
        .count();
    let max = match def.args.last() {
        Some(a) if a.variant == ArgVariant::Rest => None,
        _ => Some(def.args.len()),
    };
    (min, max)
}

pub fn describe_arity(min: usize, max: Option<usize>) -> String {
    let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
    match max {
        Some(0) => "no arguments".to_string(),
        Some(max) if max == min => format!("{min} {}", plural(min)),
        Some(max) => format!("between {min} and {max} arguments"),
        None => format!("at least {min} {}", plural(min)),
    }
}

pub fn ensure_args_count(call: &Call) -> Result<()> {
    let def = call.func.definition();
    let (min, max) = arity(def);
    let got = call.args.len();
    if got < min || max.map(|max| got > max).unwrap_or(false) {
        return Err(ExprError::ArityMismatch {
            path: call.path.to_string(),
            func: def.name,
            expected: describe_arity(min, max),
            got,
        });
    }
    Ok(())
}

/// Declared type of the argument at `idx`. Rest arguments repeat the type of
/// the last parameter.
pub fn arg_type(def: &FuncDef, idx: usize) -> ExprVal {
    match def.args.get(idx).or_else(|| def.args.last()) {
        Some(a) => a.ty,
        None => ExprVal::Any,
    }
}

/// The coerced string at `idx`, or `None` for `null`/missing arguments.
pub fn opt_string(args: &[Value], idx: usize) -> Option<&str> {
    match args.get(idx) {
        Some(Value::String(s)) => Some(s.as_ref()),
        _ => None,
    }
}

pub fn opt_number(args: &[Value], idx: usize) -> Option<f64> {
    match args.get(idx) {
        Some(Value::Number(n)) => Some(n.as_f64()),
        _ => None,
    }
}

pub fn opt_bool(args: &[Value], idx: usize) -> Option<bool> {
    match args.get(idx) {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Like [`opt_string`], but a missing value is an error naming the function.
pub fn ensure_string<'a>(call: &Call, args: &'a [Value], idx: usize, what: &str) -> Result<&'a str> {
    match opt_string(args, idx) {
        Some(s) => Ok(s),
        None => Err(ExprError::runtime(
            &call.path,
            format!("`{}` cannot look up {what} null", call.func.name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::Func;

    #[test]
    fn arity_ranges() {
        assert_eq!(arity(Func::Not.definition()), (1, Some(1)));
        assert_eq!(arity(Func::Concat.definition()), (0, None));
        assert_eq!(arity(Func::And.definition()), (1, None));
        assert_eq!(arity(Func::Round.definition()), (1, Some(2)));
        assert_eq!(arity(Func::Language.definition()), (0, Some(0)));
    }

    #[test]
    fn arity_descriptions() {
        assert_eq!(describe_arity(1, Some(1)), "1 argument");
        assert_eq!(describe_arity(2, Some(2)), "2 arguments");
        assert_eq!(describe_arity(1, None), "at least 1 argument");
        assert_eq!(describe_arity(0, Some(0)), "no arguments");
        assert_eq!(describe_arity(1, Some(2)), "between 1 and 2 arguments");
    }

    #[test]
    fn rest_arguments_repeat_last_type() {
        let def = Func::And.definition();
        assert_eq!(arg_type(def, 0), ExprVal::Boolean);
        assert_eq!(arg_type(def, 5), ExprVal::Boolean);
        assert_eq!(arg_type(Func::Language.definition(), 0), ExprVal::Any);
    }
}
