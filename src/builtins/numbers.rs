// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::opt_number;
use crate::builtins::Func;
use crate::error::{ExprError, Result};
use crate::expr::Call;
use crate::interpreter::Interpreter;
use crate::number::Number;
use crate::value::Value;

use std::collections::HashMap;

const MAX_DECIMALS: f64 = 100.0;

pub fn register(m: &mut HashMap<&'static str, Func>) {
    m.insert("round", Func::Round);
}

/// Format a number with a fixed number of decimals (0 by default). A `null`
/// number reads as 0.
pub fn round(_interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let number = match args.first() {
        Some(Value::Number(n)) => *n,
        _ => Number::from(0i64),
    };
    let decimals = opt_number(args, 1).unwrap_or(0.0).trunc();
    if !(0.0..=MAX_DECIMALS).contains(&decimals) {
        return Err(ExprError::runtime(
            &call.path,
            format!("`round` expects between 0 and {MAX_DECIMALS} decimals, got {decimals}"),
        ));
    }
    Ok(Value::from(number.to_fixed(decimals as u32)))
}
