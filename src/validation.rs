// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Design-time checks of raw expression JSON.
//!
//! Unlike parsing, validation does not stop at the first problem; layout
//! tooling shows every diagnostic at once.

use crate::builtins::utils::{arg_type, arity, describe_arity};
use crate::builtins::Func;
use crate::expr::{coerce, ExprVal, ROOT_PATH};
use crate::value::Value;

use core::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

struct Validator {
    diagnostics: Vec<Diagnostic>,
}

impl Validator {
    fn error(&mut self, path: &str, message: String) {
        self.diagnostics.push(Diagnostic {
            path: path.to_string(),
            message,
        });
    }

    fn check(&mut self, raw: &Value, expected: ExprVal, path: &str) {
        match raw {
            Value::Undefined => self.error(path, "undefined is not a valid expression".to_string()),
            Value::Object(_) => self.error(path, "objects are not valid expressions".to_string()),
            Value::Array(items) => self.check_call(items, expected, path),
            _ => {
                if coerce(raw.clone(), expected, path).is_err() {
                    self.error(path, format!("expected {expected}, got `{raw}`"));
                }
            }
        }
    }

    fn check_call(&mut self, items: &[Value], expected: ExprVal, path: &str) {
        let Some((name, args)) = items.split_first() else {
            self.error(path, "missing function name in expression".to_string());
            return;
        };
        let Value::String(name) = name else {
            self.error(path, format!("function name must be a string, got `{name}`"));
            return;
        };
        let Some(func) = Func::from_name(name) else {
            self.error(path, format!("unknown function `{name}`"));
            return;
        };

        let def = func.definition();
        let returns_mismatch = matches!(
            (expected, def.returns),
            (ExprVal::Boolean, ExprVal::Number)
                | (ExprVal::Number, ExprVal::Boolean)
                | (ExprVal::Date, ExprVal::Boolean | ExprVal::Number)
        );
        if returns_mismatch {
            self.error(
                path,
                format!("expected {expected}, but `{name}` returns {}", def.returns),
            );
        }

        let child = |idx: usize| format!("{path}[{}]", idx + 1);

        if func == Func::If {
            if args.len() > 2 && args[2] != Value::from("else") {
                self.error(&child(2), "expected third argument to be \"else\"".to_string());
            }
            if args.len() != 2 && args.len() != 4 {
                self.error(
                    path,
                    format!(
                        "expected either 2 arguments (if) or 4 (if + else), got {}",
                        args.len()
                    ),
                );
            }
            for (idx, arg) in args.iter().enumerate() {
                let ty = match idx {
                    0 => ExprVal::Boolean,
                    2 => continue,
                    _ => expected,
                };
                self.check(arg, ty, &child(idx));
            }
            return;
        }

        let (min, max) = arity(def);
        if args.len() < min || max.is_some_and(|max| args.len() > max) {
            self.error(
                path,
                format!(
                    "`{name}` expects {}, got {}",
                    describe_arity(min, max),
                    args.len()
                ),
            );
        }

        if func == Func::DataModel
            && args.len() > 1
            && !matches!(args[1], Value::Null | Value::String(_))
        {
            self.error(
                &child(1),
                "the data type must be a string (expressions cannot be used here)".to_string(),
            );
        }

        for (idx, arg) in args.iter().enumerate() {
            if func == Func::DataModel && idx == 1 {
                continue;
            }
            self.check(arg, arg_type(def, idx), &child(idx));
        }
    }
}

/// Every problem in `raw` when used where a value of type `expected` is
/// required.
pub fn validate(raw: &Value, expected: ExprVal) -> Vec<Diagnostic> {
    let mut validator = Validator {
        diagnostics: vec![],
    };
    validator.check(raw, expected, ROOT_PATH);
    validator.diagnostics
}
