// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::{dates, Func};
use crate::error::{ExprError, Result};
use crate::number::Number;
use crate::value::Value;
use crate::Rc;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Location of the root expression in error paths.
pub const ROOT_PATH: &str = "$";

/// The declared type of an expression at the place it is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprVal {
    Boolean,
    Number,
    String,
    /// An ISO 8601 date or date-time, carried as text.
    Date,
    #[default]
    Any,
}

impl ExprVal {
    pub fn name(&self) -> &'static str {
        match self {
            ExprVal::Boolean => "boolean",
            ExprVal::Number => "number",
            ExprVal::String => "string",
            ExprVal::Date => "date",
            ExprVal::Any => "any",
        }
    }
}

impl fmt::Display for ExprVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn type_error(path: &str, expected: ExprVal, found: &Value) -> ExprError {
    ExprError::TypeCoercion {
        path: path.to_string(),
        expected: expected.name(),
        found: found.to_string(),
    }
}

/// Coerce a raw scalar to `expected`.
///
/// `null` (and `undefined`) stay `null` for every type: "no value" is not an
/// error. Arrays and objects never coerce.
pub fn coerce(value: Value, expected: ExprVal, path: &str) -> Result<Value> {
    match (&value, expected) {
        (Value::Null | Value::Undefined, _) => Ok(Value::Null),
        (Value::Array(_) | Value::Object(_), _) => Err(type_error(path, expected, &value)),
        (_, ExprVal::Any) => Ok(value),

        (Value::Bool(_), ExprVal::Boolean) => Ok(value),
        (Value::String(s), ExprVal::Boolean) if s.eq_ignore_ascii_case("true") => {
            Ok(Value::Bool(true))
        }
        (Value::String(s), ExprVal::Boolean) if s.eq_ignore_ascii_case("false") => {
            Ok(Value::Bool(false))
        }
        (_, ExprVal::Boolean) => Err(type_error(path, expected, &value)),

        (Value::Number(_), ExprVal::Number) => Ok(value),
        // A cleared input field holds the empty string.
        (Value::String(s), ExprVal::Number) if s.trim().is_empty() => Ok(Value::Null),
        (Value::String(s), ExprVal::Number) => match Number::from_str(s) {
            Ok(n) => Ok(Value::Number(n)),
            Err(_) => Err(type_error(path, expected, &value)),
        },
        (_, ExprVal::Number) => Err(type_error(path, expected, &value)),

        (Value::String(s), ExprVal::Date) if s.trim().is_empty() => Ok(Value::Null),
        (Value::String(s), ExprVal::Date) if dates::parse_date(s).is_some() => Ok(value),
        (_, ExprVal::Date) => Err(type_error(path, expected, &value)),

        (Value::String(_), ExprVal::String) => Ok(value),
        (Value::Bool(_) | Value::Number(_), ExprVal::String) => match value.to_text() {
            Some(s) => Ok(Value::from(s)),
            None => Err(type_error(path, expected, &value)),
        },
    }
}

/// A parsed expression.
///
/// Expressions are immutable once parsed and can be evaluated any number of
/// times, for any node, from any thread (with the default `arc` feature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal { path: Rc<str>, value: Value },
    Call(Call),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub path: Rc<str>,
    pub func: Func,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn path(&self) -> &str {
        match self {
            Expr::Literal { path, .. } => path,
            Expr::Call(call) => &call.path,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Expr::Literal { value, .. } => Some(value),
            Expr::Call(_) => None,
        }
    }

    /// Build an expression tree from raw layout JSON.
    ///
    /// Unknown function names are rejected here, including inside branches
    /// that a later evaluation would never reach.
    pub fn parse(raw: &Value) -> Result<Expr> {
        Self::parse_at(raw, Rc::from(ROOT_PATH))
    }

    pub fn from_json_str(json: &str) -> Result<Expr> {
        let raw = Value::from_json_str(json).map_err(|e| ExprError::MalformedExpression {
            path: ROOT_PATH.to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&raw)
    }

    fn parse_at(raw: &Value, path: Rc<str>) -> Result<Expr> {
        match raw {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Ok(Expr::Literal {
                    path,
                    value: raw.clone(),
                })
            }
            Value::Undefined => Err(ExprError::MalformedExpression {
                path: path.to_string(),
                reason: "undefined is not a valid expression".to_string(),
            }),
            Value::Object(_) => Err(ExprError::MalformedExpression {
                path: path.to_string(),
                reason: "objects are not valid expressions".to_string(),
            }),
            Value::Array(items) => {
                let (name, params) = match items.split_first() {
                    Some(parts) => parts,
                    None => {
                        return Err(ExprError::MalformedExpression {
                            path: path.to_string(),
                            reason: "missing function name in expression".to_string(),
                        })
                    }
                };
                let name = match name {
                    Value::String(s) => s,
                    other => {
                        return Err(ExprError::InvalidFunctionName {
                            path: path.to_string(),
                            found: other.to_string(),
                        })
                    }
                };
                let func = Func::from_name(name).ok_or_else(|| ExprError::UnknownOperator {
                    path: path.to_string(),
                    name: name.to_string(),
                })?;

                let mut args = Vec::with_capacity(params.len());
                for (idx, param) in params.iter().enumerate() {
                    let child = Rc::from(format!("{path}[{}]", idx + 1));
                    args.push(Self::parse_at(param, child)?);
                }

                Ok(Expr::Call(Call { path, func, args }))
            }
        }
    }
}

impl FromStr for Expr {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self> {
        Expr::from_json_str(s)
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Expr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Expr::parse(&raw).map_err(serde::de::Error::custom)
    }
}
