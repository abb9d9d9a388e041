// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod builtins;
mod engine;
mod error;
mod expr;
mod interpreter;
mod node;
mod number;
mod reference;
mod sources;
mod validation;
mod value;

pub use engine::{eval_expr, Engine, EvalOptions, ValueArguments};
pub use error::{ExprError, Result};
pub use expr::{coerce, Call, Expr, ExprVal, ROOT_PATH};
pub use interpreter::Interpreter;
pub use node::{NodeContext, RowChain, RowFrame};
pub use number::Number;
pub use reference::{pick_simple_value, resolve_reference, DataReference, Segment};
pub use sources::*;
pub use validation::{validate, Diagnostic};
pub use value::Value;

#[cfg(feature = "arc")]
pub(crate) use std::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
pub(crate) use std::rc::Rc;

#[cfg(test)]
mod tests;
