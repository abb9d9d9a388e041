// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, ExprError>;

/// Failures raised while parsing or evaluating an expression.
///
/// Every variant carries `path`, the location of the failing sub-expression
/// inside the expression tree. The root is `$`; `$[1][2]` is the second
/// argument of the call passed as the first argument of the root call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("{path}: unknown function `{name}`")]
    UnknownOperator { path: String, name: String },

    #[error("{path}: function name must be a string, got `{found}`")]
    InvalidFunctionName { path: String, found: String },

    #[error("{path}: malformed expression: {reason}")]
    MalformedExpression { path: String, reason: String },

    #[error("{path}: `{func}` expects {expected}, got {got}")]
    ArityMismatch {
        path: String,
        func: &'static str,
        expected: String,
        got: usize,
    },

    #[error("{path}: expected {expected}, got `{found}`")]
    TypeCoercion {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("{path}: invalid data model reference `{reference}`")]
    InvalidReference { path: String, reference: String },

    #[error("{path}: data model with type `{data_type}` not found")]
    DataModelNotFound { path: String, data_type: String },

    #[error("{path}: `{reference}` does not exist in the data model")]
    NodeNotFoundWithoutContext { path: String, reference: String },

    #[error("{path}: unable to find component with identifier `{id}`")]
    ComponentNotFound { path: String, id: String },

    #[error("{path}: {message}")]
    Runtime { path: String, message: String },
}

impl ExprError {
    /// Whether a call-site default value may stand in for this failure.
    ///
    /// Only contextual failures qualify: a reference to a row or component
    /// that does not exist in the current data. Authoring errors never do.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExprError::NodeNotFoundWithoutContext { .. } | ExprError::ComponentNotFound { .. }
        )
    }

    pub fn path(&self) -> &str {
        match self {
            ExprError::UnknownOperator { path, .. }
            | ExprError::InvalidFunctionName { path, .. }
            | ExprError::MalformedExpression { path, .. }
            | ExprError::ArityMismatch { path, .. }
            | ExprError::TypeCoercion { path, .. }
            | ExprError::InvalidReference { path, .. }
            | ExprError::DataModelNotFound { path, .. }
            | ExprError::NodeNotFoundWithoutContext { path, .. }
            | ExprError::ComponentNotFound { path, .. }
            | ExprError::Runtime { path, .. } => path,
        }
    }

    /// Stable name of the variant, used by diagnostics and test fixtures.
    pub fn kind(&self) -> &'static str {
        match self {
            ExprError::UnknownOperator { .. } => "UnknownOperator",
            ExprError::InvalidFunctionName { .. } => "InvalidFunctionName",
            ExprError::MalformedExpression { .. } => "MalformedExpression",
            ExprError::ArityMismatch { .. } => "ArityMismatch",
            ExprError::TypeCoercion { .. } => "TypeCoercion",
            ExprError::InvalidReference { .. } => "InvalidReference",
            ExprError::DataModelNotFound { .. } => "DataModelNotFound",
            ExprError::NodeNotFoundWithoutContext { .. } => "NodeNotFoundWithoutContext",
            ExprError::ComponentNotFound { .. } => "ComponentNotFound",
            ExprError::Runtime { .. } => "Runtime",
        }
    }

    pub(crate) fn runtime(path: &str, message: impl Into<String>) -> ExprError {
        ExprError::Runtime {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
