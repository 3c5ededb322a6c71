//! CLI support for exprql
//!
//! Provides programmatic access to the `render` and `eval` commands so other
//! tools can embed them.

mod convert;
mod eval;
mod render;

pub use convert::{json_to_value, parameters_from_json, value_to_json};
pub use eval::{EvalOptions, execute_eval};
pub use render::{RenderOptions, execute_render};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Expression(#[from] crate::ExpressionError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Render error: {0}")]
    Render(#[from] crate::RenderError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parameters must be a JSON object")]
    ParametersNotObject,

    /// Parameter whose JSON value has no exprql counterpart
    #[error("Unsupported value for parameter '{0}'")]
    UnsupportedParameter(String),
}
