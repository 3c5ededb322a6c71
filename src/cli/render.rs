//! Render expressions as client query strings

use log::debug;

use super::{CliError, parameters_from_json};
use crate::{Expression, Parameters};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// The expression to render
    pub expression: String,
    /// JSON object of parameter bindings
    pub parameters: Option<String>,
    /// chrono format for time literals
    pub date_format: Option<String>,
}

/// Execute a render operation
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let mut expression = Expression::new(&options.expression)?;
    if let Some(format) = &options.date_format {
        expression = expression.with_query_date_format(format.clone());
    }

    let parameters = match &options.parameters {
        Some(json) => parameters_from_json(json)?,
        None => Parameters::new(),
    };
    debug!(
        "Rendering {} tokens with {} bound parameters",
        expression.tokens().len(),
        parameters.len()
    );

    Ok(expression.to_client_expression(&parameters)?)
}
