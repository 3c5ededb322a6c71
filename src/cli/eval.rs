//! Evaluate expressions against JSON parameters

use super::{CliError, parameters_from_json, value_to_json};
use crate::{Expression, Parameters};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON object of parameter bindings
    pub parameters: Option<String>,
}

/// Execute an eval operation
pub fn execute_eval(options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let expression = Expression::new(&options.expression)?;
    let parameters = match &options.parameters {
        Some(json) => parameters_from_json(json)?,
        None => Parameters::new(),
    };

    let result = expression.evaluate(&parameters)?;
    Ok(value_to_json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_eval() {
        let options = EvalOptions {
            expression: "price * quantity".to_string(),
            parameters: Some(r#"{"price": 2.5, "quantity": 4}"#.to_string()),
        };
        assert_eq!(execute_eval(&options).unwrap(), serde_json::json!(10.0));
    }

    #[test]
    fn test_execute_eval_missing_parameter() {
        let options = EvalOptions {
            expression: "price > 1".to_string(),
            parameters: None,
        };
        assert!(matches!(execute_eval(&options), Err(CliError::Eval(_))));
    }
}
