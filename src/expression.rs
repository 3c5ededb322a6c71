use std::fmt;

use thiserror::Error;

use crate::{
    ast::{EvaluationStage, ExpressionFunction, Token},
    client::{RenderError, render_client_expression},
    evaluator::{EvalError, Parameters, evaluate},
    lexer::{LexError, lex},
    parser::{ParseError, build_expression_from_tokens},
    value::Value,
};

/// Date format used for time literals in client expressions unless
/// overridden with [`Expression::with_query_date_format`].
pub const DEFAULT_QUERY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Errors raised while building an [`Expression`] from text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A parsed and planned expression.
///
/// Immutable once built; evaluation and rendering only read it, so one
/// expression can serve many parameter sets, from many threads.
///
/// # Examples
///
/// ```
/// use exprql::{Expression, Parameters, Value};
///
/// let expression = Expression::new("true && age > 18 + 2").unwrap();
/// let parameters = Parameters::new();
///
/// assert_eq!(expression.to_client_expression(&parameters).unwrap(), "age > 20");
/// ```
#[derive(Debug, Clone)]
pub struct Expression {
    input: String,
    tokens: Vec<Token>,
    stage: EvaluationStage,
    query_date_format: String,
}

impl Expression {
    pub fn new(input: &str) -> Result<Self, ExpressionError> {
        Self::build(input, lex(input, None)?)
    }

    /// Parses `input`, recognising calls to the given functions.
    pub fn with_functions(
        input: &str,
        functions: &[ExpressionFunction],
    ) -> Result<Self, ExpressionError> {
        Self::build(input, lex(input, Some(functions))?)
    }

    /// Plans an already lexed token sequence.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self, ParseError> {
        let input = tokens
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let stage = build_expression_from_tokens(tokens.clone())?;
        Ok(Expression {
            input,
            tokens,
            stage,
            query_date_format: DEFAULT_QUERY_DATE_FORMAT.to_string(),
        })
    }

    fn build(input: &str, tokens: Vec<Token>) -> Result<Self, ExpressionError> {
        let stage = build_expression_from_tokens(tokens.clone())?;
        Ok(Expression {
            input: input.to_string(),
            tokens,
            stage,
            query_date_format: DEFAULT_QUERY_DATE_FORMAT.to_string(),
        })
    }

    /// Sets the chrono format used for time literals in client expressions.
    pub fn with_query_date_format(mut self, format: impl Into<String>) -> Self {
        self.query_date_format = format.into();
        self
    }

    pub fn query_date_format(&self) -> &str {
        &self.query_date_format
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn stage(&self) -> &EvaluationStage {
        &self.stage
    }

    /// Distinct variable names, in order of first appearance.
    pub fn vars(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Token::Variable(name) = token
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    pub fn evaluate(&self, parameters: &Parameters) -> Result<Value, EvalError> {
        evaluate(&self.stage, parameters)
    }

    /// Renders a simplified, SQL-compatible form of this expression.
    ///
    /// Bound variables are substituted and constant subexpressions folded;
    /// unbound variables are kept by name.
    pub fn to_client_expression(&self, parameters: &Parameters) -> Result<String, RenderError> {
        render_client_expression(Some(&self.stage), parameters, &self.query_date_format)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}
