use std::collections::HashMap;

use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use thiserror::Error;

use crate::{
    ast::{
        Comparator, EvaluationStage, LogicalOp, Modifier, OperatorSymbol, PrefixOp, TernaryOp,
        Token,
    },
    value::Value,
};

/// Variable bindings, by name.
pub type Parameters = HashMap<String, Value>;

/// Errors that can occur during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Variable with no binding
    #[error("No parameter '{0}' found")]
    MissingParameter(String),

    /// Operand of the wrong type for its operator
    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A host function returned an error
    #[error("Function '{name}' failed: {message}")]
    Function { name: String, message: String },

    /// A stage is missing a child or token its operator needs
    #[error("Malformed stage: {0}")]
    MalformedStage(String),
}

/// Evaluates a stage tree against a set of parameters.
///
/// Evaluation is strict: both operands of every binary stage are evaluated,
/// so a missing parameter anywhere in the tree is an error.
///
/// # Examples
///
/// ```
/// use exprql::{Expression, Parameters, Value};
///
/// let expression = Expression::new("(requests_made * requests_succeeded / 100) >= 90").unwrap();
///
/// let mut parameters = Parameters::new();
/// parameters.insert("requests_made".to_string(), Value::Float(100.0));
/// parameters.insert("requests_succeeded".to_string(), Value::Float(80.0));
///
/// assert_eq!(expression.evaluate(&parameters).unwrap(), Value::Boolean(false));
/// ```
pub struct Evaluator<'a> {
    parameters: &'a Parameters,
}

impl<'a> Evaluator<'a> {
    pub fn new(parameters: &'a Parameters) -> Self {
        Evaluator { parameters }
    }

    pub fn eval_stage(&self, stage: &EvaluationStage) -> Result<Value, EvalError> {
        match stage.symbol {
            OperatorSymbol::Value => self.eval_leaf(stage),
            OperatorSymbol::Noop => match &stage.right {
                Some(inner) => self.eval_stage(inner),
                None => Ok(Value::Array(Vec::new())),
            },
            OperatorSymbol::Logical(op) => {
                let (left, right) = self.eval_operands(stage)?;
                apply_logical(op, &left, &right)
            }
            OperatorSymbol::Comparator(op) if op.is_regex() => self.eval_match(op, stage),
            OperatorSymbol::Comparator(op) => {
                let (left, right) = self.eval_operands(stage)?;
                apply_comparator(op, &left, &right)
            }
            OperatorSymbol::Modifier(op) => {
                let (left, right) = self.eval_operands(stage)?;
                apply_modifier(op, &left, &right)
            }
            OperatorSymbol::Prefix(op) => {
                let operand = self.eval_child(&stage.right, "prefix operand")?;
                apply_prefix(op, &operand)
            }
            OperatorSymbol::Ternary(op) => {
                let (left, right) = self.eval_operands(stage)?;
                apply_ternary(op, left, right)
            }
            OperatorSymbol::Separate => {
                let (left, right) = self.eval_operands(stage)?;
                let flatten = stage
                    .left
                    .as_ref()
                    .is_some_and(|l| l.symbol == OperatorSymbol::Separate);
                match left {
                    Value::Array(mut items) if flatten => {
                        items.push(right);
                        Ok(Value::Array(items))
                    }
                    left => Ok(Value::Array(vec![left, right])),
                }
            }
            OperatorSymbol::Functional => self.eval_function(stage),
        }
    }

    fn eval_leaf(&self, stage: &EvaluationStage) -> Result<Value, EvalError> {
        match &stage.original_token {
            Some(Token::Boolean(b)) => Ok(Value::Boolean(*b)),
            Some(Token::Numeric(n)) => Ok(Value::Float(*n)),
            Some(Token::String(s)) => Ok(Value::String(s.clone())),
            Some(Token::Pattern(re)) => Ok(Value::String(re.as_str().to_string())),
            Some(Token::Time(t)) => Ok(Value::Time(*t)),
            Some(Token::Variable(name)) => self
                .parameters
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::MissingParameter(name.clone())),
            Some(token) => Err(EvalError::MalformedStage(format!(
                "'{}' of kind {} is not a value",
                token,
                token.kind()
            ))),
            None => Err(EvalError::MalformedStage("value stage without a token".to_string())),
        }
    }

    fn eval_child(
        &self,
        child: &Option<Box<EvaluationStage>>,
        what: &str,
    ) -> Result<Value, EvalError> {
        match child {
            Some(stage) => self.eval_stage(stage),
            None => Err(EvalError::MalformedStage(format!("missing {}", what))),
        }
    }

    fn eval_operands(&self, stage: &EvaluationStage) -> Result<(Value, Value), EvalError> {
        let left = self.eval_child(&stage.left, "left operand")?;
        let right = self.eval_child(&stage.right, "right operand")?;
        Ok((left, right))
    }

    fn eval_match(&self, op: Comparator, stage: &EvaluationStage) -> Result<Value, EvalError> {
        let left = self.eval_child(&stage.left, "left operand")?;
        let Value::String(subject) = &left else {
            return Err(EvalError::TypeError(format!(
                "Cannot match {} against a pattern",
                left.type_name()
            )));
        };

        // Literal patterns were compiled by the lexer
        let compiled;
        let pattern = match stage.right.as_deref() {
            Some(EvaluationStage {
                original_token: Some(Token::Pattern(re)),
                ..
            }) => re,
            _ => {
                let source = match self.eval_child(&stage.right, "pattern")? {
                    Value::String(s) => s,
                    other => {
                        return Err(EvalError::TypeError(format!(
                            "Cannot use {} as a pattern",
                            other.type_name()
                        )));
                    }
                };
                compiled = Regex::new(&source).map_err(|e| EvalError::InvalidPattern {
                    pattern: source.clone(),
                    message: e.to_string(),
                })?;
                &compiled
            }
        };

        let matched = pattern.is_match(subject);
        Ok(Value::Boolean(if op == Comparator::Matches {
            matched
        } else {
            !matched
        }))
    }

    fn eval_function(&self, stage: &EvaluationStage) -> Result<Value, EvalError> {
        let Some(Token::Function(function)) = &stage.original_token else {
            return Err(EvalError::MalformedStage(
                "function stage without a function".to_string(),
            ));
        };

        let arguments = match &stage.right {
            None => Vec::new(),
            Some(right) => match self.eval_stage(right)? {
                Value::Array(items) => items,
                single => vec![single],
            },
        };

        function
            .call(&arguments)
            .map_err(|message| EvalError::Function {
                name: function.name().to_string(),
                message,
            })
    }
}

/// Evaluates `stage` against `parameters`.
pub fn evaluate(stage: &EvaluationStage, parameters: &Parameters) -> Result<Value, EvalError> {
    Evaluator::new(parameters).eval_stage(stage)
}

fn apply_logical(op: LogicalOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_bool(), right.as_bool()) else {
        return Err(EvalError::TypeError(format!(
            "Cannot apply '{}' to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        )));
    };

    Ok(Value::Boolean(match op {
        LogicalOp::And => a && b,
        LogicalOp::Or => a || b,
    }))
}

fn apply_comparator(op: Comparator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    use std::cmp::Ordering;

    let ordering = || -> Result<Option<Ordering>, EvalError> {
        match (left, right) {
            (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b)),
            (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
            (Value::Time(a), Value::Time(b)) => Ok(Some(a.cmp(b))),
            (a, b) => Err(EvalError::TypeError(format!(
                "Cannot compare {} and {} with '{}'",
                a.type_name(),
                b.type_name(),
                op
            ))),
        }
    };

    let result = match op {
        Comparator::Equal => left == right,
        Comparator::NotEqual => left != right,
        Comparator::GreaterThan => ordering()? == Some(Ordering::Greater),
        Comparator::GreaterEqual => {
            matches!(ordering()?, Some(Ordering::Greater | Ordering::Equal))
        }
        Comparator::LessThan => ordering()? == Some(Ordering::Less),
        Comparator::LessEqual => matches!(ordering()?, Some(Ordering::Less | Ordering::Equal)),
        Comparator::In => match right {
            Value::Array(items) => items.contains(left),
            other => {
                return Err(EvalError::TypeError(format!(
                    "Right side of 'in' must be an array, got {}",
                    other.type_name()
                )));
            }
        },
        Comparator::Matches | Comparator::NotMatches => {
            unreachable!("regex comparators are evaluated with their stage")
        }
    };
    Ok(Value::Boolean(result))
}

/// Runs `op` in decimal arithmetic when both operands convert.
fn decimal_op(a: f64, b: f64, op: fn(Decimal, Decimal) -> Option<Decimal>) -> Option<f64> {
    let ad = Decimal::from_f64(a)?;
    let bd = Decimal::from_f64(b)?;
    op(ad, bd)?.to_f64()
}

fn shift(value: i64, by: i64, left: bool) -> i64 {
    if !(0..64).contains(&by) {
        return if !left && value < 0 { -1 } else { 0 };
    }
    if left { value << by } else { value >> by }
}

fn apply_modifier(op: Modifier, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => {
            let (a, b) = (*a, *b);
            let result = match op {
                Modifier::Add => decimal_op(a, b, Decimal::checked_add).unwrap_or(a + b),
                Modifier::Subtract => decimal_op(a, b, Decimal::checked_sub).unwrap_or(a - b),
                Modifier::Multiply => decimal_op(a, b, Decimal::checked_mul).unwrap_or(a * b),
                Modifier::Divide => a / b,
                Modifier::Modulus => a % b,
                Modifier::Exponent => a.powf(b),
                Modifier::BitwiseAnd => ((a as i64) & (b as i64)) as f64,
                Modifier::BitwiseOr => ((a as i64) | (b as i64)) as f64,
                Modifier::BitwiseXor => ((a as i64) ^ (b as i64)) as f64,
                Modifier::ShiftLeft => shift(a as i64, b as i64, true) as f64,
                Modifier::ShiftRight => shift(a as i64, b as i64, false) as f64,
            };
            Ok(Value::Float(result))
        }
        (Value::String(_), _) | (_, Value::String(_)) if op == Modifier::Add => {
            Ok(Value::String(format!("{}{}", left, right)))
        }
        (a, b) => Err(EvalError::TypeError(format!(
            "Cannot apply '{}' to {} and {}",
            op,
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn apply_prefix(op: PrefixOp, operand: &Value) -> Result<Value, EvalError> {
    match (op, operand) {
        (PrefixOp::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
        (PrefixOp::BitwiseNot, Value::Float(n)) => Ok(Value::Float(!(*n as i64) as f64)),
        (PrefixOp::Invert, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (op, v) => Err(EvalError::TypeError(format!(
            "Cannot apply prefix '{}' to {}",
            op,
            v.type_name()
        ))),
    }
}

fn apply_ternary(op: TernaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    match op {
        TernaryOp::TernaryTrue => match left {
            Value::Boolean(true) => Ok(right),
            Value::Boolean(false) => Ok(Value::Null),
            other => Err(EvalError::TypeError(format!(
                "Ternary condition must be a boolean, got {}",
                other.type_name()
            ))),
        },
        TernaryOp::TernaryFalse | TernaryOp::Coalesce => {
            if left.is_null() {
                Ok(right)
            } else {
                Ok(left)
            }
        }
    }
}
