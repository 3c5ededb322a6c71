use crate::ast::{OperatorSymbol, Token};

/// One node of a planned expression.
///
/// Leaves carry their literal or variable token and no children. A `Noop`
/// stage marks a parenthesized group: it has no token, and the grouped
/// expression is its right child.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationStage {
    pub symbol: OperatorSymbol,
    pub left: Option<Box<EvaluationStage>>,
    pub right: Option<Box<EvaluationStage>>,
    /// The token this stage was planned from; `None` for groupings.
    pub original_token: Option<Token>,
}

impl EvaluationStage {
    pub fn leaf(token: Token) -> Self {
        EvaluationStage {
            symbol: OperatorSymbol::Value,
            left: None,
            right: None,
            original_token: Some(token),
        }
    }

    pub fn group(inner: EvaluationStage) -> Self {
        EvaluationStage {
            symbol: OperatorSymbol::Noop,
            left: None,
            right: Some(Box::new(inner)),
            original_token: None,
        }
    }

    pub fn binary(
        symbol: OperatorSymbol,
        token: Token,
        left: EvaluationStage,
        right: EvaluationStage,
    ) -> Self {
        EvaluationStage {
            symbol,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            original_token: Some(token),
        }
    }

    /// A stage with only a right operand: prefixes and function calls.
    pub fn unary(symbol: OperatorSymbol, token: Token, right: Option<EvaluationStage>) -> Self {
        EvaluationStage {
            symbol,
            left: None,
            right: right.map(Box::new),
            original_token: Some(token),
        }
    }

    /// True when this stage applies logical AND.
    pub fn is_logical_and(&self) -> bool {
        matches!(self.original_token, Some(Token::LogicalOp(crate::ast::LogicalOp::And)))
    }
}
