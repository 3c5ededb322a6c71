//! Linearizes a stage tree into infix tokens, simplifying as it goes.

use log::{debug, trace};
use thiserror::Error;

use crate::{
    ast::{EvaluationStage, LogicalOp, OperatorSymbol, Token},
    evaluator::{EvalError, Parameters, evaluate},
    lexer::{LexError, Lexer, lex},
    value::Value,
    parser::{ParseError, build_expression_from_tokens},
};

/// Why a token sequence was left unfolded. Never surfaced to callers.
#[derive(Error, Debug)]
enum FoldSkip {
    #[error("not a complete expression: {0}")]
    Parse(#[from] ParseError),

    #[error("not evaluable: {0}")]
    Eval(#[from] EvalError),

    #[error("result does not lex: {0}")]
    Lex(#[from] LexError),

    #[error("{0} has no literal form")]
    NoLiteral(&'static str),
}

/// Returns the tokens of `stage` in infix order.
///
/// Every node's sequence is simplified before its parent sees it: a `true`
/// operand of `&&` is dropped, and any sequence that evaluates against
/// `parameters` is replaced by its literal value.
pub fn linearize(stage: Option<&EvaluationStage>, parameters: &Parameters) -> Vec<Token> {
    let Some(stage) = stage else {
        return Vec::new();
    };

    let grouped = stage.symbol == OperatorSymbol::Noop;
    let mut tokens = Vec::new();

    if grouped {
        tokens.push(Token::Clause);
    }

    let left = linearize(stage.left.as_deref(), parameters);
    if keeps_leading(&left, stage) {
        tokens.extend(left);
        if let Some(token) = &stage.original_token {
            tokens.push(token.clone());
        }
    }

    let right = linearize(stage.right.as_deref(), parameters);
    if keeps_trailing(&mut tokens, &right) {
        tokens.extend(right);
    }

    if grouped {
        tokens.push(Token::ClauseClose);
    }

    fold(tokens, parameters)
}

/// False when `left` is a lone `true` under `&&`; the operand and the
/// operator are then both dropped.
fn keeps_leading(left: &[Token], stage: &EvaluationStage) -> bool {
    !(stage.is_logical_and() && left.len() == 1 && left[0].is_true())
}

/// False when `right` is a lone `true` following a logical operator. A
/// trailing `&&` is popped; other logical operators stay in place.
fn keeps_trailing(tokens: &mut Vec<Token>, right: &[Token]) -> bool {
    if right.len() != 1 || !right[0].is_true() {
        return true;
    }

    match tokens.last() {
        Some(Token::LogicalOp(LogicalOp::And)) => {
            tokens.pop();
            false
        }
        Some(Token::LogicalOp(_)) => false,
        _ => true,
    }
}

/// Replaces a multi-token sequence with the literal it evaluates to, or
/// returns it unchanged.
pub fn fold(tokens: Vec<Token>, parameters: &Parameters) -> Vec<Token> {
    if tokens.len() <= 1 {
        return tokens;
    }

    match try_fold(&tokens, parameters) {
        Ok(folded) => {
            trace!("Folded {} tokens into {:?}", tokens.len(), folded);
            folded
        }
        Err(reason) => {
            debug!("Left {} tokens unfolded: {}", tokens.len(), reason);
            tokens
        }
    }
}

fn try_fold(tokens: &[Token], parameters: &Parameters) -> Result<Vec<Token>, FoldSkip> {
    let stage = build_expression_from_tokens(tokens.to_vec())?;
    let value = evaluate(&stage, parameters)?;
    let text = value
        .literal_text()
        .ok_or(FoldSkip::NoLiteral(value.type_name()))?;
    // A folded string stays a string even when it reads as a date
    let tokens = match value {
        Value::String(_) => Lexer::new(&text).without_time_detection().tokenize()?,
        _ => lex(&text, None)?,
    };
    Ok(tokens)
}
