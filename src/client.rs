//! Client expressions: a simplified, SQL-compatible rendering of a stage tree.
//!
//! The tree is first linearized into infix tokens by [`walker::linearize`],
//! which drops redundant `true` operands of `&&` and folds every subexpression
//! that evaluates against the given parameters. [`render::ClientRenderer`]
//! then turns the tokens into text, one logical unit at a time.
//!
//! ```text
//! true && x > 1           ->  x > 1
//! 2 + 3 > x               ->  5 > x
//! a ?? b                  ->  IF(a == NULL, b, a)
//! !(a)                    ->  NOT ( a )
//! a ? b : c               ->  error: ternary operators are unsupported
//! ```

pub mod render;
pub mod walker;

use thiserror::Error;

pub use render::ClientRenderer;
pub use walker::{fold, linearize};

use crate::{
    ast::{EvaluationStage, TokenKind},
    evaluator::Parameters,
    stream::{OutputStream, TokenStream},
};

/// Errors raised while rendering a client expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The target language has no equivalent construct
    #[error("{0}")]
    Unsupported(String),

    #[error("Unrecognized query token '{value}' of kind '{kind}'")]
    UnrecognizedToken { kind: TokenKind, value: String },

    /// An operator with nothing to apply to
    #[error("Missing operand for '{0}'")]
    MissingOperand(String),

    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),
}

/// Renders `stage` as a client expression.
///
/// Fragments are joined with single spaces. The first error aborts the whole
/// rendering; no partial output is returned.
pub fn render_client_expression(
    stage: Option<&EvaluationStage>,
    parameters: &Parameters,
    date_format: &str,
) -> Result<String, RenderError> {
    let tokens = linearize(stage, parameters);
    let mut stream = TokenStream::new(tokens);
    let mut transactions = OutputStream::new();
    let renderer = ClientRenderer::new(parameters, date_format);

    while stream.has_next() {
        let transaction = renderer.render_next(&mut stream, &mut transactions)?;
        transactions.add(transaction);
    }

    Ok(transactions.create_string(" "))
}
