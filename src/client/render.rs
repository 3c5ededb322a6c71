//! Renders linearized tokens as client query text.

use std::fmt::Write;

use crate::{
    ast::{Modifier, PrefixOp, TernaryOp, Token},
    client::RenderError,
    evaluator::Parameters,
    stream::{OutputStream, TokenStream},
    value::format_general,
};

/// Turns one logical unit of a token stream into text per call.
pub struct ClientRenderer<'a> {
    parameters: &'a Parameters,
    date_format: &'a str,
}

impl<'a> ClientRenderer<'a> {
    pub fn new(parameters: &'a Parameters, date_format: &'a str) -> Self {
        ClientRenderer {
            parameters,
            date_format,
        }
    }

    /// Consumes the next unit from `stream` and returns its fragment.
    ///
    /// Operators that render around their left operand take it back from
    /// `output`; operators that need a right operand render it recursively.
    pub fn render_next(
        &self,
        stream: &mut TokenStream,
        output: &mut OutputStream,
    ) -> Result<String, RenderError> {
        let token = stream
            .next()
            .ok_or_else(|| RenderError::MissingOperand("end of expression".to_string()))?;

        let fragment = match &token {
            Token::Pattern(re) => format!("'{}'", re.as_str()),
            Token::Time(time) => {
                let mut formatted = String::new();
                write!(formatted, "'{}'", time.format(self.date_format))
                    .map_err(|_| RenderError::InvalidDateFormat(self.date_format.to_string()))?;
                formatted
            }

            Token::Boolean(true) => "TRUE".to_string(),
            Token::Boolean(false) => "FALSE".to_string(),

            Token::LogicalOp(_) | Token::Comparator(_) | Token::String(_) => token.to_string(),

            Token::Variable(name) => match self.parameters.get(name) {
                Some(value) => value.to_string(),
                None => name.clone(),
            },
            Token::Numeric(n) => format_general(*n),

            Token::Ternary(op) => match op {
                TernaryOp::Coalesce => {
                    let left = take_left(output, &token)?;
                    let right = self.render_next(stream, output)?;
                    format!("IF({} == NULL, {}, {})", left, right, left)
                }
                TernaryOp::TernaryTrue => take_left(output, &token)?,
                TernaryOp::TernaryFalse => {
                    return Err(RenderError::Unsupported(
                        "Ternary operators are unsupported in SQL output".to_string(),
                    ));
                }
            },

            Token::Prefix(PrefixOp::Invert) => {
                let next = stream.peek();
                let right = self.render_next(stream, output)?;
                if next == Some(Token::Clause) {
                    format!("NOT {}", right)
                } else {
                    format!("NOT ({})", right)
                }
            }
            Token::Prefix(op) => {
                let right = self.render_next(stream, output)?;
                format!("{}{}", op, right)
            }

            Token::Modifier(Modifier::Exponent) => {
                let left = take_left(output, &token)?;
                let right = self.render_next(stream, output)?;
                format!("{}^{}", left, right)
            }
            Token::Modifier(Modifier::Modulus) => {
                let left = take_left(output, &token)?;
                let right = self.render_next(stream, output)?;
                format!("{} % {}", left, right)
            }
            Token::Modifier(op) => op.to_string(),

            Token::Clause => "(".to_string(),
            Token::ClauseClose => ")".to_string(),
            Token::Separator => ",".to_string(),

            Token::Function(_) => {
                return Err(RenderError::UnrecognizedToken {
                    kind: token.kind(),
                    value: token.to_string(),
                });
            }
        };

        Ok(fragment)
    }
}

/// Reclaims the fragment rendered just before an infix operator.
fn take_left(output: &mut OutputStream, operator: &Token) -> Result<String, RenderError> {
    output
        .rollback()
        .ok_or_else(|| RenderError::MissingOperand(operator.to_string()))
}
