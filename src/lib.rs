pub mod ast;
pub mod client;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod stream;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{EvaluationStage, ExpressionFunction, OperatorSymbol, Token, TokenKind};
pub use client::{RenderError, render_client_expression};
pub use evaluator::{EvalError, Evaluator, Parameters};
pub use expression::{DEFAULT_QUERY_DATE_FORMAT, Expression, ExpressionError};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use value::Value;
