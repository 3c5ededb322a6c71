//! # exprql - Expression Model
//!
//! This module defines the token and stage types shared by the lexer, the stage
//! planner, the evaluator and the client renderer.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Operator families and the stage operator symbol
//! - **[stage]** - Nodes of a planned expression tree
//! - **[function]** - Host functions callable from expressions
//!
//! ## Pipeline
//!
//! ```text
//! text -> Lexer -> [Token] -> Parser -> EvaluationStage
//!                                          |-> evaluate            -> Value
//!                                          '-> linearize + render  -> client string
//! ```
//!
//! ## Example
//!
//! ```text
//! (requests_made * requests_succeeded / 100) >= 90 && true
//! ```
//!
//! With `requests_made` and `requests_succeeded` unbound, the client form is
//! `( requests_made * requests_succeeded / 100 ) >= 90`: the redundant
//! `&& true` is dropped and nothing can be folded.
pub mod function;
pub mod operators;
pub mod stage;
pub mod tokens;

pub use function::ExpressionFunction;
pub use operators::{Comparator, LogicalOp, Modifier, OperatorSymbol, PrefixOp, TernaryOp};
pub use stage::EvaluationStage;
pub use tokens::{Token, TokenKind};
