use std::fmt;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::{
    ast::{Comparator, ExpressionFunction, LogicalOp, Modifier, PrefixOp, TernaryOp},
    value::format_general,
};

/// A lexical token.
///
/// The payload of every variant is fixed by the variant itself, so a token can
/// never carry a value that disagrees with its kind.
#[derive(Debug, Clone)]
pub enum Token {
    // Literals
    /// Boolean literal
    ///
    /// # Examples
    /// ```text
    /// true
    /// false
    /// ```
    Boolean(bool),

    /// Number literal. All numbers are floating point.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.25
    /// 1e+06
    /// 0xFF
    /// ```
    Numeric(f64),

    /// String literal in single or double quotes
    String(String),

    /// Regular expression; a string literal that follows `=~` or `!~`
    ///
    /// # Examples
    /// ```text
    /// name =~ "^b.*"
    /// ```
    Pattern(Regex),

    /// Timestamp; a string literal that parses as a date or date-time
    ///
    /// # Examples
    /// ```text
    /// '2014-01-02'
    /// "2014-01-02 14:12:22"
    /// ```
    Time(DateTime<Utc>),

    /// Parameter reference, bare or in brackets
    ///
    /// # Examples
    /// ```text
    /// age
    /// response.status
    /// [response time]
    /// ```
    Variable(String),

    /// Call of a registered function
    Function(ExpressionFunction),

    // Operators
    LogicalOp(LogicalOp),
    Comparator(Comparator),
    Prefix(PrefixOp),
    Modifier(Modifier),
    Ternary(TernaryOp),

    // Structure
    /// Opening parenthesis
    Clause,
    /// Closing parenthesis
    ClauseClose,
    /// Comma between arguments or array elements
    Separator,
}

/// Tag of a [`Token`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Boolean,
    Numeric,
    String,
    Pattern,
    Time,
    Variable,
    Function,
    LogicalOp,
    Comparator,
    Prefix,
    Modifier,
    Ternary,
    Clause,
    ClauseClose,
    Separator,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Boolean(_) => TokenKind::Boolean,
            Token::Numeric(_) => TokenKind::Numeric,
            Token::String(_) => TokenKind::String,
            Token::Pattern(_) => TokenKind::Pattern,
            Token::Time(_) => TokenKind::Time,
            Token::Variable(_) => TokenKind::Variable,
            Token::Function(_) => TokenKind::Function,
            Token::LogicalOp(_) => TokenKind::LogicalOp,
            Token::Comparator(_) => TokenKind::Comparator,
            Token::Prefix(_) => TokenKind::Prefix,
            Token::Modifier(_) => TokenKind::Modifier,
            Token::Ternary(_) => TokenKind::Ternary,
            Token::Clause => TokenKind::Clause,
            Token::ClauseClose => TokenKind::ClauseClose,
            Token::Separator => TokenKind::Separator,
        }
    }

    /// True when the token is a complete operand, i.e. something an infix
    /// operator may follow.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Boolean(_)
                | Token::Numeric(_)
                | Token::String(_)
                | Token::Pattern(_)
                | Token::Time(_)
                | Token::Variable(_)
                | Token::ClauseClose
        )
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Token::Boolean(true))
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Boolean(a), Token::Boolean(b)) => a == b,
            (Token::Numeric(a), Token::Numeric(b)) => a == b,
            (Token::String(a), Token::String(b)) => a == b,
            (Token::Pattern(a), Token::Pattern(b)) => a.as_str() == b.as_str(),
            (Token::Time(a), Token::Time(b)) => a == b,
            (Token::Variable(a), Token::Variable(b)) => a == b,
            (Token::Function(a), Token::Function(b)) => a == b,
            (Token::LogicalOp(a), Token::LogicalOp(b)) => a == b,
            (Token::Comparator(a), Token::Comparator(b)) => a == b,
            (Token::Prefix(a), Token::Prefix(b)) => a == b,
            (Token::Modifier(a), Token::Modifier(b)) => a == b,
            (Token::Ternary(a), Token::Ternary(b)) => a == b,
            (Token::Clause, Token::Clause)
            | (Token::ClauseClose, Token::ClauseClose)
            | (Token::Separator, Token::Separator) => true,
            _ => false,
        }
    }
}

/// The token's payload in its default textual form.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Boolean(b) => write!(f, "{}", b),
            Token::Numeric(n) => f.write_str(&format_general(*n)),
            Token::String(s) => f.write_str(s),
            Token::Pattern(re) => f.write_str(re.as_str()),
            Token::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Token::Variable(name) => f.write_str(name),
            Token::Function(func) => f.write_str(func.name()),
            Token::LogicalOp(op) => write!(f, "{}", op),
            Token::Comparator(op) => write!(f, "{}", op),
            Token::Prefix(op) => write!(f, "{}", op),
            Token::Modifier(op) => write!(f, "{}", op),
            Token::Ternary(op) => write!(f, "{}", op),
            Token::Clause => f.write_str("("),
            Token::ClauseClose => f.write_str(")"),
            Token::Separator => f.write_str(","),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Numeric => "NUMERIC",
            TokenKind::String => "STRING",
            TokenKind::Pattern => "PATTERN",
            TokenKind::Time => "TIME",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Function => "FUNCTION",
            TokenKind::LogicalOp => "LOGICALOP",
            TokenKind::Comparator => "COMPARATOR",
            TokenKind::Prefix => "PREFIX",
            TokenKind::Modifier => "MODIFIER",
            TokenKind::Ternary => "TERNARY",
            TokenKind::Clause => "CLAUSE",
            TokenKind::ClauseClose => "CLAUSE_CLOSE",
            TokenKind::Separator => "SEPARATOR",
        };
        f.write_str(name)
    }
}
