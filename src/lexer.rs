use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use thiserror::Error;

use crate::ast::{
    Comparator, ExpressionFunction, LogicalOp, Modifier, PrefixOp, TernaryOp, Token,
};

/// Errors raised while splitting source text into tokens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("Unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Unterminated variable name starting at position {position}")]
    UnterminatedVariable { position: usize },

    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Date and date-time layouts a string literal may use to become a time.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn two_char_operator(pair: &str) -> Option<Token> {
    let token = match pair {
        "**" => Token::Modifier(Modifier::Exponent),
        "==" => Token::Comparator(Comparator::Equal),
        "!=" => Token::Comparator(Comparator::NotEqual),
        ">=" => Token::Comparator(Comparator::GreaterEqual),
        "<=" => Token::Comparator(Comparator::LessEqual),
        "=~" => Token::Comparator(Comparator::Matches),
        "!~" => Token::Comparator(Comparator::NotMatches),
        "&&" => Token::LogicalOp(LogicalOp::And),
        "||" => Token::LogicalOp(LogicalOp::Or),
        "<<" => Token::Modifier(Modifier::ShiftLeft),
        ">>" => Token::Modifier(Modifier::ShiftRight),
        "??" => Token::Ternary(TernaryOp::Coalesce),
        _ => return None,
    };
    Some(token)
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    functions: HashMap<String, ExpressionFunction>,
    previous: Option<Token>,
    detect_times: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            functions: HashMap::new(),
            previous: None,
            detect_times: true,
        }
    }

    /// Lexer that recognises the given function names as calls.
    pub fn with_functions(input: &str, functions: &[ExpressionFunction]) -> Self {
        let mut lexer = Lexer::new(input);
        lexer.functions = functions
            .iter()
            .map(|f| (f.name().to_string(), f.clone()))
            .collect();
        lexer
    }

    /// Keeps date-like string literals as strings.
    pub fn without_time_detection(mut self) -> Self {
        self.detect_times = false;
        self
    }

    /// Lexes the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// An operand is expected when nothing that ends a value precedes us.
    fn expects_operand(&self) -> bool {
        !self.previous.as_ref().is_some_and(Token::ends_operand)
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_bracketed_variable(&mut self) -> Result<String, LexError> {
        let start = self.position;
        self.advance(); // Consume '['

        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == ']' {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedVariable { position: start })
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some(c @ ('"' | '\'' | '\\')) => result.push(c),
                        // Unknown escapes are kept so regex classes like \d survive
                        Some(c) => {
                            result.push('\\');
                            result.push(c);
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;

        if self.current_char() == Some('0') && matches!(self.peek_char(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            let mut digits = String::new();
            while let Some(ch) = self.current_char().filter(|c| c.is_ascii_hexdigit()) {
                digits.push(ch);
                self.advance();
            }
            return i64::from_str_radix(&digits, 16)
                .map(|n| Token::Numeric(n as f64))
                .map_err(|_| LexError::InvalidNumber {
                    text: format!("0x{}", digits),
                    position: start,
                });
        }

        let mut number = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Exponent, only when digits follow: `1e+06`, `2.5E-3`
        if let Some(e @ ('e' | 'E')) = self.current_char() {
            let sign = self.peek_char(1).filter(|c| *c == '+' || *c == '-');
            let digit_offset = if sign.is_some() { 2 } else { 1 };
            if self.peek_char(digit_offset).is_some_and(|c| c.is_ascii_digit()) {
                number.push(e);
                self.advance();
                if let Some(s) = sign {
                    number.push(s);
                    self.advance();
                }
                while let Some(ch) = self.current_char().filter(|c| c.is_ascii_digit()) {
                    number.push(ch);
                    self.advance();
                }
            }
        }

        number
            .parse::<f64>()
            .map(Token::Numeric)
            .map_err(|_| LexError::InvalidNumber {
                text: number,
                position: start,
            })
    }

    fn read_operator(&mut self, ch: char) -> Result<Token, LexError> {
        let position = self.position;

        if self.expects_operand() {
            let prefix = match ch {
                '-' => Some(PrefixOp::Negate),
                '!' => Some(PrefixOp::Invert),
                '~' => Some(PrefixOp::BitwiseNot),
                _ => None,
            };
            if let Some(op) = prefix {
                self.advance();
                return Ok(Token::Prefix(op));
            }
        }

        if let Some(next) = self.peek_char(1) {
            let pair: String = [ch, next].iter().collect();
            if let Some(token) = two_char_operator(&pair) {
                self.advance();
                self.advance();
                return Ok(token);
            }
        }

        let token = match ch {
            '>' => Token::Comparator(Comparator::GreaterThan),
            '<' => Token::Comparator(Comparator::LessThan),
            '+' => Token::Modifier(Modifier::Add),
            '-' => Token::Modifier(Modifier::Subtract),
            '*' => Token::Modifier(Modifier::Multiply),
            '/' => Token::Modifier(Modifier::Divide),
            '%' => Token::Modifier(Modifier::Modulus),
            '&' => Token::Modifier(Modifier::BitwiseAnd),
            '|' => Token::Modifier(Modifier::BitwiseOr),
            '^' => Token::Modifier(Modifier::BitwiseXor),
            '?' => Token::Ternary(TernaryOp::TernaryTrue),
            ':' => Token::Ternary(TernaryOp::TernaryFalse),
            _ => return Err(LexError::UnexpectedCharacter { ch, position }),
        };
        self.advance();
        Ok(token)
    }

    fn string_token(&self, text: String) -> Result<Token, LexError> {
        if let Some(Token::Comparator(op)) = &self.previous
            && op.is_regex()
        {
            return Regex::new(&text)
                .map(Token::Pattern)
                .map_err(|e| LexError::InvalidPattern {
                    pattern: text.clone(),
                    message: e.to_string(),
                });
        }

        if !self.detect_times {
            return Ok(Token::String(text));
        }

        Ok(match parse_time(&text) {
            Some(time) => Token::Time(time),
            None => Token::String(text),
        })
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => return Ok(None),
            Some('(') => {
                self.advance();
                Token::Clause
            }
            Some(')') => {
                self.advance();
                Token::ClauseClose
            }
            Some(',') => {
                self.advance();
                Token::Separator
            }
            Some('[') => Token::Variable(self.read_bracketed_variable()?),
            Some(quote @ ('"' | '\'')) => {
                let text = self.read_string(quote)?;
                self.string_token(text)?
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    s if s.eq_ignore_ascii_case("in") => Token::Comparator(Comparator::In),
                    _ => match self.functions.get(&ident) {
                        Some(function) => Token::Function(function.clone()),
                        None => Token::Variable(ident),
                    },
                }
            }
            Some(ch) => self.read_operator(ch)?,
        };

        self.previous = Some(token.clone());
        Ok(Some(token))
    }
}

/// Lexes `input` into tokens; the optional functions are recognised as calls.
pub fn lex(input: &str, functions: Option<&[ExpressionFunction]>) -> Result<Vec<Token>, LexError> {
    match functions {
        Some(functions) => Lexer::with_functions(input, functions).tokenize(),
        None => Lexer::new(input).tokenize(),
    }
}

/// Interprets a string literal as a time when it matches a known layout.
pub fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(time.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}

#[test]
fn test_keywords() {
    let tokens = Lexer::new("true false in IN").tokenize().unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Boolean(true),
            Token::Boolean(false),
            Token::Comparator(Comparator::In),
            Token::Comparator(Comparator::In),
        ]
    );
}

#[test]
fn test_prefix_context() {
    let tokens = Lexer::new("-a - -1").tokenize().unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Prefix(PrefixOp::Negate),
            Token::Variable("a".to_string()),
            Token::Modifier(Modifier::Subtract),
            Token::Prefix(PrefixOp::Negate),
            Token::Numeric(1.0),
        ]
    );
}

#[test]
fn test_without_time_detection() {
    let tokens = Lexer::new("'2014-01-02'")
        .without_time_detection()
        .tokenize()
        .unwrap();
    assert_eq!(tokens, vec![Token::String("2014-01-02".to_string())]);
}
