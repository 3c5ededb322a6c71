use thiserror::Error;

use crate::{
    ast::{EvaluationStage, LogicalOp, Modifier, OperatorSymbol, Token, TokenKind},
    stream::TokenStream,
};

/// Errors raised while planning tokens into stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unexpected token '{value}' of kind {kind}")]
    UnexpectedToken { kind: TokenKind, value: String },

    #[error("Unbalanced parenthesis")]
    UnbalancedClause,

    #[error("Function '{0}' must be followed by an argument list")]
    MissingArguments(String),
}

impl ParseError {
    fn unexpected(token: &Token) -> Self {
        ParseError::UnexpectedToken {
            kind: token.kind(),
            value: token.to_string(),
        }
    }
}

type Level = fn(&mut Parser) -> Result<EvaluationStage, ParseError>;

/// Plans a token sequence into an [`EvaluationStage`] tree.
///
/// Binary operators are left-associative. Precedence, lowest first:
///
/// ```text
/// ,  ->  ? : ??  ->  ||  ->  &&  ->  == != < <= > >= =~ !~ in
///    ->  & | ^  ->  << >>  ->  + -  ->  * / %  ->  **  ->  - ! ~ (prefix)
/// ```
pub struct Parser {
    stream: TokenStream,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            stream: TokenStream::new(tokens),
        }
    }

    /// Parses the whole token sequence.
    pub fn parse(&mut self) -> Result<EvaluationStage, ParseError> {
        let stage = self.parse_separator()?;
        match self.stream.next() {
            None => Ok(stage),
            Some(Token::ClauseClose) => Err(ParseError::UnbalancedClause),
            Some(token) => Err(ParseError::unexpected(&token)),
        }
    }

    /// Folds `operand (op operand)*` into a left-leaning chain of stages.
    fn parse_left_assoc(
        &mut self,
        operand: Level,
        symbol_for: fn(&Token) -> Option<OperatorSymbol>,
    ) -> Result<EvaluationStage, ParseError> {
        let mut left = operand(self)?;

        while let Some(token) = self.stream.peek() {
            let Some(symbol) = symbol_for(&token) else {
                break;
            };
            self.stream.next();
            let right = operand(self)?;
            left = EvaluationStage::binary(symbol, token, left, right);
        }
        Ok(left)
    }

    fn parse_separator(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_ternary, |token| match token {
            Token::Separator => Some(OperatorSymbol::Separate),
            _ => None,
        })
    }

    fn parse_ternary(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_or, |token| match token {
            Token::Ternary(op) => Some(OperatorSymbol::Ternary(*op)),
            _ => None,
        })
    }

    fn parse_or(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_and, |token| match token {
            Token::LogicalOp(LogicalOp::Or) => Some(OperatorSymbol::Logical(LogicalOp::Or)),
            _ => None,
        })
    }

    fn parse_and(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_comparison, |token| match token {
            Token::LogicalOp(LogicalOp::And) => Some(OperatorSymbol::Logical(LogicalOp::And)),
            _ => None,
        })
    }

    fn parse_comparison(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_bitwise, |token| match token {
            Token::Comparator(op) => Some(OperatorSymbol::Comparator(*op)),
            _ => None,
        })
    }

    fn parse_bitwise(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_shift, |token| match token {
            Token::Modifier(
                op @ (Modifier::BitwiseAnd | Modifier::BitwiseOr | Modifier::BitwiseXor),
            ) => Some(OperatorSymbol::Modifier(*op)),
            _ => None,
        })
    }

    fn parse_shift(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_additive, |token| match token {
            Token::Modifier(op @ (Modifier::ShiftLeft | Modifier::ShiftRight)) => {
                Some(OperatorSymbol::Modifier(*op))
            }
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_multiplicative, |token| match token {
            Token::Modifier(op @ (Modifier::Add | Modifier::Subtract)) => {
                Some(OperatorSymbol::Modifier(*op))
            }
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_exponent, |token| match token {
            Token::Modifier(op @ (Modifier::Multiply | Modifier::Divide | Modifier::Modulus)) => {
                Some(OperatorSymbol::Modifier(*op))
            }
            _ => None,
        })
    }

    fn parse_exponent(&mut self) -> Result<EvaluationStage, ParseError> {
        self.parse_left_assoc(Parser::parse_prefix, |token| match token {
            Token::Modifier(Modifier::Exponent) => {
                Some(OperatorSymbol::Modifier(Modifier::Exponent))
            }
            _ => None,
        })
    }

    fn parse_prefix(&mut self) -> Result<EvaluationStage, ParseError> {
        match self.stream.peek() {
            Some(token @ Token::Prefix(op)) => {
                self.stream.next();
                let operand = self.parse_prefix()?; // Right-associative
                Ok(EvaluationStage::unary(
                    OperatorSymbol::Prefix(op),
                    token,
                    Some(operand),
                ))
            }
            _ => self.parse_primary(),
        }
    }

    /// Parse primary expressions: literals, variables, clauses and calls
    fn parse_primary(&mut self) -> Result<EvaluationStage, ParseError> {
        let token = self.stream.next().ok_or(ParseError::UnexpectedEnd)?;

        match token {
            Token::Boolean(_)
            | Token::Numeric(_)
            | Token::String(_)
            | Token::Pattern(_)
            | Token::Time(_)
            | Token::Variable(_) => Ok(EvaluationStage::leaf(token)),

            Token::Clause => self.parse_clause(),

            Token::Function(function) => {
                if self.stream.next() != Some(Token::Clause) {
                    return Err(ParseError::MissingArguments(function.name().to_string()));
                }
                let arguments = self.parse_clause()?;
                Ok(EvaluationStage::unary(
                    OperatorSymbol::Functional,
                    Token::Function(function),
                    Some(arguments),
                ))
            }

            Token::ClauseClose => Err(ParseError::UnbalancedClause),

            token => Err(ParseError::unexpected(&token)),
        }
    }

    /// Parses the inside of a clause whose opening token was just consumed.
    fn parse_clause(&mut self) -> Result<EvaluationStage, ParseError> {
        // `()` only makes sense as an empty argument list
        if self.stream.peek() == Some(Token::ClauseClose) {
            self.stream.next();
            return Ok(EvaluationStage {
                symbol: OperatorSymbol::Noop,
                left: None,
                right: None,
                original_token: None,
            });
        }

        let inner = self.parse_separator()?;
        match self.stream.next() {
            Some(Token::ClauseClose) => Ok(EvaluationStage::group(inner)),
            Some(token) => Err(ParseError::unexpected(&token)),
            None => Err(ParseError::UnbalancedClause),
        }
    }
}

/// Plans a token sequence into a stage tree.
pub fn build_expression_from_tokens(tokens: Vec<Token>) -> Result<EvaluationStage, ParseError> {
    Parser::new(tokens).parse()
}

#[test]
fn test_comparison_binds_looser_than_arithmetic() {
    use crate::ast::Comparator;

    let tokens = vec![
        Token::Variable("a".to_string()),
        Token::Modifier(Modifier::Add),
        Token::Numeric(1.0),
        Token::Comparator(Comparator::GreaterThan),
        Token::Numeric(2.0),
    ];
    let stage = build_expression_from_tokens(tokens).unwrap();
    assert_eq!(stage.symbol, OperatorSymbol::Comparator(Comparator::GreaterThan));
    assert_eq!(
        stage.left.map(|s| s.symbol),
        Some(OperatorSymbol::Modifier(Modifier::Add))
    );
}
