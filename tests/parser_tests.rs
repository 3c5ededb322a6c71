// tests/parser_tests.rs

use exprql::ast::{Comparator, LogicalOp, Modifier, PrefixOp, TernaryOp};
use exprql::lexer::lex;
use exprql::parser::build_expression_from_tokens;
use exprql::{EvaluationStage, ExpressionFunction, OperatorSymbol, ParseError, Token, TokenKind};

fn parse(input: &str) -> EvaluationStage {
    build_expression_from_tokens(lex(input, None).unwrap()).unwrap()
}

fn parse_err(input: &str) -> ParseError {
    build_expression_from_tokens(lex(input, None).unwrap()).unwrap_err()
}

fn left(stage: &EvaluationStage) -> &EvaluationStage {
    stage.left.as_deref().expect("stage has no left child")
}

fn right(stage: &EvaluationStage) -> &EvaluationStage {
    stage.right.as_deref().expect("stage has no right child")
}

fn assert_leaf(stage: &EvaluationStage, token: Token) {
    assert_eq!(stage.symbol, OperatorSymbol::Value);
    assert_eq!(stage.original_token, Some(token));
    assert!(stage.left.is_none() && stage.right.is_none());
}

fn var(name: &str) -> Token {
    Token::Variable(name.to_string())
}

// ============================================================================
// Leaves
// ============================================================================

#[test]
fn test_single_operands() {
    assert_leaf(&parse("42"), Token::Numeric(42.0));
    assert_leaf(&parse("true"), Token::Boolean(true));
    assert_leaf(&parse("'bob'"), Token::String("bob".into()));
    assert_leaf(&parse("[user id]"), var("user id"));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let stage = parse("a + b * c");
    assert_eq!(stage.symbol, OperatorSymbol::Modifier(Modifier::Add));
    assert_leaf(left(&stage), var("a"));

    let product = right(&stage);
    assert_eq!(product.symbol, OperatorSymbol::Modifier(Modifier::Multiply));
    assert_leaf(left(product), var("b"));
    assert_leaf(right(product), var("c"));
}

#[test]
fn test_and_binds_tighter_than_or() {
    let stage = parse("a || b && c");
    assert_eq!(stage.symbol, OperatorSymbol::Logical(LogicalOp::Or));
    assert_eq!(right(&stage).symbol, OperatorSymbol::Logical(LogicalOp::And));
}

#[test]
fn test_comparison_between_logical_and_arithmetic() {
    let stage = parse("x > 1 + 2 && y == 3");
    assert_eq!(stage.symbol, OperatorSymbol::Logical(LogicalOp::And));

    let comparison = left(&stage);
    assert_eq!(
        comparison.symbol,
        OperatorSymbol::Comparator(Comparator::GreaterThan)
    );
    assert_eq!(
        right(comparison).symbol,
        OperatorSymbol::Modifier(Modifier::Add)
    );
    assert_eq!(
        right(&stage).symbol,
        OperatorSymbol::Comparator(Comparator::Equal)
    );
}

#[test]
fn test_operator_families_from_loosest_to_tightest() {
    // Each input puts a looser operator first; the root must be that operator
    let test_cases = vec![
        ("a ?? b || c", OperatorSymbol::Ternary(TernaryOp::Coalesce)),
        ("a == b | c", OperatorSymbol::Comparator(Comparator::Equal)),
        ("a & b << c", OperatorSymbol::Modifier(Modifier::BitwiseAnd)),
        ("a >> b - c", OperatorSymbol::Modifier(Modifier::ShiftRight)),
        ("a - b % c", OperatorSymbol::Modifier(Modifier::Subtract)),
        ("a / b ** c", OperatorSymbol::Modifier(Modifier::Divide)),
        ("a, b ? c", OperatorSymbol::Separate),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse(input).symbol, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_binary_operators_are_left_associative() {
    let stage = parse("a - b - c");
    assert_eq!(stage.symbol, OperatorSymbol::Modifier(Modifier::Subtract));
    assert_leaf(right(&stage), var("c"));

    let inner = left(&stage);
    assert_eq!(inner.symbol, OperatorSymbol::Modifier(Modifier::Subtract));
    assert_leaf(left(inner), var("a"));
    assert_leaf(right(inner), var("b"));

    let stage = parse("2 ** 3 ** 2");
    assert_eq!(
        left(&stage).symbol,
        OperatorSymbol::Modifier(Modifier::Exponent)
    );
}

#[test]
fn test_prefix_operators() {
    let stage = parse("!a && -b > ~c");
    assert_eq!(stage.symbol, OperatorSymbol::Logical(LogicalOp::And));

    let invert = left(&stage);
    assert_eq!(invert.symbol, OperatorSymbol::Prefix(PrefixOp::Invert));
    assert!(invert.left.is_none());
    assert_leaf(right(invert), var("a"));

    let comparison = right(&stage);
    assert_eq!(
        left(comparison).symbol,
        OperatorSymbol::Prefix(PrefixOp::Negate)
    );
    assert_eq!(
        right(comparison).symbol,
        OperatorSymbol::Prefix(PrefixOp::BitwiseNot)
    );

    let stage = parse("!!a");
    assert_eq!(stage.symbol, OperatorSymbol::Prefix(PrefixOp::Invert));
    assert_eq!(
        right(&stage).symbol,
        OperatorSymbol::Prefix(PrefixOp::Invert)
    );
}

#[test]
fn test_operator_stages_keep_their_token() {
    let stage = parse("a >= 1");
    assert_eq!(
        stage.original_token,
        Some(Token::Comparator(Comparator::GreaterEqual))
    );
}

// ============================================================================
// Clauses
// ============================================================================

#[test]
fn test_clause_becomes_noop_group() {
    let stage = parse("(a + b) * c");
    assert_eq!(stage.symbol, OperatorSymbol::Modifier(Modifier::Multiply));

    let group = left(&stage);
    assert_eq!(group.symbol, OperatorSymbol::Noop);
    assert_eq!(group.original_token, None);
    assert!(group.left.is_none());
    assert_eq!(right(group).symbol, OperatorSymbol::Modifier(Modifier::Add));
}

#[test]
fn test_nested_clauses() {
    let stage = parse("((a))");
    assert_eq!(stage.symbol, OperatorSymbol::Noop);
    assert_eq!(right(&stage).symbol, OperatorSymbol::Noop);
    assert_leaf(right(right(&stage)), var("a"));
}

#[test]
fn test_separator_in_clause() {
    let stage = parse("x in (1, 2, 3)");
    assert_eq!(stage.symbol, OperatorSymbol::Comparator(Comparator::In));

    let list = right(right(&stage));
    assert_eq!(list.symbol, OperatorSymbol::Separate);
    assert_eq!(list.original_token, Some(Token::Separator));
    assert_eq!(left(list).symbol, OperatorSymbol::Separate);
    assert_leaf(right(list), Token::Numeric(3.0));
}

// ============================================================================
// Functions
// ============================================================================

fn max_function() -> ExpressionFunction {
    ExpressionFunction::new("max", |args| {
        args.iter()
            .filter_map(|v| v.as_float())
            .reduce(f64::max)
            .map(exprql::Value::Float)
            .ok_or_else(|| "max needs numbers".to_string())
    })
}

#[test]
fn test_function_stage() {
    let functions = vec![max_function()];
    let tokens = lex("max(a, 2) > 1", Some(functions.as_slice())).unwrap();
    let stage = build_expression_from_tokens(tokens).unwrap();

    let call = left(&stage);
    assert_eq!(call.symbol, OperatorSymbol::Functional);
    assert_eq!(call.original_token, Some(Token::Function(max_function())));
    assert!(call.left.is_none());

    let arguments = right(call);
    assert_eq!(arguments.symbol, OperatorSymbol::Noop);
    assert_eq!(right(arguments).symbol, OperatorSymbol::Separate);
}

#[test]
fn test_function_with_empty_argument_list() {
    let functions = vec![max_function()];
    let tokens = lex("max()", Some(functions.as_slice())).unwrap();
    let stage = build_expression_from_tokens(tokens).unwrap();

    let arguments = right(&stage);
    assert_eq!(arguments.symbol, OperatorSymbol::Noop);
    assert!(arguments.left.is_none() && arguments.right.is_none());
}

#[test]
fn test_function_without_arguments_is_an_error() {
    let functions = vec![max_function()];
    let tokens = lex("max + 1", Some(functions.as_slice())).unwrap();
    assert_eq!(
        build_expression_from_tokens(tokens),
        Err(ParseError::MissingArguments("max".to_string()))
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input() {
    assert_eq!(
        build_expression_from_tokens(Vec::new()),
        Err(ParseError::UnexpectedEnd)
    );
}

#[test]
fn test_dangling_operator() {
    assert_eq!(parse_err("a &&"), ParseError::UnexpectedEnd);
    assert_eq!(parse_err("-"), ParseError::UnexpectedEnd);
}

#[test]
fn test_unbalanced_clauses() {
    assert_eq!(parse_err("(a + b"), ParseError::UnbalancedClause);
    assert_eq!(parse_err("a + b)"), ParseError::UnbalancedClause);
    assert_eq!(parse_err(")"), ParseError::UnbalancedClause);
}

#[test]
fn test_unexpected_tokens() {
    assert_eq!(
        parse_err("a b"),
        ParseError::UnexpectedToken {
            kind: TokenKind::Variable,
            value: "b".to_string(),
        }
    );
    assert_eq!(
        parse_err("&& a"),
        ParseError::UnexpectedToken {
            kind: TokenKind::LogicalOp,
            value: "&&".to_string(),
        }
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ParseError::UnbalancedClause.to_string(),
        "Unbalanced parenthesis"
    );
    assert_eq!(
        ParseError::MissingArguments("max".into()).to_string(),
        "Function 'max' must be followed by an argument list"
    );
}
