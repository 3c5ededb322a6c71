// tests/lexer_tests.rs

use exprql::ast::{Comparator, LogicalOp, Modifier, PrefixOp, TernaryOp, Token};
use exprql::lexer::{LexError, Lexer, lex, parse_time};
use exprql::{ExpressionFunction, Value};

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

fn var(name: &str) -> Token {
    Token::Variable(name.to_string())
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_single_char_operators() {
    let test_cases = vec![
        ("a > b", Token::Comparator(Comparator::GreaterThan)),
        ("a < b", Token::Comparator(Comparator::LessThan)),
        ("a + b", Token::Modifier(Modifier::Add)),
        ("a - b", Token::Modifier(Modifier::Subtract)),
        ("a * b", Token::Modifier(Modifier::Multiply)),
        ("a / b", Token::Modifier(Modifier::Divide)),
        ("a % b", Token::Modifier(Modifier::Modulus)),
        ("a & b", Token::Modifier(Modifier::BitwiseAnd)),
        ("a | b", Token::Modifier(Modifier::BitwiseOr)),
        ("a ^ b", Token::Modifier(Modifier::BitwiseXor)),
        ("a ? b", Token::Ternary(TernaryOp::TernaryTrue)),
        ("a : b", Token::Ternary(TernaryOp::TernaryFalse)),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            tokens(input),
            vec![var("a"), expected, var("b")],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_two_char_operators() {
    let test_cases = vec![
        ("a == b", Token::Comparator(Comparator::Equal)),
        ("a != b", Token::Comparator(Comparator::NotEqual)),
        ("a >= b", Token::Comparator(Comparator::GreaterEqual)),
        ("a <= b", Token::Comparator(Comparator::LessEqual)),
        ("a && b", Token::LogicalOp(LogicalOp::And)),
        ("a || b", Token::LogicalOp(LogicalOp::Or)),
        ("a ** b", Token::Modifier(Modifier::Exponent)),
        ("a << b", Token::Modifier(Modifier::ShiftLeft)),
        ("a >> b", Token::Modifier(Modifier::ShiftRight)),
        ("a ?? b", Token::Ternary(TernaryOp::Coalesce)),
        ("a in b", Token::Comparator(Comparator::In)),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            tokens(input),
            vec![var("a"), expected, var("b")],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_operators_without_whitespace() {
    assert_eq!(
        tokens("a>=1&&b<2"),
        vec![
            var("a"),
            Token::Comparator(Comparator::GreaterEqual),
            Token::Numeric(1.0),
            Token::LogicalOp(LogicalOp::And),
            var("b"),
            Token::Comparator(Comparator::LessThan),
            Token::Numeric(2.0),
        ]
    );
}

#[test]
fn test_prefixes_in_operand_position() {
    assert_eq!(
        tokens("!a && ~b"),
        vec![
            Token::Prefix(PrefixOp::Invert),
            var("a"),
            Token::LogicalOp(LogicalOp::And),
            Token::Prefix(PrefixOp::BitwiseNot),
            var("b"),
        ]
    );

    assert_eq!(
        tokens("(a) - (-b)"),
        vec![
            Token::Clause,
            var("a"),
            Token::ClauseClose,
            Token::Modifier(Modifier::Subtract),
            Token::Clause,
            Token::Prefix(PrefixOp::Negate),
            var("b"),
            Token::ClauseClose,
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    let test_cases = vec![
        ("42", 42.0),
        ("3.25", 3.25),
        (".5", 0.5),
        ("1e+06", 1_000_000.0),
        ("2.5E-3", 0.0025),
        ("1e3", 1000.0),
        ("0xFF", 255.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            tokens(input),
            vec![Token::Numeric(expected)],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_number_followed_by_identifier_is_not_exponent() {
    assert_eq!(
        tokens("2 * e"),
        vec![
            Token::Numeric(2.0),
            Token::Modifier(Modifier::Multiply),
            var("e"),
        ]
    );
}

#[test]
fn test_strings() {
    assert_eq!(tokens(r#""hello""#), vec![Token::String("hello".into())]);
    assert_eq!(tokens("'world'"), vec![Token::String("world".into())]);
    assert_eq!(
        tokens(r#""say \"hi\"\n""#),
        vec![Token::String("say \"hi\"\n".into())]
    );
}

#[test]
fn test_booleans() {
    assert_eq!(
        tokens("true false"),
        vec![Token::Boolean(true), Token::Boolean(false)]
    );
}

#[test]
fn test_strings_that_look_like_dates_become_times() {
    let test_cases = vec![
        "'2014-01-02'",
        "'2014-01-02 14:12:22'",
        "'2014-01-02T14:12:22'",
        "'2014-01-02T14:12:22Z'",
        "'2014-01-02T14:12:22+00:00'",
    ];

    for input in test_cases {
        let lexed = tokens(input);
        assert!(
            matches!(lexed.as_slice(), [Token::Time(_)]),
            "Failed for input: {}",
            input
        );
    }

    assert_eq!(
        tokens("'2014-01-02 14:12:22'"),
        vec![Token::Time(parse_time("2014-01-02T14:12:22Z").unwrap())]
    );
}

#[test]
fn test_pattern_after_regex_comparator() {
    let lexed = tokens(r#"name =~ "^b\d+""#);
    assert_eq!(lexed.len(), 3);
    assert_eq!(lexed[1], Token::Comparator(Comparator::Matches));
    match &lexed[2] {
        Token::Pattern(re) => assert_eq!(re.as_str(), r"^b\d+"),
        other => panic!("Expected pattern, got {:?}", other),
    }

    let lexed = tokens("name !~ 'x'");
    assert!(matches!(lexed[2], Token::Pattern(_)));

    // Only directly after the comparator
    let lexed = tokens("name == 'x'");
    assert_eq!(lexed[2], Token::String("x".into()));
}

// ============================================================================
// Variables and functions
// ============================================================================

#[test]
fn test_variables() {
    assert_eq!(tokens("foo_bar1"), vec![var("foo_bar1")]);
    assert_eq!(tokens("response.status"), vec![var("response.status")]);
    assert_eq!(tokens("[response time]"), vec![var("response time")]);
    assert_eq!(tokens("[a-b] > 1")[0], var("a-b"));
}

#[test]
fn test_functions_are_recognised_by_name() {
    let strlen = ExpressionFunction::new("strlen", |args| match args {
        [Value::String(s)] => Ok(Value::Float(s.len() as f64)),
        _ => Err("strlen takes one string".to_string()),
    });

    let functions = vec![strlen.clone()];
    let lexed = lex("strlen(name) > strlength", Some(functions.as_slice())).unwrap();
    assert_eq!(
        lexed,
        vec![
            Token::Function(strlen),
            Token::Clause,
            var("name"),
            Token::ClauseClose,
            Token::Comparator(Comparator::GreaterThan),
            var("strlength"),
        ]
    );

    // Without a registry the name is a variable
    assert_eq!(lex("strlen", None).unwrap(), vec![var("strlen")]);
}

#[test]
fn test_clauses_and_separators() {
    assert_eq!(
        tokens("x in (1, 2)"),
        vec![
            var("x"),
            Token::Comparator(Comparator::In),
            Token::Clause,
            Token::Numeric(1.0),
            Token::Separator,
            Token::Numeric(2.0),
            Token::ClauseClose,
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    assert_eq!(
        Lexer::new("name == 'bob").tokenize(),
        Err(LexError::UnterminatedString { position: 8 })
    );
}

#[test]
fn test_unterminated_variable() {
    assert_eq!(
        Lexer::new("[foo").tokenize(),
        Err(LexError::UnterminatedVariable { position: 0 })
    );
}

#[test]
fn test_unexpected_character() {
    assert_eq!(
        Lexer::new("a # b").tokenize(),
        Err(LexError::UnexpectedCharacter { ch: '#', position: 2 })
    );
    assert_eq!(
        Lexer::new("a = b").tokenize(),
        Err(LexError::UnexpectedCharacter { ch: '=', position: 2 })
    );
}

#[test]
fn test_invalid_pattern() {
    let result = Lexer::new("a =~ '('").tokenize();
    assert!(matches!(result, Err(LexError::InvalidPattern { pattern, .. }) if pattern == "("));
}

#[test]
fn test_bang_after_operand_is_not_a_prefix() {
    assert_eq!(
        Lexer::new("a ! b").tokenize(),
        Err(LexError::UnexpectedCharacter { ch: '!', position: 2 })
    );
}
