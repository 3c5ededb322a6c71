//! Cursor and buffer primitives used by the planner and the client renderer.

use crate::ast::Token;

/// A forward cursor over tokens with a single-step rewind.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream { tokens, index: 0 }
    }

    /// Consumes and returns the next token.
    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    /// Undoes the last `next`.
    pub fn rewind(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Option<Token> {
        let token = self.next()?;
        self.rewind();
        Some(token)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }
}

/// Append-only buffer of rendered fragments.
///
/// Binary operators that render after their left operand reclaim it with
/// [`OutputStream::rollback`].
#[derive(Debug, Default)]
pub struct OutputStream {
    transactions: Vec<String>,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, transaction: String) {
        self.transactions.push(transaction);
    }

    /// Removes and returns the most recently added fragment.
    pub fn rollback(&mut self) -> Option<String> {
        self.transactions.pop()
    }

    pub fn create_string(&self, separator: &str) -> String {
        self.transactions.join(separator)
    }
}

#[test]
fn test_token_stream_rewind() {
    let mut stream = TokenStream::new(vec![Token::Numeric(1.0), Token::Separator]);
    assert_eq!(stream.next(), Some(Token::Numeric(1.0)));
    stream.rewind();
    assert_eq!(stream.peek(), Some(Token::Numeric(1.0)));
    assert_eq!(stream.next(), Some(Token::Numeric(1.0)));
    assert_eq!(stream.next(), Some(Token::Separator));
    assert!(!stream.has_next());
    assert_eq!(stream.next(), None);
    assert_eq!(stream.peek(), None);
}

#[test]
fn test_output_stream_rollback() {
    let mut output = OutputStream::new();
    output.add("a".to_string());
    output.add("b".to_string());
    assert_eq!(output.rollback().as_deref(), Some("b"));
    output.add("c".to_string());
    assert_eq!(output.create_string(" "), "a c");

    let mut empty = OutputStream::new();
    assert_eq!(empty.rollback(), None);
    assert_eq!(empty.create_string(" "), "");
}
