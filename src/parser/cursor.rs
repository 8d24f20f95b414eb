//! Token cursor: a `Vec`-backed iterator with peek-ahead, specialised to
//! `Token` since this parser only ever walks one kind of stream.

use crate::error::RuntimeError;
use crate::token::{Token, TokenKind};

pub struct Cursor {
    tokens: Vec<Token>,
    index: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Cursor { tokens, index: 0 }
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.index + offset).map(|t| t.kind)
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, RuntimeError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(RuntimeError::syntax(
                format!("expected {kind}, found {:?} '{}'", token.kind, token.lexeme),
                token.line,
                token.column,
            )),
            None => Err(self.eof_error(&kind.to_string())),
        }
    }

    /// Position to report for an error at or past the end of the stream:
    /// the last token's position, or the origin if the source was empty.
    pub fn position_or_eof(&self) -> (usize, usize) {
        self.tokens
            .get(self.index)
            .or_else(|| self.tokens.last())
            .map(Token::position)
            .unwrap_or((1, 0))
    }

    pub fn eof_error(&self, expected: &str) -> RuntimeError {
        let (line, column) = self.position_or_eof();
        RuntimeError::syntax(format!("unexpected end of input, expected {expected}"), line, column)
    }

    pub fn unexpected_error(&self, expected: &str) -> RuntimeError {
        match self.tokens.get(self.index) {
            Some(token) => RuntimeError::syntax(
                format!("expected {expected}, found '{}'", token.lexeme),
                token.line,
                token.column,
            ),
            None => self.eof_error(expected),
        }
    }
}
