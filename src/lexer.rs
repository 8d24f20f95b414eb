//! Hand-rolled lexer: turns source text into a `Vec<Token>`.
//!
//! A character-at-a-time `Peekable<Chars>` scanner rather than a
//! grammar-driven one, because the numeric-literal quirk here — a bare
//! digit run is lexed as a plain `IDENTIFIER`, with the `.` operator doing
//! the work of turning `three.14` or `1.5` into a rational value at
//! evaluation time — has no clean PEG-grammar expression.

use std::iter::Peekable;
use std::str::Chars;

use log::trace;

use crate::error::RuntimeError;
use crate::token::{Token, TokenKind};

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("for", TokenKind::KwdFor),
    ("while", TokenKind::KwdWhile),
    ("if", TokenKind::KwdIf),
    ("else", TokenKind::KwdElse),
    ("class", TokenKind::KwdClass),
    ("auto", TokenKind::KwdAuto),
    ("const", TokenKind::KwdConst),
    ("final", TokenKind::KwdFinal),
    ("nonlocal", TokenKind::KwdNonlocal),
    ("is", TokenKind::Identity),
];

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    /// Byte offset of `chars`'s next character within `source`.
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            chars: source.chars().peekable(),
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, RuntimeError> {
        let mut tokens = vec![];
        while let Some(token) = self.next_token()? {
            trace!("lexed {:?} {:?}", token.kind, token.lexeme);
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_at(&self, offset_from_next: usize) -> Option<char> {
        self.source[self.offset..].chars().nth(offset_from_next)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_ignored(&mut self) -> Result<(), RuntimeError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    while let Some(c) = self.peek() {
                        if c == '*' && self.peek_at(1) == Some('/') {
                            self.advance();
                            self.advance();
                            closed = true;
                            break;
                        }
                        self.advance();
                    }
                    if !closed {
                        return Err(RuntimeError::syntax(
                            "unterminated block comment",
                            line,
                            column,
                        ));
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, RuntimeError> {
        self.skip_ignored()?;

        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let (line, column) = (self.line, self.column);

        if c.is_ascii_alphanumeric() || c == '_' {
            return Ok(Some(self.lex_identifier(line, column)));
        }

        self.lex_operator(line, column).map(Some)
    }

    fn lex_identifier(&mut self, line: usize, column: usize) -> Token {
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }

        for (keyword, kind) in KEYWORDS {
            if lexeme == *keyword {
                return Token::new(*kind, lexeme, line, column);
            }
        }

        Token::new(TokenKind::Identifier, lexeme, line, column)
    }

    fn lex_operator(&mut self, line: usize, column: usize) -> Result<Token, RuntimeError> {
        // Longest-match-first; ties broken by declaration order.
        const OPERATORS: &[(&str, TokenKind)] = &[
            ("++", TokenKind::Increment),
            ("--", TokenKind::Decrement),
            ("+=", TokenKind::PlusEquals),
            ("-=", TokenKind::MinusEquals),
            ("*=", TokenKind::StarEquals),
            ("/=", TokenKind::SlashEquals),
            ("<=", TokenKind::LessEqual),
            (">=", TokenKind::GreaterEqual),
            ("==", TokenKind::Equality),
            ("!=", TokenKind::Nonequality),
            ("<", TokenKind::Less),
            (">", TokenKind::Greater),
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Star),
            ("/", TokenKind::Slash),
            ("=", TokenKind::Equals),
            (".", TokenKind::Period),
            (";", TokenKind::Semi),
            ("(", TokenKind::LeftParen),
            (")", TokenKind::RightParen),
            ("{", TokenKind::LeftBrace),
            ("}", TokenKind::RightBrace),
        ];

        let rest = &self.source[self.offset..];
        for (text, kind) in OPERATORS {
            if rest.starts_with(text) {
                for _ in 0..text.chars().count() {
                    self.advance();
                }
                return Ok(Token::new(*kind, *text, line, column));
            }
        }

        let snippet: String = rest.chars().take(8).collect();
        Err(RuntimeError::syntax(
            format!("unexpected character sequence '{snippet}'"),
            line,
            column,
        ))
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, RuntimeError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_digits_as_identifiers() {
        let tokens = tokenize("123").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "123");
        assert!(tokens[0].is_digit_identifier());
    }

    #[test]
    fn lexes_decimal_as_dot_triple() {
        use TokenKind::*;
        assert_eq!(kinds("1.5"), vec![Identifier, Period, Identifier]);
    }

    #[test]
    fn longest_operator_match_wins() {
        use TokenKind::*;
        assert_eq!(kinds("a++;"), vec![Identifier, Increment, Semi]);
        assert_eq!(kinds("a+=1;"), vec![Identifier, PlusEquals, Identifier, Semi]);
        assert_eq!(kinds("a<=b;"), vec![Identifier, LessEqual, Identifier, Semi]);
    }

    #[test]
    fn keywords_are_whole_identifiers() {
        use TokenKind::*;
        assert_eq!(kinds("for forward"), vec![KwdFor, Identifier]);
    }

    #[test]
    fn skips_line_and_block_comments() {
        use TokenKind::*;
        assert_eq!(kinds("a; // comment\nb;"), vec![Identifier, Semi, Identifier, Semi]);
        assert_eq!(
            kinds("a; /* multi\nline\ncomment */ b;"),
            vec![Identifier, Semi, Identifier, Semi]
        );
    }

    #[test]
    fn block_comment_tracks_line_count() {
        let tokens = tokenize("/* a\nb\nc */ x;").unwrap();
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn unterminated_block_comment_is_syntax_error() {
        let err = tokenize("a; /* never closed").unwrap_err();
        assert!(matches!(err, RuntimeError::Syntax { .. }));
    }

    #[test]
    fn unmatchable_character_is_syntax_error() {
        let err = tokenize("$").unwrap_err();
        assert!(matches!(err, RuntimeError::Syntax { .. }));
    }

    #[test]
    fn is_keyword_recognized_as_identity_operator() {
        use TokenKind::*;
        assert_eq!(kinds("a is b;"), vec![Identifier, Identity, Identifier, Semi]);
    }
}
