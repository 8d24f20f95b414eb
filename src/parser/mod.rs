//! Operator-precedence parser over the token stream.
//!
//! Precedence, loosest to tightest: comparisons, additive, multiplicative,
//! unary prefix, postfix `++`/`--`, dot. Each level is one recursive-descent
//! production referencing the next tighter level, specialised to this
//! language's fixed, small precedence table rather than a generic
//! binding-power table.

mod cursor;

use log::trace;

use crate::ast::{BinaryOpKind, ComparisonOpKind, CompoundOpKind, IncDecKind, Node, UnaryOpKind};
use crate::env::Context;
use crate::error::RuntimeError;
use crate::lexer;
use crate::token::{Token, TokenKind};

use cursor::Cursor;

/// Parses token streams into an AST and carries the `Context` that
/// evaluation threads through. A single parser is reused across many
/// `parse_program` calls by the host's default REPL-style instance, so the
/// environment persists while the token cursor is swapped out per call.
pub struct Parser {
    cursor: Cursor,
    context: Context,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            context: Context::new(),
        }
    }

    pub fn from_source(source: &str) -> Result<Self, RuntimeError> {
        Ok(Parser::new(lexer::tokenize(source)?))
    }

    /// Swaps in a fresh token cursor for `source`, keeping the current
    /// `Context` untouched — used by the shared default parser so
    /// repeated evaluations see each other's declarations.
    pub fn reset_source(&mut self, source: &str) -> Result<(), RuntimeError> {
        self.cursor = Cursor::new(lexer::tokenize(source)?);
        Ok(())
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Parse the whole token stream into a top-level `Block`.
    pub fn parse_program(&mut self) -> Result<Node, RuntimeError> {
        let position = self.cursor.position_or_eof();
        let mut statements = vec![];
        while !self.cursor.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(Node::Block {
            statements,
            position,
        })
    }

    fn parse_statement(&mut self) -> Result<Node, RuntimeError> {
        match self.cursor.peek_kind(0) {
            Some(TokenKind::LeftBrace) => self.parse_block(),
            Some(TokenKind::KwdFor) => self.parse_for(),
            Some(TokenKind::KwdWhile) => self.parse_while(),
            Some(TokenKind::KwdIf) => self.parse_if(),
            Some(TokenKind::KwdNonlocal) => self.parse_nonlocal(),
            Some(TokenKind::KwdConst) => {
                self.cursor.advance();
                self.parse_declaration(true)
            }
            Some(TokenKind::KwdAuto) => self.parse_declaration(false),
            Some(TokenKind::Identifier) if self.cursor.peek_kind(1) == Some(TokenKind::Identifier) => {
                self.parse_declaration(false)
            }
            Some(TokenKind::Identifier) if self.cursor.peek_kind(1) == Some(TokenKind::Equals) => {
                self.parse_assignment()
            }
            Some(TokenKind::Identifier) if self.is_compound_assign(self.cursor.peek_kind(1)) => {
                self.parse_compound_assignment()
            }
            _ => self.parse_expr_statement(),
        }
    }

    fn is_compound_assign(&self, kind: Option<TokenKind>) -> bool {
        matches!(
            kind,
            Some(TokenKind::PlusEquals)
                | Some(TokenKind::MinusEquals)
                | Some(TokenKind::StarEquals)
                | Some(TokenKind::SlashEquals)
        )
    }

    fn parse_block(&mut self) -> Result<Node, RuntimeError> {
        let position = self.cursor.expect(TokenKind::LeftBrace)?.position();
        let mut statements = vec![];
        while self.cursor.peek_kind(0) != Some(TokenKind::RightBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.eof_error("'}'"));
            }
            statements.push(self.parse_statement()?);
        }
        self.cursor.expect(TokenKind::RightBrace)?;
        Ok(Node::Block {
            statements,
            position,
        })
    }

    fn parse_declaration(&mut self, is_const: bool) -> Result<Node, RuntimeError> {
        let position = self.cursor.position_or_eof();

        let type_name = if self.cursor.peek_kind(0) == Some(TokenKind::KwdAuto) {
            self.cursor.advance();
            None
        } else {
            Some(self.cursor.expect(TokenKind::Identifier)?.lexeme)
        };

        let name = self.cursor.expect(TokenKind::Identifier)?.lexeme;

        let init = if self.cursor.peek_kind(0) == Some(TokenKind::Equals) {
            self.cursor.advance();
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        if init.is_none() && type_name.is_none() {
            return Err(RuntimeError::syntax(
                "'auto' declaration requires an initializer",
                position.0,
                position.1,
            ));
        }
        if init.is_none() && is_const {
            return Err(RuntimeError::syntax(
                "'const' declaration requires an initializer",
                position.0,
                position.1,
            ));
        }

        self.cursor.expect(TokenKind::Semi)?;

        trace!("parsed declaration '{name}' (const={is_const}, type={type_name:?})");

        Ok(Node::VarDecl {
            name,
            type_name,
            init,
            is_const,
            position,
        })
    }

    fn parse_assignment(&mut self) -> Result<Node, RuntimeError> {
        let name_token = self.cursor.expect(TokenKind::Identifier)?;
        let position = name_token.position();
        self.cursor.expect(TokenKind::Equals)?;
        let value = Box::new(self.parse_expression()?);
        self.cursor.expect(TokenKind::Semi)?;
        Ok(Node::VarAssign {
            name: name_token.lexeme,
            value,
            position,
        })
    }

    fn parse_compound_assignment(&mut self) -> Result<Node, RuntimeError> {
        let name_token = self.cursor.expect(TokenKind::Identifier)?;
        let position = name_token.position();
        let op_token = self.cursor.advance().expect("checked by caller");
        let op = match op_token.kind {
            TokenKind::PlusEquals => CompoundOpKind::Plus,
            TokenKind::MinusEquals => CompoundOpKind::Minus,
            TokenKind::StarEquals => CompoundOpKind::Star,
            TokenKind::SlashEquals => CompoundOpKind::Slash,
            _ => unreachable!("is_compound_assign guards this dispatch"),
        };
        let value = Box::new(self.parse_expression()?);
        self.cursor.expect(TokenKind::Semi)?;
        Ok(Node::AssignOp {
            op,
            name: name_token.lexeme,
            value,
            position,
        })
    }

    fn parse_nonlocal(&mut self) -> Result<Node, RuntimeError> {
        let position = self.cursor.expect(TokenKind::KwdNonlocal)?.position();
        let name = self.cursor.expect(TokenKind::Identifier)?.lexeme;
        self.cursor.expect(TokenKind::Semi)?;
        Ok(Node::NonLocal { name, position })
    }

    fn parse_expr_statement(&mut self) -> Result<Node, RuntimeError> {
        let expr = self.parse_expression()?;
        self.cursor.expect(TokenKind::Semi)?;
        Ok(expr)
    }

    fn parse_for(&mut self) -> Result<Node, RuntimeError> {
        let position = self.cursor.expect(TokenKind::KwdFor)?.position();
        self.cursor.expect(TokenKind::LeftParen)?;
        let init = Box::new(self.parse_statement()?);
        let check = Box::new(self.parse_expr_statement()?);
        let change = Box::new(self.parse_expression()?);
        self.cursor.expect(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Node::For {
            init,
            check,
            change,
            body,
            position,
        })
    }

    fn parse_while(&mut self) -> Result<Node, RuntimeError> {
        let position = self.cursor.expect(TokenKind::KwdWhile)?.position();
        self.cursor.expect(TokenKind::LeftParen)?;
        let check = Box::new(self.parse_expression()?);
        self.cursor.expect(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Node::While {
            check,
            body,
            position,
        })
    }

    fn parse_if(&mut self) -> Result<Node, RuntimeError> {
        let position = self.cursor.expect(TokenKind::KwdIf)?.position();
        self.cursor.expect(TokenKind::LeftParen)?;
        let check = Box::new(self.parse_expression()?);
        self.cursor.expect(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        let else_body = if self.cursor.peek_kind(0) == Some(TokenKind::KwdElse) {
            self.cursor.advance();
            Box::new(self.parse_statement()?)
        } else {
            Box::new(Node::empty_block(position))
        };
        Ok(Node::If {
            check,
            body,
            else_body,
            position,
        })
    }

    fn parse_expression(&mut self) -> Result<Node, RuntimeError> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.comparison_op() {
            let position = self.cursor.advance().unwrap().position();
            let right = self.parse_additive()?;
            left = Node::ComparisonOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn comparison_op(&self) -> Option<ComparisonOpKind> {
        match self.cursor.peek_kind(0)? {
            TokenKind::Less => Some(ComparisonOpKind::Less),
            TokenKind::LessEqual => Some(ComparisonOpKind::LessEqual),
            TokenKind::Greater => Some(ComparisonOpKind::Greater),
            TokenKind::GreaterEqual => Some(ComparisonOpKind::GreaterEqual),
            TokenKind::Equality => Some(ComparisonOpKind::Equality),
            TokenKind::Nonequality => Some(ComparisonOpKind::Nonequality),
            TokenKind::Identity => Some(ComparisonOpKind::Identity),
            _ => None,
        }
    }

    fn parse_additive(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.peek_kind(0) {
                Some(TokenKind::Plus) => BinaryOpKind::Plus,
                Some(TokenKind::Minus) => BinaryOpKind::Minus,
                _ => break,
            };
            let position = self.cursor.advance().unwrap().position();
            let right = self.parse_multiplicative()?;
            left = Node::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.cursor.peek_kind(0) {
                Some(TokenKind::Star) => BinaryOpKind::Star,
                Some(TokenKind::Slash) => BinaryOpKind::Slash,
                _ => break,
            };
            let position = self.cursor.advance().unwrap().position();
            let right = self.parse_unary()?;
            left = Node::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, RuntimeError> {
        let op = match self.cursor.peek_kind(0) {
            Some(TokenKind::Plus) => Some(UnaryOpKind::Plus),
            Some(TokenKind::Minus) => Some(UnaryOpKind::Minus),
            _ => None,
        };
        match op {
            Some(op) => {
                let position = self.cursor.advance().unwrap().position();
                let child = Box::new(self.parse_unary()?);
                Ok(Node::UnaryOp {
                    op,
                    child,
                    position,
                })
            }
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Node, RuntimeError> {
        let node = self.parse_dot()?;
        let op = match self.cursor.peek_kind(0) {
            Some(TokenKind::Increment) => Some(IncDecKind::Increment),
            Some(TokenKind::Decrement) => Some(IncDecKind::Decrement),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(node);
        };
        let Node::VarRef { name, position } = node else {
            let position = node.position();
            return Err(RuntimeError::syntax(
                format!("'{}' may only follow a plain identifier", op.symbol()),
                position.0,
                position.1,
            ));
        };
        self.cursor.advance();
        Ok(Node::IncDec {
            op,
            name,
            position,
        })
    }

    fn parse_dot(&mut self) -> Result<Node, RuntimeError> {
        let mut left = self.parse_primary()?;
        while self.cursor.peek_kind(0) == Some(TokenKind::Period) {
            let position = self.cursor.advance().unwrap().position();
            let right = self.parse_primary()?;
            left = Node::Dot {
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Node, RuntimeError> {
        match self.cursor.peek_kind(0) {
            Some(TokenKind::LeftParen) => {
                self.cursor.advance();
                let expr = self.parse_expression()?;
                self.cursor.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            Some(TokenKind::Identifier) => {
                let token = self.cursor.advance().unwrap();
                Ok(Node::VarRef {
                    name: token.lexeme,
                    position: token.position(),
                })
            }
            _ => Err(self.cursor.unexpected_error("an expression")),
        }
    }
}

pub fn parse(source: &str) -> Result<Node, RuntimeError> {
    Parser::from_source(source)?.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arithmetic_with_precedence() {
        let ast = parse("1 + 2 * 3;").unwrap();
        let Node::Block { statements, .. } = ast else {
            panic!("expected block");
        };
        assert_eq!(statements.len(), 1);
        let Node::BinaryOp { op, left, right, .. } = &statements[0] else {
            panic!("expected binary op");
        };
        assert_eq!(*op, BinaryOpKind::Plus);
        assert!(matches!(**left, Node::VarRef { .. }));
        assert!(matches!(**right, Node::BinaryOp { op: BinaryOpKind::Star, .. }));
    }

    #[test]
    fn parses_explicit_type_declaration() {
        let ast = parse("int a = 1;").unwrap();
        let Node::Block { statements, .. } = ast else {
            panic!()
        };
        assert!(matches!(
            &statements[0],
            Node::VarDecl {
                type_name: Some(t),
                is_const: false,
                ..
            } if t == "int"
        ));
    }

    #[test]
    fn parses_auto_declaration() {
        let ast = parse("auto pi = 22 / 7;").unwrap();
        let Node::Block { statements, .. } = ast else {
            panic!()
        };
        assert!(matches!(
            &statements[0],
            Node::VarDecl {
                type_name: None,
                ..
            }
        ));
    }

    #[test]
    fn parses_for_loop() {
        let ast = parse("for (int x = 0; x < 10; x++) { a *= 2; }").unwrap();
        let Node::Block { statements, .. } = ast else {
            panic!()
        };
        assert!(matches!(&statements[0], Node::For { .. }));
    }

    #[test]
    fn parses_nonlocal() {
        let ast = parse("{ nonlocal 3; }").unwrap();
        let Node::Block { statements, .. } = ast else {
            panic!()
        };
        let Node::Block { statements, .. } = &statements[0] else {
            panic!()
        };
        assert!(matches!(&statements[0], Node::NonLocal { name, .. } if name == "3"));
    }

    #[test]
    fn parses_dot_as_decimal() {
        let ast = parse("three.14;").unwrap();
        let Node::Block { statements, .. } = ast else {
            panic!()
        };
        assert!(matches!(&statements[0], Node::Dot { .. }));
    }

    #[test]
    fn rejects_incdec_on_non_identifier() {
        let err = parse("(1 + 2)++;").unwrap_err();
        assert!(matches!(err, RuntimeError::Syntax { .. }));
    }

    #[test]
    fn auto_without_initializer_is_syntax_error() {
        let err = parse("auto x;").unwrap_err();
        assert!(matches!(err, RuntimeError::Syntax { .. }));
    }

    #[test]
    fn unexpected_eof_is_syntax_error() {
        let err = parse("int a = ").unwrap_err();
        assert!(matches!(err, RuntimeError::Syntax { .. }));
    }
}
