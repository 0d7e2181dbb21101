//! Statement parser for C--.

use super::expression::ExpressionParser;
use super::Parser;
use crate::diagnostics::codes;
use crate::lexer::TokenKind;
use crate::semantic::Node;

/// Trait extension for statement parsing
pub trait StatementParser {
    /// One statement; `Some(None)` for an empty statement or block
    fn statement(&mut self) -> Option<Option<Node>>;
}

impl<'a> StatementParser for Parser<'a> {
    fn statement(&mut self) -> Option<Option<Node>> {
        self.parse_statement()
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Option<Option<Node>> {
        match self.peek().kind {
            TokenKind::If => self.if_statement().map(Some),
            TokenKind::While => self.while_statement().map(Some),
            TokenKind::For => self.for_statement().map(Some),
            TokenKind::Return => self.return_statement().map(Some),

            TokenKind::LeftBrace => {
                self.advance();
                let body = self.statements_until_brace()?;
                self.expect(TokenKind::RightBrace, "expected '}' after block")?;
                Some(body)
            }

            TokenKind::Semicolon => {
                self.advance();
                Some(None)
            }

            TokenKind::Identifier if self.check_next(TokenKind::LeftParen) => {
                self.call_statement().map(Some)
            }

            TokenKind::Identifier => {
                let assignment = self.assignment()?;
                self.expect(TokenKind::Semicolon, "expected ';' after assignment")?;
                Some(Some(assignment))
            }

            _ => {
                self.error_at_current(codes::EXPECTED_STATEMENT, "expected statement");
                None
            }
        }
    }

    /// `if ( expr ) stmt [ else stmt ]`
    fn if_statement(&mut self) -> Option<Node> {
        let start = self.advance().span();
        self.expect(TokenKind::LeftParen, "expected '(' after 'if'")?;
        let test = self.expression()?;
        self.expect(TokenKind::RightParen, "expected ')' after condition")?;

        let then_branch = self.statement()?;
        let else_branch = if self.match_token(TokenKind::Else) {
            self.statement()?
        } else {
            None
        };

        let span = self.span_from(start);
        Some(self.actions.if_statement(test, then_branch, else_branch, span))
    }

    /// `while ( expr ) stmt`
    fn while_statement(&mut self) -> Option<Node> {
        let start = self.advance().span();
        self.expect(TokenKind::LeftParen, "expected '(' after 'while'")?;
        let test = self.expression()?;
        self.expect(TokenKind::RightParen, "expected ')' after condition")?;
        let body = self.statement()?;

        let span = self.span_from(start);
        Some(self.actions.while_statement(test, body, span))
    }

    /// `for ( [assg] ; [expr] ; [assg] ) stmt`
    fn for_statement(&mut self) -> Option<Node> {
        let start = self.advance().span();
        self.expect(TokenKind::LeftParen, "expected '(' after 'for'")?;

        let init = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.assignment()?)
        };
        self.expect(TokenKind::Semicolon, "expected ';' after loop initializer")?;

        let test = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon, "expected ';' after loop condition")?;

        let update = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.assignment()?)
        };
        self.expect(TokenKind::RightParen, "expected ')' after for clauses")?;

        let body = self.statement()?;
        let span = self.span_from(start);
        Some(self.actions.for_statement(init, test, update, body, span))
    }

    /// `return [ expr ] ;`
    fn return_statement(&mut self) -> Option<Node> {
        let start = self.advance().span();
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon, "expected ';' after return")?;

        let span = self.span_from(start);
        Some(self.actions.return_statement(value, span))
    }

    /// `id [ '[' expr ']' ] = expr`
    fn assignment(&mut self) -> Option<Node> {
        let (name, start) = self.expect_identifier("expected variable name")?;

        let lhs = if self.match_token(TokenKind::LeftBracket) {
            let index = self.expression()?;
            self.expect(TokenKind::RightBracket, "expected ']' after subscript")?;
            let span = self.span_from(start);
            self.actions.array_element(&name, index, span)
        } else {
            self.actions.variable(&name, start)
        };

        self.expect(TokenKind::Equal, "expected '=' in assignment")?;
        let rhs = self.expression()?;

        let span = self.span_from(start);
        Some(self.actions.assignment(lhs, rhs, span))
    }

    /// `id ( args ) ;`
    fn call_statement(&mut self) -> Option<Node> {
        let (name, start) = self.expect_identifier("expected function name")?;
        let args = self.call_arguments()?;
        let span = self.span_from(start);
        self.expect(TokenKind::Semicolon, "expected ';' after call")?;

        Some(self.actions.call_statement(&name, args, span))
    }
}
