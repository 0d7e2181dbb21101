//! Expression parser for C--.
//! One function per precedence level, lowest first.

use super::Parser;
use crate::diagnostics::{codes, Diagnostic};
use crate::lexer::{unescape_char, unescape_string, TokenKind};
use crate::semantic::builders::make_error;
use crate::semantic::{BinaryOp, Node, UnaryOp};

/// Trait extension for expression parsing
pub trait ExpressionParser {
    fn expression(&mut self) -> Option<Node>;
}

impl<'a> ExpressionParser for Parser<'a> {
    fn expression(&mut self) -> Option<Node> {
        self.parse_or()
    }
}

impl<'a> Parser<'a> {
    /// Parse logical OR: a || b
    fn parse_or(&mut self) -> Option<Node> {
        let mut expr = self.parse_and()?;

        while self.match_token(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            expr = self.actions.binary(BinaryOp::Or, expr, right);
        }

        Some(expr)
    }

    /// Parse logical AND: a && b
    fn parse_and(&mut self) -> Option<Node> {
        let mut expr = self.parse_equality()?;

        while self.match_token(TokenKind::AmpersandAmpersand) {
            let right = self.parse_equality()?;
            expr = self.actions.binary(BinaryOp::And, expr, right);
        }

        Some(expr)
    }

    /// Parse equality: a == b, a != b
    fn parse_equality(&mut self) -> Option<Node> {
        let mut expr = self.parse_comparison()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            expr = self.actions.binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse comparison: a < b, a <= b, a > b, a >= b
    fn parse_comparison(&mut self) -> Option<Node> {
        let mut expr = self.parse_additive()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEqual => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEqual => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            expr = self.actions.binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse additive: a + b, a - b
    fn parse_additive(&mut self) -> Option<Node> {
        let mut expr = self.parse_multiplicative()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = self.actions.binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse multiplicative: a * b, a / b
    fn parse_multiplicative(&mut self) -> Option<Node> {
        let mut expr = self.parse_unary()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = self.actions.binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse unary: -a, !a
    fn parse_unary(&mut self) -> Option<Node> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_primary(),
        };

        let start = self.advance().span();
        let operand = self.parse_unary()?;
        let span = start.merge(&operand.span);
        Some(self.actions.unary(op, operand, span))
    }

    /// Constants, names, calls, subscripts and parenthesized expressions
    fn parse_primary(&mut self) -> Option<Node> {
        let token = self.peek().clone();
        let span = token.span();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                match token.lexeme.parse::<i64>() {
                    Ok(value) => Some(self.actions.int_constant(value, span)),
                    Err(_) => {
                        self.actions.reporter_mut().report(
                            Diagnostic::error(
                                codes::INVALID_NUMBER,
                                format!("integer constant '{}' is too large", token.lexeme),
                            ),
                            span,
                        );
                        Some(make_error(span))
                    }
                }
            }

            TokenKind::CharLiteral => {
                self.advance();
                let value = unescape_char(strip_quotes(&token.lexeme)).unwrap_or_default();
                Some(self.actions.char_constant(value, span))
            }

            TokenKind::StringLiteral => {
                self.advance();
                let text = unescape_string(strip_quotes(&token.lexeme)).unwrap_or_default();
                Some(self.actions.string_constant(&text, span))
            }

            TokenKind::Identifier => {
                self.advance();
                let name = token.lexeme;

                if self.check(TokenKind::LeftParen) {
                    let args = self.call_arguments()?;
                    let span = self.span_from(span);
                    return Some(self.actions.call_expression(&name, args, span));
                }

                if self.match_token(TokenKind::LeftBracket) {
                    let index = self.expression()?;
                    self.expect(TokenKind::RightBracket, "expected ']' after subscript")?;
                    let span = self.span_from(span);
                    return Some(self.actions.array_element(&name, index, span));
                }

                Some(self.actions.variable(&name, span))
            }

            TokenKind::LeftParen => {
                self.advance();
                let mut expr = self.expression()?;
                self.expect(TokenKind::RightParen, "expected ')' after expression")?;
                expr.span = self.span_from(span);
                Some(expr)
            }

            _ => {
                self.error_at_current(codes::EXPECTED_EXPRESSION, "expected expression");
                None
            }
        }
    }

    /// `( [ expr { , expr } ] )` as an argument list, `None` when empty
    pub(crate) fn call_arguments(&mut self) -> Option<Option<Node>> {
        self.expect(TokenKind::LeftParen, "expected '('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "expected ')' after arguments")?;

        Some(
            args.into_iter()
                .rev()
                .fold(None, |tail, head| Some(self.actions.argument_list(head, tail))),
        )
    }
}

fn strip_quotes(lexeme: &str) -> &str {
    lexeme
        .get(1..lexeme.len().saturating_sub(1))
        .unwrap_or_default()
}
