//! Recursive descent parser for C--.
//!
//! The parser owns no syntax tree of its own: every construct it recognizes
//! is handed straight to the semantic actions, which check it and build the
//! tree for the current function. The first syntax error ends the parse.

mod expression;
mod statement;

#[cfg(test)]
mod parser_tests;

pub use expression::ExpressionParser;
pub use statement::StatementParser;

use log::debug;

use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter, Span};
use crate::lexer::{Token, TokenKind};
use crate::semantic::{BaseType, Node, Semantics, SymbolTable, TreeConsumer};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    actions: Semantics<'a>,
    consumer: &'a mut dyn TreeConsumer,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        reporter: &'a mut DiagnosticReporter,
        consumer: &'a mut dyn TreeConsumer,
    ) -> Self {
        let tokens = if tokens.last().map(|t| t.kind) == Some(TokenKind::Eof) {
            tokens
        } else {
            // a token stream always ends in Eof
            let end = tokens.last().map_or(0, |t| t.offset + t.length);
            tokens.into_iter().chain([Token::eof(end)]).collect()
        };

        Self {
            tokens,
            current: 0,
            actions: Semantics::new(reporter),
            consumer,
        }
    }

    /// Parse the whole program. Returns the final symbol table, or `None`
    /// after a syntax error.
    pub fn parse(mut self) -> Option<SymbolTable> {
        while !self.is_at_end() {
            self.external_declaration()?;
        }
        Some(self.actions.into_symbols())
    }

    /// A global declaration list, a prototype list, or a function definition
    fn external_declaration(&mut self) -> Option<()> {
        let is_extern = self.match_token(TokenKind::Extern);
        if is_extern {
            self.actions.mark_extern();
        }

        let ty = self.type_keyword()?;
        self.actions.set_type(ty);
        let (name, span) = self.expect_identifier("expected identifier after type")?;

        if !self.check(TokenKind::LeftParen) {
            if is_extern {
                self.error_at_current(
                    codes::EXPECTED_TOKEN,
                    "expected '(' after extern declaration",
                );
                return None;
            }
            return self.variable_declarations(name, span);
        }

        self.actions.begin_function(&name, span);
        self.parameter_list()?;

        if !is_extern && self.check(TokenKind::LeftBrace) {
            return self.function_definition();
        }

        self.actions.declare_prototype();
        while self.match_token(TokenKind::Comma) {
            let (name, span) = self.expect_identifier("expected function name")?;
            self.actions.begin_function(&name, span);
            self.parameter_list()?;
            self.actions.declare_prototype();
        }
        self.expect(TokenKind::Semicolon, "expected ';' after prototype")?;
        self.actions.end_prototypes();
        Some(())
    }

    /// `int`, `char` or `void`
    fn type_keyword(&mut self) -> Option<BaseType> {
        let ty = match self.peek().kind {
            TokenKind::Int => BaseType::Int,
            TokenKind::Char => BaseType::Char,
            TokenKind::Void => BaseType::Void,
            _ => {
                self.error_at_current(codes::EXPECTED_TYPE, "expected type");
                return None;
            }
        };
        self.advance();
        Some(ty)
    }

    /// `( void )` or `( type id [ '[' ']' ] , ... )`
    fn parameter_list(&mut self) -> Option<()> {
        self.expect(TokenKind::LeftParen, "expected '(' after function name")?;

        if self.check(TokenKind::Void) && self.check_next(TokenKind::RightParen) {
            self.advance();
        } else if !self.check(TokenKind::RightParen) {
            loop {
                let ty = self.type_keyword()?;
                let (name, span) = self.expect_identifier("expected parameter name")?;
                let is_array = self.match_token(TokenKind::LeftBracket);
                if is_array {
                    self.expect(TokenKind::RightBracket, "expected ']' in array parameter")?;
                }
                self.actions.add_param(&name, ty, is_array, span);

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "expected ')' after parameters")?;
        Some(())
    }

    /// The rest of `type id [ '[' n ']' ] { , id [ '[' n ']' ] } ;` once the
    /// first name has been read
    fn variable_declarations(&mut self, name: String, span: Span) -> Option<()> {
        let (mut name, mut span) = (name, span);
        loop {
            self.variable_declarator(&name, span)?;
            if !self.match_token(TokenKind::Comma) {
                break;
            }
            (name, span) = self.expect_identifier("expected variable name")?;
        }
        self.expect(TokenKind::Semicolon, "expected ';' after declaration")?;
        Some(())
    }

    fn variable_declarator(&mut self, name: &str, span: Span) -> Option<()> {
        if !self.match_token(TokenKind::LeftBracket) {
            self.actions.declare_variable(name, span);
            return Some(());
        }

        let size = self.expect(TokenKind::IntLiteral, "expected array size")?.clone();
        self.expect(TokenKind::RightBracket, "expected ']' after array size")?;

        let size = match size.lexeme.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                self.actions.reporter_mut().report(
                    Diagnostic::error(
                        codes::INVALID_NUMBER,
                        format!("array size '{}' is too large", size.lexeme),
                    ),
                    size.span(),
                );
                0
            }
        };
        let span = self.span_from(span);
        self.actions.declare_array(name, size, span);
        Some(())
    }

    /// `{ local declarations; statements }` after a function header
    fn function_definition(&mut self) -> Option<()> {
        self.actions.begin_definition();
        self.expect(TokenKind::LeftBrace, "expected '{' before function body")?;

        while self.peek().kind.is_type_keyword() {
            let ty = self.type_keyword()?;
            self.actions.set_type(ty);
            let (name, span) = self.expect_identifier("expected variable name")?;
            self.variable_declarations(name, span)?;
        }

        let body = self.statements_until_brace()?;
        let closing = self.expect(TokenKind::RightBrace, "expected '}' after function body")?;
        let span = closing.span();

        debug!("finished function body, handing tree to consumer");
        self.actions.finish_function(body, span, &mut *self.consumer);
        Some(())
    }

    /// Statements up to (not including) the next `}`, as a statement list
    fn statements_until_brace(&mut self) -> Option<Option<Node>> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Some(
            statements
                .into_iter()
                .rev()
                .fold(None, |tail, head| self.actions.statement_list(head, tail)),
        )
    }

    // Token helpers

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.current + 1)
            .is_some_and(|token| token.kind == kind)
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<&Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_at_current(codes::EXPECTED_TOKEN, message);
            None
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Option<(String, Span)> {
        if self.check(TokenKind::Identifier) {
            let token = self.advance();
            Some((token.lexeme.clone(), token.span()))
        } else {
            self.error_at_current(codes::EXPECTED_IDENTIFIER, message);
            None
        }
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: Span) -> Span {
        start.merge(&self.previous().span())
    }

    fn error_at_current(&mut self, code: &'static str, message: &str) {
        let token = self.peek().clone();
        let found = match token.kind {
            TokenKind::Identifier | TokenKind::IntLiteral => {
                format!("{} '{}'", token.kind.describe(), token.lexeme)
            }
            TokenKind::CharLiteral | TokenKind::StringLiteral => {
                format!("{} {}", token.kind.describe(), token.lexeme)
            }
            kind => kind.describe().to_string(),
        };

        self.actions.reporter_mut().report(
            Diagnostic::error(code, format!("syntax error: {}", message))
                .with_note(format!("found {}", found)),
            token.span(),
        );
    }
}
