//! Scanner for C-- source code tokenization.

use super::token::{lookup_keyword, Token, TokenKind};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter, Span};

/// Scanner that produces tokens from source code
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_offset: usize,
    start_offset: usize,
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_offset: 0,
            start_offset: 0,
            reporter,
        }
    }

    /// Tokenize the entire source. Malformed tokens are reported and dropped.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;

            if token.kind != TokenKind::Error {
                tokens.push(token);
            }

            if is_eof {
                break;
            }
        }

        tokens
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start_offset = self.current_offset;

        match self.advance() {
            None => Token::eof(self.current_offset),
            Some((offset, c)) => {
                self.start_offset = offset;
                self.current_offset = offset + c.len_utf8();

                match c {
                    '(' => self.make_token(TokenKind::LeftParen),
                    ')' => self.make_token(TokenKind::RightParen),
                    '{' => self.make_token(TokenKind::LeftBrace),
                    '}' => self.make_token(TokenKind::RightBrace),
                    '[' => self.make_token(TokenKind::LeftBracket),
                    ']' => self.make_token(TokenKind::RightBracket),
                    ',' => self.make_token(TokenKind::Comma),
                    ';' => self.make_token(TokenKind::Semicolon),
                    '+' => self.make_token(TokenKind::Plus),
                    '-' => self.make_token(TokenKind::Minus),
                    '*' => self.make_token(TokenKind::Star),
                    '/' => self.make_token(TokenKind::Slash),

                    '!' => self.match_compound('=', TokenKind::BangEqual, TokenKind::Bang),
                    '=' => self.match_compound('=', TokenKind::EqualEqual, TokenKind::Equal),
                    '<' => self.match_compound('=', TokenKind::LessEqual, TokenKind::Less),
                    '>' => self.match_compound('=', TokenKind::GreaterEqual, TokenKind::Greater),

                    // C-- has no bitwise operators, so a lone '&' or '|' is an error
                    '&' => self.match_pair('&', TokenKind::AmpersandAmpersand),
                    '|' => self.match_pair('|', TokenKind::PipePipe),

                    '"' => self.scan_string(),
                    '\'' => self.scan_char(),
                    '0'..='9' => self.scan_number(),
                    c if is_ident_start(c) => self.scan_identifier(),

                    _ => self.error_token(c),
                }
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('/') => {
                    let mut chars = self.chars.clone();
                    chars.next();
                    match chars.peek() {
                        Some((_, '/')) => {
                            self.advance();
                            self.advance();
                            while self.peek().is_some_and(|c| c != '\n') {
                                self.advance();
                            }
                        }
                        Some((_, '*')) => {
                            let start = self.current_offset;
                            self.advance();
                            self.advance();
                            if !self.skip_block_comment() {
                                self.reporter.report(
                                    Diagnostic::error(
                                        codes::UNEXPECTED_CHARACTER,
                                        "unterminated comment",
                                    )
                                    .with_help("close the comment with '*/'"),
                                    Span::new(start, 2),
                                );
                            }
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip to the end of a `/* ... */` comment; C comments do not nest.
    fn skip_block_comment(&mut self) -> bool {
        while let Some((_, c)) = self.advance() {
            if c == '*' && self.match_char('/') {
                return true;
            }
        }
        false
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((_, c)) = result {
            self.current_offset += c.len_utf8();
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_compound(&mut self, next: char, compound: TokenKind, single: TokenKind) -> Token {
        if self.match_char(next) {
            self.make_token(compound)
        } else {
            self.make_token(single)
        }
    }

    fn match_pair(&mut self, next: char, kind: TokenKind) -> Token {
        if self.match_char(next) {
            self.make_token(kind)
        } else {
            self.error_token(next)
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = &self.source[self.start_offset..self.current_offset];
        Token::new(
            kind,
            lexeme,
            self.start_offset,
            self.current_offset - self.start_offset,
        )
    }

    fn current_span(&self) -> Span {
        Span::new(self.start_offset, self.current_offset - self.start_offset)
    }

    fn error_token(&mut self, c: char) -> Token {
        self.reporter.report(
            Diagnostic::error(
                codes::UNEXPECTED_CHARACTER,
                format!("unexpected character '{}'", c.escape_default()),
            ),
            self.current_span(),
        );
        Token::new(TokenKind::Error, c, self.start_offset, c.len_utf8())
    }

    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }

        let lexeme = &self.source[self.start_offset..self.current_offset];
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }

    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // `12abc` is one malformed token, not a number followed by a name
        if self.peek().is_some_and(is_ident_continue) {
            while self.peek().is_some_and(is_ident_continue) {
                self.advance();
            }
            let lexeme = self.source[self.start_offset..self.current_offset].to_string();
            self.reporter.report(
                Diagnostic::error(
                    codes::INVALID_NUMBER,
                    format!("invalid integer constant '{}'", lexeme),
                ),
                self.current_span(),
            );
            return Token::new(TokenKind::Error, lexeme, self.start_offset, 0);
        }

        self.make_token(TokenKind::IntLiteral)
    }

    fn scan_string(&mut self) -> Token {
        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    self.advance();
                    let token = self.make_token(TokenKind::StringLiteral);
                    let body = &token.lexeme[1..token.lexeme.len() - 1];
                    if unescape_string(body).is_none() {
                        return self.invalid_escape("string constant");
                    }
                    return token;
                }
                '\\' => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                '\n' => break,
                _ => {
                    self.advance();
                }
            }
        }

        self.reporter.report(
            Diagnostic::error(codes::UNTERMINATED_STRING, "unterminated string constant")
                .with_help("string constants cannot span multiple lines"),
            self.current_span(),
        );
        Token::new(TokenKind::Error, "", self.start_offset, 0)
    }

    fn scan_char(&mut self) -> Token {
        match self.advance() {
            None | Some((_, '\n')) => {
                self.reporter.report(
                    Diagnostic::error(codes::UNTERMINATED_CHAR, "unterminated character constant"),
                    self.current_span(),
                );
                return Token::new(TokenKind::Error, "", self.start_offset, 0);
            }
            Some((_, '\\')) => {
                self.advance();
            }
            Some((_, '\'')) => {
                self.reporter.report(
                    Diagnostic::error(codes::UNTERMINATED_CHAR, "empty character constant"),
                    self.current_span(),
                );
                return Token::new(TokenKind::Error, "", self.start_offset, 0);
            }
            _ => {}
        }

        if !self.match_char('\'') {
            self.reporter.report(
                Diagnostic::error(codes::UNTERMINATED_CHAR, "unterminated character constant")
                    .with_help("add a closing '\\'' after the character"),
                self.current_span(),
            );
            return Token::new(TokenKind::Error, "", self.start_offset, 0);
        }

        let token = self.make_token(TokenKind::CharLiteral);
        if unescape_char(&token.lexeme[1..token.lexeme.len() - 1]).is_none() {
            return self.invalid_escape("character constant");
        }
        token
    }

    fn invalid_escape(&mut self, what: &str) -> Token {
        self.reporter.report(
            Diagnostic::error(codes::INVALID_ESCAPE, format!("invalid {}", what))
                .with_help("C-- supports the escapes \\n, \\0, \\\\, \\' and \\\" over ASCII text"),
            self.current_span(),
        );
        Token::new(TokenKind::Error, "", self.start_offset, 0)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_continue(c)
}

fn escape(c: char) -> Option<u8> {
    match c {
        'n' => Some(b'\n'),
        '0' => Some(0),
        '\\' => Some(b'\\'),
        '\'' => Some(b'\''),
        '"' => Some(b'"'),
        _ => None,
    }
}

/// Decode the body of a string constant (without quotes) into bytes.
/// Returns `None` for an unknown escape or a non-ASCII character.
pub fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        let byte = match c {
            '\\' => escape(chars.next()?)?,
            c if c.is_ascii() => c as u8,
            _ => return None,
        };
        result.push(byte as char);
    }

    Some(result)
}

/// Decode the body of a character constant (without quotes).
pub fn unescape_char(s: &str) -> Option<u8> {
    let mut chars = s.chars();
    let value = match chars.next()? {
        '\\' => escape(chars.next()?)?,
        c if c.is_ascii() => c as u8,
        _ => return None,
    };
    chars.next().is_none().then_some(value)
}
