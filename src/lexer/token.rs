//! Token definitions for the C-- lexer.

use std::fmt;

use crate::diagnostics::Span;

/// A token with its kind, lexeme, and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
    pub length: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            offset,
            length,
        }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset, 0)
    }

    pub fn span(&self) -> Span {
        Span::new(self.offset, self.length)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}('{}')", self.kind, self.lexeme)
    }
}

/// All token kinds in C--
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    IntLiteral,
    CharLiteral,
    StringLiteral,

    Identifier,

    // Type keywords
    Int,
    Char,
    Void,

    // Keywords
    Extern,
    If,
    Else,
    While,
    For,
    Return,

    // Operators
    Plus,               // +
    Minus,              // -
    Star,               // *
    Slash,              // /
    Bang,               // !
    Less,               // <
    Greater,            // >
    Equal,              // =
    EqualEqual,         // ==
    BangEqual,          // !=
    LessEqual,          // <=
    GreaterEqual,       // >=
    AmpersandAmpersand, // &&
    PipePipe,           // ||

    // Delimiters
    Comma,        // ,
    Semicolon,    // ;
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]

    Eof,
    Error,
}

impl TokenKind {
    /// `int`, `char` or `void`
    pub fn is_type_keyword(&self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Char | TokenKind::Void)
    }

    /// How the token reads in a "syntax error: expected ..." message
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::IntLiteral => "integer constant",
            TokenKind::CharLiteral => "character constant",
            TokenKind::StringLiteral => "string constant",
            TokenKind::Identifier => "identifier",
            TokenKind::Int => "'int'",
            TokenKind::Char => "'char'",
            TokenKind::Void => "'void'",
            TokenKind::Extern => "'extern'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::For => "'for'",
            TokenKind::Return => "'return'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Bang => "'!'",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::Equal => "'='",
            TokenKind::EqualEqual => "'=='",
            TokenKind::BangEqual => "'!='",
            TokenKind::LessEqual => "'<='",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::AmpersandAmpersand => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// Map string to keyword token kind
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "int" => Some(TokenKind::Int),
        "char" => Some(TokenKind::Char),
        "void" => Some(TokenKind::Void),
        "extern" => Some(TokenKind::Extern),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "for" => Some(TokenKind::For),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}
