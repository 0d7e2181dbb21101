//! Lexer module for tokenizing C-- source code.

mod scanner;
mod token;

#[cfg(test)]
mod scanner_tests;

pub use scanner::{unescape_char, unescape_string, Scanner};
pub use token::{Token, TokenKind};
