use indoc::indoc;

use super::{unescape_char, unescape_string, Scanner, TokenKind};
use crate::diagnostics::{codes, DiagnosticReporter};

fn scan(source: &str) -> (Vec<TokenKind>, DiagnosticReporter) {
    let mut reporter = DiagnosticReporter::new("test.c", source);
    let tokens = Scanner::new(source, &mut reporter).scan_tokens();
    (tokens.into_iter().map(|t| t.kind).collect(), reporter)
}

fn kinds(source: &str) -> Vec<TokenKind> {
    let (kinds, reporter) = scan(source);
    assert!(!reporter.has_errors(), "{:?}", reporter.diagnostics());
    kinds
}

#[test]
fn keywords_and_identifiers() {
    use TokenKind::*;

    assert_eq!(
        kinds("extern int char void if else while for return integer _x"),
        vec![Extern, Int, Char, Void, If, Else, While, For, Return, Identifier, Identifier, Eof]
    );
}

#[test]
fn compound_operators() {
    use TokenKind::*;

    assert_eq!(
        kinds("= == ! != < <= > >= && || + - * /"),
        vec![
            Equal, EqualEqual, Bang, BangEqual, Less, LessEqual, Greater, GreaterEqual,
            AmpersandAmpersand, PipePipe, Plus, Minus, Star, Slash, Eof
        ]
    );
}

#[test]
fn comments_are_skipped() {
    use TokenKind::*;

    let source = indoc! {"
        int x; // trailing
        /* block
           comment */ char /* inline */ y;
    "};

    assert_eq!(
        kinds(source),
        vec![Int, Identifier, Semicolon, Char, Identifier, Semicolon, Eof]
    );
}

#[test]
fn block_comments_do_not_nest() {
    use TokenKind::*;

    // the first `*/` closes the comment
    assert_eq!(
        kinds("/* a /* b */ y * / z"),
        vec![Identifier, Star, Slash, Identifier, Eof]
    );
}

#[test]
fn unterminated_block_comment() {
    let (_, reporter) = scan("int /* never closed");
    assert_eq!(reporter.count(codes::UNEXPECTED_CHARACTER), 1);
}

#[test]
fn literals() {
    let source = r#"42 'a' '\n' "hi\n""#;
    let mut reporter = DiagnosticReporter::new("test.c", source);
    let tokens = Scanner::new(source, &mut reporter).scan_tokens();

    assert!(!reporter.has_errors());
    assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
    assert_eq!(tokens[0].lexeme, "42");
    assert_eq!(tokens[1].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[1].lexeme, "'a'");
    assert_eq!(tokens[2].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[2].lexeme, r"'\n'");
    assert_eq!(tokens[3].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[3].lexeme, r#""hi\n""#);
    assert_eq!(tokens[3].offset, 12);
}

#[test]
fn lone_ampersand_is_rejected() {
    let (kinds, reporter) = scan("a & b");
    assert_eq!(
        kinds,
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
    assert_eq!(reporter.count(codes::UNEXPECTED_CHARACTER), 1);
}

#[test]
fn unexpected_character() {
    let (_, reporter) = scan("int x @ 3;");
    let diagnostic = &reporter.diagnostics()[0];

    assert_eq!(diagnostic.code, codes::UNEXPECTED_CHARACTER);
    assert_eq!(diagnostic.message, "unexpected character '@'");
    let location = diagnostic.location.as_ref().unwrap();
    assert_eq!((location.line, location.column), (1, 7));
}

#[test]
fn unterminated_string_stops_at_newline() {
    let (kinds, reporter) = scan("\"abc\nx");
    assert_eq!(reporter.count(codes::UNTERMINATED_STRING), 1);
    assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Eof]);
}

#[test]
fn bad_character_constants() {
    let (_, reporter) = scan("''");
    assert_eq!(reporter.count(codes::UNTERMINATED_CHAR), 1);

    let (_, reporter) = scan("'ab");
    assert_eq!(reporter.count(codes::UNTERMINATED_CHAR), 1);

    let (_, reporter) = scan(r"'\q'");
    assert_eq!(reporter.count(codes::INVALID_ESCAPE), 1);
    assert_eq!(reporter.error_count(), 1);
}

#[test]
fn number_glued_to_identifier() {
    let (kinds, reporter) = scan("12abc;");
    assert_eq!(reporter.count(codes::INVALID_NUMBER), 1);
    assert_eq!(kinds, vec![TokenKind::Semicolon, TokenKind::Eof]);
}

#[test]
fn unescape_helpers() {
    assert_eq!(unescape_char("a"), Some(b'a'));
    assert_eq!(unescape_char(r"\0"), Some(0));
    assert_eq!(unescape_char(r"\'"), Some(b'\''));
    assert_eq!(unescape_char("ab"), None);
    assert_eq!(unescape_char(r"\t"), None);

    assert_eq!(unescape_string(r#"a\"b\\c\n"#).as_deref(), Some("a\"b\\c\n"));
    assert_eq!(unescape_string(r"\x"), None);
}
