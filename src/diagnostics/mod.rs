//! Diagnostic reporting for the C-- front end.
//!
//! Every semantic problem is reported here and parsing carries on; only a
//! syntax error ends the run.

mod reporter;

pub use reporter::DiagnosticReporter;

use colored::Colorize;
use std::fmt;

/// Byte range of a token or syntax tree node in the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset from start of source
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Create a span that covers both self and other
    pub fn merge(&self, other: &Span) -> Span {
        let start = self.offset.min(other.offset);
        let end = (self.offset + self.length).max(other.offset + other.length);
        Span::new(start, end - start)
    }
}

/// Location in source code, resolved from a [`Span`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl SourceLocation {
    pub fn new(file: &str, line: usize, column: usize, length: usize) -> Self {
        Self {
            file: file.to_string(),
            line,
            column,
            length,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A single error message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub source_line: Option<String>,
    pub help: Option<String>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            source_line: None,
            help: None,
            notes: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
        self.source_line = Some(line.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // error[E200]: message
        writeln!(
            f,
            "{}[{}]: {}",
            "error".red().bold(),
            self.code.cyan(),
            self.message
        )?;

        if let Some(ref loc) = self.location {
            let padding = " ".repeat(loc.line.to_string().len());

            writeln!(f, "{}--> {}", padding, loc.to_string().blue())?;
            writeln!(f, "{} {}", padding, "|".blue())?;

            if let Some(ref source) = self.source_line {
                writeln!(
                    f,
                    "{} {} {}",
                    loc.line.to_string().blue().bold(),
                    "|".blue(),
                    source
                )?;

                let underline = "^".repeat(loc.length.max(1)).red().bold();
                writeln!(
                    f,
                    "{} {} {}{}",
                    padding,
                    "|".blue(),
                    " ".repeat(loc.column.saturating_sub(1)),
                    underline
                )?;
            }

            writeln!(f, "{} {}", padding, "|".blue())?;
        }

        if let Some(ref help) = self.help {
            writeln!(f, "   {} {}: {}", "=".blue(), "help".green().bold(), help)?;
        }

        for note in &self.notes {
            writeln!(f, "   {} {}: {}", "=".blue(), "note".cyan().bold(), note)?;
        }

        Ok(())
    }
}

/// Error codes for C-- diagnostics
pub mod codes {
    // Lexical errors (E0xx)
    pub const UNEXPECTED_CHARACTER: &str = "E001";
    pub const UNTERMINATED_STRING: &str = "E002";
    pub const UNTERMINATED_CHAR: &str = "E003";
    pub const INVALID_ESCAPE: &str = "E004";
    pub const INVALID_NUMBER: &str = "E005";

    // Syntax errors (E1xx), always fatal
    pub const EXPECTED_TOKEN: &str = "E100";
    pub const EXPECTED_EXPRESSION: &str = "E101";
    pub const EXPECTED_STATEMENT: &str = "E102";
    pub const EXPECTED_TYPE: &str = "E103";
    pub const EXPECTED_IDENTIFIER: &str = "E104";

    // Declarations and name resolution (E2xx)
    pub const MULTIPLE_DECLARATION: &str = "E200";
    pub const UNDECLARED_IDENTIFIER: &str = "E201";
    pub const VOID_VARIABLE: &str = "E202";
    pub const NOT_AN_ARRAY: &str = "E203";
    pub const NOT_A_FUNCTION: &str = "E204";

    // Expression and statement typing (E3xx)
    pub const OPERAND_TYPE: &str = "E300";
    pub const INVALID_ASSIGNMENT: &str = "E301";
    pub const NON_BOOLEAN_CONDITION: &str = "E302";
    pub const SUBSCRIPT_TYPE: &str = "E303";
    pub const RETURN_TYPE: &str = "E304";

    // Function signatures and calls (E4xx)
    pub const PROTOTYPE_ARGUMENT_MISMATCH: &str = "E400";
    pub const PROTOTYPE_ARITY_MISMATCH: &str = "E401";
    pub const PROTOTYPE_RETURN_MISMATCH: &str = "E402";
    pub const EXTERN_REDEFINITION: &str = "E403";
    pub const MULTIPLE_DEFINITIONS: &str = "E404";
    pub const ARGUMENT_TYPE_MISMATCH: &str = "E405";
    pub const ARGUMENT_COUNT_MISMATCH: &str = "E406";
    pub const NON_VOID_CALL_STATEMENT: &str = "E407";
}
