//! cminus - semantic front end for the C-- language
//!
//! Scans and parses a C-- program, builds a checked syntax tree for every
//! function definition and reports declaration and type errors as it goes.

pub mod diagnostics;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod semantic;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticReporter, SourceLocation, Span};
pub use driver::{CompileSummary, Driver, DriverError};
pub use semantic::{Node, NodeStats, SymbolTable, TreeConsumer};
