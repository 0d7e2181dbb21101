//! Driver that runs the front end over one source file.

use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticReporter};
use crate::lexer::Scanner;
use crate::parser::Parser;
use crate::semantic::{Node, NodeStats, Scope, SymbolRef, SymbolTable, TreeConsumer};

/// File extensions accepted as C-- source
pub const SOURCE_EXTENSIONS: [&str; 2] = ["c", "cm"];

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("input file must have a .c or .cm extension: {}", .0.display())]
    Extension(PathBuf),
    #[error("could not read file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a successful run produced
#[derive(Debug, Clone, Default)]
pub struct CompileSummary {
    /// Function definitions whose bodies were checked
    pub functions: usize,
    /// Rendered node counts, when requested
    pub stats: Option<String>,
    /// Global symbol table listing, when requested
    pub global_symbols: Option<String>,
}

/// The front end driver
pub struct Driver {
    file: String,
    source: String,
    dump_tokens: bool,
    dump_ast: bool,
    dump_symtab: bool,
    stats: bool,
}

impl Driver {
    pub fn new(file: String, source: String) -> Self {
        Self {
            file,
            source,
            dump_tokens: false,
            dump_ast: false,
            dump_symtab: false,
            stats: false,
        }
    }

    /// Read a source file, checking its extension first
    pub fn from_path(path: &Path) -> Result<Self, DriverError> {
        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if !accepted {
            return Err(DriverError::Extension(path.to_path_buf()));
        }

        let source = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.to_string_lossy().to_string(), source))
    }

    pub fn set_dump_tokens(&mut self, enabled: bool) {
        self.dump_tokens = enabled;
    }

    pub fn set_dump_ast(&mut self, enabled: bool) {
        self.dump_ast = enabled;
    }

    pub fn set_dump_symtab(&mut self, enabled: bool) {
        self.dump_symtab = enabled;
    }

    pub fn set_stats(&mut self, enabled: bool) {
        self.stats = enabled;
    }

    /// Scan, parse and check the program
    pub fn compile(&mut self) -> Result<CompileSummary, Vec<Diagnostic>> {
        let mut reporter = DiagnosticReporter::new(&self.file, &self.source);
        info!("checking {}", self.file);

        // === Lexical Analysis ===
        let scanner = Scanner::new(&self.source, &mut reporter);
        let tokens = scanner.scan_tokens();
        debug!("scanned {} tokens", tokens.len());

        if self.dump_tokens {
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("  {}", token);
            }
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(reporter.take_diagnostics());
        }

        // === Parsing and semantic checks ===
        let mut stats = NodeStats::new();
        let (dump_ast, dump_symtab) = (self.dump_ast, self.dump_symtab);
        let mut consumer = |symbols: &SymbolTable, function: SymbolRef, body: &Node| {
            let name = symbols
                .get(function)
                .map(|symbol| symbol.name.as_str())
                .unwrap_or("?");
            if dump_ast {
                eprintln!("=== {} ===", name);
                for statement in body.iter_list() {
                    eprintln!("{:#?}", statement);
                }
                eprintln!();
            }
            if dump_symtab {
                eprintln!("=== locals of {} ===", name);
                eprint!("{}", symbols.dump(Scope::Local));
                eprintln!();
            }
            stats.process(symbols, function, body);
        };

        let symbols = Parser::new(tokens, &mut reporter, &mut consumer).parse();

        let Some(symbols) = symbols else {
            return Err(reporter.take_diagnostics());
        };
        if reporter.has_errors() {
            return Err(reporter.take_diagnostics());
        }

        Ok(CompileSummary {
            functions: stats.functions().len(),
            stats: self.stats.then(|| stats.render()),
            global_symbols: self.dump_symtab.then(|| symbols.dump(Scope::Global)),
        })
    }
}
