//! Diagnostic reporter that collects and manages diagnostics.

use log::debug;

use super::{Diagnostic, SourceLocation, Span};

/// Collects diagnostics during compilation
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
    source: String,
    file: String,
    lines: Vec<(usize, usize)>, // (start, end) byte offsets for each line
}

impl DiagnosticReporter {
    pub fn new(file: &str, source: &str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;

        for (i, c) in source.char_indices() {
            if c == '\n' {
                lines.push((start, i));
                start = i + 1;
            }
        }

        // last line has no trailing newline
        if start <= source.len() {
            lines.push((start, source.len()));
        }

        Self {
            diagnostics: Vec::new(),
            source: source.to_string(),
            file: file.to_string(),
            lines,
        }
    }

    /// Resolve a span to a line/column location plus the text of that line
    pub fn locate(&self, span: Span) -> (SourceLocation, String) {
        let (index, &(start, _)) = self
            .lines
            .iter()
            .enumerate()
            .find(|(_, (start, end))| span.offset >= *start && span.offset <= *end)
            .unwrap_or((0, &(0, 0)));

        let line_num = index + 1;
        let column = span.offset.saturating_sub(start) + 1;

        (
            SourceLocation::new(&self.file, line_num, column, span.length),
            self.line_text(line_num),
        )
    }

    /// Text of a 1-based line, empty when out of range
    pub fn line_text(&self, line_num: usize) -> String {
        if line_num == 0 || line_num > self.lines.len() {
            return String::new();
        }

        let (start, end) = self.lines[line_num - 1];
        self.source.get(start..end).unwrap_or_default().to_string()
    }

    /// Report a diagnostic anchored at `span`
    pub fn report(&mut self, diagnostic: Diagnostic, span: Span) {
        let (location, line) = self.locate(span);
        debug!("{} at {}: {}", diagnostic.code, location, diagnostic.message);

        self.diagnostics.push(
            diagnostic
                .with_location(location)
                .with_source_line(line),
        );
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Number of diagnostics reported with the given code
    pub fn count(&self, code: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    /// Consume and return all diagnostics
    pub fn take_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
