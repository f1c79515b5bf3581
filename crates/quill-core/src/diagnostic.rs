//! Uniform rendering for errors that point into source text.

use std::fmt;

use crate::{CheckError, GenerateError, LexError, ParseError, Span};

/// An error with a source location.
pub trait Diagnostic: fmt::Display {
    fn span(&self) -> Span;

    fn message(&self) -> String {
        self.to_string()
    }

    /// Single-line form: `file:line:col: message`.
    fn render(&self, file: &str) -> String {
        let span = self.span();
        format!("{file}:{}:{}: {}", span.line, span.col, self.message())
    }

    /// Multi-line form with the offending source line and a caret underline.
    fn render_with_source(&self, file: &str, source: &str) -> String {
        let mut output = self.render(file);
        output.push('\n');

        let span = self.span();
        let Some(line_text) = source.lines().nth((span.line as usize).saturating_sub(1)) else {
            return output;
        };

        output.push_str("    |\n");
        output.push_str(&format!("{:>3} | {line_text}\n", span.line));

        let indent = " ".repeat((span.col as usize).saturating_sub(1));
        let underline = "~".repeat((span.len as usize).saturating_sub(1));
        output.push_str(&format!("    | {indent}^{underline}\n"));
        output
    }
}

impl Diagnostic for LexError {
    fn span(&self) -> Span {
        LexError::span(self)
    }
}

impl Diagnostic for ParseError {
    fn span(&self) -> Span {
        self.span
    }
}

impl Diagnostic for CheckError {
    fn span(&self) -> Span {
        CheckError::span(self)
    }
}

impl Diagnostic for GenerateError {
    fn span(&self) -> Span {
        GenerateError::span(self)
    }
}
