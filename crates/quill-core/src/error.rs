//! Error types for every phase of the pipeline.
//!
//! ```text
//! QuillError (what a pipeline run fails with)
//! ├── ParseErrors     - syntax errors, lexer errors folded in
//! ├── Vec<CheckError> - semantic errors, always the full set for the program
//! └── GenerateError   - internal compiler errors surfaced by the IR generator
//! ```
//!
//! Display output is the bare message. Source locations are added by
//! [`Diagnostic::render`](crate::Diagnostic::render), which produces the
//! `file:line:col: message` form the driver prints.

use thiserror::Error;

use crate::{Diagnostic, Span, Type};

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } | LexError::UnterminatedString { span } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but another was found.
    ExpectedToken,
    /// Input ended inside a declaration, block or argument list.
    UnexpectedEof,
    /// An expression was expected.
    ExpectedExpression,
    /// A type was expected.
    ExpectedType,
    /// A top-level `func` or `var` was expected.
    ExpectedDeclaration,
    /// A declaration is well formed token-wise but not allowed.
    InvalidDeclaration,
    /// A literal whose value cannot be represented.
    InvalidLiteral,
    /// A construct the lexer knows but expressions do not support.
    UnsupportedExpression,
    /// A lexical error, folded into the parse error stream.
    InvalidSyntax,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
            ParseErrorKind::InvalidDeclaration => "invalid declaration",
            ParseErrorKind::InvalidLiteral => "invalid literal",
            ParseErrorKind::UnsupportedExpression => "unsupported expression",
            ParseErrorKind::InvalidSyntax => "invalid syntax",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A syntax error with its location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// `expected X, got Y`.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, got {found}"),
        )
    }

    /// `expected X, got end of file`.
    pub fn unexpected_eof(span: Span, expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            format!("expected {expected}, got end of file"),
        )
    }

    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, got {found}"),
        )
    }

    pub fn expected_type(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedType,
            span,
            format!("expected type, got {found}"),
        )
    }

    pub fn invalid_integer(span: Span, lexeme: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidLiteral,
            span,
            format!("invalid integer literal '{lexeme}': out of range for i32"),
        )
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::InvalidSyntax, error.span(), error.to_string())
    }
}

/// The ordered list of syntax errors from one parse.
#[derive(Debug, Clone, Default)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {error}", error.span)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Check Errors
// ============================================================================

/// Which namespace a declaration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Function,
    Variable,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DeclKind::Function => "function",
            DeclKind::Variable => "variable",
        })
    }
}

/// Semantic errors found by the checker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("{kind} '{name}' already declared at {original_span}")]
    DuplicateDeclaration {
        kind: DeclKind,
        name: String,
        original_span: Span,
        span: Span,
    },

    #[error("{kind} '{name}' not declared")]
    Undeclared {
        kind: DeclKind,
        name: String,
        span: Span,
    },

    #[error("mismatched operand types '{left}' and '{right}' for '{op}'")]
    OperandTypeMismatch {
        op: &'static str,
        left: Type,
        right: Type,
        span: Span,
    },

    #[error("operator '{op}' is not defined for type '{ty}'")]
    NonNumericOperand { op: &'static str, ty: Type, span: Span },

    #[error("expected type '{expected}', found '{found}'")]
    TypeMismatch {
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("variable '{name}' cannot have type void")]
    VoidVariable { name: String, span: Span },

    #[error("'{name}' expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("argument {position} of '{name}' expects '{expected}', found '{found}'")]
    ArgumentTypeMismatch {
        name: String,
        position: usize,
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("function '{name}' returns '{expected}', found '{found}'")]
    ReturnTypeMismatch {
        name: String,
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("function '{name}' must return a value of type '{expected}'")]
    MissingReturnValue {
        name: String,
        expected: Type,
        span: Span,
    },

    #[error("void function '{name}' cannot return a value")]
    UnexpectedReturnValue { name: String, span: Span },

    #[error("function '{name}' does not end with a return statement")]
    MissingReturn { name: String, span: Span },

    #[error("global '{name}' is used in its own initializer")]
    SelfReference { name: String, span: Span },

    #[error("initialization cycle: {path}")]
    InitializationCycle { name: String, path: String, span: Span },

    #[error("{kind} '{name}' conflicts with the top-level declaration at {original_span}")]
    NameConflict {
        kind: DeclKind,
        name: String,
        original_span: Span,
        span: Span,
    },

    #[error("'{name}' is a reserved name")]
    ReservedName { name: String, span: Span },
}

impl CheckError {
    pub fn span(&self) -> Span {
        match self {
            CheckError::DuplicateDeclaration { span, .. }
            | CheckError::Undeclared { span, .. }
            | CheckError::OperandTypeMismatch { span, .. }
            | CheckError::NonNumericOperand { span, .. }
            | CheckError::TypeMismatch { span, .. }
            | CheckError::VoidVariable { span, .. }
            | CheckError::ArgumentCountMismatch { span, .. }
            | CheckError::ArgumentTypeMismatch { span, .. }
            | CheckError::ReturnTypeMismatch { span, .. }
            | CheckError::MissingReturnValue { span, .. }
            | CheckError::UnexpectedReturnValue { span, .. }
            | CheckError::MissingReturn { span, .. }
            | CheckError::SelfReference { span, .. }
            | CheckError::InitializationCycle { span, .. }
            | CheckError::NameConflict { span, .. }
            | CheckError::ReservedName { span, .. } => *span,
        }
    }
}

// ============================================================================
// Generate Errors
// ============================================================================

/// Failures of the IR generator.
///
/// The generator only runs on checked programs, so anything it rejects is a
/// compiler bug rather than a user error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("internal compiler error: {message}")]
    Internal { message: String, span: Span },
}

impl GenerateError {
    pub fn internal(span: Span, message: impl Into<String>) -> Self {
        GenerateError::Internal {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            GenerateError::Internal { span, .. } => *span,
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Why a compilation stopped.
///
/// Each phase runs only when the previous one produced no errors, so a
/// `QuillError` always carries the diagnostics of exactly one phase.
#[derive(Debug, Clone, Error)]
pub enum QuillError {
    #[error(transparent)]
    Parse(#[from] ParseErrors),

    #[error("{} semantic error(s)", .0.len())]
    Check(Vec<CheckError>),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl From<Vec<CheckError>> for QuillError {
    fn from(errors: Vec<CheckError>) -> Self {
        QuillError::Check(errors)
    }
}

impl QuillError {
    pub fn is_parse(&self) -> bool {
        matches!(self, QuillError::Parse(_))
    }

    pub fn is_check(&self) -> bool {
        matches!(self, QuillError::Check(_))
    }

    /// Internal errors are compiler bugs, not problems with the input.
    pub fn is_internal(&self) -> bool {
        matches!(self, QuillError::Generate(_))
    }

    /// Every diagnostic carried by this error, in report order.
    pub fn diagnostics(&self) -> Vec<&dyn Diagnostic> {
        match self {
            QuillError::Parse(errors) => errors.iter().map(|e| e as &dyn Diagnostic).collect(),
            QuillError::Check(errors) => errors.iter().map(|e| e as &dyn Diagnostic).collect(),
            QuillError::Generate(error) => vec![error as &dyn Diagnostic],
        }
    }

    /// Render every diagnostic as `file:line:col: message`.
    pub fn render(&self, file: &str) -> Vec<String> {
        self.diagnostics().iter().map(|d| d.render(file)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_converts_to_syntax_error() {
        let err: ParseError = LexError::UnexpectedChar {
            ch: '@',
            span: Span::new(2, 3, 1),
        }
        .into();
        assert_eq!(err.kind, ParseErrorKind::InvalidSyntax);
        assert_eq!(err.span, Span::new(2, 3, 1));
        assert_eq!(err.to_string(), "unexpected character '@'");
    }

    #[test]
    fn expected_token_message() {
        let err = ParseError::expected_token(Span::new(1, 9, 1), "')'", "'{'");
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
        assert_eq!(err.to_string(), "expected ')', got '{'");
    }

    #[test]
    fn parse_errors_display_lists_positions() {
        let mut errors = ParseErrors::new();
        assert!(errors.is_empty());
        errors.push(ParseError::expected_expression(Span::new(1, 4, 1), "'}'"));
        errors.push(ParseError::invalid_integer(Span::new(2, 1, 11), "99999999999"));

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "1:4: expected expression, got '}'\n\
             2:1: invalid integer literal '99999999999': out of range for i32"
        );
    }

    #[test]
    fn duplicate_declaration_names_the_original() {
        let err = CheckError::DuplicateDeclaration {
            kind: DeclKind::Function,
            name: "main".into(),
            original_span: Span::new(1, 6, 4),
            span: Span::new(3, 6, 4),
        };
        assert_eq!(err.to_string(), "function 'main' already declared at 1:6");
        assert_eq!(err.span(), Span::new(3, 6, 4));
    }

    #[test]
    fn operand_mismatch_display() {
        let err = CheckError::OperandTypeMismatch {
            op: "+",
            left: Type::Int32,
            right: Type::pointer_to(Type::Int32),
            span: Span::new(1, 1, 5),
        };
        assert_eq!(err.to_string(), "mismatched operand types 'i32' and '*i32' for '+'");
    }

    #[test]
    fn quill_error_renders_each_diagnostic() {
        let err = QuillError::from(vec![
            CheckError::Undeclared {
                kind: DeclKind::Variable,
                name: "x".into(),
                span: Span::new(2, 12, 1),
            },
            CheckError::Undeclared {
                kind: DeclKind::Function,
                name: "g".into(),
                span: Span::new(3, 5, 1),
            },
        ]);
        assert!(err.is_check());
        assert!(!err.is_internal());
        assert_eq!(
            err.render("main.ql"),
            vec![
                "main.ql:2:12: variable 'x' not declared".to_string(),
                "main.ql:3:5: function 'g' not declared".to_string(),
            ]
        );
    }

    #[test]
    fn generate_errors_are_internal() {
        let err: QuillError = GenerateError::internal(Span::new(1, 1, 0), "unresolved name 'x'").into();
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "internal compiler error: unresolved name 'x'");
    }
}
