//! Shared vocabulary for the quill compiler.
//!
//! Every phase of the pipeline (lexing, parsing, checking, IR generation)
//! speaks in terms of the types defined here:
//!
//! - [`Span`]: source positions attached to tokens, AST nodes and errors
//! - [`Type`]: the closed set of static types of the language
//! - [`error`]: the per-phase error taxonomy and the unified [`QuillError`]
//! - [`Diagnostic`]: uniform `file:line:col: message` rendering

pub mod diagnostic;
pub mod error;
mod span;
mod types;

pub use diagnostic::Diagnostic;
pub use error::{
    CheckError, DeclKind, GenerateError, LexError, ParseError, ParseErrorKind, ParseErrors,
    QuillError,
};
pub use span::Span;
pub use types::Type;
