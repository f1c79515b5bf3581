//! Tokens produced by the lexer.

use quill_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme is copied into the arena, so tokens outlive the source string.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    pub kind: TokenKind,
    pub lexeme: &'ast str,
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// How this token reads in an `expected X, got Y` message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier | TokenKind::IntLiteral | TokenKind::StringLiteral => {
                format!("{} '{}'", self.kind.description(), self.lexeme)
            }
            _ => self.kind.description().to_string(),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// `42`
    IntLiteral,
    /// `"text"`; lexed, but rejected by the expression parser
    StringLiteral,

    /// User-defined name, including type names such as `i32`
    Identifier,

    // Keywords
    Func,
    Var,
    Return,
    Extern,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Equal,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    /// Produced for a lexical error; the error itself is recorded by the lexer.
    Error,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Func | TokenKind::Var | TokenKind::Return | TokenKind::Extern
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            TokenKind::IntLiteral => "integer literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Func => "'func'",
            TokenKind::Var => "'var'",
            TokenKind::Return => "'return'",
            TokenKind::Extern => "'extern'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Equal => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Keyword for an identifier-shaped lexeme, if it is one.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident {
        "func" => TokenKind::Func,
        "var" => TokenKind::Var,
        "return" => TokenKind::Return,
        "extern" => TokenKind::Extern,
        _ => return None,
    })
}
