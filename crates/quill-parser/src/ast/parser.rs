//! Parser infrastructure: token navigation, node ids and the program loop.

use bumpalo::Bump;
use quill_core::{ParseError, ParseErrors, Span};

use super::{ExprId, FuncDecl, FuncDeclId, Item, Program, Stmt, VarDecl, VarDeclId};
use crate::lexer::{Lexer, Token, TokenKind};

/// Recursive-descent parser with precedence climbing for expressions.
///
/// The whole source is tokenized up front. Lexer errors are folded into the
/// parse errors, and a source with lexer errors is not parsed further.
///
/// Parsing stops at the first syntax error; there is no resynchronization.
pub struct Parser<'ast> {
    pub(super) buffer: Vec<Token<'ast>>,
    pub(super) position: usize,
    pub(super) errors: ParseErrors,
    pub(super) arena: &'ast Bump,
    next_expr: u32,
    var_decls: Vec<&'ast VarDecl<'ast>>,
    func_decls: Vec<&'ast FuncDecl<'ast>>,
}

impl<'ast> Parser<'ast> {
    /// Tokenize `source` into the arena and prepare to parse it.
    pub fn new(source: &str, arena: &'ast Bump) -> Self {
        let mut lexer = Lexer::new(source, arena);
        let mut buffer = Vec::with_capacity(source.len() / 4 + 1);
        let mut errors = ParseErrors::new();

        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Error {
                for lex_error in lexer.take_errors() {
                    errors.push(lex_error.into());
                }
            }

            let is_eof = token.kind == TokenKind::Eof;
            buffer.push(token);
            if is_eof {
                break;
            }
        }

        Self::with_buffer(buffer, errors, arena)
    }

    /// Parse an already tokenized stream.
    ///
    /// An `Eof` token is appended if the stream does not end with one.
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token<'ast>>, arena: &'ast Bump) -> Self {
        let mut buffer: Vec<Token<'ast>> = tokens.into_iter().collect();
        let needs_eof = buffer.last().is_none_or(|t| t.kind != TokenKind::Eof);
        if needs_eof {
            let span = buffer
                .last()
                .map(|t| Span::point(t.span.line, t.span.col + t.span.len))
                .unwrap_or(Span::point(1, 1));
            buffer.push(Token::new(TokenKind::Eof, "", span));
        }
        Self::with_buffer(buffer, ParseErrors::new(), arena)
    }

    fn with_buffer(buffer: Vec<Token<'ast>>, errors: ParseErrors, arena: &'ast Bump) -> Self {
        Self {
            buffer,
            position: 0,
            errors,
            arena,
            next_expr: 0,
            var_decls: Vec::new(),
            func_decls: Vec::new(),
        }
    }

    /// Parse a complete source file, failing with every error collected.
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<Program<'ast>, ParseErrors> {
        let mut parser = Parser::new(source, arena);
        let (program, ok) = parser.parse_program();
        if ok {
            Ok(program)
        } else {
            Err(parser.take_errors())
        }
    }

    /// Parse top-level declarations until end of input.
    ///
    /// On the first error, parsing stops and the declarations parsed so far
    /// are returned with `ok == false`; the errors are available from
    /// [`take_errors`](Self::take_errors).
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_program(&mut self) -> (Program<'ast>, bool) {
        let mut items = Vec::new();

        if self.errors.is_empty() {
            while !self.is_eof() {
                match self.parse_top_level() {
                    Ok(item) => items.push(item),
                    Err(err) => {
                        self.errors.push(err);
                        break;
                    }
                }
            }
        }

        let program = Program::new(
            self.arena.alloc_slice_copy(&items),
            std::mem::take(&mut self.var_decls),
            std::mem::take(&mut self.func_decls),
            self.next_expr,
        );
        (program, self.errors.is_empty())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &ParseErrors {
        &self.errors
    }

    /// Take the errors, leaving an empty error collection.
    pub fn take_errors(&mut self) -> ParseErrors {
        std::mem::take(&mut self.errors)
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// The current token. At end of input this is the `Eof` token.
    pub fn peek(&self) -> &Token<'ast> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> &Token<'ast> {
        let index = (self.position + n).min(self.buffer.len() - 1);
        &self.buffer[index]
    }

    /// Consume the current token. `Eof` is never consumed.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or fail with `expected X, got Y`.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(kind.description()))
        }
    }

    /// An `expected X, got <current token>` error at the current token.
    pub fn expected(&self, what: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::unexpected_eof(token.span, what)
        } else {
            ParseError::expected_token(token.span, what, &token.describe())
        }
    }

    // ========================================================================
    // Node Ids
    // ========================================================================

    pub(super) fn next_expr_id(&mut self) -> ExprId {
        let id = ExprId(self.next_expr);
        self.next_expr += 1;
        id
    }

    pub(super) fn alloc_var_decl(
        &mut self,
        build: impl FnOnce(VarDeclId) -> VarDecl<'ast>,
    ) -> &'ast VarDecl<'ast> {
        let decl = self.arena.alloc(build(VarDeclId(self.var_decls.len() as u32)));
        self.var_decls.push(decl);
        decl
    }

    pub(super) fn alloc_func_decl(
        &mut self,
        build: impl FnOnce(FuncDeclId) -> FuncDecl<'ast>,
    ) -> &'ast FuncDecl<'ast> {
        let decl = self.arena.alloc(build(FuncDeclId(self.func_decls.len() as u32)));
        self.func_decls.push(decl);
        decl
    }

    pub(super) fn alloc_stmts(&self, stmts: &[Stmt<'ast>]) -> &'ast [Stmt<'ast>] {
        self.arena.alloc_slice_copy(stmts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::ParseErrorKind;

    #[test]
    fn token_navigation() {
        let arena = Bump::new();
        let mut parser = Parser::new("var x i32", &arena);

        assert_eq!(parser.peek().kind, TokenKind::Var);
        assert_eq!(parser.peek_nth(1).kind, TokenKind::Identifier);
        assert_eq!(parser.peek_nth(2).lexeme, "i32");
        assert_eq!(parser.peek_nth(10).kind, TokenKind::Eof);

        assert_eq!(parser.advance().kind, TokenKind::Var);
        assert_eq!(parser.peek().lexeme, "x");
    }

    #[test]
    fn advance_stops_at_eof() {
        let arena = Bump::new();
        let mut parser = Parser::new("x", &arena);
        parser.advance();
        assert!(parser.is_eof());
        assert_eq!(parser.advance().kind, TokenKind::Eof);
        assert!(parser.is_eof());
    }

    #[test]
    fn check_and_eat() {
        let arena = Bump::new();
        let mut parser = Parser::new("func f", &arena);

        assert!(parser.check(TokenKind::Func));
        assert!(parser.eat(TokenKind::Var).is_none());
        assert_eq!(parser.eat(TokenKind::Func).map(|t| t.lexeme), Some("func"));
        assert!(parser.check(TokenKind::Identifier));
    }

    #[test]
    fn expect_failure_describes_both_tokens() {
        let arena = Bump::new();
        let mut parser = Parser::new("func 42", &arena);
        parser.advance();

        let err = parser.expect(TokenKind::Identifier).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
        assert_eq!(err.span, Span::new(1, 6, 2));
        assert_eq!(err.message, "expected identifier, got integer literal '42'");
        // failed expectations do not consume
        assert!(parser.check(TokenKind::IntLiteral));
    }

    #[test]
    fn expect_at_eof() {
        let arena = Bump::new();
        let mut parser = Parser::new("(", &arena);
        parser.advance();
        let err = parser.expect(TokenKind::RightParen).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(err.message, "expected ')', got end of file");
    }

    #[test]
    fn lexer_errors_become_parse_errors() {
        let arena = Bump::new();
        let mut parser = Parser::new("var x i32 = $", &arena);
        assert!(parser.has_errors());

        let (program, ok) = parser.parse_program();
        assert!(!ok);
        assert!(program.items().is_empty());
        let errors = parser.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(|e| e.kind), Some(ParseErrorKind::InvalidSyntax));
    }

    #[test]
    fn from_tokens_appends_eof() {
        let arena = Bump::new();
        let tokens = vec![
            Token::new(TokenKind::Var, "var", Span::new(1, 1, 3)),
            Token::new(TokenKind::Identifier, "x", Span::new(1, 5, 1)),
        ];
        let mut parser = Parser::from_tokens(tokens, &arena);
        parser.advance();
        parser.advance();
        assert!(parser.is_eof());
        assert_eq!(parser.peek().span, Span::point(1, 6));
    }

    #[test]
    fn from_tokens_parses_like_source() {
        let arena = Bump::new();
        let tokens: Vec<_> = Lexer::new("var x i32 = 1 + 2", &arena).collect();
        let mut parser = Parser::from_tokens(tokens, &arena);
        let (program, ok) = parser.parse_program();
        assert!(ok);
        assert_eq!(program.items().len(), 1);
        assert_eq!(program.expr_count(), 3);
    }
}
