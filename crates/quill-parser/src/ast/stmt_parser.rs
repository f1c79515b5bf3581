//! Statement parsing: blocks, local declarations, returns and expression statements.

use quill_core::ParseError;

use super::parser::Parser;
use super::{Precedence, ReturnStmt, Stmt, VarKind};
use crate::lexer::{Token, TokenKind};

impl<'ast> Parser<'ast> {
    /// Parse `{ stmt* }`, returning the statements and the closing brace.
    pub fn parse_block(&mut self) -> Result<(&'ast [Stmt<'ast>], Token<'ast>), ParseError> {
        self.expect(TokenKind::LeftBrace)?;

        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            if self.is_eof() {
                return Err(self.expected("'}'"));
            }
            stmts.push(self.parse_statement()?);
            self.eat(TokenKind::Semicolon);
        }
        let close = self.expect(TokenKind::RightBrace)?;

        Ok((self.alloc_stmts(&stmts), close))
    }

    /// Parse a statement inside a function body.
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        match self.peek().kind {
            TokenKind::Var => Ok(Stmt::Var(self.parse_var_decl(VarKind::Local)?)),
            TokenKind::Return => Ok(Stmt::Return(self.parse_return()?)),
            _ => Ok(Stmt::Expr(self.parse_expression(Precedence::Lowest)?)),
        }
    }

    /// Parse `return [expression]`.
    ///
    /// The value may only be omitted directly before the closing brace.
    pub fn parse_return(&mut self) -> Result<&'ast ReturnStmt<'ast>, ParseError> {
        let keyword = self.expect(TokenKind::Return)?;

        if self.check(TokenKind::RightBrace) {
            return Ok(self.arena.alloc(ReturnStmt {
                value: None,
                span: keyword.span,
            }));
        }

        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(self.arena.alloc(ReturnStmt {
            value: Some(value),
            span: keyword.span.merge(value.span()),
        }))
    }
}
