//! Declaration parsing: functions, variables, parameters and types.

use quill_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use super::{FuncDecl, Ident, Item, Precedence, TypeExpr, VarDecl, VarKind};
use crate::lexer::{Token, TokenKind};

impl<'ast> Parser<'ast> {
    /// Parse one top-level declaration and its optional `;`.
    pub fn parse_top_level(&mut self) -> Result<Item<'ast>, ParseError> {
        let extern_kw = self.eat(TokenKind::Extern);

        let item = match self.peek().kind {
            TokenKind::Func => Item::Func(self.parse_func_decl(extern_kw)?),
            TokenKind::Var if extern_kw.is_none() => Item::Var(self.parse_var_decl(VarKind::Global)?),
            _ if extern_kw.is_some() => return Err(self.expected("'func'")),
            _ => {
                let mut err = self.expected("'func' or 'var'");
                if err.kind == ParseErrorKind::ExpectedToken {
                    err.kind = ParseErrorKind::ExpectedDeclaration;
                }
                return Err(err);
            }
        };

        self.eat(TokenKind::Semicolon);
        Ok(item)
    }

    /// Parse `[extern] func IDENT ( params ) [type] [block]`.
    ///
    /// A function with a body is a definition; without one it is an extern
    /// declaration. The `extern` keyword is optional but forbids a body.
    pub fn parse_func_decl(&mut self, extern_kw: Option<Token<'ast>>) -> Result<&'ast FuncDecl<'ast>, ParseError> {
        let func_kw = self.expect(TokenKind::Func)?;
        let start = extern_kw.map_or(func_kw.span, |kw| kw.span);
        let name = self.parse_ident()?;

        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_var_param()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RightParen)?;
        let mut span = start.merge(close.span);

        let return_type = if self.is_type_start() {
            let ty = self.parse_type()?;
            span = span.merge(ty.span());
            Some(ty)
        } else {
            None
        };

        let body = if self.check(TokenKind::LeftBrace) {
            if let Some(kw) = extern_kw {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidDeclaration,
                    self.peek().span,
                    format!("extern function '{}' cannot have a body (declared extern at {})", name.name, kw.span),
                ));
            }
            let (stmts, close) = self.parse_block()?;
            span = span.merge(close.span);
            Some(stmts)
        } else {
            None
        };

        let params = self.arena.alloc_slice_copy(&params);
        Ok(self.alloc_func_decl(|id| FuncDecl {
            id,
            name,
            params,
            return_type,
            body,
            span,
        }))
    }

    /// Parse `var IDENT type = expression`.
    pub fn parse_var_decl(&mut self, kind: VarKind) -> Result<&'ast VarDecl<'ast>, ParseError> {
        let var_kw = self.expect(TokenKind::Var)?;
        let name = self.parse_ident()?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Equal)?;
        let init = self.parse_expression(Precedence::Lowest)?;
        let span = var_kw.span.merge(init.span());

        Ok(self.alloc_var_decl(|id| VarDecl {
            id,
            name,
            ty,
            init: Some(init),
            kind,
            span,
        }))
    }

    /// Parse a parameter: `IDENT type`.
    pub fn parse_var_param(&mut self) -> Result<&'ast VarDecl<'ast>, ParseError> {
        let name = self.parse_ident()?;
        let ty = self.parse_type()?;
        let span = name.span.merge(ty.span());

        Ok(self.alloc_var_decl(|id| VarDecl {
            id,
            name,
            ty,
            init: None,
            kind: VarKind::Param,
            span,
        }))
    }

    /// Parse a type: `IDENT` or `* type`.
    pub fn parse_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        if let Some(star) = self.eat(TokenKind::Star) {
            let pointee = self.parse_type()?;
            let span = star.span.merge(pointee.span());
            return Ok(TypeExpr::Pointer {
                pointee: self.arena.alloc(pointee),
                span,
            });
        }

        match self.eat(TokenKind::Identifier) {
            Some(token) => Ok(TypeExpr::Named(Ident::new(token.lexeme, token.span))),
            None => {
                let token = self.peek();
                if token.kind == TokenKind::Eof {
                    Err(ParseError::unexpected_eof(token.span, "type"))
                } else {
                    Err(ParseError::expected_type(token.span, &token.describe()))
                }
            }
        }
    }

    pub(super) fn parse_ident(&mut self) -> Result<Ident<'ast>, ParseError> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Ident::new(token.lexeme, token.span))
    }

    fn is_type_start(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Identifier | TokenKind::Star)
    }
}
