//! Expression parsing by precedence climbing.
//!
//! ```text
//! Lowest < Sum (+ -) < Product (* /) < Prefix (unary -)
//! ```
//!
//! All binary operators are left associative.

use quill_core::{ParseError, ParseErrorKind, Span};

use super::parser::Parser;
use super::{BinaryOp, CallExpr, Expr, Ident, InfixExpr, IntLiteral, Precedence, VarExpr};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse an expression whose operators all bind tighter than `min_precedence`.
    pub fn parse_expression(&mut self, min_precedence: Precedence) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut left = self.parse_primary()?;

        while let Some(op) = BinaryOp::from_token(self.peek().kind) {
            let precedence = op.precedence();
            if precedence <= min_precedence {
                break;
            }
            self.advance();

            let right = self.parse_expression(precedence)?;
            let span = left.span().merge(right.span());
            let id = self.next_expr_id();
            left = self.arena.alloc(Expr::Infix(self.arena.alloc(InfixExpr {
                id,
                op,
                left,
                right,
                span,
            })));
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression(Precedence::Lowest)?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }

            TokenKind::Minus => {
                self.advance();
                self.parse_negation(token.span)
            }

            TokenKind::IntLiteral => {
                self.advance();
                self.int_literal(token.lexeme, false, token.span)
            }

            TokenKind::Identifier => {
                self.advance();
                let name = Ident::new(token.lexeme, token.span);
                if self.check(TokenKind::LeftParen) {
                    self.parse_call(name)
                } else {
                    let id = self.next_expr_id();
                    Ok(self.arena.alloc(Expr::Var(VarExpr { id, name })))
                }
            }

            TokenKind::StringLiteral => Err(ParseError::new(
                ParseErrorKind::UnsupportedExpression,
                token.span,
                "string literals are not supported in expressions",
            )),

            TokenKind::Eof => Err(ParseError::unexpected_eof(token.span, "expression")),

            _ => Err(ParseError::expected_expression(token.span, &token.describe())),
        }
    }

    /// Unary minus. `-<int>` folds into a negative literal; any other operand
    /// becomes `0 - operand`.
    fn parse_negation(&mut self, minus: Span) -> Result<&'ast Expr<'ast>, ParseError> {
        if self.check(TokenKind::IntLiteral) {
            let literal = self.advance();
            return self.int_literal(literal.lexeme, true, minus.merge(literal.span));
        }

        let operand = self.parse_expression(Precedence::Prefix)?;
        let zero_id = self.next_expr_id();
        let zero = self.arena.alloc(Expr::IntLiteral(IntLiteral {
            id: zero_id,
            value: 0,
            span: Span::point(minus.line, minus.col),
        }));
        let id = self.next_expr_id();
        Ok(self.arena.alloc(Expr::Infix(self.arena.alloc(InfixExpr {
            id,
            op: BinaryOp::Sub,
            left: zero,
            right: operand,
            span: minus.merge(operand.span()),
        }))))
    }

    fn int_literal(&mut self, lexeme: &str, negative: bool, span: Span) -> Result<&'ast Expr<'ast>, ParseError> {
        let text = if negative { format!("-{lexeme}") } else { lexeme.to_string() };
        let value = text
            .parse::<i32>()
            .map_err(|_| ParseError::invalid_integer(span, &text))?;

        let id = self.next_expr_id();
        Ok(self.arena.alloc(Expr::IntLiteral(IntLiteral {
            id,
            value: i64::from(value),
            span,
        })))
    }

    /// Parse the argument list of a call whose callee has been consumed.
    fn parse_call(&mut self, callee: Ident<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::LeftParen)?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression(Precedence::Lowest)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RightParen)?;

        let id = self.next_expr_id();
        let args = self.arena.alloc_slice_copy(&args);
        Ok(self.arena.alloc(Expr::Call(self.arena.alloc(CallExpr {
            id,
            callee,
            args,
            span: callee.span.merge(close.span),
        }))))
    }
}
