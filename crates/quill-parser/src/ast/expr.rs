//! Expression nodes.

use quill_core::Span;

use super::{BinaryOp, ExprId, Ident};

/// An expression.
///
/// Every expression carries an [`ExprId`] unique within its program, which
/// later passes use to key their side tables.
#[derive(Debug, Clone, Copy)]
pub enum Expr<'ast> {
    IntLiteral(IntLiteral),
    Var(VarExpr<'ast>),
    Infix(&'ast InfixExpr<'ast>),
    Call(&'ast CallExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    pub fn id(&self) -> ExprId {
        match self {
            Expr::IntLiteral(lit) => lit.id,
            Expr::Var(var) => var.id,
            Expr::Infix(infix) => infix.id,
            Expr::Call(call) => call.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::IntLiteral(lit) => lit.span,
            Expr::Var(var) => var.name.span,
            Expr::Infix(infix) => infix.span,
            Expr::Call(call) => call.span,
        }
    }
}

/// An integer literal. A leading minus is folded into `value`.
#[derive(Debug, Clone, Copy)]
pub struct IntLiteral {
    pub id: ExprId,
    pub value: i64,
    pub span: Span,
}

/// A use of a variable.
#[derive(Debug, Clone, Copy)]
pub struct VarExpr<'ast> {
    pub id: ExprId,
    pub name: Ident<'ast>,
}

/// `left op right`.
#[derive(Debug, Clone, Copy)]
pub struct InfixExpr<'ast> {
    pub id: ExprId,
    pub op: BinaryOp,
    pub left: &'ast Expr<'ast>,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

/// `callee(args...)`.
#[derive(Debug, Clone, Copy)]
pub struct CallExpr<'ast> {
    pub id: ExprId,
    pub callee: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}
