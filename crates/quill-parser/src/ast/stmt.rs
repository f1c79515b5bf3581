//! Statement and declaration nodes.

use quill_core::Span;

use super::{Expr, FuncDeclId, Ident, VarDeclId};

/// A top-level declaration.
#[derive(Debug, Clone, Copy)]
pub enum Item<'ast> {
    Func(&'ast FuncDecl<'ast>),
    Var(&'ast VarDecl<'ast>),
}

impl<'ast> Item<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Item::Func(decl) => decl.span,
            Item::Var(decl) => decl.span,
        }
    }
}

/// A statement inside a function body.
#[derive(Debug, Clone, Copy)]
pub enum Stmt<'ast> {
    Var(&'ast VarDecl<'ast>),
    Return(&'ast ReturnStmt<'ast>),
    Expr(&'ast Expr<'ast>),
}

impl<'ast> Stmt<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Var(decl) => decl.span,
            Stmt::Return(ret) => ret.span,
            Stmt::Expr(expr) => expr.span(),
        }
    }
}

/// A function declaration.
///
/// A function without a body is an extern declaration: only its signature is
/// known and no definition is emitted for it.
#[derive(Debug, Clone, Copy)]
pub struct FuncDecl<'ast> {
    pub id: FuncDeclId,
    pub name: Ident<'ast>,
    pub params: &'ast [&'ast VarDecl<'ast>],
    /// `None` when the source omits it, meaning `void`.
    pub return_type: Option<TypeExpr<'ast>>,
    pub body: Option<&'ast [Stmt<'ast>]>,
    pub span: Span,
}

impl<'ast> FuncDecl<'ast> {
    pub fn is_extern(&self) -> bool {
        self.body.is_none()
    }
}

/// Where a variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Global,
    Local,
    Param,
}

/// A variable declaration: a global, a local or a function parameter.
#[derive(Debug, Clone, Copy)]
pub struct VarDecl<'ast> {
    pub id: VarDeclId,
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    /// Always present for globals and locals, always `None` for parameters.
    pub init: Option<&'ast Expr<'ast>>,
    pub kind: VarKind,
    pub span: Span,
}

impl<'ast> VarDecl<'ast> {
    pub fn is_param(&self) -> bool {
        self.kind == VarKind::Param
    }

    pub fn is_global(&self) -> bool {
        self.kind == VarKind::Global
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// A type as written in source: a name or `*` applied to a type.
#[derive(Debug, Clone, Copy)]
pub enum TypeExpr<'ast> {
    Named(Ident<'ast>),
    Pointer {
        pointee: &'ast TypeExpr<'ast>,
        span: Span,
    },
}

impl<'ast> TypeExpr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named(ident) => ident.span,
            TypeExpr::Pointer { span, .. } => *span,
        }
    }
}
