//! Abstract syntax tree and parser.
//!
//! AST nodes live in a [`bumpalo::Bump`] arena and are immutable once the
//! parser returns. Later passes never write to nodes; they key their results
//! by the ids assigned here:
//!
//! - [`ExprId`]: one per expression node, dense from 0
//! - [`VarDeclId`] / [`FuncDeclId`]: indices into the [`Program`]'s
//!   declaration tables, used as non-owning references to declarations

mod decl_parser;
mod expr;
mod expr_parser;
mod ops;
mod parser;
mod printer;
mod stmt;
mod stmt_parser;

pub use expr::{CallExpr, Expr, InfixExpr, IntLiteral, VarExpr};
pub use ops::{BinaryOp, Precedence};
pub use parser::Parser;
pub use stmt::{FuncDecl, Item, ReturnStmt, Stmt, TypeExpr, VarDecl, VarKind};

use quill_core::Span;
use std::fmt;

/// Identity of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

/// Identity of a variable declaration (global, local or parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarDeclId(pub u32);

/// Identity of a function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncDeclId(pub u32);

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}

/// A name with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A parsed source file.
#[derive(Debug)]
pub struct Program<'ast> {
    items: &'ast [Item<'ast>],
    var_decls: Vec<&'ast VarDecl<'ast>>,
    func_decls: Vec<&'ast FuncDecl<'ast>>,
    expr_count: u32,
}

impl<'ast> Program<'ast> {
    pub(crate) fn new(
        items: &'ast [Item<'ast>],
        var_decls: Vec<&'ast VarDecl<'ast>>,
        func_decls: Vec<&'ast FuncDecl<'ast>>,
        expr_count: u32,
    ) -> Self {
        Self {
            items,
            var_decls,
            func_decls,
            expr_count,
        }
    }

    /// Top-level declarations in source order.
    pub fn items(&self) -> &'ast [Item<'ast>] {
        self.items
    }

    pub fn var_decl(&self, id: VarDeclId) -> Option<&'ast VarDecl<'ast>> {
        self.var_decls.get(id.0 as usize).copied()
    }

    pub fn func_decl(&self, id: FuncDeclId) -> Option<&'ast FuncDecl<'ast>> {
        self.func_decls.get(id.0 as usize).copied()
    }

    /// Every variable declaration in the program, indexed by [`VarDeclId`].
    pub fn var_decls(&self) -> &[&'ast VarDecl<'ast>] {
        &self.var_decls
    }

    /// Every function declaration in the program, indexed by [`FuncDeclId`].
    pub fn func_decls(&self) -> &[&'ast FuncDecl<'ast>] {
        &self.func_decls
    }

    /// Number of expression nodes; every [`ExprId`] is below this.
    pub fn expr_count(&self) -> u32 {
        self.expr_count
    }

    pub fn functions(&self) -> impl Iterator<Item = &'ast FuncDecl<'ast>> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Func(decl) => Some(*decl),
            Item::Var(_) => None,
        })
    }

    pub fn globals(&self) -> impl Iterator<Item = &'ast VarDecl<'ast>> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Var(decl) => Some(*decl),
            Item::Func(_) => None,
        })
    }
}
