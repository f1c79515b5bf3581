//! Initialization order of globals.
//!
//! A global depends on every global its initializer reads, either directly
//! or inside the body of a function the initializer calls. Globals are
//! initialized dependencies first. Globals that depend on each other form a
//! cycle and have no valid order.

use quill_parser::Program;
use quill_parser::ast::{Expr, FuncDeclId, Stmt, VarDeclId, VarKind};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::checker::Resolutions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Dependency order of a program's globals.
#[derive(Debug, Default)]
pub struct GlobalOrder {
    order: Vec<VarDeclId>,
    cycles: Vec<Vec<VarDeclId>>,
}

impl GlobalOrder {
    /// Order the globals of a checked program.
    ///
    /// Unresolved names contribute no dependency, so this also runs on
    /// programs with errors.
    pub fn compute(program: &Program<'_>, resolutions: &Resolutions) -> Self {
        let edges: FxHashMap<VarDeclId, Vec<VarDeclId>> = program
            .globals()
            .map(|global| {
                let mut reads = GlobalReads::new(program, resolutions);
                if let Some(init) = global.init {
                    reads.expr(init);
                }
                (global.id, reads.globals)
            })
            .collect();

        let mut walk = Walk {
            edges: &edges,
            marks: FxHashMap::default(),
            stack: Vec::new(),
            order: GlobalOrder::default(),
        };
        for global in program.globals() {
            walk.visit(global.id);
        }
        walk.order
    }

    /// Every global, each one after all the globals it depends on.
    pub fn order(&self) -> &[VarDeclId] {
        &self.order
    }

    /// Dependency cycles, each listing its globals in dependency order.
    pub fn cycles(&self) -> &[Vec<VarDeclId>] {
        &self.cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Globals read by one initializer, in order of first use.
struct GlobalReads<'p, 'ast> {
    program: &'p Program<'ast>,
    resolutions: &'p Resolutions,
    globals: Vec<VarDeclId>,
    seen: FxHashSet<VarDeclId>,
    entered: FxHashSet<FuncDeclId>,
}

impl<'p, 'ast> GlobalReads<'p, 'ast> {
    fn new(program: &'p Program<'ast>, resolutions: &'p Resolutions) -> Self {
        Self {
            program,
            resolutions,
            globals: Vec::new(),
            seen: FxHashSet::default(),
            entered: FxHashSet::default(),
        }
    }

    fn expr(&mut self, expr: &Expr<'ast>) {
        match expr {
            Expr::IntLiteral(_) => {}
            Expr::Var(var) => {
                if let Some(decl) = self.resolutions.var_decl(var.id)
                    && self.is_global(decl)
                    && self.seen.insert(decl)
                {
                    self.globals.push(decl);
                }
            }
            Expr::Infix(infix) => {
                self.expr(infix.left);
                self.expr(infix.right);
            }
            Expr::Call(call) => {
                for arg in call.args {
                    self.expr(arg);
                }
                if let Some(func) = self.resolutions.callee(call.id)
                    && self.entered.insert(func)
                    && let Some(body) = self.program.func_decl(func).and_then(|decl| decl.body)
                {
                    for stmt in body {
                        self.stmt(stmt);
                    }
                }
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt<'ast>) {
        match stmt {
            Stmt::Var(decl) => {
                if let Some(init) = decl.init {
                    self.expr(init);
                }
            }
            Stmt::Return(ret) => {
                if let Some(value) = ret.value {
                    self.expr(value);
                }
            }
            Stmt::Expr(expr) => self.expr(expr),
        }
    }

    fn is_global(&self, decl: VarDeclId) -> bool {
        self.program
            .var_decl(decl)
            .is_some_and(|decl| decl.kind == VarKind::Global)
    }
}

/// Depth first walk over the dependency graph.
struct Walk<'e> {
    edges: &'e FxHashMap<VarDeclId, Vec<VarDeclId>>,
    marks: FxHashMap<VarDeclId, Mark>,
    stack: Vec<VarDeclId>,
    order: GlobalOrder,
}

impl Walk<'_> {
    fn visit(&mut self, global: VarDeclId) {
        match self.marks.get(&global).copied() {
            Some(Mark::Done) => return,
            Some(Mark::Visiting) => {
                let start = self.stack.iter().rposition(|&id| id == global).unwrap_or(0);
                self.order.cycles.push(self.stack[start..].to_vec());
                return;
            }
            None => {}
        }

        self.marks.insert(global, Mark::Visiting);
        self.stack.push(global);

        let edges = self.edges;
        for &dep in edges.get(&global).into_iter().flatten() {
            self.visit(dep);
        }

        self.stack.pop();
        self.marks.insert(global, Mark::Done);
        self.order.order.push(global);
    }
}
