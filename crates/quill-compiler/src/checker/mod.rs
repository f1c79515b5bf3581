//! Semantic analysis.
//!
//! The checker walks a parsed [`Program`] in two passes:
//!
//! 1. **Registration** - every top-level function and global is declared in
//!    the outermost frame and given its type, so bodies can refer to
//!    declarations that appear later in the file.
//! 2. **Checking** - global initializers and function bodies are resolved
//!    and type checked. Each body runs in its own frame holding its
//!    parameters and locals. Globals whose initializers depend on each
//!    other are reported last.
//!
//! Errors never stop the walk; every problem in the program is reported.
//! Results are written to a [`Resolutions`] side table keyed by node id.

mod resolutions;
mod scope;

pub use resolutions::{Resolutions, Signature};
pub use scope::ScopeStack;

use quill_core::{CheckError, DeclKind, Span, Type};
use quill_parser::Program;
use quill_parser::ast::{CallExpr, Expr, FuncDecl, Ident, InfixExpr, Item, ReturnStmt, Stmt, VarDecl, VarExpr};

use crate::codegen::GLOBAL_INIT_FUNCTION;
use crate::global_order::GlobalOrder;
use crate::return_checker::ReturnChecker;
use crate::type_resolver::{resolve_type, return_type};

/// Everything the checker produced for one program.
#[derive(Debug)]
pub struct CheckOutput {
    pub resolutions: Resolutions,
    pub errors: Vec<CheckError>,
}

impl CheckOutput {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolve and type check a whole program.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn check(program: &Program<'_>) -> CheckOutput {
    let mut checker = Checker::new(program);
    checker.register_declarations();
    checker.check_declarations();
    checker.check_initialization_order();
    checker.finish()
}

/// The function whose body is being checked.
struct FunctionContext<'ast> {
    name: &'ast str,
    ret: Type,
}

struct Checker<'p, 'ast> {
    program: &'p Program<'ast>,
    scopes: ScopeStack<'ast>,
    resolutions: Resolutions,
    errors: Vec<CheckError>,
    /// Global whose initializer is being checked.
    initializing: Option<&'ast VarDecl<'ast>>,
}

impl<'p, 'ast> Checker<'p, 'ast> {
    fn new(program: &'p Program<'ast>) -> Self {
        Self {
            program,
            scopes: ScopeStack::new(),
            resolutions: Resolutions::new(),
            errors: Vec::new(),
            initializing: None,
        }
    }

    fn finish(self) -> CheckOutput {
        CheckOutput {
            resolutions: self.resolutions,
            errors: self.errors,
        }
    }

    // ========================================================================
    // Pass 1: registration
    // ========================================================================

    fn register_declarations(&mut self) {
        for item in self.program.items() {
            match item {
                Item::Func(decl) => self.register_function(decl),
                Item::Var(decl) => self.register_global(decl),
            }
        }
    }

    fn register_function(&mut self, decl: &'ast FuncDecl<'ast>) {
        let signature = Signature {
            params: decl.params.iter().map(|param| resolve_type(&param.ty)).collect(),
            ret: return_type(decl),
        };
        self.resolutions.record_signature(decl.id, signature);
        self.check_symbol_name(DeclKind::Function, decl.name);

        if let Err(existing) = self.scopes.declare_func(decl.name.name, decl.id) {
            let original_span = self
                .program
                .func_decl(existing)
                .map_or(decl.name.span, |original| original.name.span);
            self.error(CheckError::DuplicateDeclaration {
                kind: DeclKind::Function,
                name: decl.name.name.to_string(),
                original_span,
                span: decl.name.span,
            });
        }
    }

    fn register_global(&mut self, decl: &'ast VarDecl<'ast>) {
        self.declared_type(decl);
        self.check_symbol_name(DeclKind::Variable, decl.name);
        self.declare_variable(decl);
    }

    /// Functions and globals share one symbol namespace in the emitted IR.
    fn check_symbol_name(&mut self, kind: DeclKind, name: Ident<'ast>) {
        if name.name == GLOBAL_INIT_FUNCTION {
            self.error(CheckError::ReservedName {
                name: name.name.to_string(),
                span: name.span,
            });
            return;
        }

        let original_span = match kind {
            DeclKind::Function => self
                .scopes
                .lookup_var(name.name)
                .and_then(|id| self.program.var_decl(id))
                .map(|decl| decl.name.span),
            DeclKind::Variable => self
                .scopes
                .lookup_func(name.name)
                .and_then(|id| self.program.func_decl(id))
                .map(|decl| decl.name.span),
        };
        if let Some(original_span) = original_span {
            self.error(CheckError::NameConflict {
                kind,
                name: name.name.to_string(),
                original_span,
                span: name.span,
            });
        }
    }

    /// Resolve and record a variable's declared type, rejecting `void`.
    fn declared_type(&mut self, decl: &VarDecl<'ast>) -> Type {
        let ty = resolve_type(&decl.ty);
        if ty.is_void() {
            self.error(CheckError::VoidVariable {
                name: decl.name.name.to_string(),
                span: decl.ty.span(),
            });
        }
        self.resolutions.record_var_type(decl.id, ty.clone());
        ty
    }

    fn declare_variable(&mut self, decl: &'ast VarDecl<'ast>) {
        if let Err(existing) = self.scopes.declare_var(decl.name.name, decl.id) {
            let original_span = self
                .program
                .var_decl(existing)
                .map_or(decl.name.span, |original| original.name.span);
            self.error(CheckError::DuplicateDeclaration {
                kind: DeclKind::Variable,
                name: decl.name.name.to_string(),
                original_span,
                span: decl.name.span,
            });
        }
    }

    // ========================================================================
    // Pass 2: bodies and initializers
    // ========================================================================

    fn check_declarations(&mut self) {
        for item in self.program.items() {
            match item {
                Item::Func(decl) => self.check_function(decl),
                Item::Var(decl) => self.check_global(decl),
            }
        }
    }

    fn check_global(&mut self, decl: &'ast VarDecl<'ast>) {
        let Some(init) = decl.init else {
            return;
        };
        let declared = self.resolutions.var_type(decl.id).cloned().unwrap_or(Type::Void);

        self.initializing = Some(decl);
        let found = self.check_expression(init);
        self.initializing = None;

        self.check_initializer(&declared, found, init);
    }

    fn check_function(&mut self, decl: &'ast FuncDecl<'ast>) {
        self.scopes.push_frame();
        for param in decl.params {
            self.declared_type(param);
            self.declare_variable(param);
        }

        if let Some(body) = decl.body {
            let function = FunctionContext {
                name: decl.name.name,
                ret: return_type(decl),
            };
            for stmt in body {
                self.check_statement(&function, stmt);
            }

            if !function.ret.is_void() && !ReturnChecker::all_paths_return(body) {
                self.error(CheckError::MissingReturn {
                    name: decl.name.name.to_string(),
                    span: decl.name.span,
                });
            }
        }

        self.scopes.pop_frame();
    }

    fn check_statement(&mut self, function: &FunctionContext<'ast>, stmt: &Stmt<'ast>) {
        match stmt {
            Stmt::Var(decl) => self.check_var_decl(decl),
            Stmt::Return(ret) => self.check_return(function, ret),
            Stmt::Expr(expr) => {
                self.check_expression(expr);
            }
        }
    }

    /// Locals are declared after their initializer is checked, so
    /// `var x i32 = x` refers to an outer `x`.
    fn check_var_decl(&mut self, decl: &'ast VarDecl<'ast>) {
        let found = decl.init.map(|init| self.check_expression(init));
        let declared = self.declared_type(decl);
        if let (Some(found), Some(init)) = (found, decl.init) {
            self.check_initializer(&declared, found, init);
        }
        self.declare_variable(decl);
    }

    fn check_initializer(&mut self, declared: &Type, found: Option<Type>, init: &Expr<'ast>) {
        if declared.is_void() {
            return;
        }
        if let Some(found) = found
            && &found != declared
        {
            self.error(CheckError::TypeMismatch {
                expected: declared.clone(),
                found,
                span: init.span(),
            });
        }
    }

    fn check_return(&mut self, function: &FunctionContext<'ast>, ret: &ReturnStmt<'ast>) {
        let name = function.name;
        let expected = function.ret.clone();

        match ret.value {
            Some(value) => {
                let found = self.check_expression(value);
                if expected.is_void() {
                    self.error(CheckError::UnexpectedReturnValue {
                        name: name.to_string(),
                        span: value.span(),
                    });
                } else if let Some(found) = found
                    && found != expected
                {
                    self.error(CheckError::ReturnTypeMismatch {
                        name: name.to_string(),
                        expected,
                        found,
                        span: value.span(),
                    });
                }
            }
            None if !expected.is_void() => self.error(CheckError::MissingReturnValue {
                name: name.to_string(),
                expected,
                span: ret.span,
            }),
            None => {}
        }
    }

    /// Report globals whose initializers depend on each other.
    fn check_initialization_order(&mut self) {
        let order = GlobalOrder::compute(self.program, &self.resolutions);
        for cycle in order.cycles() {
            let decls: Vec<&'ast VarDecl<'ast>> = cycle.iter().filter_map(|&id| self.program.var_decl(id)).collect();
            let Some(first) = decls.first().copied() else {
                continue;
            };
            let mut path: Vec<&str> = decls.iter().map(|decl| decl.name.name).collect();
            path.push(first.name.name);

            self.error(CheckError::InitializationCycle {
                name: first.name.name.to_string(),
                path: path.join(" -> "),
                span: first.name.span,
            });
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Resolve an expression and return its type.
    ///
    /// `None` means an error was already reported somewhere inside the
    /// expression; callers must not report it again.
    fn check_expression(&mut self, expr: &Expr<'ast>) -> Option<Type> {
        let ty = match expr {
            Expr::IntLiteral(_) => Some(Type::Int32),
            Expr::Var(var) => self.check_var(var),
            Expr::Infix(infix) => self.check_infix(infix),
            Expr::Call(call) => self.check_call(call),
        };
        if let Some(ty) = &ty {
            self.resolutions.record_expr_type(expr.id(), ty.clone());
        }
        ty
    }

    fn check_var(&mut self, var: &VarExpr<'ast>) -> Option<Type> {
        let Some(decl) = self.scopes.lookup_var(var.name.name) else {
            self.undeclared(DeclKind::Variable, var.name.name, var.name.span);
            return None;
        };

        if let Some(global) = self.initializing
            && global.id == decl
        {
            self.error(CheckError::SelfReference {
                name: var.name.name.to_string(),
                span: var.name.span,
            });
            return None;
        }

        self.resolutions.record_var_ref(var.id, decl);
        self.resolutions.var_type(decl).cloned()
    }

    fn check_infix(&mut self, infix: &InfixExpr<'ast>) -> Option<Type> {
        let left = self.check_expression(infix.left);
        let right = self.check_expression(infix.right);
        let (left, right) = (left?, right?);

        if left != right {
            self.error(CheckError::OperandTypeMismatch {
                op: infix.op.as_str(),
                left,
                right,
                span: infix.span,
            });
            return None;
        }

        if !left.is_numeric() {
            self.error(CheckError::NonNumericOperand {
                op: infix.op.as_str(),
                ty: left,
                span: infix.span,
            });
            return None;
        }

        Some(left)
    }

    fn check_call(&mut self, call: &CallExpr<'ast>) -> Option<Type> {
        let arg_types: Vec<Option<Type>> = call.args.iter().map(|arg| self.check_expression(arg)).collect();

        let Some(func) = self.scopes.lookup_func(call.callee.name) else {
            self.undeclared(DeclKind::Function, call.callee.name, call.callee.span);
            return None;
        };
        self.resolutions.record_callee(call.id, func);

        let signature = self.resolutions.signature(func).cloned()?;
        if signature.params.len() != arg_types.len() {
            self.error(CheckError::ArgumentCountMismatch {
                name: call.callee.name.to_string(),
                expected: signature.params.len(),
                got: arg_types.len(),
                span: call.span,
            });
        } else {
            for (position, ((expected, found), arg)) in signature
                .params
                .iter()
                .zip(arg_types)
                .zip(call.args.iter())
                .enumerate()
            {
                // a void parameter was already reported at its declaration
                if !expected.is_void()
                    && let Some(found) = found
                    && &found != expected
                {
                    self.error(CheckError::ArgumentTypeMismatch {
                        name: call.callee.name.to_string(),
                        position: position + 1,
                        expected: expected.clone(),
                        found,
                        span: arg.span(),
                    });
                }
            }
        }

        Some(signature.ret)
    }

    fn undeclared(&mut self, kind: DeclKind, name: &str, span: Span) {
        self.error(CheckError::Undeclared {
            kind,
            name: name.to_string(),
            span,
        });
    }

    fn error(&mut self, error: CheckError) {
        self.errors.push(error);
    }
}
