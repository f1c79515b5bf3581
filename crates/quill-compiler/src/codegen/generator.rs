//! AST to IR lowering.
//!
//! Expressions are emitted depth first: operands are fully lowered before
//! the instruction that consumes them. Every instruction result gets a fresh
//! virtual register; the counter restarts at zero for each function, so the
//! first register is `%1`. Integer literals become immediates and use no
//! register.
//!
//! Globals with a literal initializer are emitted with that value. All
//! others start at zero and are computed, dependencies first, by a module
//! initializer registered in `@llvm.global_ctors`.
//!
//! The generator only accepts checked programs. Anything unresolved is a
//! compiler bug and comes back as [`GenerateError::Internal`].

use quill_core::{GenerateError, Span, Type};
use quill_parser::Program;
use quill_parser::ast::{CallExpr, Expr, ExprId, FuncDecl, InfixExpr, Item as AstItem, ReturnStmt, Stmt, VarDecl, VarDeclId, VarExpr};
use rustc_hash::FxHashMap;

use super::ir::{Declaration, Function, Global, GlobalInit, Instruction, Item, Location, Module, Operand};
use super::locations::Locations;
use crate::checker::Resolutions;
use crate::global_order::GlobalOrder;
use crate::return_checker::ReturnChecker;

/// Name of the synthesized function that computes non-constant globals.
pub const GLOBAL_INIT_FUNCTION: &str = "__quill_init_globals";

/// The lowered module plus where every value was placed.
#[derive(Debug)]
pub struct GenerateOutput {
    pub module: Module,
    pub locations: Locations,
}

/// Lower a checked program to IR.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn generate(program: &Program<'_>, resolutions: &Resolutions) -> Result<GenerateOutput, GenerateError> {
    let mut generator = Generator::new(program, resolutions);
    generator.generate_program()?;
    Ok(GenerateOutput {
        module: generator.module,
        locations: generator.locations,
    })
}

struct Generator<'p, 'ast> {
    program: &'p Program<'ast>,
    resolutions: &'p Resolutions,
    module: Module,
    locations: Locations,
    register: u32,
    /// Globals whose initializer must run in the module initializer.
    deferred: Vec<&'ast VarDecl<'ast>>,
}

impl<'p, 'ast> Generator<'p, 'ast> {
    fn new(program: &'p Program<'ast>, resolutions: &'p Resolutions) -> Self {
        Self {
            program,
            resolutions,
            module: Module::new(),
            locations: Locations::new(),
            register: 0,
            deferred: Vec::new(),
        }
    }

    fn generate_program(&mut self) -> Result<(), GenerateError> {
        // Globals are addressable from any function, including ones
        // defined before them.
        for global in self.program.globals() {
            self.locations
                .set_decl(global.id, Location::Global(global.name.name.to_string()));
        }

        for item in self.program.items() {
            match item {
                AstItem::Func(decl) => self.generate_function(decl)?,
                AstItem::Var(decl) => self.generate_global(decl)?,
            }
        }

        self.generate_global_initializer()
    }

    fn next_register(&mut self) -> Location {
        self.register += 1;
        Location::Register(self.register)
    }

    // ========================================================================
    // Items
    // ========================================================================

    fn generate_global(&mut self, decl: &'ast VarDecl<'ast>) -> Result<(), GenerateError> {
        let ty = self.var_type(decl)?;
        let init = match decl.init {
            Some(Expr::IntLiteral(lit)) => GlobalInit::Int(lit.value),
            Some(_) => {
                self.deferred.push(decl);
                GlobalInit::Zero
            }
            None => GlobalInit::Zero,
        };
        self.module.push(Item::Global(Global {
            name: decl.name.name.to_string(),
            ty,
            init,
        }));
        Ok(())
    }

    fn generate_function(&mut self, decl: &'ast FuncDecl<'ast>) -> Result<(), GenerateError> {
        let signature = self
            .resolutions
            .signature(decl.id)
            .cloned()
            .ok_or_else(|| GenerateError::internal(decl.name.span, format!("no signature for '{}'", decl.name.name)))?;

        let Some(body) = decl.body else {
            self.module.push(Item::Declare(Declaration {
                name: decl.name.name.to_string(),
                ret: signature.ret,
                params: signature.params,
            }));
            return Ok(());
        };

        self.register = 0;
        let mut function = Function::new(decl.name.name, signature.ret.clone());
        for (param, ty) in decl.params.iter().zip(signature.params) {
            let location = self.next_register();
            self.locations.set_decl(param.id, location.clone());
            function.params.push((ty, location));
        }

        for stmt in body {
            self.generate_statement(&mut function, stmt)?;
        }

        if signature.ret.is_void() && !ReturnChecker::all_paths_return(body) {
            function.push(Instruction::Ret { value: None });
        }

        self.module.push(Item::Define(function));
        Ok(())
    }

    /// Emit `define void @__quill_init_globals()` for globals whose
    /// initializer is not a literal, and register it as a module
    /// constructor. Nothing is emitted when every global is constant.
    fn generate_global_initializer(&mut self) -> Result<(), GenerateError> {
        if self.deferred.is_empty() {
            return Ok(());
        }

        let order = GlobalOrder::compute(self.program, self.resolutions);
        if let Some(decl) = order
            .cycles()
            .first()
            .and_then(|cycle| cycle.first())
            .and_then(|&id| self.program.var_decl(id))
        {
            return Err(GenerateError::internal(
                decl.name.span,
                format!("global '{}' has no initialization order", decl.name.name),
            ));
        }
        let rank: FxHashMap<VarDeclId, usize> = order
            .order()
            .iter()
            .enumerate()
            .map(|(rank, &id)| (id, rank))
            .collect();
        let mut deferred = std::mem::take(&mut self.deferred);
        deferred.sort_by_key(|decl| rank.get(&decl.id).copied().unwrap_or(usize::MAX));

        self.register = 0;
        let mut function = Function::new(GLOBAL_INIT_FUNCTION, Type::Void);
        for decl in deferred {
            let Some(init) = decl.init else {
                continue;
            };
            let ty = self.var_type(decl)?;
            let value = self.generate_value(&mut function, init)?;
            function.push(Instruction::Store {
                ty,
                value,
                ptr: Location::Global(decl.name.name.to_string()),
            });
        }
        function.push(Instruction::Ret { value: None });

        self.module.push(Item::Define(function));
        self.module.push(Item::Constructors(vec![GLOBAL_INIT_FUNCTION.to_string()]));
        Ok(())
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn generate_statement(&mut self, function: &mut Function, stmt: &Stmt<'ast>) -> Result<(), GenerateError> {
        match stmt {
            Stmt::Var(decl) => self.generate_local(function, decl),
            Stmt::Return(ret) => self.generate_return(function, ret),
            Stmt::Expr(expr) => self.generate_expr(function, expr).map(drop),
        }
    }

    fn generate_local(&mut self, function: &mut Function, decl: &'ast VarDecl<'ast>) -> Result<(), GenerateError> {
        let ty = self.var_type(decl)?;
        let slot = Location::Slot(decl.name.name.to_string());
        function.push(Instruction::Alloca {
            dest: slot.clone(),
            ty: ty.clone(),
        });
        self.locations.set_decl(decl.id, slot.clone());

        if let Some(init) = decl.init {
            let value = self.generate_value(function, init)?;
            function.push(Instruction::Store { ty, value, ptr: slot });
        }
        Ok(())
    }

    fn generate_return(&mut self, function: &mut Function, ret: &ReturnStmt<'ast>) -> Result<(), GenerateError> {
        let value = match ret.value {
            Some(expr) => {
                let operand = self.generate_value(function, expr)?;
                Some((self.expr_type(expr)?, operand))
            }
            None => None,
        };
        function.push(Instruction::Ret { value });
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Emit an expression whose value is used.
    fn generate_value(&mut self, function: &mut Function, expr: &Expr<'ast>) -> Result<Operand, GenerateError> {
        self.generate_expr(function, expr)?
            .ok_or_else(|| GenerateError::internal(expr.span(), "void value used as an operand"))
    }

    /// Emit an expression. Void calls produce no operand.
    fn generate_expr(&mut self, function: &mut Function, expr: &Expr<'ast>) -> Result<Option<Operand>, GenerateError> {
        match expr {
            Expr::IntLiteral(lit) => Ok(Some(Operand::Immediate(lit.value))),
            Expr::Var(var) => self.generate_var(function, var).map(Some),
            Expr::Infix(infix) => self.generate_infix(function, infix).map(Some),
            Expr::Call(call) => self.generate_call(function, call),
        }
    }

    fn generate_var(&mut self, function: &mut Function, var: &VarExpr<'ast>) -> Result<Operand, GenerateError> {
        let decl_id = self.resolutions.var_decl(var.id).ok_or_else(|| {
            GenerateError::internal(var.name.span, format!("unresolved variable '{}'", var.name.name))
        })?;
        let ty = self
            .resolutions
            .var_type(decl_id)
            .cloned()
            .ok_or_else(|| GenerateError::internal(var.name.span, format!("untyped variable '{}'", var.name.name)))?;
        let ptr = self.locations.decl(decl_id).cloned().ok_or_else(|| {
            GenerateError::internal(var.name.span, format!("variable '{}' has no storage", var.name.name))
        })?;

        let dest = self.next_register();
        function.push(Instruction::Load {
            dest: dest.clone(),
            ty,
            ptr,
        });
        self.locations.set_expr(var.id, dest.clone());
        Ok(dest.into())
    }

    fn generate_infix(&mut self, function: &mut Function, infix: &InfixExpr<'ast>) -> Result<Operand, GenerateError> {
        let left = self.generate_value(function, infix.left)?;
        let right = self.generate_value(function, infix.right)?;
        let ty = self.type_of(infix.id, infix.span)?;

        let dest = self.next_register();
        function.push(Instruction::Binary {
            dest: dest.clone(),
            op: infix.op.into(),
            ty,
            left,
            right,
        });
        self.locations.set_expr(infix.id, dest.clone());
        Ok(dest.into())
    }

    fn generate_call(&mut self, function: &mut Function, call: &CallExpr<'ast>) -> Result<Option<Operand>, GenerateError> {
        let mut args = Vec::with_capacity(call.args.len());
        for arg in call.args {
            let value = self.generate_value(function, arg)?;
            args.push((self.expr_type(arg)?, value));
        }

        let callee = self
            .resolutions
            .callee(call.id)
            .and_then(|id| self.program.func_decl(id).map(|decl| (id, decl)));
        let Some((callee_id, callee)) = callee else {
            return Err(GenerateError::internal(
                call.callee.span,
                format!("unresolved function '{}'", call.callee.name),
            ));
        };
        let ret = self
            .resolutions
            .signature(callee_id)
            .map(|signature| signature.ret.clone())
            .ok_or_else(|| GenerateError::internal(call.span, format!("no signature for '{}'", callee.name.name)))?;

        let dest = (!ret.is_void()).then(|| self.next_register());
        if let Some(dest) = &dest {
            self.locations.set_expr(call.id, dest.clone());
        }
        function.push(Instruction::Call {
            dest: dest.clone(),
            ret,
            callee: callee.name.name.to_string(),
            args,
        });
        Ok(dest.map(Operand::from))
    }

    // ========================================================================
    // Resolution lookups
    // ========================================================================

    fn var_type(&self, decl: &VarDecl<'ast>) -> Result<Type, GenerateError> {
        self.resolutions
            .var_type(decl.id)
            .cloned()
            .ok_or_else(|| GenerateError::internal(decl.name.span, format!("untyped variable '{}'", decl.name.name)))
    }

    fn expr_type(&self, expr: &Expr<'ast>) -> Result<Type, GenerateError> {
        self.type_of(expr.id(), expr.span())
    }

    fn type_of(&self, id: ExprId, span: Span) -> Result<Type, GenerateError> {
        self.resolutions
            .expr_type(id)
            .cloned()
            .ok_or_else(|| GenerateError::internal(span, format!("untyped expression {id}")))
    }
}
