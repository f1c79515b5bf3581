//! Generator side table: where each node's value ended up.

use quill_parser::ast::{ExprId, VarDeclId};
use rustc_hash::FxHashMap;

use super::ir::Location;

#[derive(Debug, Default)]
pub struct Locations {
    exprs: FxHashMap<ExprId, Location>,
    decls: FxHashMap<VarDeclId, Location>,
}

impl Locations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result location of a `Var`, `Infix` or non-void `Call` expression.
    ///
    /// Literals are emitted as immediates and never have one.
    pub fn expr(&self, id: ExprId) -> Option<&Location> {
        self.exprs.get(&id)
    }

    /// Storage of a variable: its register, stack slot or global symbol.
    pub fn decl(&self, id: VarDeclId) -> Option<&Location> {
        self.decls.get(&id)
    }

    pub(crate) fn set_expr(&mut self, id: ExprId, location: Location) {
        let previous = self.exprs.insert(id, location);
        debug_assert!(previous.is_none(), "{id} emitted twice");
    }

    pub(crate) fn set_decl(&mut self, id: VarDeclId, location: Location) {
        let previous = self.decls.insert(id, location);
        debug_assert!(previous.is_none(), "{id:?} bound twice");
    }
}
