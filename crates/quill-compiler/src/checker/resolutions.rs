//! The checker's side table.
//!
//! AST nodes are immutable, so everything the checker learns about them is
//! recorded here, keyed by node id. Each entry is written once; looking up a
//! node the checker has not resolved yields `None`.

use std::fmt::Debug;
use std::hash::Hash;

use quill_core::Type;
use quill_parser::ast::{ExprId, FuncDeclId, VarDeclId};
use rustc_hash::FxHashMap;

/// A function's parameter and return types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Type>,
    pub ret: Type,
}

#[derive(Debug, Default)]
pub struct Resolutions {
    /// Variable uses to the declaration they bind to.
    var_refs: FxHashMap<ExprId, VarDeclId>,
    /// Calls to the function they invoke.
    callees: FxHashMap<ExprId, FuncDeclId>,
    /// Static type of every successfully checked expression.
    expr_types: FxHashMap<ExprId, Type>,
    var_types: FxHashMap<VarDeclId, Type>,
    signatures: FxHashMap<FuncDeclId, Signature>,
}

impl Resolutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The declaration a `Var` expression refers to.
    pub fn var_decl(&self, expr: ExprId) -> Option<VarDeclId> {
        self.var_refs.get(&expr).copied()
    }

    /// The function a call expression invokes.
    pub fn callee(&self, expr: ExprId) -> Option<FuncDeclId> {
        self.callees.get(&expr).copied()
    }

    pub fn expr_type(&self, expr: ExprId) -> Option<&Type> {
        self.expr_types.get(&expr)
    }

    pub fn var_type(&self, decl: VarDeclId) -> Option<&Type> {
        self.var_types.get(&decl)
    }

    pub fn signature(&self, func: FuncDeclId) -> Option<&Signature> {
        self.signatures.get(&func)
    }

    pub fn typed_expr_count(&self) -> usize {
        self.expr_types.len()
    }

    pub(crate) fn record_var_ref(&mut self, expr: ExprId, decl: VarDeclId) {
        insert_once(&mut self.var_refs, expr, decl);
    }

    pub(crate) fn record_callee(&mut self, expr: ExprId, func: FuncDeclId) {
        insert_once(&mut self.callees, expr, func);
    }

    pub(crate) fn record_expr_type(&mut self, expr: ExprId, ty: Type) {
        insert_once(&mut self.expr_types, expr, ty);
    }

    pub(crate) fn record_var_type(&mut self, decl: VarDeclId, ty: Type) {
        insert_once(&mut self.var_types, decl, ty);
    }

    pub(crate) fn record_signature(&mut self, func: FuncDeclId, signature: Signature) {
        insert_once(&mut self.signatures, func, signature);
    }
}

fn insert_once<K: Hash + Eq + Debug, V>(map: &mut FxHashMap<K, V>, key: K, value: V) {
    if map.contains_key(&key) {
        debug_assert!(false, "{key:?} resolved twice");
        return;
    }
    map.insert(key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_nodes_read_as_none() {
        let resolutions = Resolutions::new();
        assert_eq!(resolutions.var_decl(ExprId(0)), None);
        assert_eq!(resolutions.callee(ExprId(0)), None);
        assert_eq!(resolutions.expr_type(ExprId(0)), None);
        assert_eq!(resolutions.var_type(VarDeclId(0)), None);
        assert_eq!(resolutions.signature(FuncDeclId(0)), None);
    }

    #[test]
    fn records_are_readable() {
        let mut resolutions = Resolutions::new();
        resolutions.record_var_ref(ExprId(3), VarDeclId(1));
        resolutions.record_callee(ExprId(4), FuncDeclId(0));
        resolutions.record_expr_type(ExprId(3), Type::Int32);
        resolutions.record_signature(
            FuncDeclId(0),
            Signature {
                params: vec![Type::Int32],
                ret: Type::Void,
            },
        );

        assert_eq!(resolutions.var_decl(ExprId(3)), Some(VarDeclId(1)));
        assert_eq!(resolutions.callee(ExprId(4)), Some(FuncDeclId(0)));
        assert_eq!(resolutions.expr_type(ExprId(3)), Some(&Type::Int32));
        assert_eq!(resolutions.signature(FuncDeclId(0)).map(|s| &s.ret), Some(&Type::Void));
        assert_eq!(resolutions.typed_expr_count(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "resolved twice")]
    fn second_write_is_rejected() {
        let mut resolutions = Resolutions::new();
        resolutions.record_expr_type(ExprId(0), Type::Int32);
        resolutions.record_expr_type(ExprId(0), Type::Void);
    }
}
