//! The scope stack used for name resolution.
//!
//! Each frame owns two independent namespaces, variables and functions.
//! Lookup walks from the innermost frame outward, so an inner declaration
//! shadows an outer one for the rest of its frame. Declaring a name twice
//! in the same frame is rejected.

use quill_parser::ast::{FuncDeclId, VarDeclId};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
struct Frame<'ast> {
    vars: FxHashMap<&'ast str, VarDeclId>,
    funcs: FxHashMap<&'ast str, FuncDeclId>,
}

#[derive(Debug)]
pub struct ScopeStack<'ast> {
    frames: Vec<Frame<'ast>>,
}

impl<'ast> ScopeStack<'ast> {
    /// Create a stack holding only the outermost (global) frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Leave the innermost frame. The global frame is never popped.
    pub fn pop_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot pop the global frame");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of frames, counting the global frame.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_global(&self) -> bool {
        self.frames.len() == 1
    }

    /// Declare a variable in the innermost frame.
    ///
    /// Fails with the existing declaration if the name is already taken in
    /// that frame.
    pub fn declare_var(&mut self, name: &'ast str, decl: VarDeclId) -> Result<(), VarDeclId> {
        let frame = self.innermost();
        match frame.vars.get(name) {
            Some(&existing) => Err(existing),
            None => {
                frame.vars.insert(name, decl);
                Ok(())
            }
        }
    }

    /// Declare a function in the innermost frame.
    pub fn declare_func(&mut self, name: &'ast str, decl: FuncDeclId) -> Result<(), FuncDeclId> {
        let frame = self.innermost();
        match frame.funcs.get(name) {
            Some(&existing) => Err(existing),
            None => {
                frame.funcs.insert(name, decl);
                Ok(())
            }
        }
    }

    pub fn lookup_var(&self, name: &str) -> Option<VarDeclId> {
        self.frames.iter().rev().find_map(|frame| frame.vars.get(name).copied())
    }

    pub fn lookup_func(&self, name: &str) -> Option<FuncDeclId> {
        self.frames.iter().rev().find_map(|frame| frame.funcs.get(name).copied())
    }

    fn innermost(&mut self) -> &mut Frame<'ast> {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for ScopeStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}
