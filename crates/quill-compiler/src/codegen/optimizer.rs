//! Post-generation pass hook.

use super::ir::Module;

/// A pass over a generated module, run before it is written out.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    fn optimize(&self, module: &mut Module);
}

/// Leaves the module untouched. Generated IR is emitted as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOptimizer;

impl Optimizer for NoopOptimizer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn optimize(&self, _module: &mut Module) {}
}
