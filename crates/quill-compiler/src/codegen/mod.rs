//! IR generation.
//!
//! [`generate`] lowers a checked program into an [`ir::Module`]. An
//! [`Optimizer`] may then rewrite the module before it is written out as
//! text.

mod generator;
pub mod ir;
mod locations;
mod optimizer;

pub use generator::{GLOBAL_INIT_FUNCTION, GenerateOutput, generate};
pub use locations::Locations;
pub use optimizer::{NoopOptimizer, Optimizer};
