//! Quill Compiler
//!
//! Semantic analysis and IR generation for parsed quill programs.
//!
//! ## Architecture
//!
//! - **Checking**: [`check`] resolves every name against a scope stack and
//!   type checks every expression, recording results in [`Resolutions`].
//! - **Generation**: [`generate`] lowers a checked program to an
//!   [`ir::Module`], recording value placement in [`Locations`].
//!
//! Neither pass modifies the AST. Both report through side tables keyed by
//! node id.
//!
//! ## Modules
//!
//! - [`checker`]: name resolution and type checking
//! - [`codegen`]: IR model, generator and the post-generation pass hook
//! - [`global_order`]: dependency order of global initializers
//! - [`type_resolver`]: mapping from written types to semantic types

pub mod checker;
pub mod codegen;
pub mod global_order;
mod return_checker;
pub mod type_resolver;

pub use checker::{CheckOutput, Resolutions, ScopeStack, Signature, check};
pub use codegen::{GLOBAL_INIT_FUNCTION, GenerateOutput, Locations, NoopOptimizer, Optimizer, generate, ir};
pub use global_order::GlobalOrder;
pub use return_checker::ReturnChecker;

// Re-export the error types from core for convenience
pub use quill_core::{CheckError, GenerateError};
