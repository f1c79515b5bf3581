//! Lexer, AST and parser for quill source code.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use quill_parser::Parser;
//!
//! let arena = Bump::new();
//! let source = "func add(a i32, b i32) i32 { return a + b }";
//!
//! match Parser::parse(source, &arena) {
//!     Ok(program) => println!("{} top-level declarations", program.items().len()),
//!     Err(errors) => eprintln!("parse errors:\n{errors}"),
//! }
//! ```

pub mod ast;
pub mod lexer;

pub use ast::{Parser, Program};
pub use lexer::{Lexer, Token, TokenKind};
