//! Quill
//!
//! An ahead-of-time compiler for a small statically typed language. Source
//! text goes through three phases, each of which runs only if the previous
//! one reported nothing:
//!
//! 1. **Parsing** into an arena allocated AST ([`quill_parser`])
//! 2. **Checking**: name resolution and type checking ([`quill_compiler::check`])
//! 3. **Generation** of textual SSA style IR ([`quill_compiler::generate`])
//!
//! # Example
//!
//! ```
//! let ir = quill::compile("func f() i32 { return 1 + 2 }").unwrap();
//! assert!(ir.contains("%1 = add i32 1, 2"));
//! ```

use bumpalo::Bump;

pub use quill_compiler::{
    CheckOutput, GLOBAL_INIT_FUNCTION, GenerateOutput, Locations, NoopOptimizer, Optimizer, Resolutions, check,
    generate, ir,
};
pub use quill_core::{CheckError, Diagnostic, GenerateError, ParseError, ParseErrors, QuillError, Span, Type};
pub use quill_parser::{Parser, Program};

/// What the compiler writes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitKind {
    /// Textual IR.
    #[default]
    Ir,
    /// The parsed program printed back as source. Checking is skipped.
    Ast,
}

/// Settings for one [`Compiler`].
pub struct CompileOptions {
    /// Name used when rendering diagnostics.
    pub filename: String,
    pub emit: EmitKind,
    pub optimizer: Box<dyn Optimizer>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            filename: "main.ql".to_string(),
            emit: EmitKind::default(),
            optimizer: Box::new(NoopOptimizer),
        }
    }
}

/// Counters collected while compiling, reported by `quillc --verbose`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub functions: usize,
    pub variables: usize,
    pub expressions: u32,
    pub typed_expressions: usize,
    pub instructions: usize,
}

/// Result of a successful compilation.
#[derive(Debug, Clone)]
pub struct Output {
    pub text: String,
    pub stats: CompileStats,
}

/// Runs the whole pipeline over source text.
#[derive(Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn with_emit(mut self, emit: EmitKind) -> Self {
        self.options.emit = emit;
        self
    }

    pub fn with_optimizer(mut self, optimizer: impl Optimizer + 'static) -> Self {
        self.options.optimizer = Box::new(optimizer);
        self
    }

    /// Compile one source file.
    ///
    /// The error carries the diagnostics of the first phase that failed.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, source: &str) -> Result<Output, QuillError> {
        let arena = Bump::new();
        let program = Parser::parse(source, &arena)?;

        let mut stats = CompileStats {
            functions: program.func_decls().len(),
            variables: program.var_decls().len(),
            expressions: program.expr_count(),
            ..CompileStats::default()
        };

        if self.options.emit == EmitKind::Ast {
            return Ok(Output {
                text: format!("{program}\n"),
                stats,
            });
        }

        let checked = check(&program);
        if !checked.is_ok() {
            return Err(checked.errors.into());
        }
        stats.typed_expressions = checked.resolutions.typed_expr_count();

        let mut generated = generate(&program, &checked.resolutions)?;
        self.options.optimizer.optimize(&mut generated.module);
        stats.instructions = generated.module.instruction_count();

        Ok(Output {
            text: generated.module.to_string(),
            stats,
        })
    }

    /// Render an error's diagnostics as `file:line:col: message` lines.
    pub fn render_diagnostics(&self, error: &QuillError) -> Vec<String> {
        error.render(&self.options.filename)
    }
}

/// Compile source text to IR with default options.
pub fn compile(source: &str) -> Result<String, QuillError> {
    Compiler::default().compile(source).map(|output| output.text)
}
