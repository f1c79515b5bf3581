use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use quill::{CompileOptions, Compiler, EmitKind, NoopOptimizer};

#[derive(Parser, Debug)]
#[command(name = "quillc", version, about = "Ahead-of-time compiler for the quill language")]
struct AppArgs {
    /// Source file to compile
    #[arg(default_value = "main.ql")]
    input: PathBuf,
    #[arg(short = 'o', long = "output", default_value = "out.ll")]
    output: PathBuf,
    #[arg(long = "emit", value_enum, default_value_t = Emit::Ir)]
    emit: Emit,
    /// Print the result instead of writing the output file
    #[arg(long)]
    stdout: bool,
    /// Report per-phase counts on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Ir,
    Ast,
}

impl From<Emit> for EmitKind {
    fn from(emit: Emit) -> Self {
        match emit {
            Emit::Ir => EmitKind::Ir,
            Emit::Ast => EmitKind::Ast,
        }
    }
}

fn main() -> ExitCode {
    let args = AppArgs::parse();
    match run(&args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &AppArgs) -> Result<ExitCode> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    let compiler = Compiler::new(CompileOptions {
        filename: args.input.display().to_string(),
        emit: args.emit.into(),
        optimizer: Box::new(NoopOptimizer),
    });

    let output = match compiler.compile(&source) {
        Ok(output) => output,
        Err(error) => {
            for line in compiler.render_diagnostics(&error) {
                eprintln!("{line}");
            }
            let code = if error.is_internal() { 2 } else { 1 };
            return Ok(ExitCode::from(code));
        }
    };

    if args.verbose {
        let stats = output.stats;
        eprintln!("parse: {} function(s), {} variable(s), {} expression(s)", stats.functions, stats.variables, stats.expressions);
        if args.emit == Emit::Ir {
            eprintln!("check: {} typed expression(s)", stats.typed_expressions);
            eprintln!(
                "generate: {} instruction(s), optimizer '{}'",
                stats.instructions,
                compiler.options().optimizer.name()
            );
        }
    }

    if args.stdout {
        print!("{}", output.text);
    } else {
        fs::write(&args.output, &output.text)
            .with_context(|| format!("cannot write {}", args.output.display()))?;
        if args.verbose {
            eprintln!("wrote {}", args.output.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
