//! Performance benchmarks for the quill compile pipeline.
//!
//! Two groups:
//! - Size-based: the sample scripts plus generated programs of growing size
//! - Phase-based: parsing, checking and generation measured separately
//!
//! ## Profiling with Puffin
//!
//! Run with the `profile-with-puffin` feature to collect per-phase timings:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use bumpalo::Bump;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quill::{Compiler, Parser, check, generate};
use std::fmt::Write;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };
    let view = frame_view.lock();
    println!("\n=== Profiling: {} frames recorded ===\n", view.recent_frames().count());
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

/// A program with `functions` small functions, each calling the previous one.
fn generated_program(functions: usize) -> String {
    let mut source = String::from("var seed i32 = 7\n");
    source.push_str("func f0(x i32) i32 { return x * seed }\n");
    for i in 1..functions {
        let _ = writeln!(
            source,
            "func f{i}(x i32) i32 {{\n    var a i32 = x + {i}\n    var b i32 = a * 3 - -x / 2\n    return f{prev}(b - a)\n}}",
            prev = i - 1
        );
    }
    source
}

fn size_based_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let compiler = Compiler::default();
    let mut group = c.benchmark_group("pipeline/file_sizes");

    let scripts = [
        ("hello", include_str!("../test_scripts/hello.ql")),
        ("arithmetic", include_str!("../test_scripts/arithmetic.ql")),
        ("globals", include_str!("../test_scripts/globals.ql")),
    ];
    for (name, source) in scripts {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let output = compiler.compile(black_box(source)).unwrap();
                end_profiling_frame();
                black_box(output.stats.instructions)
            });
        });
    }

    for functions in [10, 100, 1000] {
        let source = generated_program(functions);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("generated", functions), &source, |b, source| {
            b.iter(|| {
                let output = compiler.compile(black_box(source)).unwrap();
                end_profiling_frame();
                black_box(output.text.len())
            });
        });
    }

    group.finish();
    print_profiling_stats();
}

fn phase_benchmarks(c: &mut Criterion) {
    let source = generated_program(500);
    let mut group = c.benchmark_group("pipeline/phases");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = Parser::parse(black_box(&source), &arena).unwrap();
            black_box(program.items().len())
        });
    });

    let arena = Bump::new();
    let program = Parser::parse(&source, &arena).unwrap();

    group.bench_function("check", |b| {
        b.iter(|| black_box(check(black_box(&program)).errors.len()));
    });

    let checked = check(&program);
    group.bench_function("generate", |b| {
        b.iter(|| {
            let output = generate(black_box(&program), &checked.resolutions).unwrap();
            black_box(output.module.instruction_count())
        });
    });

    group.finish();
}

criterion_group!(benches, size_based_benchmarks, phase_benchmarks);
criterion_main!(benches);
