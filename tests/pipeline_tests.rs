//! End-to-end behavior of the parse, check and generate pipeline.

use bumpalo::Bump;
use quill::ir::{Item, Location, Module};
use quill::{
    CheckError, CompileOptions, Compiler, Diagnostic, EmitKind, Optimizer, Parser, QuillError, Type, check, compile,
    generate,
};
use quill_parser::ast::{Expr, ExprId, FuncDecl, Item as AstItem, Stmt, TypeExpr, VarDecl};
use std::fs;
use std::path::Path;

const SAMPLE: &str = "
var limit i32 = 100
extern func emit(v i32)
func clamp(v i32) i32 {
    var over i32 = v - limit
    return v - over / 2
}
func main() {
    emit(clamp(-(3 + 4) * 20))
    return
}
";

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn add_function_lowers_to_load_add_ret() {
    let ir = compile("func add(a i32, b i32) i32 { return a + b }").unwrap();
    assert_eq!(
        ir,
        "define i32 @add(i32 %1, i32 %2) {\n\
         \t%3 = load i32, ptr %1\n\
         \t%4 = load i32, ptr %2\n\
         \t%5 = add i32 %3, %4\n\
         \tret i32 %5\n\
         }\n"
    );
}

#[test]
fn duplicate_function_is_reported_once() {
    let error = compile("func x() func x() {}").unwrap_err();
    let QuillError::Check(errors) = error else {
        panic!("expected semantic errors");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "function 'x' already declared at 1:6");
}

#[test]
fn global_initializer_resolves_to_first_declaration() {
    let arena = Bump::new();
    let program = Parser::parse("var x i32 = 1 var y i32 = x", &arena).unwrap();
    let checked = check(&program);
    assert!(checked.is_ok());

    let (AstItem::Var(first), AstItem::Var(second)) = (program.items()[0], program.items()[1]) else {
        panic!("expected two globals");
    };
    let Some(Expr::Var(use_of_x)) = second.init else {
        panic!("expected a variable initializer");
    };
    let resolved = checked
        .resolutions
        .var_decl(use_of_x.id)
        .and_then(|id| program.var_decl(id))
        .expect("x should resolve");
    assert!(std::ptr::eq(resolved, first));
}

#[test]
fn literal_operands_use_no_registers() {
    assert_eq!(
        compile("func f() i32 { return 1 + 2 }").unwrap(),
        "define i32 @f() {\n\t%1 = add i32 1, 2\n\tret i32 %1\n}\n"
    );
}

#[test]
fn undeclared_call_leaves_callee_unresolved() {
    let arena = Bump::new();
    let program = Parser::parse("func main() { g() }", &arena).unwrap();
    let checked = check(&program);

    assert_eq!(checked.errors.len(), 1);
    assert_eq!(checked.errors[0].to_string(), "function 'g' not declared");
    assert_eq!(checked.resolutions.callee(ExprId(0)), None);
    assert_eq!(checked.resolutions.expr_type(ExprId(0)), None);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn generation_is_deterministic() {
    let arena = Bump::new();
    let program = Parser::parse(SAMPLE, &arena).unwrap();
    let checked = check(&program);
    assert!(checked.is_ok(), "{:?}", checked.errors);

    let first = generate(&program, &checked.resolutions).unwrap().module.to_string();
    let second = generate(&program, &checked.resolutions).unwrap().module.to_string();
    assert_eq!(first, second);
    assert_eq!(first, compile(SAMPLE).unwrap());
}

#[test]
fn printed_program_reparses_to_the_same_tree() {
    let arena = Bump::new();
    let program = Parser::parse(SAMPLE, &arena).unwrap();
    let printed = program.to_string();
    let reparsed = Parser::parse(&printed, &arena).unwrap();
    assert_same_program(&program, &reparsed, "sample");
    assert_eq!(printed, reparsed.to_string());

    // and the reprinted source still compiles to identical IR
    assert_eq!(compile(&printed).unwrap(), compile(SAMPLE).unwrap());
}

#[test]
fn printed_scripts_reparse_to_the_same_tree() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_scripts");
    let mut scripts: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ql"))
        .filter(|path| !path.ends_with("syntax_error.ql"))
        .collect();
    scripts.sort();
    assert!(!scripts.is_empty());

    for path in scripts {
        let name = path.display().to_string();
        let source = fs::read_to_string(&path).unwrap();
        let arena = Bump::new();
        let program = Parser::parse(&source, &arena).unwrap_or_else(|err| panic!("{name}: {err:?}"));
        let printed = program.to_string();
        let reparsed = Parser::parse(&printed, &arena).unwrap_or_else(|err| panic!("{name}: {err:?}\n{printed}"));
        assert_same_program(&program, &reparsed, &name);
    }
}

#[test]
fn infix_type_matches_operand_type() {
    let arena = Bump::new();
    let program = Parser::parse("func f(a i32, b i32) i32 { return (a + b) * (a - 1) / b }", &arena).unwrap();
    let checked = check(&program);
    assert!(checked.is_ok());
    for id in 0..program.expr_count() {
        assert_eq!(checked.resolutions.expr_type(ExprId(id)), Some(&Type::Int32), "expr#{id}");
    }
}

#[test]
fn mismatched_infix_yields_one_diagnostic() {
    let error = compile("func f(p *i32) i32 { return (p + 1) * 2 }").unwrap_err();
    let QuillError::Check(errors) = error else {
        panic!("expected semantic errors");
    };
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], CheckError::OperandTypeMismatch { .. }));
}

#[test]
fn well_formed_program_checks_clean() {
    let arena = Bump::new();
    let program = Parser::parse(SAMPLE, &arena).unwrap();
    assert!(check(&program).errors.is_empty());
}

// =============================================================================
// Driver behavior
// =============================================================================

#[test]
fn parse_errors_skip_checking() {
    // `y` is undeclared, but the syntax error is all that gets reported
    let error = compile("func f() i32 { return y }\nfunc g( {}").unwrap_err();
    assert!(error.is_parse());
    assert_eq!(error.render("t.ql"), vec!["t.ql:2:9: expected identifier, got '{'"]);
}

#[test]
fn ast_emission_prints_source() {
    let output = Compiler::default()
        .with_emit(EmitKind::Ast)
        .compile("func f(a i32) i32 { return a+1 }")
        .unwrap();
    assert_eq!(output.text, "func f(a i32) i32 {\n    return (a + 1);\n}\n");
    assert_eq!(output.stats.typed_expressions, 0);
}

/// Drops every function definition, keeping globals and declarations.
struct DeclarationsOnly;

impl Optimizer for DeclarationsOnly {
    fn name(&self) -> &'static str {
        "declarations-only"
    }

    fn optimize(&self, module: &mut Module) {
        module.items.retain(|item| !matches!(item, Item::Define(_)));
    }
}

#[test]
fn optimizer_runs_before_rendering() {
    let source = "var g i32 = 1 extern func ext() func f() i32 { return g }";
    let output = Compiler::default().with_optimizer(DeclarationsOnly).compile(source).unwrap();
    assert_eq!(output.text, "@g = global i32 1\ndeclare void @ext()\n");
    assert_eq!(output.stats.instructions, 0);
}

#[test]
fn stats_count_each_phase() {
    let output = Compiler::default().compile(SAMPLE).unwrap();
    assert_eq!(output.stats.functions, 3);
    // limit, v of emit, v of clamp, over
    assert_eq!(output.stats.variables, 4);
    assert!(output.stats.instructions > 0);
    assert_eq!(output.stats.typed_expressions as u32, output.stats.expressions);
}

#[test]
fn diagnostics_render_with_filename_and_source() {
    let source = "func main() i32 {\n    return total\n}\n";
    let compiler = Compiler::new(CompileOptions {
        filename: "sum.ql".to_string(),
        ..CompileOptions::default()
    });
    let error = compiler.compile(source).unwrap_err();
    assert_eq!(compiler.render_diagnostics(&error), vec!["sum.ql:2:12: variable 'total' not declared"]);

    let detailed = error.diagnostics()[0].render_with_source("sum.ql", source);
    assert!(detailed.contains("  2 |     return total\n"));
    assert!(detailed.contains("    |            ^~~~~\n"));
}

#[test]
fn parameter_locations_are_registers() {
    let arena = Bump::new();
    let program = Parser::parse("func f(a i32, b *i32) {}", &arena).unwrap();
    let checked = check(&program);
    let output = generate(&program, &checked.resolutions).unwrap();
    let locations: Vec<_> = program
        .var_decls()
        .iter()
        .map(|decl| output.locations.decl(decl.id).cloned())
        .collect();
    assert_eq!(locations, vec![Some(Location::Register(1)), Some(Location::Register(2))]);
}

// =============================================================================
// Tree comparison
// =============================================================================

/// Compare two trees by shape and content. Ids and spans are ignored.
fn assert_same_program(expected: &quill::Program<'_>, actual: &quill::Program<'_>, name: &str) {
    assert_eq!(expected.items().len(), actual.items().len(), "{name}: item count");
    for (index, (left, right)) in expected.items().iter().zip(actual.items()).enumerate() {
        let same = match (left, right) {
            (AstItem::Func(a), AstItem::Func(b)) => same_func(a, b),
            (AstItem::Var(a), AstItem::Var(b)) => same_var(a, b),
            _ => false,
        };
        assert!(same, "{name}: item {index} differs\n{left:?}\n{right:?}");
    }
}

fn same_func(a: &FuncDecl<'_>, b: &FuncDecl<'_>) -> bool {
    a.name.name == b.name.name
        && a.params.len() == b.params.len()
        && a.params.iter().zip(b.params).all(|(x, y)| same_var(x, y))
        && match (&a.return_type, &b.return_type) {
            (Some(x), Some(y)) => same_type(x, y),
            (None, None) => true,
            _ => false,
        }
        && match (a.body, b.body) {
            (Some(x), Some(y)) => x.len() == y.len() && x.iter().zip(y).all(|(s, t)| same_stmt(s, t)),
            (None, None) => true,
            _ => false,
        }
}

fn same_var(a: &VarDecl<'_>, b: &VarDecl<'_>) -> bool {
    a.name.name == b.name.name && a.kind == b.kind && same_type(&a.ty, &b.ty) && same_opt_expr(a.init, b.init)
}

fn same_stmt(a: &Stmt<'_>, b: &Stmt<'_>) -> bool {
    match (a, b) {
        (Stmt::Var(x), Stmt::Var(y)) => same_var(x, y),
        (Stmt::Return(x), Stmt::Return(y)) => same_opt_expr(x.value, y.value),
        (Stmt::Expr(x), Stmt::Expr(y)) => same_expr(x, y),
        _ => false,
    }
}

fn same_type(a: &TypeExpr<'_>, b: &TypeExpr<'_>) -> bool {
    match (a, b) {
        (TypeExpr::Named(x), TypeExpr::Named(y)) => x.name == y.name,
        (TypeExpr::Pointer { pointee: x, .. }, TypeExpr::Pointer { pointee: y, .. }) => same_type(x, y),
        _ => false,
    }
}

fn same_opt_expr(a: Option<&Expr<'_>>, b: Option<&Expr<'_>>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => same_expr(x, y),
        (None, None) => true,
        _ => false,
    }
}

fn same_expr(a: &Expr<'_>, b: &Expr<'_>) -> bool {
    match (a, b) {
        (Expr::IntLiteral(x), Expr::IntLiteral(y)) => x.value == y.value,
        (Expr::Var(x), Expr::Var(y)) => x.name.name == y.name.name,
        (Expr::Infix(x), Expr::Infix(y)) => x.op == y.op && same_expr(x.left, y.left) && same_expr(x.right, y.right),
        (Expr::Call(x), Expr::Call(y)) => {
            x.callee.name == y.callee.name
                && x.args.len() == y.args.len()
                && x.args.iter().zip(y.args).all(|(s, t)| same_expr(s, t))
        }
        _ => false,
    }
}
