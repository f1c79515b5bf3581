//! Source-like rendering of the AST.
//!
//! Infix expressions are fully parenthesized and statements are terminated
//! with `;`, so the output re-parses to the same tree.

use std::fmt::{self, Write};

use super::{Expr, FuncDecl, Item, Program, ReturnStmt, Stmt, TypeExpr, VarDecl};

const INDENT: &str = "    ";

impl fmt::Display for Program<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items().iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Func(decl) => write!(f, "{decl}"),
            Item::Var(decl) => write_var(f, decl),
        }
    }
}

impl fmt::Display for Stmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    match stmt {
        Stmt::Var(decl) => write_var(f, decl),
        Stmt::Return(ret) => write!(f, "{ret}"),
        Stmt::Expr(expr) => write!(f, "{expr};"),
    }
}

fn write_var(f: &mut fmt::Formatter<'_>, decl: &VarDecl<'_>) -> fmt::Result {
    match decl.init {
        Some(init) => write!(f, "var {decl} = {init};"),
        None => write!(f, "var {decl}"),
    }
}

impl fmt::Display for FuncDecl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func {}(", self.name.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_char(')')?;

        if let Some(ty) = &self.return_type {
            write!(f, " {ty}")?;
        }

        let Some(body) = self.body else {
            return Ok(());
        };
        f.write_str(" {\n")?;
        for stmt in body {
            write_stmt(f, stmt, 1)?;
            f.write_char('\n')?;
        }
        f.write_char('}')
    }
}

/// `name type`, the form shared by parameters and `var` headers.
impl fmt::Display for VarDecl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name.name, self.ty)
    }
}

impl fmt::Display for ReturnStmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // a bare return is only valid right before `}`, so it takes no `;`
        match self.value {
            Some(value) => write!(f, "return {value};"),
            None => f.write_str("return"),
        }
    }
}

impl fmt::Display for TypeExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(ident) => f.write_str(ident.name),
            TypeExpr::Pointer { pointee, .. } => write!(f, "*{pointee}"),
        }
    }
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntLiteral(lit) => write!(f, "{}", lit.value),
            Expr::Var(var) => f.write_str(var.name.name),
            Expr::Infix(infix) => write!(f, "({} {} {})", infix.left, infix.op, infix.right),
            Expr::Call(call) => {
                write!(f, "{}(", call.callee.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_char(')')
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Parser;
    use bumpalo::Bump;

    fn print(source: &str) -> String {
        let arena = Bump::new();
        match Parser::parse(source, &arena) {
            Ok(program) => program.to_string(),
            Err(errors) => panic!("parse failed for {source:?}: {errors}"),
        }
    }

    #[test]
    fn prints_function_definition() {
        assert_eq!(
            print("func add(a i32, b i32) i32 { return a + b }"),
            "func add(a i32, b i32) i32 {\n    return (a + b);\n}"
        );
    }

    #[test]
    fn prints_extern_and_globals() {
        assert_eq!(
            print("extern func puts(s *i8) i32\nvar answer i32 = 6 * 7"),
            "func puts(s *i8) i32\nvar answer i32 = (6 * 7);"
        );
    }

    #[test]
    fn prints_empty_body_and_bare_return() {
        assert_eq!(print("func x() {}"), "func x() {\n}");
        assert_eq!(print("func y() { f() return }"), "func y() {\n    f();\n    return\n}");
    }

    #[test]
    fn round_trip_is_stable() {
        let sources = [
            "func add(a i32, b i32) i32 { return a + b }",
            "var x i32 = 1 var y i32 = x",
            "func f(p *i32) *i32 { var q *i32 = p; return q }",
            "func g() i32 { var a i32 = -3; var b i32 = -(a * 2) / 4; return b - -a }",
            "func h() { print(add(1, 2), 3) }\nfunc print(a i32, b i32)\nfunc add(a i32, b i32) i32",
            "func k() i32 { var n i32 = 1; (n + 1); return n }",
        ];
        for source in sources {
            let once = print(source);
            let twice = print(&once);
            assert_eq!(once, twice, "printing is not stable for {source:?}");
        }
    }
}
