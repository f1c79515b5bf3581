//! Return path verification.
//!
//! The language has no control flow, so a body returns on every path exactly
//! when its last statement is a `return`.

use quill_parser::ast::Stmt;

/// Checks whether a function body always ends in a `return`.
pub struct ReturnChecker;

impl ReturnChecker {
    pub fn all_paths_return(body: &[Stmt<'_>]) -> bool {
        matches!(body.last(), Some(Stmt::Return(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use quill_parser::Parser;
    use quill_parser::ast::Item;

    fn body_returns(source: &str) -> bool {
        let arena = Bump::new();
        let program = Parser::parse(source, &arena).unwrap();
        let Some(Item::Func(func)) = program.items().first() else {
            panic!("expected a function");
        };
        ReturnChecker::all_paths_return(func.body.unwrap_or_default())
    }

    #[test]
    fn trailing_return() {
        assert!(body_returns("func f() i32 { var x i32 = 1; return x }"));
        assert!(body_returns("func f() { return }"));
    }

    #[test]
    fn missing_or_early_return() {
        assert!(!body_returns("func f() i32 {}"));
        assert!(!body_returns("func f() i32 { return 1; g() }"));
    }
}
