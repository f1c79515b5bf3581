//! Resolution of source type expressions to semantic [`Type`]s.

use quill_core::Type;
use quill_parser::ast::{FuncDecl, TypeExpr};

/// Resolve a written type.
///
/// Unknown names are not an error: they become opaque [`Type::Custom`] types.
pub fn resolve_type(ty: &TypeExpr<'_>) -> Type {
    match ty {
        TypeExpr::Named(ident) => Type::from_name(ident.name),
        TypeExpr::Pointer { pointee, .. } => Type::pointer_to(resolve_type(pointee)),
    }
}

/// The declared return type of a function, `void` when omitted.
pub fn return_type(decl: &FuncDecl<'_>) -> Type {
    decl.return_type.as_ref().map_or(Type::Void, resolve_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use quill_parser::Parser;
    use quill_parser::ast::Item;

    fn first_func<'ast>(source: &str, arena: &'ast Bump) -> &'ast FuncDecl<'ast> {
        let program = Parser::parse(source, arena).unwrap();
        match program.items()[0] {
            Item::Func(decl) => decl,
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn resolves_parameter_types() {
        let arena = Bump::new();
        let func = first_func("func f(a i32, b *i8, c **Node, d void)", &arena);
        let types: Vec<_> = func.params.iter().map(|p| resolve_type(&p.ty)).collect();
        assert_eq!(
            types,
            vec![
                Type::Int32,
                Type::pointer_to(Type::Custom("i8".into())),
                Type::pointer_to(Type::pointer_to(Type::Custom("Node".into()))),
                Type::Void,
            ]
        );
    }

    #[test]
    fn omitted_return_type_is_void() {
        let arena = Bump::new();
        assert_eq!(return_type(first_func("func f()", &arena)), Type::Void);
        assert_eq!(return_type(first_func("func g() *i32", &arena)), Type::pointer_to(Type::Int32));
    }
}
