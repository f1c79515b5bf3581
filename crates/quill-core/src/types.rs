//! The static type model.
//!
//! Types are plain structural values: two types are equal iff their tags and
//! substructure match. There is no subtyping and no implicit conversion, so
//! every type rule in the checker reduces to `==`.

use std::fmt;

/// A static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// 32-bit signed integer, the only numeric type.
    Int32,
    /// Absence of a value. Only valid as a function return type.
    Void,
    /// Pointer to another type, written `*T` in source.
    Pointer(Box<Type>),
    /// Any other named type. Opaque: it can be passed around but not computed on.
    Custom(String),
}

impl Type {
    /// Map a source type name to a type.
    pub fn from_name(name: &str) -> Type {
        match name {
            "i32" => Type::Int32,
            "void" => Type::Void,
            other => Type::Custom(other.to_string()),
        }
    }

    pub fn pointer_to(pointee: Type) -> Type {
        Type::Pointer(Box::new(pointee))
    }

    /// Whether arithmetic is defined on values of this type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int32)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// The spelling of this type in emitted IR.
    ///
    /// Pointers are opaque in the IR, so every pointer type prints as `ptr`.
    pub fn ir_name(&self) -> &str {
        match self {
            Type::Int32 => "i32",
            Type::Void => "void",
            Type::Pointer(_) => "ptr",
            Type::Custom(name) => name,
        }
    }
}

impl fmt::Display for Type {
    /// Source spelling, used in diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int32 => f.write_str("i32"),
            Type::Void => f.write_str("void"),
            Type::Pointer(pointee) => write!(f, "*{pointee}"),
            Type::Custom(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_builtins() {
        assert_eq!(Type::from_name("i32"), Type::Int32);
        assert_eq!(Type::from_name("void"), Type::Void);
        assert_eq!(Type::from_name("File"), Type::Custom("File".into()));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Type::pointer_to(Type::Int32), Type::pointer_to(Type::Int32));
        assert_ne!(Type::pointer_to(Type::Int32), Type::pointer_to(Type::Custom("i8".into())));
        assert_ne!(Type::Int32, Type::Custom("i64".into()));
    }

    #[test]
    fn only_int32_is_numeric() {
        assert!(Type::Int32.is_numeric());
        assert!(!Type::Void.is_numeric());
        assert!(!Type::pointer_to(Type::Int32).is_numeric());
        assert!(!Type::Custom("u8".into()).is_numeric());
    }

    #[test]
    fn source_and_ir_spellings() {
        let ty = Type::pointer_to(Type::pointer_to(Type::Custom("i8".into())));
        assert_eq!(ty.to_string(), "**i8");
        assert_eq!(ty.ir_name(), "ptr");
        assert_eq!(Type::Custom("Node".into()).ir_name(), "Node");
    }
}
