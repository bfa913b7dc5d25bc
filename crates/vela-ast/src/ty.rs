// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type expressions as written in signatures.

use std::fmt;

/// A type as it appears in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Unit,
    Int,
    Bool,
    Double,
    String,
    /// A user-defined type, by the (possibly qualified) name written.
    Named(String),
    Tuple(Vec<TypeExpr>),
    Array(Box<TypeExpr>),
}

impl TypeExpr {
    /// Map a builtin type name to its variant.
    pub fn builtin(name: &str) -> Option<TypeExpr> {
        match name {
            "Unit" => Some(TypeExpr::Unit),
            "Int" => Some(TypeExpr::Int),
            "Bool" => Some(TypeExpr::Bool),
            "Double" => Some(TypeExpr::Double),
            "String" => Some(TypeExpr::String),
            _ => None,
        }
    }

    /// Every named type referenced, outermost first.
    pub fn named_types(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeExpr::Named(name) => out.push(name),
            TypeExpr::Tuple(items) => items.iter().for_each(|t| t.collect_named(out)),
            TypeExpr::Array(inner) => inner.collect_named(out),
            _ => {}
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Unit => write!(f, "Unit"),
            TypeExpr::Int => write!(f, "Int"),
            TypeExpr::Bool => write!(f, "Bool"),
            TypeExpr::Double => write!(f, "Double"),
            TypeExpr::String => write!(f, "String"),
            TypeExpr::Named(name) => write!(f, "{}", name),
            TypeExpr::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            TypeExpr::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested() {
        let ty = TypeExpr::Array(Box::new(TypeExpr::Tuple(vec![
            TypeExpr::Int,
            TypeExpr::Named("Pair".to_string()),
        ])));
        assert_eq!(ty.to_string(), "(Int, Pair)[]");
        assert_eq!(ty.named_types(), vec!["Pair"]);
    }
}
