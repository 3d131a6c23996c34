//! Rendering of types in DSL source syntax.
//!
//! ```text
//! int   string   entity   int[]   entity<>   [int -> string]   fn(int, bool) -> string
//! ```

use core::fmt;

use crate::{PrototypeKind, Ty, TypeKind};

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.kind(), f)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::NoType => write!(f, "none"),
            TypeKind::Scalar(scalar) => write!(f, "{}", scalar.name()),
            TypeKind::Aggregate(agg) => write!(f, "{}", agg.name()),
            TypeKind::List(elem) => write!(f, "{}[]", elem),
            TypeKind::Set(elem) => write!(f, "{}<>", elem),
            TypeKind::Map(key, elem) => write!(f, "[{} -> {}]", key, elem),
            TypeKind::Function { params, ret } => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") -> {}", ret)
            }
            TypeKind::Enum(e) => write!(f, "{}", e.name()),
            TypeKind::Prototype(PrototypeKind::Entity) => write!(f, "prototype"),
            TypeKind::Prototype(PrototypeKind::Item) => write!(f, "item_prototype"),
        }
    }
}
