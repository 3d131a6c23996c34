//! Scalar type variants for the DSL.
//!
//! Scalars are the "basic" types of the language: values of these types are
//! stored directly in a value's payload and have a canonical zero value.

/// Scalar type variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scalar {
    /// Boolean type
    Bool,

    /// Integer type
    Int,

    /// Floating-point type
    Float,

    /// String type
    Str,

    /// Task dependency graph
    Graph,
}

impl Scalar {
    /// Returns true if this scalar is a numeric type (Int or Float)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int | Scalar::Float)
    }

    /// Name of the scalar as written in DSL source.
    pub fn name(&self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::Str => "string",
            Scalar::Graph => "graph",
        }
    }
}
