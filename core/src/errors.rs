//! Errors raised by the value model.
//!
//! Only structural and type errors are raised. Payload-level misses (an
//! out-of-bounds list read, a map miss, a disabled property read) are modeled
//! as data: the `none` sentinel, `false`, or a null payload.

use ecow::EcoString;

/// Structural and type errors. These propagate to the interpreter, which turns
/// them into a user-facing diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ValueError {
    #[error("cannot write to immutable value of type `{ty}`")]
    #[diagnostic(code(dsl::value::not_mutable))]
    NotMutable { ty: EcoString },

    #[error("incompatible types: expected `{expected}`, found `{found}`")]
    #[diagnostic(code(dsl::value::incompatible_type))]
    IncompatibleType { expected: EcoString, found: EcoString },

    #[error("a {payload} payload cannot be stored in a value of type `{ty}`")]
    #[diagnostic(code(dsl::value::payload_mismatch))]
    PayloadMismatch { ty: EcoString, payload: &'static str },

    #[error("value of type `{ty}` does not own a member space")]
    #[diagnostic(code(dsl::value::not_aggregate))]
    NotAggregate { ty: EcoString },

    #[error("scope depth {depth} exceeds maximum of {max_depth}")]
    #[diagnostic(
        code(dsl::memory::scope_depth),
        help("this usually means unbounded recursion in a DSL function")
    )]
    ScopeDepthExceeded { depth: usize, max_depth: usize },

    #[error("memory space does not exist (it was freed or never allocated)")]
    #[diagnostic(code(dsl::memory::unknown_space))]
    UnknownSpace,

    #[error("`{name}` expects {expected} argument(s), got {found}")]
    #[diagnostic(code(dsl::call::arity))]
    ArityMismatch {
        name: EcoString,
        expected: usize,
        found: usize,
    },

    #[error("method `{name}` called without a receiver")]
    #[diagnostic(code(dsl::call::missing_receiver))]
    MissingReceiver { name: EcoString },
}

/// Failure of a write through a property accessor.
///
/// Never fatal: the base value contract reports these as a `false` write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum PropertyError {
    #[error("property is not settable")]
    #[diagnostic(code(dsl::property::not_settable))]
    NotSettable,

    #[error("property write expected {expected}, found {found}")]
    #[diagnostic(code(dsl::property::type_mismatch))]
    TypeMismatch { expected: EcoString, found: EcoString },
}
