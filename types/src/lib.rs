//! Type descriptors for the dungeon DSL.
//!
//! Types are produced by semantic analysis and consumed by the runtime value
//! model, which only ever stores and compares them.
//!
//! # Example
//!
//! ```
//! use dungeon_dsl_types::{Ty, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let int_ty = registry.resolve_type("int").unwrap();
//! assert!(registry.types_equal(&int_ty, &Ty::int()));
//! assert_eq!(Ty::map(Ty::int(), Ty::string()).to_string(), "[int -> string]");
//! ```

#![no_std]
extern crate alloc;

mod aggregate;
mod display;
mod registry;
mod scalar;
mod ty;

pub use aggregate::{AggregateType, EnumType, MemberKind, MemberSymbol, Variant};
pub use registry::{TypeError, TypeRegistry};
pub use scalar::Scalar;
pub use ty::{DataType, Kind, PrototypeKind, Ty, TypeKind};
