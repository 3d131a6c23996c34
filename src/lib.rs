//! Dungeon DSL runtime: values and memory spaces.
//!
//! # Overview
//!
//! This crate is the object model a tree-walking interpreter for the dungeon
//! content DSL runs on. It unifies:
//!
//! - literal values (`int`, `float`, `bool`, `string`, `graph`)
//! - aggregates backed by chained memory spaces
//! - property bridges into live host objects
//! - lists, sets and maps with callable native methods
//! - enums, function values and prototypes
//!
//! # Quick Start
//!
//! ```
//! use dungeon_dsl::{Spaces, Ty, Value};
//!
//! let mut spaces = Spaces::new();
//! let global = spaces.new_space(None).unwrap();
//! spaces.bind(global, "answer", Value::int(42));
//!
//! let block = spaces.new_space(Some(global)).unwrap();
//! let answer = spaces.lookup(block, "answer").unwrap();
//! assert_eq!(answer.to_string(), "42");
//!
//! let names = Value::set(Ty::set(Ty::string()));
//! let set = names.as_set().unwrap();
//! assert!(set.add(Value::string("orc")));
//! assert!(!set.add(Value::string("orc")));
//! ```
//!
//! # Errors
//!
//! Structural and type errors are returned as [`ValueError`], which carries
//! a [`miette::Diagnostic`] code. See [`render_error`] for turning one into
//! a user-facing report.

pub use dungeon_dsl_core::{
    MemorySpace, PropertyError, RuntimeOptions, SpaceId, Spaces, ValueError, memory, values,
};
pub use dungeon_dsl_core::values::{Payload, Value, ValueKind};
pub use dungeon_dsl_types::{self as types, DataType, Ty, TypeKind, TypeRegistry};

mod error_renderer;
pub use error_renderer::{render_error, render_error_to_string, render_error_to_string_no_color};
