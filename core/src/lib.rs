//! Runtime value and memory-space model of the dungeon DSL.
//!
//! The interpreter drives everything in here: it asks for values to be
//! constructed, reads and writes their payloads, and resolves member access
//! through memory spaces. Memory spaces live in an arena ([`memory::Spaces`])
//! and refer to their parents by [`memory::SpaceId`], so every operation that
//! can touch a scope takes the arena explicitly.
//!
//! The model is single-threaded: values are reference counted and use interior
//! mutability, and are neither `Send` nor `Sync`.

pub mod errors;
pub mod memory;
pub mod options;
pub mod values;

pub use errors::{PropertyError, ValueError};
pub use memory::{MemorySpace, SpaceId, Spaces};
pub use options::RuntimeOptions;
pub use values::{Payload, Value, ValueKind};
