//! Name-keyed registry of type descriptors.
//!
//! This is the service the value model consumes for `resolve_type` and
//! `types_equal`. The semantic analyzer registers every type it builds; the
//! registry comes pre-populated with the builtin types.

use ecow::EcoString;
use hashbrown::HashMap;

use crate::{DataType, Ty};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("type `{name}` is already registered")]
    DuplicateType { name: EcoString },
}

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<EcoString, Ty>,
}

impl TypeRegistry {
    /// Create a registry holding the builtin types.
    pub fn new() -> Self {
        let mut types = HashMap::new();
        for ty in [
            Ty::int(),
            Ty::float(),
            Ty::bool(),
            Ty::string(),
            Ty::graph(),
            Ty::prototype(),
            Ty::item_prototype(),
        ] {
            types.insert(ty.type_name(), ty);
        }
        Self { types }
    }

    /// Register a named type. Names must be unique.
    pub fn register(&mut self, ty: Ty) -> Result<(), TypeError> {
        let name = ty.type_name();
        if self.types.contains_key(&name) {
            return Err(TypeError::DuplicateType { name });
        }
        self.types.insert(name, ty);
        Ok(())
    }

    pub fn resolve_type(&self, name: &str) -> Option<Ty> {
        self.types.get(name).cloned()
    }

    pub fn types_equal(&self, a: &Ty, b: &Ty) -> bool {
        a == b
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
