//! Prototypes: named templates of default member values.
//!
//! A prototype is created once per entity or item type definition and is
//! both a value (of type `prototype` or `item_prototype`) and a type
//! descriptor in its own right: it has a name and a kind. Instantiating an
//! aggregate from a prototype is the interpreter's job; it reads the
//! registered defaults through [`Prototype::default_value`].

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use dungeon_dsl_types::{DataType, Kind, Ty};
use ecow::EcoString;
use hashbrown::HashMap;

use super::value::Repr;
use crate::Value;

struct PrototypeData {
    ty: Ty,
    internal: Option<Ty>,
    defaults: RefCell<HashMap<EcoString, Value>>,
}

/// Shared handle to a prototype. Compared by identity.
#[derive(Clone)]
pub struct Prototype(Rc<PrototypeData>);

impl Prototype {
    /// A prototype of builtin type `ty` for instances of aggregate type
    /// `internal`. Without an internal type no default can be registered.
    pub fn new(ty: Ty, internal: Option<Ty>) -> Self {
        Self(Rc::new(PrototypeData {
            ty,
            internal,
            defaults: RefCell::new(HashMap::new()),
        }))
    }

    /// `prototype` or `item_prototype`.
    pub fn ty(&self) -> &Ty {
        &self.0.ty
    }

    /// The aggregate type instances are built from.
    pub fn internal_type(&self) -> Option<&Ty> {
        self.0.internal.as_ref()
    }

    pub fn name(&self) -> EcoString {
        match &self.0.internal {
            Some(internal) => internal.type_name(),
            None => self.0.ty.type_name(),
        }
    }

    /// Register a default for member `name`.
    ///
    /// Returns `false` and leaves the defaults untouched if `name` is not a
    /// member of the internal type.
    pub fn add_default_value(&self, name: &str, value: Value) -> bool {
        let known = self
            .0
            .internal
            .as_ref()
            .is_some_and(|internal| internal.member(name).is_some());
        if !known {
            tracing::debug!(prototype = %self.name(), member = name, "unknown member rejected");
            return false;
        }
        self.0.defaults.borrow_mut().insert(name.into(), value);
        true
    }

    /// Stored default for `name`, or `none`.
    pub fn default_value(&self, name: &str) -> Value {
        self.0
            .defaults
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(Value::none)
    }

    /// Snapshot of every registered default.
    pub fn default_values(&self) -> Vec<(EcoString, Value)> {
        self.0
            .defaults
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Prototype) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl DataType for Prototype {
    fn type_name(&self) -> EcoString {
        self.name()
    }

    fn type_kind(&self) -> Kind {
        Kind::Prototype
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype")
            .field("name", &self.name())
            .field("defaults", &self.0.defaults.borrow().len())
            .finish()
    }
}

impl Value {
    /// A prototype value wrapping a new, empty [`Prototype`].
    pub fn prototype(ty: Ty, internal: Option<Ty>) -> Self {
        let proto = Prototype::new(ty.clone(), internal);
        Self::from_repr(ty, true, Repr::Prototype(proto))
    }

    pub fn as_prototype(&self) -> Option<Prototype> {
        match &*self.repr() {
            Repr::Prototype(proto) => Some(proto.clone()),
            _ => None,
        }
    }
}
