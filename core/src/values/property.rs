//! Property bridges: values whose payload lives in a host object.
//!
//! A [`PropertyAccessor`] is a capability object that reads and writes one
//! property of a host object. Its [`Access`] flags are static metadata: a
//! property that is not gettable reads as a null payload, one that is not
//! settable rejects every write. Neither case is fatal.
//!
//! Three value families sit on top of a [`PropertyBinding`]:
//!
//! - property values, which honour the accessor's flags;
//! - aggregate-property values, which additionally translate the current host
//!   payload into a fresh aggregate whenever their member space is requested;
//! - encapsulated fields, reflected fields of a host object that bypass the
//!   flags and are always writable.

use core::any::{Any, type_name};
use std::rc::Rc;

use bitflags::bitflags;
use dungeon_dsl_types::Ty;
use ecow::EcoString;

use super::payload::{HostObject, Payload};
use super::value::Repr;
use crate::{PropertyError, SpaceId, Spaces, Value, ValueError};

bitflags! {
    /// Which directions of a property accessor are enabled.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct Access: u8 {
        const GET = 1;
        const SET = 1 << 1;
    }
}

/// Reads and writes one property of a host object.
pub trait PropertyAccessor {
    fn access(&self) -> Access;

    fn get(&self, host: &HostObject) -> Payload;

    fn set(&self, host: &HostObject, payload: Payload) -> Result<(), PropertyError>;
}

/// Converts a host payload into an aggregate value chained to `parent`.
///
/// The returned aggregate belongs to the caller. A property-backed aggregate
/// frees the space of its previous translation when it translates again, so
/// translators build a fresh aggregate rather than hand out a cached one.
pub trait RuntimeObjectTranslator {
    fn translate(
        &self,
        payload: &Payload,
        parent: SpaceId,
        spaces: &mut Spaces,
    ) -> Result<Value, ValueError>;
}

impl<F> RuntimeObjectTranslator for F
where
    F: Fn(&Payload, SpaceId, &mut Spaces) -> Result<Value, ValueError>,
{
    fn translate(
        &self,
        payload: &Payload,
        parent: SpaceId,
        spaces: &mut Spaces,
    ) -> Result<Value, ValueError> {
        self(payload, parent, spaces)
    }
}

impl PropertyError {
    /// A write whose payload has the wrong shape.
    pub fn type_mismatch(expected: &str, found: &Payload) -> Self {
        PropertyError::TypeMismatch {
            expected: expected.into(),
            found: found.kind_name().into(),
        }
    }
}

/// An accessor bound to the host object it reads from.
#[derive(Clone)]
pub struct PropertyBinding {
    accessor: Rc<dyn PropertyAccessor>,
    host: HostObject,
}

impl PropertyBinding {
    pub fn new(accessor: Rc<dyn PropertyAccessor>, host: HostObject) -> Self {
        Self { accessor, host }
    }

    pub fn host(&self) -> &HostObject {
        &self.host
    }

    pub fn access(&self) -> Access {
        self.accessor.access()
    }

    /// Current payload, or null if the property is not gettable.
    pub fn read(&self) -> Payload {
        if !self.access().contains(Access::GET) {
            tracing::trace!("read of a non-gettable property");
            return Payload::Null;
        }
        self.accessor.get(&self.host)
    }

    /// Write through the accessor, honouring the settable flag.
    pub fn write(&self, payload: Payload) -> Result<(), PropertyError> {
        if !self.access().contains(Access::SET) {
            return Err(PropertyError::NotSettable);
        }
        self.accessor.set(&self.host, payload)
    }

    pub(crate) fn read_unchecked(&self) -> Payload {
        self.accessor.get(&self.host)
    }

    pub(crate) fn write_unchecked(&self, payload: Payload) -> Result<(), PropertyError> {
        self.accessor.set(&self.host, payload)
    }
}

type Getter<H> = Box<dyn Fn(&H) -> Payload>;
type Setter<H> = Box<dyn Fn(&H, Payload) -> Result<(), PropertyError>>;

/// Accessor built from a pair of closures over a concrete host type `H`.
///
/// A host object of any other type reads as null and rejects writes with
/// [`PropertyError::TypeMismatch`].
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use dungeon_dsl_core::values::{HostObject, HostProperty, Payload, PropertyBinding};
///
/// struct Door { open: Cell<bool> }
///
/// let accessor = HostProperty::<Door>::new(
///     |door| door.open.get().into(),
///     |door, payload| {
///         door.open.set(payload.as_bool().ok_or_else(|| {
///             dungeon_dsl_core::PropertyError::type_mismatch("bool", &payload)
///         })?);
///         Ok(())
///     },
/// );
/// let door = HostObject::new(Door { open: Cell::new(false) });
/// let binding = PropertyBinding::new(Rc::new(accessor), door);
/// binding.write(Payload::Bool(true)).unwrap();
/// assert_eq!(binding.read(), Payload::Bool(true));
/// ```
pub struct HostProperty<H> {
    access: Access,
    getter: Getter<H>,
    setter: Setter<H>,
}

impl<H: Any> HostProperty<H> {
    pub fn new(
        getter: impl Fn(&H) -> Payload + 'static,
        setter: impl Fn(&H, Payload) -> Result<(), PropertyError> + 'static,
    ) -> Self {
        Self {
            access: Access::GET | Access::SET,
            getter: Box::new(getter),
            setter: Box::new(setter),
        }
    }

    pub fn read_only(getter: impl Fn(&H) -> Payload + 'static) -> Self {
        Self {
            access: Access::GET,
            getter: Box::new(getter),
            setter: Box::new(|_, _| Err(PropertyError::NotSettable)),
        }
    }

    /// Override the access flags.
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    fn host<'a>(&self, host: &'a HostObject) -> Result<&'a H, PropertyError> {
        host.downcast_ref::<H>()
            .ok_or_else(|| PropertyError::TypeMismatch {
                expected: type_name::<H>().into(),
                found: EcoString::from("foreign host object"),
            })
    }
}

impl<H: Any> PropertyAccessor for HostProperty<H> {
    fn access(&self) -> Access {
        self.access
    }

    fn get(&self, host: &HostObject) -> Payload {
        self.host(host).map_or(Payload::Null, |h| (self.getter)(h))
    }

    fn set(&self, host: &HostObject, payload: Payload) -> Result<(), PropertyError> {
        (self.setter)(self.host(host)?, payload)
    }
}

impl Value {
    /// A value whose payload is read and written through `binding`.
    pub fn property(ty: Ty, binding: PropertyBinding, mutable: bool) -> Self {
        Self::from_repr(ty, mutable, Repr::Property(binding))
    }

    /// A property value of aggregate type whose members are resolved by
    /// translating the current host payload, chained to `parent`.
    pub fn aggregate_property(
        ty: Ty,
        binding: PropertyBinding,
        parent: SpaceId,
        translator: Rc<dyn RuntimeObjectTranslator>,
        mutable: bool,
    ) -> Self {
        Self::from_repr(
            ty,
            mutable,
            Repr::AggregateProperty {
                binding,
                parent,
                translator,
            },
        )
    }

    /// A reflected field of a host object. Always readable and writable.
    pub fn encapsulated_field(ty: Ty, binding: PropertyBinding) -> Self {
        Self::from_repr(ty, true, Repr::Field(binding))
    }

    pub fn as_property(&self) -> Option<PropertyBinding> {
        match &*self.repr() {
            Repr::Property(binding)
            | Repr::AggregateProperty { binding, .. }
            | Repr::Field(binding) => Some(binding.clone()),
            _ => None,
        }
    }
}
