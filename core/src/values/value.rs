//! The value handle and its base contract.
//!
//! A [`Value`] is a cheap, reference-counted handle. Cloning the handle does
//! not create a new value: both handles observe the same payload, flags and
//! member space. Creating a *new* value that still aliases the payload is
//! [`Value::shallow_view`]; a fully independent copy is [`Value::deep_copy`].
//!
//! Every value has a type descriptor, a mutability flag fixed at construction
//! and a `dirty` flag recording that the payload has been explicitly set.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use dungeon_dsl_types::{DataType, Ty};

use super::collection::{ListData, MapData, SetData};
use super::function::Callable;
use super::payload::Payload;
use super::property::{PropertyBinding, RuntimeObjectTranslator};
use super::prototype::Prototype;
use crate::{SpaceId, Spaces, ValueError};

/// Reserved name under which a member space binds its owning value.
pub const THIS_NAME: &str = "this";

/// Which family a value belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The `none` sentinel.
    None,
    /// Literal value with a directly stored payload.
    Basic,
    Aggregate,
    /// Payload read and written through an accessor against a host object.
    Property,
    /// Property whose payload is translated into an aggregate on member access.
    AggregateProperty,
    /// Reflected field of a host object.
    EncapsulatedField,
    List,
    Set,
    Map,
    Enum,
    Function,
    Prototype,
}

/// Cloning a `Repr` shares every payload reference.
#[derive(Clone)]
pub(crate) enum Repr {
    NoValue,
    Basic(Payload),
    Aggregate {
        payload: Payload,
        space: SpaceId,
    },
    Property(PropertyBinding),
    AggregateProperty {
        binding: PropertyBinding,
        parent: SpaceId,
        translator: Rc<dyn RuntimeObjectTranslator>,
    },
    Field(PropertyBinding),
    List(Rc<RefCell<ListData>>),
    Set(Rc<RefCell<SetData>>),
    Map(Rc<RefCell<MapData>>),
    Enum(Option<dungeon_dsl_types::Variant>),
    Function(Option<Rc<dyn Callable>>),
    Prototype(Prototype),
}

impl Repr {
    fn kind(&self) -> ValueKind {
        match self {
            Repr::NoValue => ValueKind::None,
            Repr::Basic(_) => ValueKind::Basic,
            Repr::Aggregate { .. } => ValueKind::Aggregate,
            Repr::Property(_) => ValueKind::Property,
            Repr::AggregateProperty { .. } => ValueKind::AggregateProperty,
            Repr::Field(_) => ValueKind::EncapsulatedField,
            Repr::List(_) => ValueKind::List,
            Repr::Set(_) => ValueKind::Set,
            Repr::Map(_) => ValueKind::Map,
            Repr::Enum(_) => ValueKind::Enum,
            Repr::Function(_) => ValueKind::Function,
            Repr::Prototype(_) => ValueKind::Prototype,
        }
    }
}

struct ValueCell {
    ty: Ty,
    mutable: bool,
    dirty: Cell<bool>,
    /// Space of the last host translation of a property-backed aggregate.
    translated: Cell<Option<SpaceId>>,
    repr: RefCell<Repr>,
}

/// Handle to a runtime value.
#[derive(Clone)]
pub struct Value(Rc<ValueCell>);

static_assertions::assert_not_impl_any!(Value: Send, Sync);

thread_local! {
    static NONE: Value = Value::from_repr(Ty::no_type(), false, Repr::NoValue);
    static NONE_FUNCTION: Value = Value::from_repr(Ty::no_type(), false, Repr::Function(None));
}

impl Value {
    pub(crate) fn from_repr(ty: Ty, mutable: bool, repr: Repr) -> Self {
        Self(Rc::new(ValueCell {
            ty,
            mutable,
            dirty: Cell::new(false),
            translated: Cell::new(None),
            repr: RefCell::new(repr),
        }))
    }

    pub(crate) fn repr(&self) -> core::cell::Ref<'_, Repr> {
        self.0.repr.borrow()
    }

    pub(crate) fn repr_mut(&self) -> core::cell::RefMut<'_, Repr> {
        self.0.repr.borrow_mut()
    }

    // ============================================================================
    // Construction
    // ============================================================================

    /// The `none` sentinel: no type, null payload, immutable.
    ///
    /// Stands for "absence" everywhere a value is expected. It is never equal
    /// to anything, itself included.
    pub fn none() -> Self {
        NONE.with(Value::clone)
    }

    /// The empty function value: no callable, no type, immutable.
    pub fn none_function() -> Self {
        NONE_FUNCTION.with(Value::clone)
    }

    /// A mutable value with a directly stored payload.
    pub fn new(ty: Ty, payload: impl Into<Payload>) -> Self {
        Self::with_mutability(ty, payload, true)
    }

    pub fn immutable(ty: Ty, payload: impl Into<Payload>) -> Self {
        Self::with_mutability(ty, payload, false)
    }

    pub fn with_mutability(ty: Ty, payload: impl Into<Payload>, mutable: bool) -> Self {
        Self::from_repr(ty, mutable, Repr::Basic(payload.into()))
    }

    pub fn int(v: i64) -> Self {
        Self::new(Ty::int(), v)
    }

    pub fn float(v: f64) -> Self {
        Self::new(Ty::float(), v)
    }

    pub fn bool(v: bool) -> Self {
        Self::new(Ty::bool(), v)
    }

    pub fn string(v: &str) -> Self {
        Self::new(Ty::string(), v)
    }

    // ============================================================================
    // Flags and identity
    // ============================================================================

    pub fn ty(&self) -> Ty {
        self.0.ty.clone()
    }

    pub fn kind(&self) -> ValueKind {
        self.repr().kind()
    }

    pub fn is_none(&self) -> bool {
        matches!(*self.repr(), Repr::NoValue)
    }

    pub fn is_mutable(&self) -> bool {
        self.0.mutable
    }

    /// Whether the payload has been explicitly set since construction.
    pub fn is_dirty(&self) -> bool {
        self.0.dirty.get()
    }

    pub fn set_dirty(&self) {
        self.0.dirty.set(true);
    }

    /// Whether both handles refer to the same value.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ============================================================================
    // Payload
    // ============================================================================

    /// The value's payload.
    ///
    /// Bridged values compute it on every call; collections unwrap to a
    /// snapshot of their elements' payloads.
    pub fn internal_value(&self) -> Payload {
        match &*self.repr() {
            Repr::NoValue => Payload::Null,
            Repr::Basic(payload) | Repr::Aggregate { payload, .. } => payload.clone(),
            Repr::Property(binding) | Repr::AggregateProperty { binding, .. } => binding.read(),
            Repr::Field(binding) => binding.read_unchecked(),
            Repr::List(list) => list.borrow().payload(),
            Repr::Set(set) => set.borrow().payload(),
            Repr::Map(map) => map.borrow().payload(),
            Repr::Enum(variant) => variant.clone().map_or(Payload::Null, Payload::Variant),
            Repr::Function(callable) => callable.clone().map_or(Payload::Null, Payload::Callable),
            Repr::Prototype(proto) => Payload::Prototype(proto.clone()),
        }
    }

    /// Write the value's payload.
    ///
    /// Fails with [`ValueError::NotMutable`] if the value is immutable. On
    /// success the value is marked dirty. `Ok(false)` is only returned by
    /// property-bridged values whose accessor rejected the write.
    pub fn set_internal_value(&self, payload: Payload) -> Result<bool, ValueError> {
        if !self.is_mutable() {
            return Err(ValueError::NotMutable {
                ty: self.ty().type_name(),
            });
        }
        let ty = self.ty();
        let mut repr = self.repr_mut();
        match &mut *repr {
            Repr::NoValue => {
                return Err(ValueError::NotMutable {
                    ty: ty.type_name(),
                });
            }
            Repr::Basic(current) | Repr::Aggregate { payload: current, .. } => *current = payload,
            Repr::Property(binding) | Repr::AggregateProperty { binding, .. } => {
                if let Err(err) = binding.write(payload) {
                    tracing::debug!(%err, ty = %ty, "property write rejected");
                    return Ok(false);
                }
            }
            Repr::Field(binding) => {
                if let Err(err) = binding.write_unchecked(payload) {
                    tracing::debug!(%err, ty = %ty, "field write rejected");
                    return Ok(false);
                }
            }
            Repr::List(list) => list.borrow_mut().assign(&ty, payload)?,
            Repr::Set(set) => set.borrow_mut().assign(&ty, payload)?,
            Repr::Map(map) => map.borrow_mut().assign(&ty, payload)?,
            Repr::Enum(variant) => match payload {
                Payload::Null => *variant = None,
                Payload::Variant(v) => *variant = Some(v),
                other => return Err(mismatch(&ty, &other)),
            },
            Repr::Function(callable) => match payload {
                Payload::Null => *callable = None,
                Payload::Callable(c) => *callable = Some(c),
                other => return Err(mismatch(&ty, &other)),
            },
            Repr::Prototype(proto) => match payload {
                Payload::Prototype(p) => *proto = p,
                other => return Err(mismatch(&ty, &other)),
            },
        }
        drop(repr);
        self.set_dirty();
        Ok(true)
    }

    /// Assign `other` to this value.
    ///
    /// Both values must have equal type descriptors. Aggregates adopt the
    /// source's member space, collections alias the source's container,
    /// function values take over the callable. Everything else copies the
    /// source's payload.
    pub fn set_from(&self, other: &Value, spaces: &mut Spaces) -> Result<bool, ValueError> {
        let (ty, other_ty) = (self.ty(), other.ty());
        if ty != other_ty {
            return Err(ValueError::IncompatibleType {
                expected: ty.type_name(),
                found: other_ty.type_name(),
            });
        }
        if self.ptr_eq(other) {
            return Ok(true);
        }
        if !self.is_mutable() {
            return Err(ValueError::NotMutable {
                ty: ty.type_name(),
            });
        }

        let source = other.repr().clone();
        match (self.kind(), source) {
            (ValueKind::Aggregate, Repr::Aggregate { payload, space }) => {
                self.set_memory_space(spaces, space)?;
                if let Repr::Aggregate { payload: current, .. } = &mut *self.repr_mut() {
                    *current = payload;
                }
            }
            (ValueKind::List, source @ Repr::List(_))
            | (ValueKind::Set, source @ Repr::Set(_))
            | (ValueKind::Map, source @ Repr::Map(_))
            | (ValueKind::Function, source @ Repr::Function(_)) => {
                *self.repr_mut() = source;
            }
            _ => return self.set_internal_value(other.internal_value()),
        }
        self.set_dirty();
        Ok(true)
    }

    /// A new value with the same type, flags and payload references.
    ///
    /// Nothing is copied: an aggregate view shares the member space, a
    /// collection view shares the container. Mutations through either
    /// handle are visible through the other.
    pub fn shallow_view(&self) -> Value {
        let view = Value::from_repr(self.ty(), self.is_mutable(), self.repr().clone());
        view.0.dirty.set(self.is_dirty());
        view
    }

    /// A fully independent copy.
    ///
    /// Aggregates get a fresh member space (chained to the same parent)
    /// holding deep copies of their members; collections get new containers
    /// of deep-copied elements. Host objects, callables and prototypes are
    /// shared, they are references by nature.
    pub fn deep_copy(&self, spaces: &mut Spaces) -> Result<Value, ValueError> {
        if self.is_none() {
            return Ok(self.clone());
        }
        let repr = self.repr().clone();
        let copy = match repr {
            Repr::Aggregate { payload, space } => {
                return self.deep_copy_aggregate(spaces, payload, space);
            }
            Repr::List(list) => {
                let copied = list.borrow().deep_copy(spaces)?;
                Repr::List(Rc::new(RefCell::new(copied)))
            }
            Repr::Set(set) => {
                let copied = set.borrow().deep_copy(spaces)?;
                Repr::Set(Rc::new(RefCell::new(copied)))
            }
            Repr::Map(map) => {
                let copied = map.borrow().deep_copy(spaces)?;
                Repr::Map(Rc::new(RefCell::new(copied)))
            }
            other => other,
        };
        let value = Value::from_repr(self.ty(), self.is_mutable(), copy);
        value.0.dirty.set(self.is_dirty());
        Ok(value)
    }

    // ============================================================================
    // Member space
    // ============================================================================

    /// The space used for member access on this value.
    ///
    /// Aggregates return the space they own. Property-backed aggregates
    /// translate their current host payload on every call and free the
    /// previous translation, so the returned id is only valid until the
    /// next call. All other values get the arena's shared self space,
    /// which binds [`THIS_NAME`] to the latest caller.
    pub fn memory_space(&self, spaces: &mut Spaces) -> Result<SpaceId, ValueError> {
        let bridged = match &*self.repr() {
            Repr::NoValue => return Ok(spaces.empty_space()),
            Repr::Aggregate { space, .. } => return Ok(*space),
            Repr::AggregateProperty {
                binding,
                parent,
                translator,
            } => Some((binding.read(), *parent, translator.clone())),
            _ => None,
        };
        let Some((payload, parent, translator)) = bridged else {
            return spaces.self_space(self.clone());
        };

        let space = if payload.is_null() {
            spaces.empty_space()
        } else {
            translator
                .translate(&payload, parent, spaces)
                .and_then(|translated| translated.memory_space(spaces))?
        };
        if let Some(previous) = self.0.translated.get()
            && previous != space
        {
            spaces.free_subtree(previous);
        }
        let owned = space != spaces.empty_space();
        self.0.translated.set(owned.then_some(space));
        Ok(space)
    }

    /// Free the last host translation of a property-backed aggregate.
    ///
    /// Values read out of it stay usable, but their members go with it.
    /// Does nothing for other values.
    pub fn release_translation(&self, spaces: &mut Spaces) {
        if let Some(space) = self.0.translated.take() {
            spaces.free_subtree(space);
        }
    }

    /// Whether the value holds nothing.
    ///
    /// An aggregate is empty if its payload is null and its space binds
    /// nothing except itself and function values. A function value is empty
    /// without a callable, a collection without elements.
    pub fn is_empty(&self, spaces: &Spaces) -> bool {
        match &*self.repr() {
            Repr::NoValue => true,
            Repr::Aggregate { payload, space } => {
                payload.is_null()
                    && spaces.get(*space).is_none_or(|space| {
                        space
                            .entries()
                            .all(|(name, value)| {
                                name.as_str() == THIS_NAME || value.kind() == ValueKind::Function
                            })
                    })
            }
            Repr::List(list) => list.borrow().is_empty(),
            Repr::Set(set) => set.borrow().is_empty(),
            Repr::Map(map) => map.borrow().is_empty(),
            Repr::Enum(variant) => variant.is_none(),
            Repr::Function(callable) => callable.is_none(),
            Repr::Prototype(_) => false,
            _ => self.internal_value().is_null(),
        }
    }
}

pub(crate) fn mismatch(ty: &Ty, payload: &Payload) -> ValueError {
    ValueError::PayloadMismatch {
        ty: ty.type_name(),
        payload: payload.kind_name(),
    }
}

impl PartialEq for Value {
    /// Value equality as seen by interpreted code.
    ///
    /// `none` is never equal to anything and a value is always equal to
    /// itself. Otherwise both payloads must be non-null and equal, after
    /// equal types (encapsulated fields skip the type check). Aggregates
    /// must also share their member space. Collections compare elements
    /// and prototypes compare template identity instead of payloads.
    fn eq(&self, other: &Self) -> bool {
        if self.is_none() || other.is_none() {
            return false;
        }
        if self.ptr_eq(other) {
            return true;
        }
        // Encapsulated fields compare unwrapped payloads only.
        if self.kind() == ValueKind::EncapsulatedField
            || other.kind() == ValueKind::EncapsulatedField
        {
            let (p1, p2) = (self.internal_value(), other.internal_value());
            return !p1.is_null() && p1 == p2;
        }
        if self.ty() != other.ty() {
            return false;
        }
        let (a, b) = (self.repr(), other.repr());
        match (&*a, &*b) {
            (
                Repr::Aggregate {
                    payload: p1,
                    space: s1,
                },
                Repr::Aggregate {
                    payload: p2,
                    space: s2,
                },
            ) => s1 == s2 && !p1.is_null() && !p2.is_null() && p1 == p2,
            (Repr::List(l1), Repr::List(l2)) => Rc::ptr_eq(l1, l2) || *l1.borrow() == *l2.borrow(),
            (Repr::Set(s1), Repr::Set(s2)) => Rc::ptr_eq(s1, s2) || *s1.borrow() == *s2.borrow(),
            (Repr::Map(m1), Repr::Map(m2)) => Rc::ptr_eq(m1, m2) || *m1.borrow() == *m2.borrow(),
            _ => {
                drop((a, b));
                let (p1, p2) = (self.internal_value(), other.internal_value());
                !p1.is_null() && !p2.is_null() && p1 == p2
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("kind", &self.kind())
            .field("ty", &self.ty())
            .field("mutable", &self.is_mutable())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

