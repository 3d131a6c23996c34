//! Internal payloads carried by values.
//!
//! A payload is plain data: it never contains a [`Value`](super::Value).
//! Collections unwrap to payload snapshots of their elements, which is what
//! set and map duplicate detection and structural equality work on.

use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::hash::DefaultHasher;
use std::rc::Rc;

use dungeon_dsl_types::Variant;
use ecow::EcoString;

use super::function::Callable;
use super::prototype::Prototype;

/// A live object owned by the host application.
///
/// Compared and hashed by identity. Host types that need to be written
/// through property accessors keep their state in `Cell`/`RefCell`.
#[derive(Clone)]
pub struct HostObject(Rc<dyn Any>);

impl HostObject {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn from_rc(rc: Rc<dyn Any>) -> Self {
        Self(rc)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObject({:p})", self.addr())
    }
}

/// Task dependency graph, the payload of `graph` values.
///
/// Graph construction belongs to the task subsystem; the value model only
/// needs an empty placeholder as the default of the `graph` type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<EcoString>,
    pub edges: Vec<(usize, usize)>,
}

impl Graph {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub enum Payload {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(EcoString),
    Graph(Rc<Graph>),
    Variant(Variant),
    Callable(Rc<dyn Callable>),
    Prototype(Prototype),
    Host(HostObject),
    List(Rc<[Payload]>),
    Set(Rc<[Payload]>),
    Map(Rc<[(Payload, Payload)]>),
}

impl Payload {
    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Payload::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Payload::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Payload::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&HostObject> {
        match self {
            Payload::Host(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&Variant> {
        match self {
            Payload::Variant(v) => Some(v),
            _ => None,
        }
    }

    /// Short name of the payload's shape, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::Null => "null",
            Payload::Bool(_) => "bool",
            Payload::Int(_) => "int",
            Payload::Float(_) => "float",
            Payload::Str(_) => "string",
            Payload::Graph(_) => "graph",
            Payload::Variant(_) => "enum variant",
            Payload::Callable(_) => "callable",
            Payload::Prototype(_) => "prototype",
            Payload::Host(_) => "host object",
            Payload::List(_) => "list",
            Payload::Set(_) => "set",
            Payload::Map(_) => "map",
        }
    }
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// Order-independent hash of a collection of hashable items.
fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Null, Payload::Null) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::Float(a), Payload::Float(b)) => float_eq(*a, *b),
            (Payload::Str(a), Payload::Str(b)) => a == b,
            (Payload::Graph(a), Payload::Graph(b)) => Rc::ptr_eq(a, b),
            (Payload::Variant(a), Payload::Variant(b)) => a == b,
            (Payload::Callable(a), Payload::Callable(b)) => Rc::ptr_eq(a, b),
            (Payload::Prototype(a), Payload::Prototype(b)) => a.ptr_eq(b),
            (Payload::Host(a), Payload::Host(b)) => a.ptr_eq(b),
            (Payload::List(a), Payload::List(b)) => a == b,
            // Sets and maps are duplicate-free, so equal length plus
            // containment in one direction is enough.
            (Payload::Set(a), Payload::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Payload::Map(a), Payload::Map(b)) => {
                a.len() == b.len() && a.iter().all(|entry| b.contains(entry))
            }
            _ => false,
        }
    }
}

impl Eq for Payload {}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Payload::Null => {}
            Payload::Bool(v) => v.hash(state),
            Payload::Int(v) => v.hash(state),
            Payload::Float(v) => float_bits(*v).hash(state),
            Payload::Str(s) => s.hash(state),
            Payload::Graph(g) => (Rc::as_ptr(g) as *const ()).hash(state),
            Payload::Variant(v) => v.hash(state),
            Payload::Callable(c) => (Rc::as_ptr(c) as *const ()).hash(state),
            Payload::Prototype(p) => p.addr().hash(state),
            Payload::Host(h) => h.addr().hash(state),
            Payload::List(items) => items.hash(state),
            Payload::Set(items) => unordered_hash(items.iter()).hash(state),
            Payload::Map(entries) => unordered_hash(entries.iter()).hash(state),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => write!(f, "Null"),
            Payload::Bool(v) => write!(f, "Bool({v})"),
            Payload::Int(v) => write!(f, "Int({v})"),
            Payload::Float(v) => write!(f, "Float({v})"),
            Payload::Str(s) => write!(f, "Str({s:?})"),
            Payload::Graph(g) => write!(f, "Graph({} nodes)", g.nodes.len()),
            Payload::Variant(v) => write!(f, "Variant({v})"),
            Payload::Callable(c) => write!(f, "Callable({})", c.name()),
            Payload::Prototype(p) => write!(f, "Prototype({})", p.name()),
            Payload::Host(h) => write!(f, "{h:?}"),
            Payload::List(items) => f.debug_tuple("List").field(items).finish(),
            Payload::Set(items) => f.debug_tuple("Set").field(items).finish(),
            Payload::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
        }
    }
}

impl From<bool> for Payload {
    fn from(v: bool) -> Self {
        Payload::Bool(v)
    }
}

impl From<i64> for Payload {
    fn from(v: i64) -> Self {
        Payload::Int(v)
    }
}

impl From<f64> for Payload {
    fn from(v: f64) -> Self {
        Payload::Float(v)
    }
}

impl From<&str> for Payload {
    fn from(v: &str) -> Self {
        Payload::Str(v.into())
    }
}

impl From<EcoString> for Payload {
    fn from(v: EcoString) -> Self {
        Payload::Str(v)
    }
}

impl From<Variant> for Payload {
    fn from(v: Variant) -> Self {
        Payload::Variant(v)
    }
}

impl From<HostObject> for Payload {
    fn from(v: HostObject) -> Self {
        Payload::Host(v)
    }
}
