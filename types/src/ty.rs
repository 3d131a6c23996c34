use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt::{self, Write};
use core::hash::{Hash, Hasher};

use ecow::EcoString;

use crate::{AggregateType, EnumType, MemberSymbol, Scalar};

/// The two builtin types prototype values can have.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrototypeKind {
    /// `prototype`: templates for game objects (`entity_type` definitions).
    Entity,
    /// `item_prototype`: templates for items (`item_type` definitions).
    Item,
}

/// Logical structure of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The type of the absent value.
    NoType,

    /// Basic types (bool, int, float, string, graph)
    Scalar(Scalar),

    /// Struct-like type with named members.
    Aggregate(AggregateType),

    /// Ordered, growable list (`int[]`).
    List(Ty),

    /// Duplicate-free set (`int<>`).
    Set(Ty),

    /// Map with key and element types (`[int -> string]`).
    Map(Ty, Ty),

    /// Function type with parameters and return type.
    Function { params: Rc<[Ty]>, ret: Ty },

    /// Enum type with named variants.
    Enum(EnumType),

    /// The type of prototype values.
    Prototype(PrototypeKind),
}

/// Coarse classification of a type, shared by every kind of type descriptor
/// (including prototype values, which act as types themselves).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    NoType,
    Basic,
    Aggregate,
    AggregateAdapted,
    List,
    Set,
    Map,
    Function,
    Enum,
    Prototype,
}

/// Anything that can stand in as a data type: has a name and a kind.
pub trait DataType {
    fn type_name(&self) -> EcoString;
    fn type_kind(&self) -> Kind;
}

/// Handle to a type descriptor.
///
/// Cheap to clone. Two handles are equal if they point to the same
/// descriptor, or if their structure is equal (aggregates and enums are
/// compared by name).
#[derive(Clone)]
pub struct Ty(Rc<TypeKind>);

impl Ty {
    pub fn new(kind: TypeKind) -> Self {
        Self(Rc::new(kind))
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn no_type() -> Self {
        Self::new(TypeKind::NoType)
    }

    pub fn int() -> Self {
        Self::new(TypeKind::Scalar(Scalar::Int))
    }

    pub fn float() -> Self {
        Self::new(TypeKind::Scalar(Scalar::Float))
    }

    pub fn bool() -> Self {
        Self::new(TypeKind::Scalar(Scalar::Bool))
    }

    pub fn string() -> Self {
        Self::new(TypeKind::Scalar(Scalar::Str))
    }

    pub fn graph() -> Self {
        Self::new(TypeKind::Scalar(Scalar::Graph))
    }

    pub fn list(elem: Ty) -> Self {
        Self::new(TypeKind::List(elem))
    }

    pub fn set(elem: Ty) -> Self {
        Self::new(TypeKind::Set(elem))
    }

    pub fn map(key: Ty, elem: Ty) -> Self {
        Self::new(TypeKind::Map(key, elem))
    }

    pub fn function(params: impl IntoIterator<Item = Ty>, ret: Ty) -> Self {
        let params: Vec<Ty> = params.into_iter().collect();
        Self::new(TypeKind::Function {
            params: params.into(),
            ret,
        })
    }

    pub fn aggregate(ty: AggregateType) -> Self {
        Self::new(TypeKind::Aggregate(ty))
    }

    pub fn enumeration(ty: EnumType) -> Self {
        Self::new(TypeKind::Enum(ty))
    }

    pub fn prototype() -> Self {
        Self::new(TypeKind::Prototype(PrototypeKind::Entity))
    }

    pub fn item_prototype() -> Self {
        Self::new(TypeKind::Prototype(PrototypeKind::Item))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_no_type(&self) -> bool {
        matches!(self.kind(), TypeKind::NoType)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind(), TypeKind::Scalar(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind(), TypeKind::Aggregate(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind(), TypeKind::Function { .. })
    }

    pub fn as_aggregate(&self) -> Option<&AggregateType> {
        match self.kind() {
            TypeKind::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self.kind() {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Element type of a list or set, element (value) type of a map.
    pub fn element_type(&self) -> Option<&Ty> {
        match self.kind() {
            TypeKind::List(elem) | TypeKind::Set(elem) | TypeKind::Map(_, elem) => Some(elem),
            _ => None,
        }
    }

    pub fn key_type(&self) -> Option<&Ty> {
        match self.kind() {
            TypeKind::Map(key, _) => Some(key),
            _ => None,
        }
    }

    pub fn return_type(&self) -> Option<&Ty> {
        match self.kind() {
            TypeKind::Function { ret, .. } => Some(ret),
            _ => None,
        }
    }

    /// Resolve a member of an aggregate type.
    pub fn member(&self, name: &str) -> Option<&MemberSymbol> {
        self.as_aggregate().and_then(|agg| agg.resolve(name))
    }
}

impl PartialEq for Ty {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Ty {}

impl Hash for Ty {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty({})", self)
    }
}

impl DataType for Ty {
    fn type_name(&self) -> EcoString {
        match self.kind() {
            TypeKind::Aggregate(agg) => agg.name().into(),
            TypeKind::Enum(e) => e.name().into(),
            _ => {
                let mut name = EcoString::new();
                let _ = write!(name, "{self}");
                name
            }
        }
    }

    fn type_kind(&self) -> Kind {
        match self.kind() {
            TypeKind::NoType => Kind::NoType,
            TypeKind::Scalar(_) => Kind::Basic,
            TypeKind::Aggregate(agg) if agg.is_adapted() => Kind::AggregateAdapted,
            TypeKind::Aggregate(_) => Kind::Aggregate,
            TypeKind::List(_) => Kind::List,
            TypeKind::Set(_) => Kind::Set,
            TypeKind::Map(_, _) => Kind::Map,
            TypeKind::Function { .. } => Kind::Function,
            TypeKind::Enum(_) => Kind::Enum,
            TypeKind::Prototype(_) => Kind::Prototype,
        }
    }
}
