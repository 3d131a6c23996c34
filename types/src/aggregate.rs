//! Nominal types: aggregates (structs, entity and component types) and enums.
//!
//! Both are compared by name. The semantic analyzer guarantees that a name
//! denotes exactly one definition, so two descriptors with the same name are
//! the same type.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use ecow::EcoString;

use crate::Ty;

/// How a member of an aggregate type is backed at runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A plain stored member (or a reflected field of a host object).
    Field,
    /// A computed member, read and written through a property accessor.
    Property,
}

/// A named member in an aggregate type's symbol table.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberSymbol {
    pub name: EcoString,
    pub ty: Ty,
    pub kind: MemberKind,
}

impl MemberSymbol {
    pub fn field(name: impl Into<EcoString>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: MemberKind::Field,
        }
    }

    pub fn property(name: impl Into<EcoString>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: MemberKind::Property,
        }
    }
}

struct AggregateData {
    name: EcoString,
    members: Vec<MemberSymbol>,
    adapted: bool,
}

/// An aggregate (struct-like) type with a member symbol table.
///
/// An *adapted* aggregate is a host type that the DSL cannot construct
/// member-wise and only ever sees through a translator.
#[derive(Clone)]
pub struct AggregateType(Rc<AggregateData>);

impl AggregateType {
    pub fn new(
        name: impl Into<EcoString>,
        members: impl IntoIterator<Item = MemberSymbol>,
    ) -> Self {
        Self(Rc::new(AggregateData {
            name: name.into(),
            members: members.into_iter().collect(),
            adapted: false,
        }))
    }

    pub fn adapted(
        name: impl Into<EcoString>,
        members: impl IntoIterator<Item = MemberSymbol>,
    ) -> Self {
        Self(Rc::new(AggregateData {
            name: name.into(),
            members: members.into_iter().collect(),
            adapted: true,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_adapted(&self) -> bool {
        self.0.adapted
    }

    pub fn members(&self) -> &[MemberSymbol] {
        &self.0.members
    }

    /// Look up a member by name.
    pub fn resolve(&self, name: &str) -> Option<&MemberSymbol> {
        self.0.members.iter().find(|m| m.name == name)
    }
}

impl PartialEq for AggregateType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for AggregateType {}

impl Hash for AggregateType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateType")
            .field("name", &self.0.name)
            .field("members", &self.0.members.len())
            .finish()
    }
}

struct EnumData {
    name: EcoString,
    variants: Vec<EcoString>,
}

/// An enum type: a name plus an ordered list of variant names.
#[derive(Clone)]
pub struct EnumType(Rc<EnumData>);

impl EnumType {
    pub fn new(
        name: impl Into<EcoString>,
        variants: impl IntoIterator<Item = impl Into<EcoString>>,
    ) -> Self {
        Self(Rc::new(EnumData {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn variants(&self) -> impl Iterator<Item = Variant> + '_ {
        (0..self.0.variants.len()).map(|index| Variant {
            owner: self.clone(),
            index,
        })
    }

    /// Resolve a variant symbol by name.
    pub fn variant(&self, name: &str) -> Option<Variant> {
        self.0
            .variants
            .iter()
            .position(|v| v == name)
            .map(|index| Variant {
                owner: self.clone(),
                index,
            })
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for EnumType {}

impl Hash for EnumType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumType").field(&self.0.name).finish()
    }
}

/// A variant symbol of an enum type. Identity is (enum type, position).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    owner: EnumType,
    index: usize,
}

impl Variant {
    pub fn owner(&self) -> &EnumType {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.owner.0.variants[self.index]
    }

    pub fn ordinal(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.name(), self.name())
    }
}
