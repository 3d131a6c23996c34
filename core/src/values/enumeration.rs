//! Enum values.
//!
//! An enum value holds one variant symbol of its enum type, or nothing. Two
//! enum values are equal when they hold the same variant.

use dungeon_dsl_types::{Ty, Variant};

use super::value::Repr;
use crate::Value;

impl Value {
    /// A mutable enum value of type `ty` holding `variant`.
    pub fn enum_value(ty: Ty, variant: Option<Variant>) -> Self {
        Self::from_repr(ty, true, Repr::Enum(variant))
    }

    /// Value of enum type `ty` holding the variant called `name`, if it exists.
    pub fn variant(ty: Ty, name: &str) -> Option<Self> {
        let variant = ty.as_enum()?.variant(name)?;
        Some(Self::enum_value(ty, Some(variant)))
    }

    pub fn as_variant(&self) -> Option<Variant> {
        match &*self.repr() {
            Repr::Enum(variant) => variant.clone(),
            _ => None,
        }
    }
}
