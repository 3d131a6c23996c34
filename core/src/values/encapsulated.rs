//! Host objects wrapped as aggregates.
//!
//! [`encapsulate`] turns a host object into an aggregate value whose member
//! space is populated from a [`HostSchema`]: the host tells which accessor
//! backs which member, the aggregate type tells how each member is exposed.
//!
//! | member kind | member type | exposed as |
//! |-------------|-------------|------------|
//! | field       | aggregate   | translated aggregate (skipped while null) |
//! | field       | other       | encapsulated field |
//! | property    | aggregate   | aggregate-property value |
//! | property    | other       | property value |

use std::rc::Rc;

use dungeon_dsl_types::{DataType, MemberKind, Ty};

use super::payload::{HostObject, Payload};
use super::property::{PropertyAccessor, PropertyBinding, RuntimeObjectTranslator};
use crate::{SpaceId, Spaces, Value, ValueError};

/// Describes how a host type's members are reached.
pub trait HostSchema {
    /// Accessor of the plain field backing member `name`.
    fn field(&self, name: &str) -> Option<Rc<dyn PropertyAccessor>>;

    /// Accessor of the computed property backing member `name`.
    fn property(&self, name: &str) -> Option<Rc<dyn PropertyAccessor>>;
}

/// Wrap `host` as an aggregate of type `ty` chained to `parent`.
///
/// Members the schema has no accessor for are left unbound.
pub fn encapsulate(
    spaces: &mut Spaces,
    host: HostObject,
    ty: &Ty,
    schema: &dyn HostSchema,
    translator: Rc<dyn RuntimeObjectTranslator>,
    parent: SpaceId,
) -> Result<Value, ValueError> {
    let agg = ty.as_aggregate().ok_or_else(|| ValueError::NotAggregate {
        ty: ty.type_name(),
    })?;
    let payload = Payload::Host(host.clone());
    let value = Value::aggregate_with_payload(spaces, ty.clone(), parent, payload)?;
    let space = value.memory_space(spaces)?;

    for symbol in agg.members() {
        let name = symbol.name.as_str();
        let member_ty = symbol.ty.clone();
        let member = match symbol.kind {
            MemberKind::Field => {
                let Some(accessor) = schema.field(name) else {
                    tracing::debug!(ty = %ty, member = name, "no host field for member");
                    continue;
                };
                let binding = PropertyBinding::new(accessor, host.clone());
                if member_ty.is_aggregate() {
                    let payload = binding.read_unchecked();
                    if payload.is_null() {
                        continue;
                    }
                    translator.translate(&payload, space, spaces)?
                } else {
                    Value::encapsulated_field(member_ty, binding)
                }
            }
            MemberKind::Property => {
                let Some(accessor) = schema.property(name) else {
                    tracing::debug!(ty = %ty, member = name, "no host property for member");
                    continue;
                };
                let binding = PropertyBinding::new(accessor, host.clone());
                if member_ty.is_aggregate() {
                    Value::aggregate_property(member_ty, binding, space, translator.clone(), true)
                } else {
                    Value::property(member_ty, binding, true)
                }
            }
        };
        spaces.bind(space, name, member);
    }
    Ok(value)
}
