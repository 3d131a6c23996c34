//! Default values for declarations without an initializer.

use std::rc::Rc;

use dungeon_dsl_types::{Scalar, Ty, TypeKind};

use super::payload::{Graph, Payload};
use crate::{SpaceId, Spaces, Value, ValueError};

/// Canonical zero payload of a basic type.
///
/// `int`, `float`, `string` and `graph` have one; every other type, `bool`
/// included, has none and gets [`Payload::Null`].
pub fn default_payload(ty: &Ty) -> Payload {
    match ty.kind() {
        TypeKind::Scalar(Scalar::Int) => Payload::Int(0),
        TypeKind::Scalar(Scalar::Float) => Payload::Float(0.0),
        TypeKind::Scalar(Scalar::Str) => Payload::Str("".into()),
        TypeKind::Scalar(Scalar::Graph) => Payload::Graph(Rc::new(Graph::empty())),
        _ => Payload::Null,
    }
}

impl Value {
    /// A complete default value of type `ty`, chained to `parent` where a
    /// member space is needed.
    ///
    /// Aggregates get every declared member bound to its own default, so a
    /// self-containing aggregate type fails with
    /// [`ValueError::ScopeDepthExceeded`] instead of recursing forever. On
    /// failure every space built so far is freed again.
    /// Adapted aggregates are only ever populated by the host and start out
    /// without members.
    pub fn default_for(ty: &Ty, spaces: &mut Spaces, parent: SpaceId) -> Result<Value, ValueError> {
        let value = match ty.kind() {
            TypeKind::NoType => Value::none(),
            TypeKind::Scalar(_) => Value::new(ty.clone(), default_payload(ty)),
            TypeKind::Aggregate(agg) => {
                let value = Value::aggregate(spaces, ty.clone(), parent)?;
                if !agg.is_adapted() {
                    let space = value.memory_space(spaces)?;
                    for member in agg.members() {
                        match Value::default_for(&member.ty, spaces, space) {
                            Ok(default) => {
                                spaces.bind(space, &member.name, default);
                            }
                            Err(err) => {
                                spaces.free_subtree(space);
                                return Err(err);
                            }
                        }
                    }
                }
                value
            }
            TypeKind::List(_) => Value::list(ty.clone()),
            TypeKind::Set(_) => Value::set(ty.clone()),
            TypeKind::Map(_, _) => Value::map(ty.clone()),
            TypeKind::Enum(_) => Value::enum_value(ty.clone(), None),
            TypeKind::Function { .. } => Value::empty_function(ty.clone()),
            TypeKind::Prototype(_) => Value::prototype(ty.clone(), None),
        };
        Ok(value)
    }
}
