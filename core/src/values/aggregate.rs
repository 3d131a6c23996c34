//! Aggregate values: struct-like values backed by their own member space.
//!
//! An aggregate's space is created at construction, chained to the scope of
//! the definition site, and binds [`THIS_NAME`] to the aggregate itself.
//! Members are ordinary bindings in that space.

use dungeon_dsl_types::{DataType, Ty};

use super::payload::Payload;
use super::value::{Repr, THIS_NAME};
use crate::{SpaceId, Spaces, Value, ValueError};

impl Value {
    /// A new aggregate with a null payload whose space is chained to `parent`.
    pub fn aggregate(spaces: &mut Spaces, ty: Ty, parent: SpaceId) -> Result<Value, ValueError> {
        Self::aggregate_with_payload(spaces, ty, parent, Payload::Null)
    }

    pub fn aggregate_with_payload(
        spaces: &mut Spaces,
        ty: Ty,
        parent: SpaceId,
        payload: Payload,
    ) -> Result<Value, ValueError> {
        let space = spaces.new_space(Some(parent))?;
        let value = Value::from_repr(ty, true, Repr::Aggregate { payload, space });
        spaces.bind(space, THIS_NAME, value.clone());
        Ok(value)
    }

    /// Re-home an aggregate into `space`.
    ///
    /// Any existing self-binding in `space` is replaced by one pointing at
    /// this value. The previous space is left as is; freeing it is up to its
    /// owner.
    pub fn set_memory_space(&self, spaces: &mut Spaces, space: SpaceId) -> Result<(), ValueError> {
        if !spaces.contains(space) {
            return Err(ValueError::UnknownSpace);
        }
        match &mut *self.repr_mut() {
            Repr::Aggregate { space: current, .. } => *current = space,
            _ => {
                return Err(ValueError::NotAggregate {
                    ty: self.ty().type_name(),
                });
            }
        }
        spaces.unbind(space, THIS_NAME);
        spaces.bind(space, THIS_NAME, self.clone());
        Ok(())
    }

    /// Local member `name` of the value's member space, or `none`.
    pub fn member(&self, spaces: &mut Spaces, name: &str) -> Result<Value, ValueError> {
        let space = self.memory_space(spaces)?;
        Ok(spaces.lookup_local(space, name).unwrap_or_else(Value::none))
    }

    pub(crate) fn deep_copy_aggregate(
        &self,
        spaces: &mut Spaces,
        payload: Payload,
        space: SpaceId,
    ) -> Result<Value, ValueError> {
        let parent = spaces.get(space).and_then(|s| s.parent());
        let members = spaces.entries(space);
        let new_space = spaces.new_space(parent)?;
        let copy = Value::from_repr(
            self.ty(),
            self.is_mutable(),
            Repr::Aggregate {
                payload,
                space: new_space,
            },
        );
        spaces.bind(new_space, THIS_NAME, copy.clone());
        for (name, member) in members {
            if name.as_str() == THIS_NAME {
                continue;
            }
            let member = member.deep_copy(spaces)?;
            spaces.bind(new_space, &name, member);
        }
        if self.is_dirty() {
            copy.set_dirty();
        }
        Ok(copy)
    }
}
