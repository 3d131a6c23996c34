//! Memory spaces: chained, name-keyed binding tables.
//!
//! Spaces are stored in an arena ([`Spaces`]) and addressed by [`SpaceId`].
//! A space's parent is just another id in the same arena and is used for
//! lookup only: freeing a child never touches the parent, and a lookup whose
//! parent has been freed simply stops there.
//!
//! ```text
//! global ◄── file ◄── function call ◄── block
//!   ▲
//!   └──────── aggregate instance (parent = scope at definition site)
//! ```
//!
//! Reads fall through to the parent chain, writes always target the local
//! table.

use ecow::EcoString;
use hashbrown::HashMap;
use slotmap::SlotMap;

use crate::values::THIS_NAME;
use crate::{RuntimeOptions, Value, ValueError};

slotmap::new_key_type! {
    /// Handle to a memory space in a [`Spaces`] arena.
    pub struct SpaceId;
}

/// A single scope: local bindings plus an optional parent.
#[derive(Debug, Default)]
pub struct MemorySpace {
    bindings: HashMap<EcoString, Value>,
    parent: Option<SpaceId>,
    depth: usize,
}

impl MemorySpace {
    pub fn parent(&self) -> Option<SpaceId> {
        self.parent
    }

    /// Number of spaces in the parent chain above this one.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Local binding only, no parent lookup.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Local bindings (inherited ones are not included).
    pub fn entries(&self) -> impl Iterator<Item = (&EcoString, &Value)> {
        self.bindings.iter()
    }
}

/// Arena owning every memory space of an interpreter run.
///
/// A shared, always-empty space is allocated up front. It is handed out
/// wherever a member space is requested from something that has no members
/// (the `none` value, a property-backed aggregate whose host payload is null)
/// and it refuses all bindings.
///
/// A second shared space, allocated on first use, is the member space of
/// values that own none (see [`Value::memory_space`]).
#[derive(Debug)]
pub struct Spaces {
    arena: SlotMap<SpaceId, MemorySpace>,
    empty: SpaceId,
    self_space: Option<SpaceId>,
    options: RuntimeOptions,
}

impl Spaces {
    pub fn new() -> Self {
        Self::with_options(RuntimeOptions::default())
    }

    pub fn with_options(options: RuntimeOptions) -> Self {
        let mut arena = SlotMap::with_key();
        let empty = arena.insert(MemorySpace::default());
        Self {
            arena,
            empty,
            self_space: None,
            options,
        }
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// The shared empty space.
    pub fn empty_space(&self) -> SpaceId {
        self.empty
    }

    /// Allocate a new space, optionally chained to `parent`.
    pub fn new_space(&mut self, parent: Option<SpaceId>) -> Result<SpaceId, ValueError> {
        let depth = match parent {
            Some(parent) => {
                let parent = self.arena.get(parent).ok_or(ValueError::UnknownSpace)?;
                parent.depth + 1
            }
            None => 0,
        };
        if depth > self.options.max_scope_depth {
            return Err(ValueError::ScopeDepthExceeded {
                depth,
                max_depth: self.options.max_scope_depth,
            });
        }
        Ok(self.arena.insert(MemorySpace {
            bindings: HashMap::new(),
            parent,
            depth,
        }))
    }

    /// Release a space. Values bound in it are dropped with it; spaces that
    /// use it as a parent are left alone. The shared empty space cannot be freed.
    pub fn free(&mut self, id: SpaceId) -> Option<MemorySpace> {
        if id == self.empty {
            return None;
        }
        self.arena.remove(id)
    }

    /// Release `id` and every space whose parent chain runs through it.
    ///
    /// Returns the number of spaces freed. The shared spaces are never freed
    /// this way.
    pub fn free_subtree(&mut self, id: SpaceId) -> usize {
        if id == self.empty || Some(id) == self.self_space || !self.arena.contains_key(id) {
            return 0;
        }
        let doomed: Vec<SpaceId> = self
            .arena
            .keys()
            .filter(|&candidate| self.descends_from(candidate, id))
            .collect();
        for space in &doomed {
            self.arena.remove(*space);
        }
        tracing::trace!(freed = doomed.len(), "free subtree");
        doomed.len()
    }

    fn descends_from(&self, mut id: SpaceId, ancestor: SpaceId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.arena.get(id).and_then(|space| space.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// The shared self space, rebound so that it holds only
    /// [`THIS_NAME`] bound to `value`.
    pub(crate) fn self_space(&mut self, value: Value) -> Result<SpaceId, ValueError> {
        let id = match self.self_space.filter(|id| self.arena.contains_key(*id)) {
            Some(id) => id,
            None => {
                let id = self.new_space(None)?;
                self.self_space = Some(id);
                id
            }
        };
        if let Some(space) = self.arena.get_mut(id) {
            space.bindings.clear();
            space.bindings.insert(THIS_NAME.into(), value);
        }
        Ok(id)
    }

    pub fn contains(&self, id: SpaceId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn get(&self, id: SpaceId) -> Option<&MemorySpace> {
        self.arena.get(id)
    }

    /// Number of live spaces, the shared empty space included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Bind `name` in the local table of `id`.
    ///
    /// Returns `false` if the name is already bound locally, or if the space
    /// does not accept bindings.
    pub fn bind(&mut self, id: SpaceId, name: &str, value: Value) -> bool {
        let Some(space) = self.writable(id) else {
            return false;
        };
        if space.bindings.contains_key(name) {
            tracing::trace!(name, "name already bound in space");
            return false;
        }
        space.bindings.insert(name.into(), value);
        true
    }

    /// Bind or rebind `name` in the local table of `id`.
    pub fn set(&mut self, id: SpaceId, name: &str, value: Value) -> bool {
        let Some(space) = self.writable(id) else {
            return false;
        };
        space.bindings.insert(name.into(), value);
        true
    }

    pub fn unbind(&mut self, id: SpaceId, name: &str) -> Option<Value> {
        let value = self.arena.get_mut(id)?.bindings.remove(name);
        tracing::trace!(name, removed = value.is_some(), "unbind");
        value
    }

    /// Look `name` up in `id`, then along the parent chain.
    pub fn lookup(&self, id: SpaceId, name: &str) -> Option<Value> {
        let mut current = Some(id);
        while let Some(space_id) = current {
            let space = self.arena.get(space_id)?;
            if let Some(value) = space.bindings.get(name) {
                return Some(value.clone());
            }
            current = space.parent;
        }
        tracing::trace!(name, "lookup miss");
        None
    }

    pub fn lookup_local(&self, id: SpaceId, name: &str) -> Option<Value> {
        self.arena.get(id)?.bindings.get(name).cloned()
    }

    /// Snapshot of the local bindings of `id`.
    pub fn entries(&self, id: SpaceId) -> Vec<(EcoString, Value)> {
        self.arena
            .get(id)
            .map(|space| {
                space
                    .bindings
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn writable(&mut self, id: SpaceId) -> Option<&mut MemorySpace> {
        if id == self.empty {
            tracing::debug!("refusing to bind into the shared empty space");
            return None;
        }
        let space = self.arena.get_mut(id);
        if space.is_none() {
            tracing::warn!(?id, "write to a freed memory space");
        }
        space
    }
}

impl Default for Spaces {
    fn default() -> Self {
        Self::new()
    }
}
