//! List, set and map values.
//!
//! Each collection value owns a shared container of child values. Sets and
//! maps also keep a shadow index of the *unwrapped* payloads of their
//! elements (keys, for maps): duplicates are detected by payload equality,
//! not by value identity, and the first write wins.
//!
//! Containers are reference counted so that assignment between collection
//! values aliases them, matching how interpreted code shares collection
//! literals.

use core::cell::RefCell;
use std::rc::Rc;

use dungeon_dsl_types::Ty;
use hashbrown::{HashMap, HashSet};

use super::payload::Payload;
use super::value::{Repr, mismatch};
use crate::{Spaces, Value, ValueError};

fn element_type(ty: &Ty) -> Ty {
    ty.element_type().cloned().unwrap_or_else(Ty::no_type)
}

fn key_type(ty: &Ty) -> Ty {
    ty.key_type().cloned().unwrap_or_else(Ty::no_type)
}

// ============================================================================
// Containers
// ============================================================================

pub(crate) struct ListData {
    elem_ty: Ty,
    elems: Vec<Value>,
}

impl ListData {
    fn new(elem_ty: Ty) -> Self {
        Self {
            elem_ty,
            elems: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub(crate) fn payload(&self) -> Payload {
        Payload::List(self.elems.iter().map(Value::internal_value).collect())
    }

    pub(crate) fn assign(&mut self, ty: &Ty, payload: Payload) -> Result<(), ValueError> {
        match payload {
            Payload::Null => self.elems.clear(),
            Payload::List(items) => {
                self.elems = items
                    .iter()
                    .map(|item| Value::new(self.elem_ty.clone(), item.clone()))
                    .collect();
            }
            other => return Err(mismatch(ty, &other)),
        }
        Ok(())
    }

    pub(crate) fn deep_copy(&self, spaces: &mut Spaces) -> Result<Self, ValueError> {
        let elems = self
            .elems
            .iter()
            .map(|elem| elem.deep_copy(spaces))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            elem_ty: self.elem_ty.clone(),
            elems,
        })
    }
}

impl PartialEq for ListData {
    fn eq(&self, other: &Self) -> bool {
        self.elems == other.elems
    }
}

pub(crate) struct SetData {
    elem_ty: Ty,
    elems: Vec<Value>,
    index: HashSet<Payload>,
}

impl SetData {
    fn new(elem_ty: Ty) -> Self {
        Self {
            elem_ty,
            elems: Vec::new(),
            index: HashSet::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub(crate) fn payload(&self) -> Payload {
        Payload::Set(self.elems.iter().map(Value::internal_value).collect())
    }

    fn add(&mut self, value: Value) -> bool {
        if !self.index.insert(value.internal_value()) {
            return false;
        }
        self.elems.push(value);
        true
    }

    fn clear(&mut self) {
        self.index.clear();
        self.elems.clear();
    }

    pub(crate) fn assign(&mut self, ty: &Ty, payload: Payload) -> Result<(), ValueError> {
        match payload {
            Payload::Null => self.clear(),
            Payload::Set(items) | Payload::List(items) => {
                self.clear();
                for item in items.iter() {
                    self.add(Value::new(self.elem_ty.clone(), item.clone()));
                }
            }
            other => return Err(mismatch(ty, &other)),
        }
        Ok(())
    }

    pub(crate) fn deep_copy(&self, spaces: &mut Spaces) -> Result<Self, ValueError> {
        let mut copy = Self::new(self.elem_ty.clone());
        for elem in &self.elems {
            copy.add(elem.deep_copy(spaces)?);
        }
        Ok(copy)
    }
}

impl PartialEq for SetData {
    fn eq(&self, other: &Self) -> bool {
        self.elems.len() == other.elems.len()
            && other
                .elems
                .iter()
                .all(|elem| self.index.contains(&elem.internal_value()))
    }
}

pub(crate) struct MapData {
    key_ty: Ty,
    elem_ty: Ty,
    entries: Vec<(Value, Value)>,
    index: HashMap<Payload, usize>,
}

impl MapData {
    fn new(key_ty: Ty, elem_ty: Ty) -> Self {
        Self {
            key_ty,
            elem_ty,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn payload(&self) -> Payload {
        Payload::Map(
            self.entries
                .iter()
                .map(|(key, elem)| (key.internal_value(), elem.internal_value()))
                .collect(),
        )
    }

    fn add(&mut self, key: Value, elem: Value) -> bool {
        let unwrapped = key.internal_value();
        if self.index.contains_key(&unwrapped) {
            return false;
        }
        self.index.insert(unwrapped, self.entries.len());
        self.entries.push((key, elem));
        true
    }

    fn get(&self, key: &Payload) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }

    pub(crate) fn assign(&mut self, ty: &Ty, payload: Payload) -> Result<(), ValueError> {
        match payload {
            Payload::Null => self.clear(),
            Payload::Map(entries) => {
                self.clear();
                for (key, elem) in entries.iter() {
                    self.add(
                        Value::new(self.key_ty.clone(), key.clone()),
                        Value::new(self.elem_ty.clone(), elem.clone()),
                    );
                }
            }
            other => return Err(mismatch(ty, &other)),
        }
        Ok(())
    }

    pub(crate) fn deep_copy(&self, spaces: &mut Spaces) -> Result<Self, ValueError> {
        let mut copy = Self::new(self.key_ty.clone(), self.elem_ty.clone());
        for (key, elem) in &self.entries {
            copy.add(key.deep_copy(spaces)?, elem.deep_copy(spaces)?);
        }
        Ok(copy)
    }
}

impl PartialEq for MapData {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, elem)| other.get(&key.internal_value()).is_some_and(|e| e == elem))
    }
}

// ============================================================================
// Values and views
// ============================================================================

impl Value {
    /// An empty list value of list type `ty`.
    pub fn list(ty: Ty) -> Self {
        let data = ListData::new(element_type(&ty));
        Self::from_repr(ty, true, Repr::List(Rc::new(RefCell::new(data))))
    }

    /// An empty set value of set type `ty`.
    pub fn set(ty: Ty) -> Self {
        let data = SetData::new(element_type(&ty));
        Self::from_repr(ty, true, Repr::Set(Rc::new(RefCell::new(data))))
    }

    /// An empty map value of map type `ty`.
    pub fn map(ty: Ty) -> Self {
        let data = MapData::new(key_type(&ty), element_type(&ty));
        Self::from_repr(ty, true, Repr::Map(Rc::new(RefCell::new(data))))
    }

    pub fn as_list(&self) -> Option<List> {
        match &*self.repr() {
            Repr::List(data) => Some(List {
                ty: self.ty(),
                data: data.clone(),
            }),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<Set> {
        match &*self.repr() {
            Repr::Set(data) => Some(Set {
                ty: self.ty(),
                data: data.clone(),
            }),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<Map> {
        match &*self.repr() {
            Repr::Map(data) => Some(Map {
                ty: self.ty(),
                data: data.clone(),
            }),
            _ => None,
        }
    }
}

/// View over a list value's container. Ordered, duplicates permitted.
#[derive(Clone)]
pub struct List {
    ty: Ty,
    data: Rc<RefCell<ListData>>,
}

impl List {
    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn element_type(&self) -> Ty {
        self.data.borrow().elem_ty.clone()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().elems.is_empty()
    }

    pub fn add(&self, value: Value) {
        self.data.borrow_mut().elems.push(value);
    }

    /// Element at `index`, or `none` if the index is out of bounds.
    pub fn get(&self, index: usize) -> Value {
        match self.data.borrow().elems.get(index) {
            Some(value) => value.clone(),
            None => {
                tracing::debug!(index, len = self.len(), "list index out of bounds");
                Value::none()
            }
        }
    }

    pub fn clear(&self) {
        self.data.borrow_mut().elems.clear();
    }

    /// Snapshot of the elements.
    pub fn values(&self) -> Vec<Value> {
        self.data.borrow().elems.clone()
    }
}

/// View over a set value's container.
#[derive(Clone)]
pub struct Set {
    ty: Ty,
    data: Rc<RefCell<SetData>>,
}

impl Set {
    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn element_type(&self) -> Ty {
        self.data.borrow().elem_ty.clone()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().elems.is_empty()
    }

    /// Insert `value` unless an element with an equal payload is present.
    ///
    /// The element is stored by handle but indexed by its payload at
    /// insertion time. Writing to an element afterwards does not re-index
    /// it: the set may then hold two equal payloads, and [`Set::contains`]
    /// still answers for the old one.
    pub fn add(&self, value: Value) -> bool {
        let added = self.data.borrow_mut().add(value);
        if !added {
            tracing::debug!(ty = %self.ty, "duplicate set element rejected");
        }
        added
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.data.borrow().index.contains(&value.internal_value())
    }

    pub fn clear(&self) {
        self.data.borrow_mut().clear();
    }

    /// Snapshot of the elements, in insertion order.
    pub fn values(&self) -> Vec<Value> {
        self.data.borrow().elems.clone()
    }
}

/// View over a map value's container.
#[derive(Clone)]
pub struct Map {
    ty: Ty,
    data: Rc<RefCell<MapData>>,
}

impl Map {
    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn key_type(&self) -> Ty {
        self.data.borrow().key_ty.clone()
    }

    pub fn element_type(&self) -> Ty {
        self.data.borrow().elem_ty.clone()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().entries.is_empty()
    }

    /// Insert an entry unless a key with an equal payload is present.
    /// Existing entries are never overwritten.
    ///
    /// Keys are indexed by their payload at insertion time, as in
    /// [`Set::add`]: writing to a key afterwards does not re-index it.
    pub fn add(&self, key: Value, elem: Value) -> bool {
        let added = self.data.borrow_mut().add(key, elem);
        if !added {
            tracing::debug!(ty = %self.ty, "duplicate map key rejected");
        }
        added
    }

    /// Element stored under a key with `key`'s payload, or `none`.
    pub fn get(&self, key: &Value) -> Value {
        self.data
            .borrow()
            .get(&key.internal_value())
            .cloned()
            .unwrap_or_else(Value::none)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.data.borrow().index.contains_key(&key.internal_value())
    }

    pub fn clear(&self) {
        self.data.borrow_mut().clear();
    }

    /// Snapshot of the keys, in insertion order.
    pub fn keys(&self) -> Vec<Value> {
        self.data.borrow().entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of the elements, in insertion order.
    pub fn elements(&self) -> Vec<Value> {
        self.data.borrow().entries.iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.data.borrow().entries.clone()
    }
}
