//! Native methods of the collection values.
//!
//! `Value::method` looks a method up by name on a list, set or map value and
//! returns it as a function value. The method's function type is derived from
//! the collection's element (and key) types.

use std::rc::Rc;

use dungeon_dsl_types::{DataType, Ty, TypeKind};

use super::collection::{List, Map, Set};
use super::function::NativeFunction;
use crate::{Spaces, Value, ValueError};

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_else(Value::none)
}

fn receiver_mismatch(expected: &str, receiver: &Value) -> ValueError {
    ValueError::IncompatibleType {
        expected: expected.into(),
        found: receiver.ty().type_name(),
    }
}

fn list_of(receiver: &Value) -> Result<List, ValueError> {
    receiver
        .as_list()
        .ok_or_else(|| receiver_mismatch("list", receiver))
}

fn set_of(receiver: &Value) -> Result<Set, ValueError> {
    receiver
        .as_set()
        .ok_or_else(|| receiver_mismatch("set", receiver))
}

fn map_of(receiver: &Value) -> Result<Map, ValueError> {
    receiver
        .as_map()
        .ok_or_else(|| receiver_mismatch("map", receiver))
}

fn size(len: usize) -> Value {
    Value::int(i64::try_from(len).unwrap_or(i64::MAX))
}

/// A fresh list value of element type `elem` holding `values`.
fn snapshot_list(elem: Ty, values: Vec<Value>) -> Value {
    let list = Value::list(Ty::list(elem));
    if let Some(view) = list.as_list() {
        for value in values {
            view.add(value);
        }
    }
    list
}

// ============================================================================
// List
// ============================================================================

fn list_add(receiver: &Value, args: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    list_of(receiver)?.add(arg(args, 0));
    Ok(Value::none())
}

fn list_size(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    Ok(size(list_of(receiver)?.len()))
}

fn list_get(receiver: &Value, args: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    let list = list_of(receiver)?;
    let index = arg(args, 0).internal_value().as_int();
    match index.and_then(|i| usize::try_from(i).ok()) {
        Some(index) => Ok(list.get(index)),
        None => {
            tracing::debug!(?index, "list index is negative or not an int");
            Ok(Value::none())
        }
    }
}

fn list_clear(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    list_of(receiver)?.clear();
    Ok(Value::none())
}

const LIST_ADD: NativeFunction = NativeFunction::new("add", 1, list_add);
const LIST_SIZE: NativeFunction = NativeFunction::new("size", 0, list_size);
const LIST_GET: NativeFunction = NativeFunction::new("get", 1, list_get);
const LIST_CLEAR: NativeFunction = NativeFunction::new("clear", 0, list_clear);

// ============================================================================
// Set
// ============================================================================

fn set_add(receiver: &Value, args: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    Ok(Value::bool(set_of(receiver)?.add(arg(args, 0))))
}

fn set_size(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    Ok(size(set_of(receiver)?.len()))
}

fn set_contains(receiver: &Value, args: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    Ok(Value::bool(set_of(receiver)?.contains(&arg(args, 0))))
}

fn set_clear(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    set_of(receiver)?.clear();
    Ok(Value::none())
}

const SET_ADD: NativeFunction = NativeFunction::new("add", 1, set_add);
const SET_SIZE: NativeFunction = NativeFunction::new("size", 0, set_size);
const SET_CONTAINS: NativeFunction = NativeFunction::new("contains", 1, set_contains);
const SET_CLEAR: NativeFunction = NativeFunction::new("clear", 0, set_clear);

// ============================================================================
// Map
// ============================================================================

fn map_add(receiver: &Value, args: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    Ok(Value::bool(map_of(receiver)?.add(arg(args, 0), arg(args, 1))))
}

fn map_get(receiver: &Value, args: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    Ok(map_of(receiver)?.get(&arg(args, 0)))
}

fn map_size(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    Ok(size(map_of(receiver)?.len()))
}

fn map_get_keys(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    let map = map_of(receiver)?;
    Ok(snapshot_list(map.key_type(), map.keys()))
}

fn map_get_elements(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    let map = map_of(receiver)?;
    Ok(snapshot_list(map.element_type(), map.elements()))
}

fn map_clear(receiver: &Value, _: &[Value], _: &mut Spaces) -> Result<Value, ValueError> {
    map_of(receiver)?.clear();
    Ok(Value::none())
}

const MAP_ADD: NativeFunction = NativeFunction::new("add", 2, map_add);
const MAP_GET: NativeFunction = NativeFunction::new("get", 1, map_get);
const MAP_SIZE: NativeFunction = NativeFunction::new("size", 0, map_size);
const MAP_GET_KEYS: NativeFunction = NativeFunction::new("get_keys", 0, map_get_keys);
const MAP_GET_ELEMENTS: NativeFunction = NativeFunction::new("get_elements", 0, map_get_elements);
const MAP_CLEAR: NativeFunction = NativeFunction::new("clear", 0, map_clear);

impl Value {
    /// Look up a native method on a collection value.
    ///
    /// Returns `None` for unknown names and for values without methods.
    pub fn method(&self, name: &str) -> Option<Value> {
        let ty = self.ty();
        let (native, fn_ty) = match ty.kind() {
            TypeKind::List(elem) => match name {
                "add" => (LIST_ADD, Ty::function([elem.clone()], Ty::no_type())),
                "size" => (LIST_SIZE, Ty::function([], Ty::int())),
                "get" => (LIST_GET, Ty::function([Ty::int()], elem.clone())),
                "clear" => (LIST_CLEAR, Ty::function([], Ty::no_type())),
                _ => return None,
            },
            TypeKind::Set(elem) => match name {
                "add" => (SET_ADD, Ty::function([elem.clone()], Ty::bool())),
                "size" => (SET_SIZE, Ty::function([], Ty::int())),
                "contains" => (SET_CONTAINS, Ty::function([elem.clone()], Ty::bool())),
                "clear" => (SET_CLEAR, Ty::function([], Ty::no_type())),
                _ => return None,
            },
            TypeKind::Map(key, elem) => match name {
                "add" => (MAP_ADD, Ty::function([key.clone(), elem.clone()], Ty::bool())),
                "get" => (MAP_GET, Ty::function([key.clone()], elem.clone())),
                "size" => (MAP_SIZE, Ty::function([], Ty::int())),
                "get_keys" => (MAP_GET_KEYS, Ty::function([], Ty::list(key.clone()))),
                "get_elements" => (MAP_GET_ELEMENTS, Ty::function([], Ty::list(elem.clone()))),
                "clear" => (MAP_CLEAR, Ty::function([], Ty::no_type())),
                _ => return None,
            },
            _ => return None,
        };
        Some(Value::function(fn_ty, Rc::new(native)))
    }
}
