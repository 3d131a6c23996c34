//! Tests for property-bridged values.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dungeon_dsl_types::{AggregateType, MemberSymbol, Ty};
use pretty_assertions::assert_eq;

use crate::{
    PropertyError, SpaceId, Spaces, ValueError,
    values::{
        Access, HostObject, HostProperty, Payload, PropertyBinding, RuntimeObjectTranslator,
        THIS_NAME, Value, ValueKind,
    },
};

struct Door {
    open: Cell<bool>,
    label: RefCell<String>,
}

fn door() -> HostObject {
    HostObject::new(Door {
        open: Cell::new(true),
        label: RefCell::new("north".to_string()),
    })
}

fn open_accessor() -> HostProperty<Door> {
    HostProperty::<Door>::new(
        |d| d.open.get().into(),
        |d, payload| {
            let v = payload
                .as_bool()
                .ok_or_else(|| PropertyError::type_mismatch("bool", &payload))?;
            d.open.set(v);
            Ok(())
        },
    )
}

fn label_accessor() -> HostProperty<Door> {
    HostProperty::<Door>::new(
        |d| d.label.borrow().as_str().into(),
        |d, payload| {
            let s = payload
                .as_str()
                .ok_or_else(|| PropertyError::type_mismatch("string", &payload))?;
            *d.label.borrow_mut() = s.to_string();
            Ok(())
        },
    )
}

#[test]
fn test_read_only_property_rejects_writes() {
    let accessor = open_accessor().with_access(Access::GET);
    let value = Value::property(
        Ty::bool(),
        PropertyBinding::new(Rc::new(accessor), door()),
        true,
    );

    assert_eq!(value.set_internal_value(Payload::Bool(false)), Ok(false));
    // Unaffected by the rejected write.
    assert_eq!(value.internal_value(), Payload::Bool(true));
    assert!(!value.is_dirty());
}

#[test]
fn test_write_only_property_reads_null() {
    let accessor = open_accessor().with_access(Access::SET);
    let host = door();
    let value = Value::property(
        Ty::bool(),
        PropertyBinding::new(Rc::new(accessor), host.clone()),
        true,
    );

    assert!(value.internal_value().is_null());
    assert_eq!(value.set_internal_value(Payload::Bool(false)), Ok(true));
    assert!(!host.downcast_ref::<Door>().unwrap().open.get());
}

#[test]
fn test_property_reads_live_host_state() {
    let host = door();
    let value = Value::property(
        Ty::string(),
        PropertyBinding::new(Rc::new(label_accessor()), host.clone()),
        true,
    );
    assert_eq!(value.internal_value(), Payload::from("north"));

    *host.downcast_ref::<Door>().unwrap().label.borrow_mut() = "south".to_string();
    assert_eq!(value.internal_value(), Payload::from("south"));
}

#[test]
fn test_type_mismatch_write_is_soft() {
    let value = Value::property(
        Ty::bool(),
        PropertyBinding::new(Rc::new(open_accessor()), door()),
        true,
    );
    assert_eq!(value.set_internal_value(Payload::Int(1)), Ok(false));
    assert_eq!(value.internal_value(), Payload::Bool(true));
}

#[test]
fn test_binding_write_reports_reason() {
    let read_only = PropertyBinding::new(Rc::new(open_accessor().with_access(Access::GET)), door());
    assert_eq!(read_only.write(Payload::Bool(false)), Err(PropertyError::NotSettable));

    let binding = PropertyBinding::new(Rc::new(open_accessor()), door());
    assert_eq!(
        binding.write(Payload::Int(1)),
        Err(PropertyError::TypeMismatch {
            expected: "bool".into(),
            found: "int".into()
        })
    );
}

#[test]
fn test_foreign_host_object() {
    let binding = PropertyBinding::new(Rc::new(open_accessor()), HostObject::new(42u32));
    assert!(binding.read().is_null());
    assert!(matches!(
        binding.write(Payload::Bool(true)),
        Err(PropertyError::TypeMismatch { .. })
    ));
}

#[test]
fn test_immutable_property_value() {
    let value = Value::property(
        Ty::bool(),
        PropertyBinding::new(Rc::new(open_accessor()), door()),
        false,
    );
    assert!(matches!(
        value.set_internal_value(Payload::Bool(false)),
        Err(ValueError::NotMutable { .. })
    ));
}

#[test]
fn test_encapsulated_field_ignores_access_flags() {
    let accessor = open_accessor().with_access(Access::empty());
    let host = door();
    let field = Value::encapsulated_field(
        Ty::bool(),
        PropertyBinding::new(Rc::new(accessor), host.clone()),
    );
    assert!(field.is_mutable());
    assert_eq!(field.kind(), ValueKind::EncapsulatedField);
    assert_eq!(field.internal_value(), Payload::Bool(true));
    assert_eq!(field.set_internal_value(Payload::Bool(false)), Ok(true));
    assert!(!host.downcast_ref::<Door>().unwrap().open.get());
}

#[test]
fn test_encapsulated_field_compares_payloads() {
    let field = Value::encapsulated_field(
        Ty::bool(),
        PropertyBinding::new(Rc::new(open_accessor()), door()),
    );
    assert_eq!(field, Value::bool(true));
    assert_eq!(Value::bool(true), field);
    assert!(field != Value::bool(false));
}

// ============================================================================
// Aggregate properties
// ============================================================================

struct Room {
    door: RefCell<Option<HostObject>>,
}

fn door_ty() -> Ty {
    Ty::aggregate(AggregateType::new(
        "door",
        [MemberSymbol::property("open", Ty::bool())],
    ))
}

/// Translates a door host object into an aggregate exposing `open`.
struct DoorTranslator {
    calls: Cell<usize>,
}

impl RuntimeObjectTranslator for DoorTranslator {
    fn translate(
        &self,
        payload: &Payload,
        parent: SpaceId,
        spaces: &mut Spaces,
    ) -> Result<Value, ValueError> {
        self.calls.set(self.calls.get() + 1);
        let value = Value::aggregate_with_payload(spaces, door_ty(), parent, payload.clone())?;
        if let Some(host) = payload.as_host() {
            let space = value.memory_space(spaces)?;
            let open = Value::property(
                Ty::bool(),
                PropertyBinding::new(Rc::new(open_accessor()), host.clone()),
                true,
            );
            spaces.bind(space, "open", open);
        }
        Ok(value)
    }
}

fn room_door_accessor() -> HostProperty<Room> {
    HostProperty::<Room>::read_only(|room| {
        room.door
            .borrow()
            .clone()
            .map_or(Payload::Null, Payload::Host)
    })
}

#[test]
fn test_aggregate_property_translates_on_every_access() {
    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let room = HostObject::new(Room {
        door: RefCell::new(Some(door())),
    });
    let translator = Rc::new(DoorTranslator {
        calls: Cell::new(0),
    });
    let value = Value::aggregate_property(
        door_ty(),
        PropertyBinding::new(Rc::new(room_door_accessor()), room.clone()),
        global,
        translator.clone(),
        true,
    );
    assert_eq!(value.kind(), ValueKind::AggregateProperty);

    let first = value.memory_space(&mut spaces).unwrap();
    assert_eq!(spaces.get(first).unwrap().parent(), Some(global));
    assert_eq!(
        spaces.lookup_local(first, "open").unwrap().internal_value(),
        Payload::Bool(true)
    );
    assert_eq!(spaces.lookup_local(first, THIS_NAME).unwrap().kind(), ValueKind::Aggregate);

    let second = value.memory_space(&mut spaces).unwrap();
    assert!(first != second);
    assert_eq!(translator.calls.get(), 2);
    // The previous translation is gone.
    assert!(!spaces.contains(first));

    // A swapped host payload is picked up by the next access.
    let replacement = HostObject::new(Door {
        open: Cell::new(false),
        label: RefCell::new(String::new()),
    });
    *room.downcast_ref::<Room>().unwrap().door.borrow_mut() = Some(replacement);
    let third = value.memory_space(&mut spaces).unwrap();
    assert_eq!(
        spaces.lookup_local(third, "open").unwrap().internal_value(),
        Payload::Bool(false)
    );
}

#[test]
fn test_null_aggregate_property_uses_empty_space() {
    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let room = HostObject::new(Room {
        door: RefCell::new(None),
    });
    let translator = Rc::new(DoorTranslator {
        calls: Cell::new(0),
    });
    let value = Value::aggregate_property(
        door_ty(),
        PropertyBinding::new(Rc::new(room_door_accessor()), room),
        global,
        translator.clone(),
        true,
    );

    assert_eq!(value.memory_space(&mut spaces).unwrap(), spaces.empty_space());
    assert_eq!(translator.calls.get(), 0);
    assert!(value.is_empty(&spaces));
}

fn room_with_door(spaces: &mut Spaces) -> (Value, HostObject, SpaceId) {
    let global = spaces.new_space(None).unwrap();
    let room = HostObject::new(Room {
        door: RefCell::new(Some(door())),
    });
    let value = Value::aggregate_property(
        door_ty(),
        PropertyBinding::new(Rc::new(room_door_accessor()), room.clone()),
        global,
        Rc::new(DoorTranslator {
            calls: Cell::new(0),
        }),
        true,
    );
    (value, room, global)
}

#[test]
fn test_repeated_member_access_keeps_arena_flat() {
    let mut spaces = Spaces::new();
    let (value, _room, _) = room_with_door(&mut spaces);

    value.member(&mut spaces, "open").unwrap();
    let live = spaces.len();
    for _ in 0..100 {
        let open = value.member(&mut spaces, "open").unwrap();
        assert_eq!(open.internal_value(), Payload::Bool(true));
    }
    assert_eq!(spaces.len(), live);
}

#[test]
fn test_null_host_payload_frees_last_translation() {
    let mut spaces = Spaces::new();
    let (value, room, _) = room_with_door(&mut spaces);
    let before = spaces.len();

    let space = value.memory_space(&mut spaces).unwrap();
    assert_eq!(spaces.len(), before + 1);

    *room.downcast_ref::<Room>().unwrap().door.borrow_mut() = None;
    assert_eq!(value.memory_space(&mut spaces).unwrap(), spaces.empty_space());
    assert!(!spaces.contains(space));
    assert_eq!(spaces.len(), before);
}

#[test]
fn test_release_translation() {
    let mut spaces = Spaces::new();
    let (value, _room, _) = room_with_door(&mut spaces);
    let before = spaces.len();

    value.memory_space(&mut spaces).unwrap();
    value.release_translation(&mut spaces);
    assert_eq!(spaces.len(), before);

    // Harmless without a live translation, and for plain values.
    value.release_translation(&mut spaces);
    Value::int(1).release_translation(&mut spaces);
    assert_eq!(spaces.len(), before);
}
