//! Tests for the base value contract.

use dungeon_dsl_types::{AggregateType, EnumType, MemberSymbol, Ty};
use pretty_assertions::assert_eq;

use crate::{
    Spaces, ValueError,
    values::{Payload, THIS_NAME, Value, ValueKind},
};

fn point_ty() -> Ty {
    Ty::aggregate(AggregateType::new(
        "Point",
        [
            MemberSymbol::field("x", Ty::int()),
            MemberSymbol::field("y", Ty::int()),
        ],
    ))
}

// ============================================================================
// Sentinel
// ============================================================================

#[test]
fn test_none_is_never_equal() {
    let none = Value::none();
    assert!(none != Value::none());
    assert!(none != none.clone());
    assert!(none != Value::int(0));
    assert!(Value::int(0) != none);
}

#[test]
fn test_none_payload_is_null() {
    let none = Value::none();
    assert!(none.internal_value().is_null());
    assert!(none.is_none());
    assert!(!none.is_mutable());
    assert!(none.ty().is_no_type());
    assert_eq!(none.kind(), ValueKind::None);
}

#[test]
fn test_none_rejects_writes() {
    let none = Value::none();
    assert_eq!(
        none.set_internal_value(Payload::Int(1)),
        Err(ValueError::NotMutable { ty: "none".into() })
    );
    assert!(none.internal_value().is_null());
}

#[test]
fn test_none_function_has_no_callable() {
    let f = Value::none_function();
    assert_eq!(f.kind(), ValueKind::Function);
    assert!(f.as_callable().is_none());
    assert!(f.ty().is_no_type());
    assert!(f.is_empty(&Spaces::new()));
}

// ============================================================================
// Mutability and dirty flag
// ============================================================================

#[test]
fn test_immutable_write_fails() {
    let v = Value::immutable(Ty::int(), 1i64);
    assert_eq!(
        v.set_internal_value(Payload::Int(2)),
        Err(ValueError::NotMutable { ty: "int".into() })
    );
    assert_eq!(v.internal_value(), Payload::Int(1));
    assert!(!v.is_dirty());
}

#[test]
fn test_mutable_write_sets_dirty() {
    let v = Value::int(1);
    assert!(!v.is_dirty());
    assert_eq!(v.set_internal_value(Payload::Int(2)), Ok(true));
    assert!(v.is_dirty());
    assert_eq!(v.internal_value(), Payload::Int(2));
}

#[test]
fn test_write_to_enum_rejects_wrong_payload() {
    let color = Ty::enumeration(EnumType::new("Color", ["Red", "Green"]));
    let v = Value::enum_value(color, None);
    assert_eq!(
        v.set_internal_value(Payload::Int(3)),
        Err(ValueError::PayloadMismatch {
            ty: "Color".into(),
            payload: "int"
        })
    );
    assert!(!v.is_dirty());
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_equality_requires_same_type() {
    assert_eq!(Value::int(3), Value::int(3));
    assert!(Value::int(3) != Value::int(4));
    assert!(Value::int(1) != Value::float(1.0));
}

#[test]
fn test_null_payloads_are_not_equal() {
    let a = Value::new(Ty::bool(), Payload::Null);
    let b = Value::new(Ty::bool(), Payload::Null);
    assert!(a != b);
    // Same instance is the fast path.
    assert_eq!(a, a.clone());
}

#[test]
fn test_enum_equality_is_variant_identity() {
    let color = Ty::enumeration(EnumType::new("Color", ["Red", "Green"]));
    let red = Value::variant(color.clone(), "Red").unwrap();
    let red2 = Value::variant(color.clone(), "Red").unwrap();
    let green = Value::variant(color.clone(), "Green").unwrap();
    assert_eq!(red, red2);
    assert!(red != green);
    assert!(Value::variant(color, "Blue").is_none());
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn test_set_from_copies_payload() {
    let mut spaces = Spaces::new();
    let a = Value::int(1);
    let b = Value::int(2);
    assert_eq!(a.set_from(&b, &mut spaces), Ok(true));
    assert_eq!(a.internal_value(), Payload::Int(2));
    assert!(a.is_dirty());

    // Independent afterwards.
    b.set_internal_value(Payload::Int(3)).unwrap();
    assert_eq!(a.internal_value(), Payload::Int(2));
}

#[test]
fn test_set_from_incompatible_type() {
    let mut spaces = Spaces::new();
    let a = Value::int(1);
    let b = Value::string("x");
    assert_eq!(
        a.set_from(&b, &mut spaces),
        Err(ValueError::IncompatibleType {
            expected: "int".into(),
            found: "string".into()
        })
    );
}

#[test]
fn test_set_from_immutable_target() {
    let mut spaces = Spaces::new();
    let a = Value::immutable(Ty::int(), 1i64);
    assert!(matches!(
        a.set_from(&Value::int(2), &mut spaces),
        Err(ValueError::NotMutable { .. })
    ));
}

#[test]
fn test_set_from_aggregate_adopts_space() {
    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let a = Value::aggregate(&mut spaces, point_ty(), global).unwrap();
    let b = Value::aggregate(&mut spaces, point_ty(), global).unwrap();
    let b_space = b.memory_space(&mut spaces).unwrap();
    spaces.bind(b_space, "x", Value::int(7));

    a.set_from(&b, &mut spaces).unwrap();
    assert_eq!(a.memory_space(&mut spaces).unwrap(), b_space);
    assert_eq!(a.member(&mut spaces, "x").unwrap().internal_value(), Payload::Int(7));
    // The self-binding of the adopted space now points at the assignee.
    assert!(spaces.lookup_local(b_space, THIS_NAME).unwrap().ptr_eq(&a));
    // Same space, but null payloads never compare equal.
    assert!(a != b);
}

// ============================================================================
// Views and copies
// ============================================================================

#[test]
fn test_shallow_view_preserves_flags() {
    let v = Value::immutable(Ty::string(), "hi");
    let view = v.shallow_view();
    assert!(!view.ptr_eq(&v));
    assert!(!view.is_mutable());
    assert_eq!(view.ty(), Ty::string());
    assert_eq!(view, v);

    let dirty = Value::int(1);
    dirty.set_internal_value(Payload::Int(5)).unwrap();
    assert!(dirty.shallow_view().is_dirty());
}

#[test]
fn test_deep_copy_of_aggregate_is_independent() {
    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let a = Value::default_for(&point_ty(), &mut spaces, global).unwrap();
    let b = a.deep_copy(&mut spaces).unwrap();

    let a_space = a.memory_space(&mut spaces).unwrap();
    let b_space = b.memory_space(&mut spaces).unwrap();
    assert!(a_space != b_space);
    assert_eq!(spaces.get(b_space).unwrap().parent(), Some(global));
    assert!(spaces.lookup_local(b_space, THIS_NAME).unwrap().ptr_eq(&b));

    a.member(&mut spaces, "x")
        .unwrap()
        .set_internal_value(Payload::Int(9))
        .unwrap();
    assert_eq!(a.member(&mut spaces, "x").unwrap().internal_value(), Payload::Int(9));
    assert_eq!(b.member(&mut spaces, "x").unwrap().internal_value(), Payload::Int(0));
}

// ============================================================================
// Member space
// ============================================================================

#[test]
fn test_plain_value_space_binds_itself() {
    let mut spaces = Spaces::new();
    let v = Value::int(4);
    let space = v.memory_space(&mut spaces).unwrap();
    assert!(spaces.lookup(space, THIS_NAME).unwrap().ptr_eq(&v));
    assert_eq!(spaces.get(space).unwrap().len(), 1);

    // The self space is shared and follows the latest caller.
    let w = Value::string("w");
    assert_eq!(w.memory_space(&mut spaces).unwrap(), space);
    assert!(spaces.lookup(space, THIS_NAME).unwrap().ptr_eq(&w));
    assert_eq!(spaces.get(space).unwrap().len(), 1);
}

#[test]
fn test_shallow_views_do_not_grow_arena() {
    let mut spaces = Spaces::new();
    let v = Value::int(4);
    v.memory_space(&mut spaces).unwrap();
    let live = spaces.len();
    for _ in 0..10 {
        let view = v.shallow_view();
        let space = view.memory_space(&mut spaces).unwrap();
        assert!(spaces.lookup_local(space, THIS_NAME).unwrap().ptr_eq(&view));
    }
    assert_eq!(spaces.len(), live);
}

#[test]
fn test_none_space_is_the_empty_space() {
    let mut spaces = Spaces::new();
    let space = Value::none().memory_space(&mut spaces).unwrap();
    assert_eq!(space, spaces.empty_space());
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_default_payloads() {
    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let int = Value::default_for(&Ty::int(), &mut spaces, global).unwrap();
    let float = Value::default_for(&Ty::float(), &mut spaces, global).unwrap();
    let string = Value::default_for(&Ty::string(), &mut spaces, global).unwrap();
    let boolean = Value::default_for(&Ty::bool(), &mut spaces, global).unwrap();
    let graph = Value::default_for(&Ty::graph(), &mut spaces, global).unwrap();

    assert_eq!(int.internal_value(), Payload::Int(0));
    assert_eq!(float.internal_value(), Payload::Float(0.0));
    assert_eq!(string.internal_value(), Payload::Str("".into()));
    assert!(boolean.internal_value().is_null());
    assert!(matches!(graph.internal_value(), Payload::Graph(g) if g.nodes.is_empty()));
    assert!(Value::default_for(&Ty::no_type(), &mut spaces, global)
        .unwrap()
        .is_none());
}

#[test]
fn test_default_families() {
    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let color = Ty::enumeration(EnumType::new("Color", ["Red"]));
    let cases = [
        (Ty::list(Ty::int()), ValueKind::List),
        (Ty::set(Ty::int()), ValueKind::Set),
        (Ty::map(Ty::int(), Ty::string()), ValueKind::Map),
        (color, ValueKind::Enum),
        (Ty::function([Ty::int()], Ty::bool()), ValueKind::Function),
        (Ty::prototype(), ValueKind::Prototype),
        (Ty::item_prototype(), ValueKind::Prototype),
    ];
    for (ty, kind) in cases {
        let value = Value::default_for(&ty, &mut spaces, global).unwrap();
        assert_eq!(value.kind(), kind, "default of {ty}");
        assert_eq!(value.ty(), ty);
        assert!(value.is_mutable());
    }
}

#[test]
fn test_default_aggregate_binds_members() {
    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let p = Value::default_for(&point_ty(), &mut spaces, global).unwrap();
    assert_eq!(p.kind(), ValueKind::Aggregate);
    assert_eq!(p.member(&mut spaces, "x").unwrap().internal_value(), Payload::Int(0));
    assert_eq!(p.member(&mut spaces, "y").unwrap().internal_value(), Payload::Int(0));
    assert!(!p.is_empty(&spaces));
}

#[test]
fn test_nested_aggregate_default_respects_depth_limit() {
    let leaf = Ty::aggregate(AggregateType::new("Leaf", []));
    let branch = Ty::aggregate(AggregateType::new(
        "Branch",
        [MemberSymbol::field("leaf", leaf)],
    ));
    let tree = Ty::aggregate(AggregateType::new(
        "Tree",
        [MemberSymbol::field("branch", branch)],
    ));

    let mut spaces = Spaces::new();
    let global = spaces.new_space(None).unwrap();
    let value = Value::default_for(&tree, &mut spaces, global).unwrap();
    let branch = value.member(&mut spaces, "branch").unwrap();
    assert_eq!(branch.member(&mut spaces, "leaf").unwrap().kind(), ValueKind::Aggregate);

    let mut shallow = Spaces::with_options(crate::RuntimeOptions { max_scope_depth: 2 });
    let global = shallow.new_space(None).unwrap();
    assert_eq!(
        Value::default_for(&tree, &mut shallow, global),
        Err(ValueError::ScopeDepthExceeded {
            depth: 3,
            max_depth: 2
        })
    );
}

#[test]
fn test_failed_default_frees_partial_spaces() {
    let leaf = Ty::aggregate(AggregateType::new("Leaf", []));
    let twig = Ty::aggregate(AggregateType::new(
        "Twig",
        [MemberSymbol::field("leaf", leaf.clone())],
    ));
    // `first` builds fine at depth 2 before `second` hits the limit at depth 3.
    let pair = Ty::aggregate(AggregateType::new(
        "Pair",
        [
            MemberSymbol::field("first", leaf),
            MemberSymbol::field("second", twig),
        ],
    ));

    let mut spaces = Spaces::with_options(crate::RuntimeOptions { max_scope_depth: 2 });
    let global = spaces.new_space(None).unwrap();
    let before = spaces.len();
    assert!(matches!(
        Value::default_for(&pair, &mut spaces, global),
        Err(ValueError::ScopeDepthExceeded { .. })
    ));
    assert_eq!(spaces.len(), before);
    assert!(spaces.contains(global));
}
