//! Rendering runtime errors as diagnostics.

use dungeon_dsl::{Payload, Ty, Value, ValueError, render_error_to_string_no_color};

#[test]
fn not_mutable_report_has_code_and_message() {
    let value = Value::immutable(Ty::string(), "fixed");
    let err = value.set_internal_value(Payload::from("changed")).unwrap_err();
    assert!(matches!(err, ValueError::NotMutable { .. }));

    let rendered = render_error_to_string_no_color(&err);
    assert!(rendered.contains("dsl::value::not_mutable"), "{rendered}");
    assert!(
        rendered.contains("cannot write to immutable value of type `string`"),
        "{rendered}"
    );
}

#[test]
fn scope_depth_report_has_help() {
    let err = ValueError::ScopeDepthExceeded {
        depth: 1001,
        max_depth: 1000,
    };
    let rendered = render_error_to_string_no_color(&err);
    assert!(rendered.contains("unbounded recursion"), "{rendered}");
}
