//! Error rendering using miette
//!
//! Every error of the runtime model implements [`miette::Diagnostic`]; these
//! helpers render one as a report with its code and help text.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use dungeon_dsl::{Payload, Ty, Value, render_error};
///
/// let value = Value::immutable(Ty::int(), 1i64);
/// if let Err(e) = value.set_internal_value(Payload::Int(2)) {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &dyn Diagnostic) {
    eprintln!("{}", render_error_to_string(error));
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &dyn Diagnostic) -> String {
    render_with_theme(error, GraphicalTheme::unicode())
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &dyn Diagnostic) -> String {
    render_with_theme(error, GraphicalTheme::unicode_nocolor())
}

fn render_with_theme(error: &dyn Diagnostic, theme: GraphicalTheme) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(theme)
        .render_report(&mut out, error)
        .ok();
    out
}
