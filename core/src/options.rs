//! Configuration options for the runtime model.

/// Configuration options for memory spaces and values.
///
/// # Example
///
/// ```
/// use dungeon_dsl_core::{RuntimeOptions, Spaces};
///
/// let spaces = Spaces::with_options(RuntimeOptions { max_scope_depth: 64 });
/// assert_eq!(spaces.options().max_scope_depth, 64);
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Maximum length of a parent chain (recursion protection).
    ///
    /// Every function call and lexical block of interpreted code opens a
    /// nested memory space, so this bounds the interpreter's recursion depth.
    ///
    /// Default: 1000
    pub max_scope_depth: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            max_scope_depth: 1000,
        }
    }
}
