//! DSL-style rendering of values and payloads.
//!
//! ```text
//! 42   3.5   true   hello   [1, 2]   <1, 2>   [1 -> a, 2 -> b]   Color.Red   none
//! ```

use core::fmt;

use super::payload::Payload;
use crate::{Value, ValueKind};

fn format_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "nan")
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            write!(f, "inf")
        } else {
            write!(f, "-inf")
        }
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        write!(f, "{value:.1}")
    } else {
        write!(f, "{value}")
    }
}

fn write_seq<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl IntoIterator<Item = T>,
    close: &str,
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

struct Entry<K, V>(K, V);

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.0, self.1)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => write!(f, "none"),
            Payload::Bool(v) => write!(f, "{v}"),
            Payload::Int(v) => write!(f, "{v}"),
            Payload::Float(v) => format_float(f, *v),
            Payload::Str(s) => write!(f, "{s}"),
            Payload::Graph(g) => write!(f, "graph({} nodes)", g.nodes.len()),
            Payload::Variant(v) => write!(f, "{v}"),
            Payload::Callable(c) => write!(f, "{}", c.name()),
            Payload::Prototype(p) => write!(f, "{}", p.name()),
            Payload::Host(_) => write!(f, "<host object>"),
            Payload::List(items) => write_seq(f, "[", items.iter(), "]"),
            Payload::Set(items) => write_seq(f, "<", items.iter(), ">"),
            Payload::Map(entries) => {
                write_seq(f, "[", entries.iter().map(|(k, v)| Entry(k, v)), "]")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(list) = self.as_list() {
            return write_seq(f, "[", list.values(), "]");
        }
        if let Some(set) = self.as_set() {
            return write_seq(f, "<", set.values(), ">");
        }
        if let Some(map) = self.as_map() {
            let entries = map.entries().into_iter().map(|(k, v)| Entry(k, v));
            return write_seq(f, "[", entries, "]");
        }
        match self.kind() {
            ValueKind::None => write!(f, "none"),
            ValueKind::Aggregate | ValueKind::AggregateProperty => write!(f, "{}", self.ty()),
            _ => write!(f, "{}", self.internal_value()),
        }
    }
}
