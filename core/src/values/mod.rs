//! Runtime values.
//!
//! [`Value`] is a single handle type over a closed set of value families
//! (see [`ValueKind`]). Family-specific operations live in the submodules
//! as inherent methods on `Value` plus small views ([`List`], [`Set`],
//! [`Map`], [`Prototype`]) over shared state.

mod aggregate;
mod collection;
mod defaults;
mod display;
mod encapsulated;
mod enumeration;
mod function;
mod native;
mod payload;
mod property;
mod prototype;
mod value;

pub use collection::{List, Map, Set};
pub use defaults::default_payload;
pub use encapsulated::{HostSchema, encapsulate};
pub use function::{CallContext, Callable, EvaluatedArgs, NativeFn, NativeFunction};
pub use payload::{Graph, HostObject, Payload};
pub use property::{
    Access, HostProperty, PropertyAccessor, PropertyBinding, RuntimeObjectTranslator,
};
pub use prototype::Prototype;
pub use value::{THIS_NAME, Value, ValueKind};

#[cfg(test)]
mod property_test;
#[cfg(test)]
mod value_test;
