//! Function values and the callable capability.
//!
//! A function value wraps a [`Callable`] and carries its declared function
//! type. Callables are shared, never copied: every view or copy of a function
//! value refers to the same callable.
//!
//! Arguments reach a callable through a [`CallContext`], which evaluates
//! argument nodes on demand. The interpreter supplies its own context; hosts
//! and tests use [`EvaluatedArgs`] over values that are already evaluated.

use std::rc::Rc;

use dungeon_dsl_types::Ty;

use super::value::Repr;
use crate::{Spaces, Value, ValueError};

/// Trait for everything that can be invoked from interpreted code.
///
/// `receiver` is the value a method was looked up on, `None` for free
/// functions.
pub trait Callable {
    fn name(&self) -> &str;

    fn call(
        &self,
        ctx: &mut dyn CallContext,
        receiver: Option<&Value>,
    ) -> Result<Value, ValueError>;
}

/// Argument source for a call.
pub trait CallContext {
    fn arg_count(&self) -> usize;

    /// Evaluate the argument at `index`. Out-of-range indices yield `none`.
    fn eval_arg(&mut self, index: usize) -> Result<Value, ValueError>;

    fn spaces(&mut self) -> &mut Spaces;
}

/// Call context over pre-evaluated arguments.
pub struct EvaluatedArgs<'a> {
    spaces: &'a mut Spaces,
    args: Vec<Value>,
}

impl<'a> EvaluatedArgs<'a> {
    pub fn new(spaces: &'a mut Spaces, args: impl IntoIterator<Item = Value>) -> Self {
        Self {
            spaces,
            args: args.into_iter().collect(),
        }
    }
}

impl CallContext for EvaluatedArgs<'_> {
    fn arg_count(&self) -> usize {
        self.args.len()
    }

    fn eval_arg(&mut self, index: usize) -> Result<Value, ValueError> {
        Ok(self.args.get(index).cloned().unwrap_or_else(Value::none))
    }

    fn spaces(&mut self) -> &mut Spaces {
        self.spaces
    }
}

/// Type alias for native method implementations.
///
/// Receives the receiver and the evaluated arguments; the arity has already
/// been checked by [`NativeFunction`].
pub type NativeFn =
    fn(receiver: &Value, args: &[Value], spaces: &mut Spaces) -> Result<Value, ValueError>;

/// Wrapper for native Rust function pointers implementing a method.
#[derive(Copy, Clone)]
pub struct NativeFunction {
    name: &'static str,
    arity: usize,
    func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Self { name, arity, func }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn call(
        &self,
        ctx: &mut dyn CallContext,
        receiver: Option<&Value>,
    ) -> Result<Value, ValueError> {
        let found = ctx.arg_count();
        if found != self.arity {
            return Err(ValueError::ArityMismatch {
                name: self.name.into(),
                expected: self.arity,
                found,
            });
        }
        let receiver = receiver.ok_or_else(|| ValueError::MissingReceiver {
            name: self.name.into(),
        })?;
        let args = (0..found)
            .map(|i| ctx.eval_arg(i))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(name = self.name, args = args.len(), "native call");
        (self.func)(receiver, &args, ctx.spaces())
    }
}

impl Value {
    /// A mutable function value of function type `ty` wrapping `callable`.
    pub fn function(ty: Ty, callable: Rc<dyn Callable>) -> Self {
        Self::from_repr(ty, true, Repr::Function(Some(callable)))
    }

    /// A mutable function value of function type `ty` without a callable.
    pub fn empty_function(ty: Ty) -> Self {
        Self::from_repr(ty, true, Repr::Function(None))
    }

    pub fn as_callable(&self) -> Option<Rc<dyn Callable>> {
        match &*self.repr() {
            Repr::Function(callable) => callable.clone(),
            _ => None,
        }
    }

    /// Declared return type of a function value.
    pub fn return_type(&self) -> Option<Ty> {
        self.ty().return_type().cloned()
    }

    /// Invoke the wrapped callable. An empty function value returns `none`.
    pub fn call(
        &self,
        ctx: &mut dyn CallContext,
        receiver: Option<&Value>,
    ) -> Result<Value, ValueError> {
        match self.as_callable() {
            Some(callable) => callable.call(ctx, receiver),
            None => {
                tracing::debug!(ty = %self.ty(), "call of an empty function value");
                Ok(Value::none())
            }
        }
    }
}
