//! Method Binder - Plain functions bound to the receiver.
//!
//! A method entry is a free function taking the receiver and positional
//! arguments. Binding pairs it with a weak receiver handle so the bundle can
//! expose it as a zero-setup callable. No argument or return wrapping.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::context::{Ctx, WeakCtx};
use crate::value::Value;

/// A method body: observes and mutates state through the receiver.
pub type MethodFn = Rc<dyn Fn(&Ctx, &[Value]) -> Value>;

/// A method bound to one invocation's receiver.
#[derive(Clone)]
pub struct Method {
    ctx: WeakCtx,
    body: MethodFn,
}

impl Method {
    /// Invoke against the bound receiver. After teardown this is a no-op
    /// returning `Undefined`.
    pub fn call(&self, args: &[Value]) -> Value {
        match self.ctx.upgrade() {
            Some(ctx) => (self.body)(&ctx, args),
            None => Value::Undefined,
        }
    }
}

/// Bind every method entry to the receiver and register it by name.
pub(crate) fn bind_methods(ctx: &Ctx, entries: &IndexMap<String, MethodFn>) {
    for (name, body) in entries {
        ctx.insert_method(
            name.clone(),
            Method {
                ctx: ctx.downgrade(),
                body: body.clone(),
            },
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use indexmap::IndexMap;

    fn ctx_with_count() -> Ctx {
        Ctx::assemble(
            IndexMap::new(),
            [("count".to_string(), Cell::new(Value::from(0)))]
                .into_iter()
                .collect(),
        )
    }

    fn entries<const N: usize>(pairs: [(&str, MethodFn); N]) -> IndexMap<String, MethodFn> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_method_mutates_through_receiver() {
        let ctx = ctx_with_count();
        bind_methods(
            &ctx,
            &entries([(
                "increment",
                Rc::new(|ctx: &Ctx, _: &[Value]| {
                    ctx.update("count", |v| {
                        Value::from(v.as_number().unwrap_or(0.0) + 1.0)
                    });
                    Value::Undefined
                }) as MethodFn,
            )]),
        );

        ctx.call("increment", &[]);
        ctx.call("increment", &[]);
        assert_eq!(ctx.get("count"), Value::from(2));
    }

    #[test]
    fn test_method_receives_arguments_and_returns() {
        let ctx = ctx_with_count();
        bind_methods(
            &ctx,
            &entries([(
                "add",
                Rc::new(|ctx: &Ctx, args: &[Value]| {
                    let delta = args.first().and_then(Value::as_number).unwrap_or(0.0);
                    ctx.update("count", move |v| {
                        Value::from(v.as_number().unwrap_or(0.0) + delta)
                    });
                    ctx.get("count")
                }) as MethodFn,
            )]),
        );

        let result = ctx.call("add", &[Value::from(5)]);
        assert_eq!(result, Value::from(5));
    }

    #[test]
    fn test_methods_can_call_methods() {
        let ctx = ctx_with_count();
        bind_methods(
            &ctx,
            &entries([
                (
                    "increment",
                    Rc::new(|ctx: &Ctx, _: &[Value]| {
                        ctx.update("count", |v| {
                            Value::from(v.as_number().unwrap_or(0.0) + 1.0)
                        });
                        Value::Undefined
                    }) as MethodFn,
                ),
                (
                    "increment_twice",
                    Rc::new(|ctx: &Ctx, _: &[Value]| {
                        ctx.call("increment", &[]);
                        ctx.call("increment", &[])
                    }) as MethodFn,
                ),
            ]),
        );

        ctx.call("increment_twice", &[]);
        assert_eq!(ctx.get("count"), Value::from(2));
    }

    #[test]
    fn test_call_after_teardown_is_noop() {
        let method = {
            let ctx = ctx_with_count();
            bind_methods(
                &ctx,
                &entries([(
                    "noop",
                    Rc::new(|_: &Ctx, _: &[Value]| Value::from(1)) as MethodFn,
                )]),
            );
            ctx.method("noop").unwrap()
        };
        // Receiver dropped; the bound method survives but does nothing.
        assert_eq!(method.call(&[]), Value::Undefined);
    }
}
