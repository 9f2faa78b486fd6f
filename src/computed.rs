//! Derived Value Binder - `computed` entries as spark-signals deriveds.
//!
//! Each computed entry becomes a `derived` whose closure re-executes the
//! author's body against the live receiver. Dependency tracking and
//! memoization are entirely the runtime's: the binder's only job is binding
//! the receiver and registering the derivation under its name.

use std::rc::Rc;

use indexmap::IndexMap;
use spark_signals::{Derived, derived};

use crate::context::Ctx;
use crate::value::Value;

/// A computed body: derives a value from the receiver's current state.
pub type ComputedFn = Rc<dyn Fn(&Ctx) -> Value>;

type Getter = Box<dyn Fn() -> Value>;

/// A bound computed value: read-only, memoized, recomputed by the runtime
/// when any cell it read changes.
#[derive(Clone)]
pub struct Computed {
    inner: Rc<Derived<Value>>,
}

impl Computed {
    /// Current value. Inside an effect, reading a computed registers a
    /// dependency on it.
    pub fn get(&self) -> Value {
        self.inner.get()
    }
}

/// Wrap every computed entry and register it on the receiver.
///
/// The derived closure holds a weak receiver handle: the receiver stores the
/// derivation, so a strong capture would make it own itself. A dead receiver
/// (only possible mid-teardown) derives `Undefined`.
pub(crate) fn bind_computed(ctx: &Ctx, entries: &IndexMap<String, ComputedFn>) {
    for (name, body) in entries {
        let weak = ctx.downgrade();
        let body = body.clone();
        let getter: Getter = Box::new(move || match weak.upgrade() {
            Some(ctx) => body(&ctx),
            None => Value::Undefined,
        });
        ctx.insert_computed(
            name.clone(),
            Computed {
                inner: Rc::new(derived(getter)),
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
    use spark_signals::effect;
    use std::cell::Cell as StdCell;

    fn counter_ctx() -> Ctx {
        Ctx::assemble(
            [("title".to_string(), Value::from("Count:"))]
                .into_iter()
                .collect(),
            [("count".to_string(), Cell::new(Value::from(0)))]
                .into_iter()
                .collect(),
        )
    }

    fn entries<const N: usize>(
        pairs: [(&str, ComputedFn); N],
    ) -> IndexMap<String, ComputedFn> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_computed_reads_receiver_state() {
        let ctx = counter_ctx();
        bind_computed(
            &ctx,
            &entries([(
                "title_with_count",
                Rc::new(|ctx: &Ctx| {
                    Value::from(format!("{} {}", ctx.get("title"), ctx.get("count")))
                }) as ComputedFn,
            )]),
        );

        assert_eq!(ctx.get("title_with_count"), Value::from("Count: 0"));
    }

    #[test]
    fn test_computed_recomputes_after_mutation() {
        let ctx = counter_ctx();
        bind_computed(
            &ctx,
            &entries([(
                "doubled",
                Rc::new(|ctx: &Ctx| Value::from(ctx.number("count") * 2.0)) as ComputedFn,
            )]),
        );

        assert_eq!(ctx.get("doubled"), Value::from(0));
        ctx.set("count", Value::from(3));
        assert_eq!(ctx.get("doubled"), Value::from(6));
    }

    #[test]
    fn test_effect_tracks_computed() {
        let ctx = counter_ctx();
        bind_computed(
            &ctx,
            &entries([(
                "doubled",
                Rc::new(|ctx: &Ctx| Value::from(ctx.number("count") * 2.0)) as ComputedFn,
            )]),
        );

        let runs = Rc::new(StdCell::new(0));
        let seen = Rc::new(std::cell::RefCell::new(Value::Undefined));
        let doubled = ctx.computed("doubled").unwrap();
        let runs_clone = runs.clone();
        let seen_clone = seen.clone();
        let _stop = effect(move || {
            *seen_clone.borrow_mut() = doubled.get();
            runs_clone.set(runs_clone.get() + 1);
        });

        assert_eq!(runs.get(), 1);
        assert_eq!(*seen.borrow(), Value::from(0));

        ctx.set("count", Value::from(5));
        assert_eq!(runs.get(), 2);
        assert_eq!(*seen.borrow(), Value::from(10));
    }

    #[test]
    fn test_computed_is_not_writable() {
        let ctx = counter_ctx();
        bind_computed(
            &ctx,
            &entries([(
                "doubled",
                Rc::new(|ctx: &Ctx| Value::from(ctx.number("count") * 2.0)) as ComputedFn,
            )]),
        );

        ctx.set("doubled", Value::from(99));
        assert_eq!(ctx.get("doubled"), Value::from(0));
    }
}
