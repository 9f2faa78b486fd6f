//! Watch Binder - Per-field watchers and auto-tracked effects.
//!
//! Both registration forms map onto the runtime's `effect` primitive:
//!
//! - a `watch` entry observes one named source (a cell, or a computed value)
//!   and fires its callback with `(new, old)` on change. The effect's first
//!   run only primes the previous-value slot; the callback never fires for
//!   the initial value.
//! - a `watch_effect` entry is registered as-is: it runs once immediately
//!   (collecting dependencies) and re-runs whenever anything it last read
//!   changes.
//!
//! The runtime holds an effect only weakly through its dependencies, so both
//! binders hand their dispose guards back to the caller. The invocation
//! pipeline retains them on the composition context; dropping them releases
//! the watchers.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use spark_signals::effect;

use crate::composition::EffectGuard;
use crate::context::Ctx;
use crate::value::Value;

/// A per-field watch callback: `(receiver, new, old)`.
pub type WatchFn = Rc<dyn Fn(&Ctx, &Value, &Value)>;

/// An auto-tracked effect body.
pub type WatchEffectFn = Rc<dyn Fn(&Ctx)>;

/// Register one effect per `watch` entry and return the dispose guards.
///
/// A deep cell source registers a dependency on every field, so nested
/// mutation fires the callback with full old/new snapshots. Entries naming
/// neither a cell nor a computed register nothing.
pub(crate) fn bind_watch(ctx: &Ctx, entries: &IndexMap<String, WatchFn>) -> Vec<EffectGuard> {
    let mut guards: Vec<EffectGuard> = Vec::with_capacity(entries.len());
    for (field, callback) in entries {
        let read: Box<dyn Fn() -> Value> = if let Some(cell) = ctx.cell(field) {
            Box::new(move || cell.get())
        } else if let Some(computed) = ctx.computed(field) {
            Box::new(move || computed.get())
        } else {
            continue;
        };

        let previous: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
        let ctx = ctx.clone();
        let callback = callback.clone();
        let stop = effect(move || {
            let current = read();
            let old = {
                let mut slot = previous.borrow_mut();
                let old = slot.take();
                *slot = Some(current.clone());
                old
            };
            // First run primes the slot without firing.
            if let Some(old) = old
                && old != current
            {
                callback(&ctx, &current, &old);
            }
        });
        guards.push(Box::new(stop));
    }
    guards
}

/// Register every `watch_effect` entry as an auto-tracked effect bound to
/// the receiver, returning the dispose guards.
pub(crate) fn bind_watch_effect(
    ctx: &Ctx,
    entries: &IndexMap<String, WatchEffectFn>,
) -> Vec<EffectGuard> {
    let mut guards: Vec<EffectGuard> = Vec::with_capacity(entries.len());
    for body in entries.values() {
        let ctx = ctx.clone();
        let body = body.clone();
        guards.push(Box::new(effect(move || body(&ctx))));
    }
    guards
}

// =============================================================================
// Tests
// =============================================================================
