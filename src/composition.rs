//! Composition Context - The host-side boundary of one invocation.
//!
//! A [`Composition`] stands where the host UI runtime's composition context
//! would: it owns the invocation's effect scope (every watcher and effect
//! registered during binding lives inside it), carries the lifecycle hook
//! table, and exposes the driver surface the host calls:
//!
//! - [`Composition::mount`] fires `Mounted`, once;
//! - [`Composition::render`] installs a single reactive render
//!   subscription: the first run collects dependencies, and each
//!   dependency-driven re-run fires `RenderTriggered`,
//!   `BeforeUpdate`, the render body, `RenderTracked`, `Updated`;
//! - [`Composition::dispose`] stops the scope, which releases every
//!   registered effect and fires `Unmounted`, once.
//!
//! The adapter never re-orders or batches deliveries; propagation timing is
//! the signal runtime's.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{EffectScope, effect, effect_scope, on_scope_dispose};

use crate::lifecycle::{HookTable, LifecycleEvent};

/// The dispose guard the runtime returns for one registered effect. An
/// effect's dependencies hold it weakly; it stays alive only through this
/// guard or an enclosing scope.
pub(crate) type EffectGuard = Box<dyn FnOnce()>;

/// The per-invocation host context handle. Cheap to clone.
#[derive(Clone)]
pub struct Composition {
    inner: Rc<CompositionInner>,
}

struct CompositionInner {
    scope: RefCell<Option<EffectScope>>,
    guards: RefCell<Vec<EffectGuard>>,
    hooks: HookTable,
    mounted: Cell<bool>,
    disposed: Cell<bool>,
}

impl Composition {
    /// Create a fresh context with its own effect scope, and wire scope
    /// disposal to the `Unmounted` slot.
    pub(crate) fn new() -> Self {
        let composition = Self {
            inner: Rc::new(CompositionInner {
                scope: RefCell::new(Some(effect_scope(false))),
                guards: RefCell::new(Vec::new()),
                hooks: HookTable::default(),
                mounted: Cell::new(false),
                disposed: Cell::new(false),
            }),
        };
        let for_dispose = composition.clone();
        composition.enter(move || {
            on_scope_dispose(move || {
                for_dispose.inner.hooks.fire(LifecycleEvent::Unmounted);
            });
        });
        composition
    }

    /// Run a closure inside this context's effect scope, so effects created
    /// by it are released on dispose. After dispose this is a no-op.
    pub(crate) fn enter(&self, f: impl FnOnce() + 'static) {
        let scope = self.inner.scope.borrow();
        if let Some(scope) = &*scope {
            scope.run(f);
        }
    }

    /// Keep effect guards alive for the life of this context. Guards handed
    /// in after dispose are stopped on the spot.
    pub(crate) fn retain(&self, guards: Vec<EffectGuard>) {
        if self.inner.disposed.get() {
            for stop in guards {
                stop();
            }
            return;
        }
        self.inner.guards.borrow_mut().extend(guards);
    }

    // =========================================================================
    // Registration (the six named hook slots)
    // =========================================================================

    /// Register a hook on one lifecycle slot. Hooks fire in registration
    /// order.
    pub fn on(&self, event: LifecycleEvent, hook: impl Fn() + 'static) {
        self.inner.hooks.register(event, Rc::new(hook));
    }

    // =========================================================================
    // Host drivers
    // =========================================================================

    /// Fire `Mounted` hooks. Idempotent: a composition mounts at most once.
    pub fn mount(&self) {
        if self.inner.mounted.get() || self.inner.disposed.get() {
            return;
        }
        self.inner.mounted.set(true);
        self.inner.hooks.fire(LifecycleEvent::Mounted);
    }

    /// Fire one lifecycle slot directly.
    ///
    /// Escape hatch for hosts that drive their own render loop; `mount` and
    /// `dispose` remain the guarded paths for `Mounted` and `Unmounted`.
    pub fn notify(&self, event: LifecycleEvent) {
        self.inner.hooks.fire(event);
    }

    /// Install a host-style render effect around a render body.
    ///
    /// The body runs once immediately (dependency collection, followed by
    /// `RenderTracked`). Whenever a dependency changes, the re-run fires
    /// `RenderTriggered`, `BeforeUpdate`, the body, `RenderTracked`,
    /// `Updated`, in that order.
    pub fn render(&self, body: impl Fn() + 'static) {
        let composition = self.clone();
        let first = Cell::new(true);
        self.enter(move || {
            let _stop = effect(move || {
                if first.get() {
                    first.set(false);
                    body();
                    composition.notify(LifecycleEvent::RenderTracked);
                } else {
                    composition.notify(LifecycleEvent::RenderTriggered);
                    composition.notify(LifecycleEvent::BeforeUpdate);
                    body();
                    composition.notify(LifecycleEvent::RenderTracked);
                    composition.notify(LifecycleEvent::Updated);
                }
            });
        });
    }

    /// Tear down the context: stops the effect scope, releasing every
    /// watcher and effect, and fires `Unmounted`. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.get() {
            return;
        }
        self.inner.disposed.set(true);
        let scope = self.inner.scope.borrow_mut().take();
        if let Some(scope) = scope {
            scope.stop();
        }
        // The scope already stopped every effect registered inside it;
        // dropping the guards releases any registered outside of it.
        self.inner.guards.borrow_mut().clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::signal;

    fn counter_hook(counter: &Rc<Cell<u32>>) -> impl Fn() + 'static {
        let counter = counter.clone();
        move || counter.set(counter.get() + 1)
    }

    #[test]
    fn test_mount_fires_exactly_once() {
        let composition = Composition::new();
        let mounted = Rc::new(Cell::new(0));
        composition.on(LifecycleEvent::Mounted, counter_hook(&mounted));

        composition.mount();
        composition.mount();
        assert_eq!(mounted.get(), 1);
        assert!(composition.is_mounted());
    }

    #[test]
    fn test_dispose_fires_unmounted_exactly_once() {
        let composition = Composition::new();
        let unmounted = Rc::new(Cell::new(0));
        composition.on(LifecycleEvent::Unmounted, counter_hook(&unmounted));

        composition.dispose();
        composition.dispose();
        assert_eq!(unmounted.get(), 1);
        assert!(composition.is_disposed());
    }

    #[test]
    fn test_render_effect_fires_update_hooks_in_order() {
        let composition = Composition::new();
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        for (event, label) in [
            (LifecycleEvent::BeforeUpdate, "before_update"),
            (LifecycleEvent::Updated, "updated"),
            (LifecycleEvent::RenderTracked, "render_tracked"),
            (LifecycleEvent::RenderTriggered, "render_triggered"),
        ] {
            let order = order.clone();
            composition.on(event, move || order.borrow_mut().push(label));
        }

        let source = signal(0);
        let tracked = source.clone();
        let trace = order.clone();
        composition.render(move || {
            let _ = tracked.get();
            trace.borrow_mut().push("render");
        });

        assert_eq!(*order.borrow(), vec!["render", "render_tracked"]);

        order.borrow_mut().clear();
        source.set(1);
        assert_eq!(
            *order.borrow(),
            vec![
                "render_triggered",
                "before_update",
                "render",
                "render_tracked",
                "updated",
            ]
        );
    }

    #[test]
    fn test_dispose_stops_render_effect() {
        let composition = Composition::new();
        let renders = Rc::new(Cell::new(0));
        let source = signal(0);

        let tracked = source.clone();
        let counter = renders.clone();
        composition.render(move || {
            let _ = tracked.get();
            counter.set(counter.get() + 1);
        });
        assert_eq!(renders.get(), 1);

        source.set(1);
        assert_eq!(renders.get(), 2);

        composition.dispose();
        source.set(2);
        assert_eq!(renders.get(), 2);
    }

    #[test]
    fn test_mount_after_dispose_is_noop() {
        let composition = Composition::new();
        let mounted = Rc::new(Cell::new(0));
        composition.on(LifecycleEvent::Mounted, counter_hook(&mounted));

        composition.dispose();
        composition.mount();
        assert_eq!(mounted.get(), 0);
    }
}
