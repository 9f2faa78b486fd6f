//! Lifecycle Binder - Named hook slots registered against the composition.
//!
//! The slot set is fixed: `mounted`, `unmounted`, `before_update`,
//! `updated`, `render_tracked`, `render_triggered`. The binder registers
//! each slot present in the description against the composition context,
//! bound to the receiver; absent slots register nothing. Firing is the
//! host's side of the contract (see [`crate::composition`]).

use std::cell::RefCell;
use std::rc::Rc;

use crate::composition::Composition;
use crate::context::Ctx;

/// A lifecycle hook body, bound to the receiver at registration time.
pub type HookFn = Rc<dyn Fn(&Ctx)>;

/// The fixed lifecycle slot set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Mounted,
    Unmounted,
    BeforeUpdate,
    Updated,
    RenderTracked,
    RenderTriggered,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 6] = [
        LifecycleEvent::Mounted,
        LifecycleEvent::Unmounted,
        LifecycleEvent::BeforeUpdate,
        LifecycleEvent::Updated,
        LifecycleEvent::RenderTracked,
        LifecycleEvent::RenderTriggered,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            LifecycleEvent::Mounted => 0,
            LifecycleEvent::Unmounted => 1,
            LifecycleEvent::BeforeUpdate => 2,
            LifecycleEvent::Updated => 3,
            LifecycleEvent::RenderTracked => 4,
            LifecycleEvent::RenderTriggered => 5,
        }
    }
}

// =============================================================================
// Hook Table
// =============================================================================

/// Per-composition hook storage: one list per slot, fired in registration
/// order.
#[derive(Default)]
pub(crate) struct HookTable {
    slots: [RefCell<Vec<Rc<dyn Fn()>>>; 6],
}

impl HookTable {
    pub(crate) fn register(&self, event: LifecycleEvent, hook: Rc<dyn Fn()>) {
        self.slots[event.index()].borrow_mut().push(hook);
    }

    /// Fire every hook in one slot. The registration list is snapshotted
    /// first so a hook body may register further hooks without aliasing the
    /// table borrow.
    pub(crate) fn fire(&self, event: LifecycleEvent) {
        let hooks: Vec<Rc<dyn Fn()>> = self.slots[event.index()].borrow().clone();
        for hook in hooks {
            hook();
        }
    }
}

// =============================================================================
// Binder
// =============================================================================

/// Register each present hook slot against the composition, bound to the
/// receiver.
pub(crate) fn bind_lifecycle(
    ctx: &Ctx,
    hooks: &[Option<HookFn>; 6],
    composition: &Composition,
) {
    for event in LifecycleEvent::ALL {
        let Some(body) = &hooks[event.index()] else {
            continue;
        };
        let ctx = ctx.clone();
        let body = body.clone();
        composition.on(event, move || body(&ctx));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    #[test]
    fn test_fire_runs_hooks_in_registration_order() {
        let table = HookTable::default();
        let order: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            table.register(
                LifecycleEvent::Mounted,
                Rc::new(move || order.borrow_mut().push(i)),
            );
        }

        table.fire(LifecycleEvent::Mounted);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_slot_fires_nothing() {
        let table = HookTable::default();
        table.fire(LifecycleEvent::Updated);
    }

    #[test]
    fn test_slots_are_independent() {
        let table = HookTable::default();
        let mounted = Rc::new(StdCell::new(0));
        let updated = Rc::new(StdCell::new(0));

        let counter = mounted.clone();
        table.register(
            LifecycleEvent::Mounted,
            Rc::new(move || counter.set(counter.get() + 1)),
        );
        let counter = updated.clone();
        table.register(
            LifecycleEvent::Updated,
            Rc::new(move || counter.set(counter.get() + 1)),
        );

        table.fire(LifecycleEvent::Mounted);
        assert_eq!(mounted.get(), 1);
        assert_eq!(updated.get(), 0);
    }

    #[test]
    fn test_event_indices_cover_all_slots() {
        let mut seen = [false; 6];
        for event in LifecycleEvent::ALL {
            seen[event.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
