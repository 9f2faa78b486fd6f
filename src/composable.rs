//! Adapter Factory - Declarative descriptions turned into reactive bundles.
//!
//! [`define`] captures a [`ComponentOptions`] description once and returns a
//! reusable [`Composable`]. Each [`Composable::invoke`] call runs the full
//! pipeline for one composition context:
//!
//! 1. validate props (completes before any state allocation);
//! 2. run the `data` initializer and reject prop/data key collisions;
//! 3. assemble the bound receiver (prop cells first, then data cells);
//! 4. inside a fresh effect scope: bind computed, methods, watchers,
//!    auto-tracked effects and lifecycle hooks.
//!
//! Invocations are independent: two bundles from the same factory share no
//! storage. The bundle's lifetime is the composition context's; dropping an
//! undisposed bundle tears the context down.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::cell::{Cell, DataFn, build_state};
use crate::composition::Composition;
use crate::computed::{Computed, ComputedFn, bind_computed};
use crate::context::Ctx;
use crate::error::Error;
use crate::lifecycle::{HookFn, LifecycleEvent, bind_lifecycle};
use crate::methods::{Method, MethodFn, bind_methods};
use crate::props::{PropArgs, PropsSpec, validate};
use crate::value::Value;
use crate::watch::{WatchEffectFn, WatchFn, bind_watch, bind_watch_effect};

// =============================================================================
// Component Description
// =============================================================================

/// The declarative component description.
///
/// Every option is explicitly enumerated and defaulted (empty props, no
/// data, no hooks), so absent entries are uniformly no-ops for the binder
/// stages, never errors. Immutable once handed to [`define`].
#[derive(Default)]
pub struct ComponentOptions {
    pub(crate) props: PropsSpec,
    pub(crate) data: Option<DataFn>,
    pub(crate) computed: IndexMap<String, ComputedFn>,
    pub(crate) methods: IndexMap<String, MethodFn>,
    pub(crate) watch: IndexMap<String, WatchFn>,
    pub(crate) watch_effect: IndexMap<String, WatchEffectFn>,
    pub(crate) hooks: [Option<HookFn>; 6],
}

impl ComponentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the props specification.
    pub fn props(mut self, spec: PropsSpec) -> Self {
        self.props = spec;
        self
    }

    /// Declare the `data` initializer. It receives nothing and returns the
    /// initial field map; it runs once per invocation.
    pub fn data<F, I, K>(mut self, init: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.data = Some(Rc::new(move || {
            init().into_iter().map(|(k, v)| (k.into(), v)).collect()
        }));
        self
    }

    /// Add a computed entry.
    pub fn computed(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&Ctx) -> Value + 'static,
    ) -> Self {
        self.computed.insert(name.into(), Rc::new(body));
        self
    }

    /// Add a method entry.
    pub fn method(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&Ctx, &[Value]) -> Value + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(body));
        self
    }

    /// Watch one named source (a cell or a computed value); the callback
    /// receives `(receiver, new, old)`.
    pub fn watch(
        mut self,
        field: impl Into<String>,
        callback: impl Fn(&Ctx, &Value, &Value) + 'static,
    ) -> Self {
        self.watch.insert(field.into(), Rc::new(callback));
        self
    }

    /// Add an auto-tracked effect entry. The key only identifies the entry.
    pub fn watch_effect(mut self, name: impl Into<String>, body: impl Fn(&Ctx) + 'static) -> Self {
        self.watch_effect.insert(name.into(), Rc::new(body));
        self
    }

    fn hook(mut self, event: LifecycleEvent, body: impl Fn(&Ctx) + 'static) -> Self {
        self.hooks[event.index()] = Some(Rc::new(body));
        self
    }

    pub fn mounted(self, body: impl Fn(&Ctx) + 'static) -> Self {
        self.hook(LifecycleEvent::Mounted, body)
    }

    pub fn unmounted(self, body: impl Fn(&Ctx) + 'static) -> Self {
        self.hook(LifecycleEvent::Unmounted, body)
    }

    pub fn before_update(self, body: impl Fn(&Ctx) + 'static) -> Self {
        self.hook(LifecycleEvent::BeforeUpdate, body)
    }

    pub fn updated(self, body: impl Fn(&Ctx) + 'static) -> Self {
        self.hook(LifecycleEvent::Updated, body)
    }

    pub fn render_tracked(self, body: impl Fn(&Ctx) + 'static) -> Self {
        self.hook(LifecycleEvent::RenderTracked, body)
    }

    pub fn render_triggered(self, body: impl Fn(&Ctx) + 'static) -> Self {
        self.hook(LifecycleEvent::RenderTriggered, body)
    }
}

/// Build a prop argument bag from pairs.
pub fn args<K, I>(pairs: I) -> PropArgs
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

// =============================================================================
// Composable
// =============================================================================

/// A configured factory: one description, any number of invocations.
#[derive(Clone)]
pub struct Composable {
    options: Rc<ComponentOptions>,
}

/// Capture a description and return the reusable factory.
pub fn define(options: ComponentOptions) -> Composable {
    Composable {
        options: Rc::new(options),
    }
}

impl Composable {
    /// Run the adapter pipeline for one composition context.
    ///
    /// Validation failures abort before any reactive state is allocated; no
    /// partial bundle is ever returned.
    pub fn invoke(&self, props: PropArgs) -> Result<Bundle, Error> {
        let resolved = validate(&self.options.props, &props)?;

        let state = build_state(self.options.data.as_ref());
        for name in state.keys() {
            if resolved.contains_key(name) {
                return Err(Error::DuplicateField { name: name.clone() });
            }
        }

        let ctx = Ctx::assemble(resolved, state);
        let composition = Composition::new();

        let options = self.options.clone();
        let bind_ctx = ctx.clone();
        let owner = composition.clone();
        composition.enter(move || {
            bind_computed(&bind_ctx, &options.computed);
            bind_methods(&bind_ctx, &options.methods);
            owner.retain(bind_watch(&bind_ctx, &options.watch));
            owner.retain(bind_watch_effect(&bind_ctx, &options.watch_effect));
        });
        bind_lifecycle(&ctx, &self.options.hooks, &composition);

        Ok(Bundle { ctx, composition })
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// The public reactive bundle of one invocation: the exposed cells, computed
/// values and bound methods, plus the composition handle the host drives.
pub struct Bundle {
    ctx: Ctx,
    composition: Composition,
}

impl Bundle {
    /// Read a field or computed value.
    pub fn get(&self, name: &str) -> Value {
        self.ctx.get(name)
    }

    /// Write a field. Computed values are not writable.
    pub fn set(&self, name: &str, value: Value) {
        self.ctx.set(name, value);
    }

    /// The live cell behind a prop or data field.
    pub fn cell(&self, name: &str) -> Option<Cell> {
        self.ctx.cell(name)
    }

    /// A bound computed value.
    pub fn computed(&self, name: &str) -> Option<Computed> {
        self.ctx.computed(name)
    }

    /// A bound method.
    pub fn method(&self, name: &str) -> Option<Method> {
        self.ctx.method(name)
    }

    /// Call a bound method.
    pub fn call(&self, name: &str, arguments: &[Value]) -> Value {
        self.ctx.call(name, arguments)
    }

    /// Every exposed name, in order: props, data, computed, methods.
    pub fn names(&self) -> Vec<String> {
        self.ctx.names()
    }

    /// The bound receiver itself, for host glue that needs it.
    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    /// The composition context driving lifecycle for this bundle.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Fire the `Mounted` hooks, once.
    pub fn mount(&self) {
        self.composition.mount();
    }

    /// Tear down: release every watcher and effect, fire `Unmounted`.
    pub fn unmount(self) {
        self.composition.dispose();
    }
}

impl Drop for Bundle {
    fn drop(&mut self) {
        self.composition.dispose();
    }
}

// Bundles hold closures, so the exposed fields are opaque here. `Debug` is
// what lets `Result<Bundle, Error>` work with `unwrap_err` and friends.
impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("names", &self.names())
            .field("mounted", &self.composition.is_mounted())
            .field("disposed", &self.composition.is_disposed())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
