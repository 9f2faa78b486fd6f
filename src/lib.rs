//! # spark-options
//!
//! Classic options-style component descriptions on top of
//! [spark-signals](https://crates.io/crates/spark-signals) fine-grained
//! reactivity.
//!
//! A component author writes one declarative description — props schema,
//! `data` initializer, computed values, methods, watchers, lifecycle hooks —
//! and [`define`] turns it into a reusable composable. Each invocation
//! validates the supplied props, allocates reactive cells, assembles a bound
//! receiver ([`Ctx`], the explicit stand-in for an implicit `this`), and
//! wires every entry against the signal runtime's primitives: cells become
//! signals, computed entries become deriveds, watchers become effects, and
//! lifecycle slots register into the invocation's [`Composition`] context.
//!
//! Rendering, scheduling and dependency tracking stay with the host runtime;
//! this crate is only the translation layer.
//!
//! ```
//! use spark_options::{ComponentOptions, PropSpec, PropsSpec, TypeTag, Value, args, define};
//!
//! let counter = define(
//!     ComponentOptions::new()
//!         .props(PropsSpec::schema([("title", PropSpec::of(TypeTag::String))]))
//!         .data(|| [("count", Value::from(0))])
//!         .computed("title_with_count", |ctx| {
//!             Value::from(format!("{} {}", ctx.get("title"), ctx.get("count")))
//!         })
//!         .method("increment", |ctx, _| {
//!             ctx.update("count", |v| Value::from(v.as_number().unwrap_or(0.0) + 1.0));
//!             Value::Undefined
//!         }),
//! );
//!
//! let bundle = counter.invoke(args([("title", Value::from("Count:"))])).unwrap();
//! assert_eq!(bundle.get("title_with_count"), Value::from("Count: 0"));
//!
//! bundle.call("increment", &[]);
//! assert_eq!(bundle.get("title_with_count"), Value::from("Count: 1"));
//! ```
//!
//! ## Modules
//!
//! - [`value`] - Runtime-typed values and type tags
//! - [`props`] - Prop schema normalization and validation
//! - [`cell`] - Reactive cells, deep reactive objects, state building
//! - [`context`] - The bound receiver
//! - [`computed`] / [`methods`] / [`watch`] - The binder stages
//! - [`lifecycle`] / [`composition`] - Hook slots and the host context
//! - [`composable`] - The factory and the public bundle

pub mod cell;
pub mod composable;
pub mod composition;
pub mod computed;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod methods;
pub mod props;
pub mod value;
pub mod watch;

pub use cell::{Cell, DataFn, ReactiveObject};
pub use composable::{Bundle, ComponentOptions, Composable, args, define};
pub use composition::Composition;
pub use computed::{Computed, ComputedFn};
pub use context::{Ctx, WeakCtx};
pub use error::Error;
pub use lifecycle::{HookFn, LifecycleEvent};
pub use methods::{Method, MethodFn};
pub use props::{PropArgs, PropDefault, PropSpec, PropsSpec, TypeCheck};
pub use value::{NativeFn, TypeTag, Value};
pub use watch::{WatchEffectFn, WatchFn};
