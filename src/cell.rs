//! Reactive Cells - Storage allocation for props and data fields.
//!
//! Every receiver field lives in a [`Cell`]:
//!
//! - primitive and list initial values get a single [`Signal`] cell;
//! - object initial values get a [`ReactiveObject`] with one cell per field,
//!   recursively, so mutating one nested field only notifies observers of
//!   that field.
//!
//! `ReactiveObject` is the dynamic analog of spark-signals' `Reactive`
//! derive, which expands a struct into per-field signals. The key set is
//! fixed at construction; writes to unknown keys are dropped.
//!
//! Both cell kinds share one read/write contract: `get` materializes the
//! current value (registering a dependency on everything it reads), `set`
//! replaces it, `field` reaches into a deep cell.

use std::rc::Rc;

use indexmap::IndexMap;
use spark_signals::{Signal, signal};

use crate::value::Value;

/// The `data` initializer: a zero-argument function producing the initial
/// field map. It receives nothing, so it is pure of prop access by
/// construction.
pub type DataFn = Rc<dyn Fn() -> IndexMap<String, Value>>;

// =============================================================================
// Cell
// =============================================================================

/// A single reactive storage location on the receiver.
#[derive(Clone)]
pub enum Cell {
    /// Whole-value storage for primitives and lists.
    Plain(Signal<Value>),
    /// Per-field storage for objects.
    Deep(ReactiveObject),
}

impl Cell {
    /// Allocate storage for an initial value, deep for objects.
    pub fn new(initial: Value) -> Self {
        match initial {
            Value::Object(fields) => Cell::Deep(ReactiveObject::new(fields)),
            other => Cell::Plain(signal(other)),
        }
    }

    /// Read the current value. Inside an effect or derived, this registers a
    /// dependency on the cell (every field of it, for deep cells).
    pub fn get(&self) -> Value {
        match self {
            Cell::Plain(sig) => sig.get(),
            Cell::Deep(obj) => obj.snapshot(),
        }
    }

    /// Replace the current value.
    ///
    /// Writing a non-object into a deep cell is dropped: the cell's shape was
    /// fixed when the initial value was allocated.
    pub fn set(&self, value: Value) {
        match self {
            Cell::Plain(sig) => {
                sig.set(value);
            }
            Cell::Deep(obj) => {
                if let Value::Object(map) = value {
                    obj.assign(map);
                }
            }
        }
    }

    /// Read-modify-write convenience.
    pub fn update(&self, f: impl FnOnce(Value) -> Value) {
        self.set(f(self.get()));
    }

    /// The nested cell behind a field of a deep cell.
    pub fn field(&self, name: &str) -> Option<Cell> {
        match self {
            Cell::Plain(_) => None,
            Cell::Deep(obj) => obj.field(name),
        }
    }

    pub fn is_deep(&self) -> bool {
        matches!(self, Cell::Deep(_))
    }
}

// =============================================================================
// ReactiveObject
// =============================================================================

/// Deep reactive storage for an object value: one cell per field.
#[derive(Clone)]
pub struct ReactiveObject {
    fields: Rc<IndexMap<String, Cell>>,
}

impl ReactiveObject {
    fn new(initial: IndexMap<String, Value>) -> Self {
        let fields = initial
            .into_iter()
            .map(|(name, value)| (name, Cell::new(value)))
            .collect();
        Self {
            fields: Rc::new(fields),
        }
    }

    /// The cell backing one field.
    pub fn field(&self, name: &str) -> Option<Cell> {
        self.fields.get(name).cloned()
    }

    /// Materialize the current object value, reading every field.
    pub fn snapshot(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, cell)| (name.clone(), cell.get()))
                .collect(),
        )
    }

    /// Write a new object value field by field. Fields missing from the
    /// incoming map become `Undefined`; incoming keys outside the fixed key
    /// set are dropped.
    fn assign(&self, mut incoming: IndexMap<String, Value>) {
        for (name, cell) in self.fields.iter() {
            let value = incoming.shift_remove(name).unwrap_or(Value::Undefined);
            cell.set(value);
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

// =============================================================================
// State Builder
// =============================================================================

/// Run the `data` initializer and allocate one cell per returned key.
pub(crate) fn build_state(data: Option<&DataFn>) -> IndexMap<String, Cell> {
    let Some(init) = data else {
        return IndexMap::new();
    };
    init()
        .into_iter()
        .map(|(name, value)| (name, Cell::new(value)))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
