//! Context Assembler - The bound receiver for author-supplied bodies.
//!
//! [`Ctx`] is the receiver every computed, method, watch and lifecycle body
//! gets as its first argument: the explicit stand-in for an implicit `this`.
//! It merges prop cells and data cells into one ordered namespace (props
//! first, then data) and, once binding completes, also exposes computed
//! values and bound methods under their names.
//!
//! Accessors hand out the live cell, never a value snapshot: reads performed
//! through the context inside an effect or derived register real
//! dependencies on the underlying signals.
//!
//! `Ctx` is a cheap `Rc` handle. Binders that store closures *inside* the
//! context (computed, methods) capture a [`WeakCtx`] so the receiver does
//! not own itself.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::cell::Cell;
use crate::computed::Computed;
use crate::methods::Method;
use crate::value::Value;

// =============================================================================
// Ctx
// =============================================================================

/// The bound receiver for one invocation.
#[derive(Clone, Default)]
pub struct Ctx {
    inner: Rc<CtxInner>,
}

#[derive(Default)]
struct CtxInner {
    cells: RefCell<IndexMap<String, Cell>>,
    computed: RefCell<IndexMap<String, Computed>>,
    methods: RefCell<IndexMap<String, Method>>,
}

impl Ctx {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Assemble a receiver from resolved props and data cells, props first.
    pub(crate) fn assemble(
        props: IndexMap<String, Value>,
        state: IndexMap<String, Cell>,
    ) -> Self {
        let ctx = Self::new();
        {
            let mut cells = ctx.inner.cells.borrow_mut();
            for (name, value) in props {
                cells.insert(name, Cell::new(value));
            }
            for (name, cell) in state {
                cells.insert(name, cell);
            }
        }
        ctx
    }

    pub(crate) fn downgrade(&self) -> WeakCtx {
        WeakCtx {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// The live cell behind a prop or data field.
    pub fn cell(&self, name: &str) -> Option<Cell> {
        self.inner.cells.borrow().get(name).cloned()
    }

    /// The nested cell behind a field of a deep cell.
    pub fn field(&self, name: &str, key: &str) -> Option<Cell> {
        self.cell(name).and_then(|cell| cell.field(key))
    }

    /// Read a field: cells first, then computed values. Unknown names read
    /// as `Undefined`.
    pub fn get(&self, name: &str) -> Value {
        if let Some(cell) = self.cell(name) {
            return cell.get();
        }
        if let Some(computed) = self.computed(name) {
            return computed.get();
        }
        Value::Undefined
    }

    /// Write a field. Only cells are writable; computed values are derived,
    /// not independently mutable, so writes to them (and to unknown names)
    /// are dropped.
    pub fn set(&self, name: &str, value: Value) {
        if let Some(cell) = self.cell(name) {
            cell.set(value);
        }
    }

    /// Read-modify-write a field.
    pub fn update(&self, name: &str, f: impl FnOnce(Value) -> Value) {
        if let Some(cell) = self.cell(name) {
            cell.update(f);
        }
    }

    // =========================================================================
    // Computed / Methods
    // =========================================================================

    pub fn computed(&self, name: &str) -> Option<Computed> {
        self.inner.computed.borrow().get(name).cloned()
    }

    pub fn method(&self, name: &str) -> Option<Method> {
        self.inner.methods.borrow().get(name).cloned()
    }

    /// Call a bound method. Unknown names return `Undefined`.
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        match self.method(name) {
            Some(method) => method.call(args),
            None => Value::Undefined,
        }
    }

    pub(crate) fn insert_computed(&self, name: String, computed: Computed) {
        self.inner.computed.borrow_mut().insert(name, computed);
    }

    pub(crate) fn insert_method(&self, name: String, method: Method) {
        self.inner.methods.borrow_mut().insert(name, method);
    }

    // =========================================================================
    // Typed conveniences
    // =========================================================================

    /// Read a field rendered as a string.
    pub fn str(&self, name: &str) -> String {
        self.get(name).to_string()
    }

    /// Read a field as a number; non-numbers read as 0.
    pub fn number(&self, name: &str) -> f64 {
        self.get(name).as_number().unwrap_or(0.0)
    }

    /// Read a field as a boolean; non-booleans read as false.
    pub fn bool(&self, name: &str) -> bool {
        self.get(name).as_bool().unwrap_or(false)
    }

    /// All exposed names in order: cells (props first, then data), computed,
    /// methods.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.cells.borrow().keys().cloned().collect();
        names.extend(self.inner.computed.borrow().keys().cloned());
        names.extend(self.inner.methods.borrow().keys().cloned());
        names
    }
}

// =============================================================================
// WeakCtx
// =============================================================================

/// Non-owning handle to a receiver, held by closures the receiver stores.
#[derive(Clone, Default)]
pub struct WeakCtx {
    inner: Weak<CtxInner>,
}

impl WeakCtx {
    pub fn upgrade(&self) -> Option<Ctx> {
        self.inner.upgrade().map(|inner| Ctx { inner })
    }
}

// =============================================================================
// Tests
// =============================================================================
