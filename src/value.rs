//! Dynamic Value Model - Runtime-typed values for declarative descriptions.
//!
//! Component descriptions are duck-typed: prop values, data initializers and
//! defaults carry heterogeneous values whose types are only known at runtime.
//! [`Value`] is the uniform carrier for all of them, and [`TypeTag`] names the
//! runtime type of a value the way prop schemas declare it.
//!
//! `Value` is `Clone + PartialEq` because cells and deriveds compare old and
//! new values to decide whether observers fire. Functions compare by pointer
//! identity.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// A plain function value carried inside a [`Value`].
///
/// Used for function-typed props and function defaults. Takes positional
/// arguments, returns a value.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Value>;

// =============================================================================
// TypeTag
// =============================================================================

/// Runtime type tag for prop type checks.
///
/// Labels follow the constructor-name precedent used by prop schemas
/// (`Expected String, got Number`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Function,
    Object,
    Array,
}

impl TypeTag {
    /// The display label used in validation error messages.
    pub fn label(self) -> &'static str {
        match self {
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::Function => "Function",
            TypeTag::Object => "Object",
            TypeTag::Array => "Array",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Value
// =============================================================================

/// A runtime-typed value.
///
/// `Undefined` doubles as "no value supplied": a prop explicitly passed as
/// `Undefined` behaves exactly like an absent prop.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
    Func(NativeFn),
}

impl Value {
    /// Build an object value from key/value pairs, preserving order.
    pub fn object<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list value.
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Build a function value.
    pub fn func<F: Fn(&[Value]) -> Value + 'static>(f: F) -> Self {
        Value::Func(Rc::new(f))
    }

    /// The runtime type tag of this value. `Undefined` has none.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Undefined => None,
            Value::Bool(_) => Some(TypeTag::Boolean),
            Value::Number(_) => Some(TypeTag::Number),
            Value::Str(_) => Some(TypeTag::String),
            Value::List(_) => Some(TypeTag::Array),
            Value::Object(_) => Some(TypeTag::Object),
            Value::Func(_) => Some(TypeTag::Function),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Composite values get deep reactive storage instead of a single cell.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

// =============================================================================
// Equality / Debug / Display
// =============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Functions are equal only when they are the same allocation.
            (Value::Func(a), Value::Func(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Object(map) => f.debug_tuple("Object").field(map).finish(),
            Value::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Interpolation-friendly rendering: strings are unquoted, fractionless
/// numbers print without a decimal point (`0`, not `0.0`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Func(_) => f.write_str("[function]"),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

// =============================================================================
// Tests
// =============================================================================
