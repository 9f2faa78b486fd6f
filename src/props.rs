//! Prop Schema Validator - Normalization and validation of prop specs.
//!
//! A props specification comes in two shapes: a bare list of names (every
//! prop accepts anything, nothing is required) or a schema mapping each name
//! to a [`PropSpec`] descriptor. Validation first normalizes both shapes to
//! the canonical descriptor map, then runs in two passes over declaration
//! order:
//!
//! 1. supplied values: type check, then custom validator;
//! 2. resolution: supplied value, else default (factories invoked exactly
//!    once per invocation), else `required` fails, else `Undefined`.
//!
//! Type-mismatch failures therefore always surface before missing-required
//! failures, and every declared name is present in the resolved output.
//! Validation completes (or fails) before any reactive storage is allocated.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::Error;
use crate::value::{TypeTag, Value};

/// The per-invocation prop argument bag. Absent keys and `Undefined` values
/// are equivalent.
pub type PropArgs = IndexMap<String, Value>;

// =============================================================================
// Descriptors
// =============================================================================

/// Declared type constraint of a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeCheck {
    /// Accept any value, skip type checking (`type: true` or absent type).
    #[default]
    Any,
    /// The supplied value's runtime tag must match.
    Tag(TypeTag),
}

/// Default for an optional prop: a literal, or a zero-argument factory.
///
/// Factories exist so composite defaults get a fresh allocation per
/// invocation instead of a shared reference.
#[derive(Clone)]
pub enum PropDefault {
    Literal(Value),
    Factory(Rc<dyn Fn() -> Value>),
}

impl PropDefault {
    fn resolve(&self) -> Value {
        match self {
            PropDefault::Literal(v) => v.clone(),
            PropDefault::Factory(f) => f(),
        }
    }
}

/// Canonical prop descriptor.
#[derive(Clone, Default)]
pub struct PropSpec {
    pub check: TypeCheck,
    pub required: bool,
    pub default: Option<PropDefault>,
    pub validator: Option<Rc<dyn Fn(&Value) -> bool>>,
}

impl PropSpec {
    /// Descriptor accepting any value (the array-form equivalent).
    pub fn any() -> Self {
        Self::default()
    }

    /// Descriptor constrained to one runtime type.
    pub fn of(tag: TypeTag) -> Self {
        Self {
            check: TypeCheck::Tag(tag),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Literal default, used when no value is supplied.
    pub fn default_value(mut self, v: impl Into<Value>) -> Self {
        self.default = Some(PropDefault::Literal(v.into()));
        self
    }

    /// Factory default, invoked once per invocation when no value is supplied.
    pub fn default_with(mut self, f: impl Fn() -> Value + 'static) -> Self {
        self.default = Some(PropDefault::Factory(Rc::new(f)));
        self
    }

    /// Custom validation predicate, run on supplied values after the type check.
    pub fn validator(mut self, f: impl Fn(&Value) -> bool + 'static) -> Self {
        self.validator = Some(Rc::new(f));
        self
    }
}

/// Mirrors the `title: String` descriptor shorthand.
impl From<TypeTag> for PropSpec {
    fn from(tag: TypeTag) -> Self {
        PropSpec::of(tag)
    }
}

// =============================================================================
// Specification
// =============================================================================

/// A props specification: either a bare name list or a full schema.
#[derive(Clone, Default)]
pub enum PropsSpec {
    #[default]
    Empty,
    /// Array form: every listed name is optional and untyped.
    Names(Vec<String>),
    /// Map form: each name carries a descriptor.
    Schema(IndexMap<String, PropSpec>),
}

impl PropsSpec {
    pub fn names<K: Into<String>, I: IntoIterator<Item = K>>(names: I) -> Self {
        PropsSpec::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn schema<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PropSpec)>,
    {
        PropsSpec::Schema(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Normalize to the canonical descriptor map. Array form becomes
    /// `{ required: false, type: any }` for every listed name.
    fn canonical(&self) -> IndexMap<String, PropSpec> {
        match self {
            PropsSpec::Empty => IndexMap::new(),
            PropsSpec::Names(names) => names
                .iter()
                .map(|name| (name.clone(), PropSpec::any()))
                .collect(),
            PropsSpec::Schema(schema) => schema.clone(),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate an argument bag against a props specification.
///
/// Returns the resolved name -> value map in declaration order, or the first
/// failure. Undeclared argument keys are ignored.
pub fn validate(spec: &PropsSpec, args: &PropArgs) -> Result<IndexMap<String, Value>, Error> {
    let schema = spec.canonical();

    // Pass 1: check supplied values in declaration order.
    for (name, prop) in &schema {
        let Some(value) = args.get(name) else { continue };
        let Some(actual) = value.type_tag() else {
            // Explicit Undefined counts as absent.
            continue;
        };

        if let TypeCheck::Tag(expected) = prop.check
            && actual != expected
        {
            return Err(Error::TypeMismatch {
                name: name.clone(),
                expected,
                actual,
            });
        }

        if let Some(validator) = &prop.validator
            && !validator(value)
        {
            return Err(Error::FailedValidator { name: name.clone() });
        }
    }

    // Pass 2: resolve every declared prop in declaration order.
    let mut resolved = IndexMap::with_capacity(schema.len());
    for (name, prop) in &schema {
        let supplied = args.get(name).filter(|v| !v.is_undefined());
        let value = match supplied {
            Some(v) => v.clone(),
            None => match &prop.default {
                Some(default) => default.resolve(),
                None if prop.required => {
                    return Err(Error::MissingRequired { name: name.clone() });
                }
                None => Value::Undefined,
            },
        };
        resolved.insert(name.clone(), value);
    }

    Ok(resolved)
}

// =============================================================================
// Tests
// =============================================================================
