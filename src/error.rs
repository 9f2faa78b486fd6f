//! Adapter Errors - Validation failures that abort an invocation.
//!
//! Every error here is raised synchronously while an invocation is being
//! assembled, before any reactive state survives the call. A failed
//! invocation never produces a partial bundle, so a component can never
//! half-mount. Errors thrown by author-supplied bodies (computed, methods,
//! watch callbacks) are not wrapped; they propagate as-is.

use thiserror::Error;

use crate::value::TypeTag;

/// Invocation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A supplied prop value's runtime type does not match its declared tag.
    #[error("Invalid prop: type check failed for prop \"{name}\". Expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    /// A prop declared `required` has no supplied value and no default.
    #[error("{name} is required but not provided.")]
    MissingRequired { name: String },

    /// A supplied prop value was rejected by the descriptor's custom validator.
    #[error("Invalid prop: custom validator check failed for prop \"{name}\"")]
    FailedValidator { name: String },

    /// A `data` key collides with a declared prop name. Collisions are
    /// rejected outright instead of letting merge order decide visibility.
    #[error("duplicate field \"{name}\": declared as both a prop and a data key")]
    DuplicateField { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message_format() {
        let err = Error::TypeMismatch {
            name: "title".to_string(),
            expected: TypeTag::String,
            actual: TypeTag::Number,
        };
        assert_eq!(
            err.to_string(),
            "Invalid prop: type check failed for prop \"title\". Expected String, got Number"
        );
    }

    #[test]
    fn test_missing_required_message_format() {
        let err = Error::MissingRequired {
            name: "description".to_string(),
        };
        assert_eq!(err.to_string(), "description is required but not provided.");
    }
}
