//! Error types for lcm-core

use thiserror::Error;

use crate::config::ConfigError;
use crate::handle::{ClassId, Flid, Hvo};
use crate::kind::PropertyKind;

/// Result type alias for property access
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised by the property accessor and its collaborators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Handle does not resolve to a live object
    #[error("Invalid object handle: {0}")]
    InvalidObject(Hvo),

    /// Tag is not declared on the object's class or its superclasses
    #[error("Field {tag} is not declared on object {hvo}")]
    InvalidField { hvo: Hvo, tag: Flid },

    /// Vector index or text offset outside the valid range
    #[error("Index {index} out of range (size {size})")]
    OutOfRange { index: usize, size: usize },

    /// Caller-supplied capacity is smaller than the value
    #[error("Buffer too small: {required} required, capacity {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },

    /// Operation does not apply to the field's declared kind
    #[error("Field {tag} has kind {kind}; operation requires {expected}")]
    KindMismatch {
        tag: Flid,
        kind: PropertyKind,
        expected: &'static str,
    },

    /// Deliberately unimplemented operation
    #[error("Not supported: {0}")]
    NotSupported(&'static str),

    /// Undo-task Begin/End calls are mismatched
    #[error("Undo task nesting violation: {0}")]
    NestingViolation(String),

    /// No class with this id in the catalog
    #[error("Unknown class: {0}")]
    UnknownClass(ClassId),

    /// Class cannot be instantiated
    #[error("Class {0} is abstract")]
    AbstractClass(ClassId),

    /// Class is not acceptable as the destination of a field
    #[error("Class {class} cannot be stored in field {tag}")]
    ClassMismatch { class: ClassId, tag: Flid },

    /// Object is not stored in the given owning slot
    #[error("Object {hvo} is not in field {tag} of object {owner}")]
    NotInProperty { hvo: Hvo, owner: Hvo, tag: Flid },

    /// Move would place an object inside its own subtree
    #[error("Object {0} cannot be moved beneath itself")]
    OwnershipCycle(Hvo),

    /// Catalog registration failure
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Invalid accessor configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DataError {
    pub(crate) fn kind_mismatch(tag: Flid, kind: PropertyKind, expected: &'static str) -> Self {
        DataError::KindMismatch {
            tag,
            kind,
            expected,
        }
    }
}

/// Error from the meta-data catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Class already registered: {0}")]
    DuplicateClass(ClassId),

    #[error("Field already registered: {0}")]
    DuplicateField(Flid),

    #[error("Duplicate field name '{name}' in class {class}")]
    DuplicateFieldName { class: ClassId, name: String },

    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),

    #[error("Field {flid} has kind {kind} but declares no destination class")]
    MissingDestination { flid: Flid, kind: PropertyKind },
}
