//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid scene or type declarations.
/// Binding itself never fails; only building the inputs can.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("duplicate type declaration: {0}")]
    DuplicateType(String),

    #[error("type {type_name} extends unknown base type {base}")]
    UnknownBaseType { type_name: String, base: String },

    #[error("cycle detected in type hierarchy: {0}")]
    CycleDetected(String),

    #[error("script on node {node} has unknown type {type_name}")]
    UnknownScriptType { node: String, type_name: String },

    #[error("type {type_name} has no field {field}")]
    UnknownField { type_name: String, field: String },

    #[error("invalid scene document: {message}")]
    InvalidScene { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
