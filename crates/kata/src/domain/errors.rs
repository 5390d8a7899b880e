//! Domain Errors
//!
//! Error types for validation, resolution and preset loading.

use thiserror::Error;

/// Invariant a candidate field failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("required field is missing")]
    Missing,

    #[error("expected {expected}")]
    WrongType { expected: &'static str },

    #[error("must not be empty")]
    Empty,

    #[error("unexpected keys: {}", .0.join(", "))]
    UnexpectedKeys(Vec<String>),

    #[error("duplicate entry '{0}'")]
    Duplicate(String),

    #[error("unknown model provider '{0}'")]
    UnknownProvider(String),
}

/// A single failed invariant, located by field path (e.g. `style.post`)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {violation}")]
pub struct ValidationError {
    pub path: String,
    pub violation: Violation,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, violation: Violation) -> Self {
        Self {
            path: path.into(),
            violation,
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, Violation::Missing)
    }

    pub fn wrong_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::new(path, Violation::WrongType { expected })
    }

    pub fn empty(path: impl Into<String>) -> Self {
        Self::new(path, Violation::Empty)
    }
}

/// Non-fatal finding reported alongside a valid persona
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// `extends` resolution failure. Terminal for the persona being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("unknown parent persona '{0}'")]
    UnknownParent(String),

    #[error("{}", describe_cycle(.0))]
    CyclicExtends(Vec<String>),

    #[error("persona '{persona}' leaves '{field}' unset after resolution")]
    Unresolved { persona: String, field: &'static str },
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation failed with {} error(s): {}", .0.len(), join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }
}

impl From<Vec<ValidationError>> for DomainError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

fn describe_cycle(path: &[String]) -> String {
    match path {
        [name, again] if name == again => format!("cyclic extends: persona '{}' extends itself", name),
        _ => format!("cyclic extends: {}", path.join(" -> ")),
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
