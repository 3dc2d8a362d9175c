//! Error handling for the ramlkit normalization library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! the structured `ValidationError` diagnostic produced by validators, and a
//! convenient `Result` type alias. It uses `thiserror` for easy error handling
//! and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use ramlkit_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     // Operations that might fail...
//!     Ok(())
//! }
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for ramlkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ramlkit operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A declaration failed validation while running in strict mode
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The document as a whole could not be interpreted
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new document error
    pub fn document<S: Into<String>>(msg: S) -> Self {
        Self::Document(msg.into())
    }

    /// The validation diagnostic behind this error, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Broad classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A declaration has the wrong structure (e.g. a list where a mapping is expected).
    Shape,
    /// A value is rejected given the entity's declared type or a whitelist.
    Constraint,
    /// An inherited declaration refers to something that cannot be resolved.
    Reference,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Shape => write!(f, "shape"),
            ErrorKind::Constraint => write!(f, "constraint"),
            ErrorKind::Reference => write!(f, "reference"),
        }
    }
}

/// The kind of record a diagnostic is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    UriParameter,
    QueryParameter,
    FormParameter,
    Header,
    Body,
    Response,
    SecurityScheme,
    Documentation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::UriParameter => "URI parameter",
            EntityKind::QueryParameter => "query parameter",
            EntityKind::FormParameter => "form parameter",
            EntityKind::Header => "header",
            EntityKind::Body => "body",
            EntityKind::Response => "response",
            EntityKind::SecurityScheme => "security scheme",
            EntityKind::Documentation => "documentation",
        };
        write!(f, "{}", s)
    }
}

/// A single user-actionable diagnostic.
///
/// Carries the entity kind, the identity key of the offending record (parameter
/// name, MIME type, status code or scheme name) and every field involved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} error in {entity} '{name}' ({}): {message}", .fields.join(", "))]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub entity: EntityKind,
    pub name: String,
    pub fields: Vec<String>,
    pub message: String,
}

impl ValidationError {
    fn new(
        kind: ErrorKind,
        entity: EntityKind,
        name: impl Into<String>,
        fields: &[&str],
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity,
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            message: message.into(),
        }
    }

    /// Create a structural error
    pub fn shape(
        entity: EntityKind,
        name: impl Into<String>,
        fields: &[&str],
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Shape, entity, name, fields, message)
    }

    /// Create a constraint error
    pub fn constraint(
        entity: EntityKind,
        name: impl Into<String>,
        fields: &[&str],
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Constraint, entity, name, fields, message)
    }

    /// Create an unresolved-reference error
    pub fn reference(
        entity: EntityKind,
        name: impl Into<String>,
        fields: &[&str],
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Reference, entity, name, fields, message)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}
