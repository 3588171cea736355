//! Error types for the rankeval library.
//!
//! All failures surface as [`RankEvalError`]. Parse errors carry the offending
//! field and the type that was being read so that a caller can point at the
//! exact location in the submitted document.
//!
//! # Examples
//!
//! ```
//! use rankeval::error::{RankEvalError, Result};
//!
//! fn read_id() -> Result<String> {
//!     Err(RankEvalError::missing_field("id", "rated_request"))
//! }
//!
//! match read_id() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for rankeval operations.
#[derive(Error, Debug)]
pub enum RankEvalError {
    /// A required field is absent.
    #[error("[{type_name}] required field [{field}] is missing")]
    MissingField { field: String, type_name: String },

    /// Strict mode met a field that the enclosing type does not recognize.
    #[error("[{type_name}] unknown field [{field}]")]
    UnrecognizedField { field: String, type_name: String },

    /// A registry has no factory for the requested name.
    #[error("unknown [{registry}] type [{name}]")]
    UnknownType { registry: String, name: String },

    /// A value has the wrong type or shape.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Raised by query factories.
    #[error("Query error: {0}")]
    Query(String),

    /// Programmatic construction was handed invalid values.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors (file operations, streams, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with RankEvalError.
pub type Result<T> = std::result::Result<T, RankEvalError>;

impl RankEvalError {
    /// Create a new missing field error.
    pub fn missing_field<F: Into<String>, T: Into<String>>(field: F, type_name: T) -> Self {
        RankEvalError::MissingField {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a new unrecognized field error.
    pub fn unrecognized_field<F: Into<String>, T: Into<String>>(field: F, type_name: T) -> Self {
        RankEvalError::UnrecognizedField {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a new unknown type error.
    pub fn unknown_type<R: Into<String>, N: Into<String>>(registry: R, name: N) -> Self {
        RankEvalError::UnknownType {
            registry: registry.into(),
            name: name.into(),
        }
    }

    /// Create a new malformed document error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        RankEvalError::Malformed(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        RankEvalError::Query(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        RankEvalError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        RankEvalError::Other(msg.into())
    }

    /// Report a missing field as a malformed value.
    pub fn into_malformed(self) -> Self {
        match self {
            RankEvalError::MissingField { .. } => RankEvalError::Malformed(self.to_string()),
            other => other,
        }
    }

    /// The field name this error points at, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            RankEvalError::MissingField { field, .. }
            | RankEvalError::UnrecognizedField { field, .. } => Some(field),
            _ => None,
        }
    }
}
