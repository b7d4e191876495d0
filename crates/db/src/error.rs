//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The store rejected the statement (syntax, connection, constraint).
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A uniqueness constraint fired. Accessors translate this into a
    /// domain error where they know which constraint it guards.
    #[error("unique constraint violated: {}", constraint.as_deref().unwrap_or("<unnamed>"))]
    UniqueViolation { constraint: Option<String> },

    #[error("email is already in use: {0}")]
    DuplicateEmail(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("row not found")]
    NotFound,
}
