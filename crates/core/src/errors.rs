//! Core error types for the trade book.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer,
//! and spreadsheet reader failures are converted by the loader crate.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use std::num::ParseFloatError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the trade book.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Data source unavailable: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("Operation rejected: {0}")]
    Policy(#[from] PolicyViolation),

    #[error("Calculation failed: {0}")]
    Calculation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the error means the addressed record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Database(DatabaseError::NotFound(_)))
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

/// The tabular data behind positions or dividends could not be served.
///
/// Never downgraded to an empty dataset: callers see the failure.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Source file '{0}' not found")]
    NotFound(String),

    #[error("Source '{source_name}' could not be read: {message}")]
    Unreadable {
        source_name: String,
        message: String,
    },

    #[error("Source '{0}' produced no usable records")]
    Empty(String),
}

/// A request that is well formed but not allowed by portfolio policy.
#[derive(Error, Debug)]
pub enum PolicyViolation {
    #[error("Snapshots are only taken on weekdays; {date} is a {weekday}")]
    WeekendSnapshot { date: NaiveDate, weekday: String },
}

/// A single malformed record inside a batch.
///
/// Row errors are logged and the row is skipped; they never fail the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("column '{column}' holds a non-finite number")]
    NonFiniteNumber { column: &'static str },

    #[error("column '{column}' is required but empty")]
    MissingText { column: &'static str },
}

// === From implementations for common error types ===

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
