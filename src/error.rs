//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every precondition failure the engine can report. None of them are
//! retried internally; the caller decides what to present or retry.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "Employee".to_string(),
///     id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The id that was not found.
        id: String,
    },

    /// A value that must be unique is already in use.
    #[error("{entity} with {field} '{value}' already exists")]
    DuplicateValue {
        /// The kind of record being written.
        entity: String,
        /// The field carrying the uniqueness constraint.
        field: String,
        /// The conflicting value.
        value: String,
    },

    /// The requested action is not legal from the record's current state.
    #[error("Cannot {action} {entity} '{id}' in state '{from}'")]
    InvalidTransition {
        /// The kind of record.
        entity: String,
        /// The record id.
        id: String,
        /// The current state.
        from: String,
        /// The action that was attempted.
        action: String,
    },

    /// A delete was blocked because other records still reference this one.
    #[error("Cannot delete {entity} '{id}': {reason}")]
    ReferentialBlock {
        /// The kind of record.
        entity: String,
        /// The record id.
        id: String,
        /// What still references the record.
        reason: String,
    },

    /// The employee already has a check in this pay run.
    #[error("Pay run '{pay_run_id}' already has a pay check for employee '{employee_id}'")]
    DuplicatePayCheck {
        /// The pay run id.
        pay_run_id: String,
        /// The employee id.
        employee_id: String,
    },

    /// An input value failed validation.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The record store failed to read or write.
    #[error("Record store error: {message}")]
    StoreError {
        /// A description of the store failure.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::NotFound`] for the given record kind.
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Builds a [`EngineError::InvalidInput`] for the given field.
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        Self::StoreError {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
