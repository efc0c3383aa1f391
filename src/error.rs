//! Error types for the payroll engine.
//!
//! Only conditions that stop a unit of work are errors. Data-quality problems
//! (missing wage grade, missing prior period, malformed markers) are reported
//! as [`AuditWarning`](crate::models::AuditWarning)s on the result instead.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
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

    /// Configuration parsed but holds a value the engine cannot work with.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// An employee has attendance rows but no master record.
    #[error("Employee not found: {code}")]
    EmployeeNotFound {
        /// The employee code that was not found.
        code: String,
    },

    /// A request was structurally valid JSON but semantically unusable.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An external collaborator (attendance source, record store, ...) failed.
    #[error("Storage error in {collaborator}: {message}")]
    Storage {
        /// The collaborator that failed.
        collaborator: String,
        /// The failure message reported by the collaborator.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a collaborator failure.
    pub fn storage(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Storage {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
