// Copyright 2025 Cowboy AI, LLC.

//! Error types for record pipeline operations
//!
//! Data-level outcomes (a record that isn't there, a filter that matches
//! nothing) are reported through result objects, not through these errors.
//! `RecordError` is reserved for configuration and programming errors, which
//! are allowed to propagate.

use thiserror::Error;

/// Errors that can occur in record pipeline operations
#[derive(Debug, Clone, Error)]
pub enum RecordError {
    /// Record not found in the store
    #[error("Record not found: {record_type} with id {id}")]
    RecordNotFound {
        /// Type of record that wasn't found
        record_type: String,
        /// ID that was searched for
        id: String,
    },

    /// Record already exists in the store
    #[error("Record already exists: {record_type} with id {id}")]
    RecordAlreadyExists {
        /// Type of record that collided
        record_type: String,
        /// ID that collided
        id: String,
    },

    /// Pipeline wiring error, raised eagerly
    ///
    /// Distinct from an unknown filter or sort name, which is a data
    /// condition and degrades to a no-op. A missing provider indicates a
    /// wiring bug.
    #[error("Pipeline configuration error: {0}")]
    PipelineConfiguration(String),

    /// Precondition violation
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),

    /// Invalid operation
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Reason why the operation is invalid
        reason: String,
    },

    /// Store-level failure
    #[error("Store error: {0}")]
    StoreError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for record pipeline operations
pub type RecordResult<T> = Result<T, RecordError>;

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::SerializationError(err.to_string())
    }
}

impl RecordError {
    /// Create a not-found error for a record type and key
    pub fn not_found(record_type: impl Into<String>, id: impl ToString) -> Self {
        RecordError::RecordNotFound {
            record_type: record_type.into(),
            id: id.to_string(),
        }
    }

    /// Create an already-exists error for a record type and key
    pub fn already_exists(record_type: impl Into<String>, id: impl ToString) -> Self {
        RecordError::RecordAlreadyExists {
            record_type: record_type.into(),
            id: id.to_string(),
        }
    }

    /// Create a pipeline configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        RecordError::PipelineConfiguration(msg.into())
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::RecordNotFound { .. })
    }

    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RecordError::PipelineConfiguration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test error display messages
    #[test]
    fn test_error_display_messages() {
        let err = RecordError::not_found("Invoice", "123");
        assert_eq!(err.to_string(), "Record not found: Invoice with id 123");

        let err = RecordError::already_exists("Customer", "456");
        assert_eq!(
            err.to_string(),
            "Record already exists: Customer with id 456"
        );

        let err = RecordError::configuration("no filter provider for WeatherForecast");
        assert_eq!(
            err.to_string(),
            "Pipeline configuration error: no filter provider for WeatherForecast"
        );

        let err = RecordError::PreconditionViolation("edit context already loaded".to_string());
        assert_eq!(
            err.to_string(),
            "Precondition violation: edit context already loaded"
        );
    }

    /// Test error classification predicates
    #[test]
    fn test_error_predicates() {
        assert!(RecordError::not_found("Invoice", "123").is_not_found());
        assert!(!RecordError::not_found("Invoice", "123").is_configuration_error());
        assert!(RecordError::configuration("bad wiring").is_configuration_error());
    }

    /// Test serde error conversion
    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: RecordError = parse_err.into();
        assert!(matches!(err, RecordError::SerializationError(_)));
    }
}
