// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for TutorTrack operations
#[derive(Error, Debug, Diagnostic)]
pub enum TutorError {
    /// Unknown weekday name
    #[error("Invalid weekday: {value}")]
    #[diagnostic(
        code(tutortrack::invalid_weekday),
        help("Use a full day name like 'Monday' or a three-letter abbreviation like 'Mon'")
    )]
    InvalidWeekday {
        #[allow(unused)]
        value: String,
    },

    /// Unknown lesson status
    #[error("Invalid lesson status: {value}")]
    #[diagnostic(
        code(tutortrack::invalid_status),
        help("Supported statuses: completed, missed")
    )]
    InvalidStatus {
        #[allow(unused)]
        value: String,
    },

    /// Validation failed
    #[error("Validation failed for {record_type}: {details}")]
    #[diagnostic(
        code(tutortrack::validation_failed),
        help("{help_text}")
    )]
    ValidationFailed {
        #[allow(unused)]
        record_type: String,
        #[allow(unused)]
        details: String,
        #[allow(unused)]
        help_text: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(tutortrack::serialization_error),
        help("Ensure the document is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for TutorTrack operations
pub type Result<T> = std::result::Result<T, TutorError>;

impl TutorError {
    /// Create an InvalidWeekday error
    pub fn invalid_weekday(value: impl Into<String>) -> Self {
        Self::InvalidWeekday {
            value: value.into(),
        }
    }

    /// Create an InvalidStatus error
    pub fn invalid_status(value: impl Into<String>) -> Self {
        Self::InvalidStatus {
            value: value.into(),
        }
    }

    /// Create a ValidationFailed error
    pub fn validation_failed(
        record_type: impl Into<String>,
        details: impl Into<String>,
        help_text: impl Into<String>,
    ) -> Self {
        Self::ValidationFailed {
            record_type: record_type.into(),
            details: details.into(),
            help_text: help_text.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }
}
