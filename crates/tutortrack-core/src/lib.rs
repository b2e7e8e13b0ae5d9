//! TutorTrack Core - Fundamental types for weekly tuition scheduling
//!
//! This crate provides:
//! - Weekday, student requirement, capacity map and schedule types
//! - Stored record shapes and their normalization into scheduler inputs
//! - Attendance progress
//! - Error types with miette diagnostics
//! - Serialization helpers

pub mod error;
pub mod records;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TutorError};
pub use records::{
    AvailabilityRecord, ClassLog, LessonStatus, Progress, StudentRecord, DEFAULT_DAY_CAPACITY,
};
pub use types::{CapacityMap, Schedule, StudentRequirement, Weekday};

/// Serialize a value to JSON
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        TutorError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to pretty JSON
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        TutorError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from JSON
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| {
        TutorError::serialization_error(
            format!("Failed to deserialize from JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to YAML
pub fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| {
        TutorError::serialization_error(
            format!("Failed to serialize to YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from YAML (JSON documents are accepted too)
pub fn from_yaml<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_yaml::from_str(data).map_err(|e| {
        TutorError::serialization_error(
            format!("Failed to deserialize from YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}
