// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Roster error type
#[derive(Error, Debug, Diagnostic)]
pub enum RosterError {
    /// Student not found
    #[error("Student not found: {student_id}")]
    #[diagnostic(
        code(roster::student_not_found),
        help("List students with `tutortrack student list` to find the right id")
    )]
    StudentNotFound {
        student_id: String,
    },

    /// Another student on the roster already has this name
    #[error("A student named '{name}' already exists")]
    #[diagnostic(
        code(roster::duplicate_student),
        help("Schedules identify students by name; add a surname or initial to tell them apart")
    )]
    DuplicateStudent {
        name: String,
    },

    /// Tutor id cannot be used as a key segment
    #[error("Invalid tutor id: '{tutor_id}'")]
    #[diagnostic(
        code(roster::invalid_tutor_id),
        help("Tutor ids must be non-empty and must not contain '/'")
    )]
    InvalidTutorId {
        tutor_id: String,
    },

    /// Storage error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(#[from] tutortrack_storage::StorageError),

    /// Core error (validation, parsing)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] tutortrack_core::TutorError),
}

/// Result type for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

impl RosterError {
    /// Create a StudentNotFound error
    pub fn student_not_found(student_id: impl Into<String>) -> Self {
        Self::StudentNotFound {
            student_id: student_id.into(),
        }
    }

    /// Create a DuplicateStudent error
    pub fn duplicate_student(name: impl Into<String>) -> Self {
        Self::DuplicateStudent { name: name.into() }
    }

    /// Create an InvalidTutorId error
    pub fn invalid_tutor_id(tutor_id: impl Into<String>) -> Self {
        Self::InvalidTutorId {
            tutor_id: tutor_id.into(),
        }
    }
}
