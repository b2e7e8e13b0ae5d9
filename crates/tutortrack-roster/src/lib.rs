//! TutorTrack Roster - Per-tutor records and weekly plans
//!
//! This crate provides:
//! - Student, availability and class log management over a KVStore
//! - Input validation for new records
//! - Weekly plan assembly (normalize records, allocate, report progress)

pub mod error;
pub mod plan;
pub mod roster;
pub mod validation;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use plan::{PlannedStudent, WeeklyPlan};
pub use roster::{NewStudent, Roster};
