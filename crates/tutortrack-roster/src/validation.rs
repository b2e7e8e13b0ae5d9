use crate::{Result, RosterError};
use tutortrack_core::{TutorError, Weekday};
use tutortrack_storage::KeyEncoder;

/// Most lessons a student can take in one week
pub const MAX_DAYS_PER_WEEK: u32 = 7;

/// Validate and trim a student name
pub fn validate_student_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TutorError::validation_failed(
            "Student",
            "name is empty",
            "Provide a non-empty student name",
        )
        .into());
    }
    Ok(trimmed.to_string())
}

/// Validate a weekly lesson count
pub fn validate_days_per_week(days_per_week: u32) -> Result<()> {
    if !(1..=MAX_DAYS_PER_WEEK).contains(&days_per_week) {
        return Err(TutorError::validation_failed(
            "Student",
            format!("{} lessons per week is out of range", days_per_week),
            format!("Choose between 1 and {} lessons per week", MAX_DAYS_PER_WEEK),
        )
        .into());
    }
    Ok(())
}

/// Validate a set of working days and normalize capacities to at least 1
pub fn validate_working_days(days: &[(Weekday, u32)]) -> Result<Vec<(Weekday, u32)>> {
    if days.is_empty() {
        return Err(TutorError::validation_failed(
            "Availability",
            "no working days selected",
            "Select at least one working day",
        )
        .into());
    }

    let mut normalized: Vec<(Weekday, u32)> = Vec::with_capacity(days.len());
    for (day, max) in days {
        let max = (*max).max(1);
        match normalized.iter_mut().find(|(d, _)| d == day) {
            Some(existing) => existing.1 = max,
            None => normalized.push((*day, max)),
        }
    }
    Ok(normalized)
}

/// Validate a tutor id for use in storage keys
pub fn validate_tutor_id(tutor_id: &str) -> Result<()> {
    if !KeyEncoder::is_valid_segment(tutor_id) {
        return Err(RosterError::invalid_tutor_id(tutor_id));
    }
    Ok(())
}
