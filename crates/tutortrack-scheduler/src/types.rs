use tutortrack_core::{CapacityMap, Schedule, StudentRequirement, Weekday};

/// Everything a filter or scorer may look at when judging one day for one
/// student
#[derive(Debug, Clone, Copy)]
pub struct AllocationContext<'a> {
    /// Student being placed
    pub student: &'a StudentRequirement,
    /// Tutor capacity per working day
    pub capacity: &'a CapacityMap,
    /// Assignments made so far in this run
    pub schedule: &'a Schedule,
}

impl<'a> AllocationContext<'a> {
    /// Create a new allocation context
    pub fn new(
        student: &'a StudentRequirement,
        capacity: &'a CapacityMap,
        schedule: &'a Schedule,
    ) -> Self {
        Self {
            student,
            capacity,
            schedule,
        }
    }
}

/// Result of filtering a day
#[derive(Debug, Clone)]
pub struct FilterResult {
    /// Day that was checked
    pub day: Weekday,
    /// Whether the day passed the filter
    pub passed: bool,
    /// Reason for failure (if any)
    pub reason: Option<String>,
}

impl FilterResult {
    /// Create a passing filter result
    pub fn pass(day: Weekday) -> Self {
        Self {
            day,
            passed: true,
            reason: None,
        }
    }

    /// Create a failing filter result
    pub fn fail(day: Weekday, reason: String) -> Self {
        Self {
            day,
            passed: false,
            reason: Some(reason),
        }
    }
}

/// Result of scoring a day
#[derive(Debug, Clone)]
pub struct ScoreResult {
    /// Day that was scored
    pub day: Weekday,
    /// Score (higher is better)
    pub score: i64,
}

impl ScoreResult {
    /// Create a new score result
    pub fn new(day: Weekday, score: i64) -> Self {
        Self { day, score }
    }
}
