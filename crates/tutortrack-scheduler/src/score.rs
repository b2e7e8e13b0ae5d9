use crate::types::{AllocationContext, ScoreResult};
use tracing::debug;
use tutortrack_core::Weekday;

/// Scoring function trait
pub trait ScoreFunction: Send + Sync {
    /// Score a day for the context's student (higher is better)
    fn score(&self, context: &AllocationContext<'_>, day: Weekday) -> ScoreResult;

    /// Name of the scoring function
    fn name(&self) -> &str;
}

/// Prefer the day with the fewest students assigned so far, spreading load
/// before any day fills up
pub struct LeastAssigned;

impl ScoreFunction for LeastAssigned {
    fn score(&self, context: &AllocationContext<'_>, day: Weekday) -> ScoreResult {
        let assigned = context.schedule.assigned(day);
        let score = -i64::try_from(assigned).unwrap_or(i64::MAX);

        debug!("Day {} score: {} ({} assigned)", day, score, assigned);

        ScoreResult::new(day, score)
    }

    fn name(&self) -> &str {
        "LeastAssigned"
    }
}

/// Get default scoring functions
pub fn default_scores() -> Vec<Box<dyn ScoreFunction>> {
    vec![Box::new(LeastAssigned)]
}

/// Combine scores from multiple scoring functions
pub fn calculate_total_score(scores: &[ScoreResult]) -> i64 {
    scores.iter().map(|s| s.score).sum()
}
