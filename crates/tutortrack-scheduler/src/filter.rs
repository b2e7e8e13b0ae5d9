use crate::types::{AllocationContext, FilterResult};
use tutortrack_core::Weekday;

/// Filter predicate trait
pub trait FilterPredicate: Send + Sync {
    /// Decide whether `day` may take the context's student
    fn filter(&self, context: &AllocationContext<'_>, day: Weekday) -> FilterResult;

    /// Name of the filter
    fn name(&self) -> &str;
}

/// Day must be one of the tutor's working days
pub struct WorkingDay;

impl FilterPredicate for WorkingDay {
    fn filter(&self, context: &AllocationContext<'_>, day: Weekday) -> FilterResult {
        if context.capacity.contains(day) {
            FilterResult::pass(day)
        } else {
            FilterResult::fail(day, format!("{} is not a working day", day))
        }
    }

    fn name(&self) -> &str {
        "WorkingDay"
    }
}

/// Day must not be one the student has blocked
pub struct StudentAvailable;

impl FilterPredicate for StudentAvailable {
    fn filter(&self, context: &AllocationContext<'_>, day: Weekday) -> FilterResult {
        if context.student.is_blocked(day) {
            FilterResult::fail(
                day,
                format!("{} cannot attend on {}", context.student.name, day),
            )
        } else {
            FilterResult::pass(day)
        }
    }

    fn name(&self) -> &str {
        "StudentAvailable"
    }
}

/// Day must have an assigned count strictly below its capacity
pub struct HasFreeSeat;

impl FilterPredicate for HasFreeSeat {
    fn filter(&self, context: &AllocationContext<'_>, day: Weekday) -> FilterResult {
        let capacity = context.capacity.get(day).unwrap_or(0);
        let assigned = context.schedule.assigned(day);

        if (assigned as u64) < u64::from(capacity) {
            FilterResult::pass(day)
        } else {
            FilterResult::fail(
                day,
                format!("{} is full: {} of {} seats taken", day, assigned, capacity),
            )
        }
    }

    fn name(&self) -> &str {
        "HasFreeSeat"
    }
}

/// Filters for the capacity-respecting pass
pub fn default_filters() -> Vec<Box<dyn FilterPredicate>> {
    vec![
        Box::new(WorkingDay),
        Box::new(StudentAvailable),
        Box::new(HasFreeSeat),
    ]
}

/// Filters for the overflow pass; capacity is deliberately not checked
pub fn overflow_filters() -> Vec<Box<dyn FilterPredicate>> {
    vec![Box::new(WorkingDay), Box::new(StudentAvailable)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutortrack_core::{CapacityMap, Schedule, StudentRequirement};

    #[test]
    fn test_working_day() {
        let student = StudentRequirement::new("Alice", 1);
        let capacity = CapacityMap::new().with_day(Weekday::Monday, 1);
        let schedule = Schedule::new();
        let context = AllocationContext::new(&student, &capacity, &schedule);

        assert!(WorkingDay.filter(&context, Weekday::Monday).passed);

        let result = WorkingDay.filter(&context, Weekday::Sunday);
        assert!(!result.passed);
        assert!(result.reason.unwrap().contains("not a working day"));
    }

    #[test]
    fn test_student_available() {
        let student = StudentRequirement::new("Bob", 2).with_blocked_days([Weekday::Monday]);
        let capacity = CapacityMap::new().with_day(Weekday::Monday, 2);
        let schedule = Schedule::new();
        let context = AllocationContext::new(&student, &capacity, &schedule);

        let result = StudentAvailable.filter(&context, Weekday::Monday);
        assert!(!result.passed);
        assert!(result.reason.unwrap().contains("Bob cannot attend"));

        assert!(StudentAvailable.filter(&context, Weekday::Tuesday).passed);
    }

    #[test]
    fn test_has_free_seat() {
        let student = StudentRequirement::new("Carol", 1);
        let capacity = CapacityMap::new()
            .with_day(Weekday::Monday, 1)
            .with_day(Weekday::Tuesday, 0);
        let mut schedule = Schedule::new();

        let context = AllocationContext::new(&student, &capacity, &schedule);
        assert!(HasFreeSeat.filter(&context, Weekday::Monday).passed);
        assert!(!HasFreeSeat.filter(&context, Weekday::Tuesday).passed);

        schedule.assign(Weekday::Monday, "Dave");
        let context = AllocationContext::new(&student, &capacity, &schedule);
        let result = HasFreeSeat.filter(&context, Weekday::Monday);
        assert!(!result.passed);
        assert!(result.reason.unwrap().contains("1 of 1"));
    }

    #[test]
    fn test_overflow_filters_ignore_capacity() {
        let filters = overflow_filters();
        assert!(filters.iter().all(|f| f.name() != "HasFreeSeat"));
        assert_eq!(default_filters().len(), filters.len() + 1);
    }
}
