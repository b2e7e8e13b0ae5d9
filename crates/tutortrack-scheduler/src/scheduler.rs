//! Two-phase weekly allocator.
//!
//! Phase 1 (`distribute`) places each student on distinct working days that
//! still have a free seat, least-loaded day first. Phase 2 (`overflow`) tops
//! up anyone left short by walking their available working days in weekday
//! order and ignoring capacity. Students are processed by weekly count,
//! highest first, with input order kept for ties. Days are always enumerated
//! Monday to Sunday, so the result depends only on the inputs.

use crate::filter::{default_filters, overflow_filters, FilterPredicate};
use crate::score::{calculate_total_score, default_scores, ScoreFunction};
use crate::types::AllocationContext;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use tutortrack_core::{CapacityMap, Schedule, StudentRequirement, Weekday};

/// Weekly lesson scheduler
pub struct Scheduler {
    filters: Vec<Box<dyn FilterPredicate>>,
    overflow_filters: Vec<Box<dyn FilterPredicate>>,
    scorers: Vec<Box<dyn ScoreFunction>>,
}

impl Scheduler {
    /// Create a scheduler with the default filters and scores
    pub fn new() -> Self {
        Self::with_parts(default_filters(), overflow_filters(), default_scores())
    }

    /// Create a scheduler from explicit filter and score sets
    pub fn with_parts(
        filters: Vec<Box<dyn FilterPredicate>>,
        overflow_filters: Vec<Box<dyn FilterPredicate>>,
        scorers: Vec<Box<dyn ScoreFunction>>,
    ) -> Self {
        Self {
            filters,
            overflow_filters,
            scorers,
        }
    }

    /// Allocate every student's weekly lessons to weekdays.
    ///
    /// Never fails: infeasible demand is overbooked where the student can
    /// attend, and otherwise left under-scheduled.
    pub fn allocate(&self, students: &[StudentRequirement], capacity: &CapacityMap) -> Schedule {
        if students.is_empty() || capacity.is_empty() {
            debug!(
                "Nothing to allocate ({} students, {} working days)",
                students.len(),
                capacity.len()
            );
            return Schedule::new();
        }

        let schedule = self.distribute(students, capacity);
        let schedule = self.overflow(students, capacity, schedule);

        let requested: u64 = students.iter().map(|s| u64::from(s.weekly_count)).sum();
        info!(
            "Allocated {} of {} requested lessons for {} students over {} working days",
            schedule.total_assignments(),
            requested,
            students.len(),
            capacity.len()
        );

        schedule
    }

    /// Phase 1: capacity-respecting greedy distribution.
    ///
    /// No day ends up with more students than its capacity, and a student
    /// takes at most one slot per day.
    pub fn distribute(&self, students: &[StudentRequirement], capacity: &CapacityMap) -> Schedule {
        let mut schedule = Schedule::new();

        for student in order_students(students) {
            if student.weekly_count == 0 {
                continue;
            }

            let candidates = {
                let context = AllocationContext::new(student, capacity, &schedule);
                let feasible = self.feasible_days(&self.filters, &context);
                self.rank_days(&context, feasible)
            };

            let wanted = student.weekly_count as usize;
            let mut placed = 0usize;

            for day in candidates {
                if placed >= wanted {
                    break;
                }
                let seats = capacity.get(day).unwrap_or(0);
                if (schedule.assigned(day) as u64) < u64::from(seats) {
                    schedule.assign(day, student.name.as_str());
                    placed += 1;
                }
            }

            debug!(
                "Placed {} on {} of {} requested days",
                student.name, placed, wanted
            );
        }

        schedule
    }

    /// Phase 2: overflow fallback.
    ///
    /// Tops up each student whose name occurs fewer than `weekly_count`
    /// times in `schedule`, walking the working days they can attend in
    /// weekday order and ignoring capacity.
    pub fn overflow(
        &self,
        students: &[StudentRequirement],
        capacity: &CapacityMap,
        mut schedule: Schedule,
    ) -> Schedule {
        let mut tallies: HashMap<String, usize> = schedule
            .tallies()
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();

        for student in order_students(students) {
            let wanted = student.weekly_count as usize;
            let have = tallies.get(&student.name).copied().unwrap_or(0);
            let mut remaining = wanted.saturating_sub(have);

            if remaining == 0 {
                continue;
            }

            let eligible = {
                let context = AllocationContext::new(student, capacity, &schedule);
                self.feasible_days(&self.overflow_filters, &context)
            };

            for day in eligible {
                if remaining == 0 {
                    break;
                }
                debug!("Overbooking {} on {}", student.name, day);
                schedule.assign(day, student.name.as_str());
                *tallies.entry(student.name.clone()).or_insert(0) += 1;
                remaining -= 1;
            }

            if remaining > 0 {
                warn!(
                    "Student {} is under-scheduled: {} of {} lessons placed",
                    student.name,
                    wanted - remaining,
                    wanted
                );
            }
        }

        schedule
    }

    /// Working days (canonical order) that pass every filter
    fn feasible_days(
        &self,
        filters: &[Box<dyn FilterPredicate>],
        context: &AllocationContext<'_>,
    ) -> Vec<Weekday> {
        context
            .capacity
            .days()
            .filter(|day| {
                filters.iter().all(|filter| {
                    let result = filter.filter(context, *day);
                    if !result.passed {
                        debug!(
                            "Day {} filtered out for {} by {}: {}",
                            day,
                            context.student.name,
                            filter.name(),
                            result.reason.unwrap_or_default()
                        );
                    }
                    result.passed
                })
            })
            .collect()
    }

    /// Order days by total score, best first; equal scores keep their
    /// incoming order
    fn rank_days(&self, context: &AllocationContext<'_>, days: Vec<Weekday>) -> Vec<Weekday> {
        let mut scored: Vec<(Weekday, i64)> = days
            .into_iter()
            .map(|day| {
                let scores: Vec<_> = self
                    .scorers
                    .iter()
                    .map(|scorer| scorer.score(context, day))
                    .collect();
                (day, calculate_total_score(&scores))
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(day, _)| day).collect()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Students by weekly count, highest first; ties keep input order
pub fn order_students(students: &[StudentRequirement]) -> Vec<&StudentRequirement> {
    let mut ordered: Vec<&StudentRequirement> = students.iter().collect();
    ordered.sort_by(|a, b| b.weekly_count.cmp(&a.weekly_count));
    ordered
}

/// Allocate with the default scheduler
pub fn allocate(students: &[StudentRequirement], capacity: &CapacityMap) -> Schedule {
    Scheduler::new().allocate(students, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tutortrack_core::Weekday::*;

    fn days_of(schedule: &Schedule, name: &str) -> Vec<Weekday> {
        schedule
            .iter()
            .flat_map(|(day, names)| {
                names
                    .iter()
                    .filter(move |n| n.as_str() == name)
                    .map(move |_| day)
            })
            .collect()
    }

    fn random_case(rng: &mut StdRng) -> (Vec<StudentRequirement>, CapacityMap) {
        let mut capacity = CapacityMap::new();
        for day in Weekday::ALL {
            if rng.random_bool(0.7) {
                capacity.insert(day, rng.random_range(0..4));
            }
        }

        let students = (0..rng.random_range(0..8))
            .map(|i| {
                let blocked: Vec<Weekday> = Weekday::ALL
                    .into_iter()
                    .filter(|_| rng.random_bool(0.2))
                    .collect();
                StudentRequirement::new(format!("student-{}", i), rng.random_range(0..6))
                    .with_blocked_days(blocked)
            })
            .collect();

        (students, capacity)
    }

    #[test]
    fn test_single_student_spread_over_days() {
        let students = vec![StudentRequirement::new("Alice", 3)];
        let capacity = CapacityMap::new()
            .with_day(Monday, 1)
            .with_day(Tuesday, 1)
            .with_day(Wednesday, 1);

        let schedule = allocate(&students, &capacity);

        assert_eq!(schedule.day(Monday), ["Alice"]);
        assert_eq!(schedule.day(Tuesday), ["Alice"]);
        assert_eq!(schedule.day(Wednesday), ["Alice"]);
        for day in [Thursday, Friday, Saturday, Sunday] {
            assert!(schedule.day(day).is_empty());
        }
    }

    #[test]
    fn test_blocked_day_excluded_from_both_phases() {
        let students = vec![StudentRequirement::new("Bob", 2).with_blocked_days([Monday])];
        let capacity = CapacityMap::new().with_day(Monday, 2).with_day(Tuesday, 1);

        let scheduler = Scheduler::new();
        let phase_one = scheduler.distribute(&students, &capacity);
        assert_eq!(phase_one.day(Tuesday), ["Bob"]);
        assert!(phase_one.day(Monday).is_empty());

        let schedule = scheduler.overflow(&students, &capacity, phase_one);
        assert_eq!(schedule.day(Tuesday), ["Bob", "Bob"]);
        assert!(schedule.day(Monday).is_empty());
    }

    #[test]
    fn test_higher_count_placed_first_then_overflow() {
        let students = vec![
            StudentRequirement::new("B", 1),
            StudentRequirement::new("A", 2),
        ];
        let capacity = CapacityMap::new().with_day(Monday, 1).with_day(Tuesday, 1);

        let schedule = allocate(&students, &capacity);

        assert_eq!(schedule.day(Monday), ["A", "B"]);
        assert_eq!(schedule.day(Tuesday), ["A"]);
    }

    #[test]
    fn test_empty_students() {
        let capacity = CapacityMap::new().with_day(Monday, 3);
        let schedule = allocate(&[], &capacity);

        assert_eq!(schedule, Schedule::new());
        assert_eq!(schedule.iter().count(), 7);
    }

    #[test]
    fn test_empty_capacity() {
        let students = vec![
            StudentRequirement::new("Alice", 2),
            StudentRequirement::new("Bob", 1),
        ];
        let schedule = allocate(&students, &CapacityMap::new());

        assert!(schedule.is_empty());
        assert_eq!(schedule.iter().count(), 7);
    }

    #[test]
    fn test_zero_capacity_day_used_only_in_overflow() {
        let students = vec![StudentRequirement::new("Alice", 1)];
        let capacity = CapacityMap::new().with_day(Wednesday, 0);

        let scheduler = Scheduler::new();
        assert!(scheduler.distribute(&students, &capacity).is_empty());

        let schedule = scheduler.allocate(&students, &capacity);
        assert_eq!(schedule.day(Wednesday), ["Alice"]);
    }

    #[test]
    fn test_least_loaded_day_preferred() {
        let students = vec![
            StudentRequirement::new("A", 2),
            StudentRequirement::new("B", 1),
        ];
        let capacity = CapacityMap::new()
            .with_day(Monday, 2)
            .with_day(Tuesday, 2)
            .with_day(Wednesday, 2);

        let schedule = allocate(&students, &capacity);

        // A takes Monday and Tuesday; Wednesday is then the emptiest day
        assert_eq!(days_of(&schedule, "A"), vec![Monday, Tuesday]);
        assert_eq!(days_of(&schedule, "B"), vec![Wednesday]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let students = vec![
            StudentRequirement::new("First", 1),
            StudentRequirement::new("Second", 1),
        ];
        let capacity = CapacityMap::new().with_day(Friday, 2);

        let schedule = allocate(&students, &capacity);
        assert_eq!(schedule.day(Friday), ["First", "Second"]);

        let ordered: Vec<&str> = order_students(&students)
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(ordered, vec!["First", "Second"]);
    }

    #[test]
    fn test_capacity_insertion_order_is_irrelevant() {
        let students = vec![
            StudentRequirement::new("A", 2),
            StudentRequirement::new("B", 2),
            StudentRequirement::new("C", 1),
        ];
        let forward: CapacityMap = [(Monday, 1), (Wednesday, 2), (Friday, 1)].into_iter().collect();
        let backward: CapacityMap = [(Friday, 1), (Wednesday, 2), (Monday, 1)].into_iter().collect();

        assert_eq!(allocate(&students, &forward), allocate(&students, &backward));
    }

    #[test]
    fn test_fully_unavailable_student_left_unscheduled() {
        let students = vec![StudentRequirement::new("Ghost", 2).with_blocked_days([Monday, Tuesday])];
        let capacity = CapacityMap::new().with_day(Monday, 5).with_day(Tuesday, 5);

        let schedule = allocate(&students, &capacity);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_overflow_caps_at_one_per_eligible_day() {
        let students = vec![StudentRequirement::new("Eager", 5)];
        let capacity = CapacityMap::new().with_day(Monday, 1).with_day(Tuesday, 1);

        let schedule = allocate(&students, &capacity);

        // Two in phase 1, then one more per eligible day in phase 2
        assert_eq!(schedule.occurrences("Eager"), 4);
        assert_eq!(schedule.day(Monday), ["Eager", "Eager"]);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let students = vec![StudentRequirement::new("Alice", 2).with_blocked_days([Sunday])];
        let capacity = CapacityMap::new().with_day(Monday, 1);
        let students_before = students.clone();
        let capacity_before = capacity.clone();

        let _ = allocate(&students, &capacity);

        assert_eq!(students, students_before);
        assert_eq!(capacity, capacity_before);
    }

    #[test]
    fn test_never_schedules_blocked_days() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (students, capacity) = random_case(&mut rng);
            let schedule = allocate(&students, &capacity);

            assert_eq!(schedule.iter().count(), 7);
            for student in &students {
                for day in days_of(&schedule, &student.name) {
                    assert!(!student.is_blocked(day), "{} on blocked {}", student.name, day);
                    assert!(capacity.contains(day));
                }
            }
        }
    }

    #[test]
    fn test_distribute_respects_capacity() {
        let mut rng = StdRng::seed_from_u64(11);
        let scheduler = Scheduler::new();
        for _ in 0..200 {
            let (students, capacity) = random_case(&mut rng);
            let schedule = scheduler.distribute(&students, &capacity);

            for (day, names) in schedule.iter() {
                let seats = capacity.get(day).unwrap_or(0) as usize;
                assert!(names.len() <= seats, "{} over capacity", day);
            }
            for student in &students {
                assert!(schedule.occurrences(&student.name) <= student.weekly_count as usize);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..100 {
            let (students, capacity) = random_case(&mut rng);
            assert_eq!(allocate(&students, &capacity), allocate(&students, &capacity));
        }
    }

    #[test]
    fn test_feasible_input_fully_scheduled() {
        // Capacity 2 on every day and at most 7 lessons each: always feasible
        let capacity: CapacityMap = Weekday::ALL.into_iter().map(|day| (day, 2)).collect();
        let students = vec![
            StudentRequirement::new("A", 5),
            StudentRequirement::new("B", 4).with_blocked_days([Monday]),
            StudentRequirement::new("C", 3).with_blocked_days([Saturday, Sunday]),
            StudentRequirement::new("D", 2),
        ];

        let schedule = allocate(&students, &capacity);

        for student in &students {
            assert_eq!(
                schedule.occurrences(&student.name),
                student.weekly_count as usize,
                "{}",
                student.name
            );
        }
        for (day, names) in schedule.iter() {
            assert!(names.len() <= 2, "{} overbooked", day);
        }
    }

    #[test]
    fn test_feasible_random_inputs_fully_scheduled() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut feasible = 0;
        for _ in 0..500 {
            let (students, capacity) = random_case(&mut rng);

            let demand: u64 = students.iter().map(|s| u64::from(s.weekly_count)).sum();
            let each_can_attend = students.iter().all(|s| {
                capacity.days().filter(|day| !s.is_blocked(*day)).count()
                    >= s.weekly_count as usize
            });
            if capacity.total() < demand || !each_can_attend {
                continue;
            }
            feasible += 1;

            let schedule = allocate(&students, &capacity);
            for student in &students {
                assert_eq!(
                    schedule.occurrences(&student.name),
                    student.weekly_count as usize,
                    "{}",
                    student.name
                );
            }
        }
        assert!(feasible > 0);
    }

    #[test]
    fn test_scheduler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scheduler>();
    }
}
