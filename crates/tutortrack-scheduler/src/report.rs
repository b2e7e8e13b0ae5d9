//! Post-hoc feasibility diagnostics for an allocated schedule.
//!
//! The allocator reports nothing itself; this compares its output with the
//! demand and capacity it was given.

use serde::Serialize;
use tutortrack_core::{CapacityMap, Schedule, StudentRequirement, Weekday};

/// Requested versus scheduled lessons for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentAllocation {
    pub name: String,
    pub requested: u32,
    pub scheduled: usize,
}

impl StudentAllocation {
    /// Lessons still missing
    pub fn shortfall(&self) -> usize {
        (self.requested as usize).saturating_sub(self.scheduled)
    }
}

/// A day holding more students than the tutor's stated maximum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverbookedDay {
    pub day: Weekday,
    pub capacity: u32,
    pub assigned: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    students: Vec<StudentAllocation>,
    overbooked: Vec<OverbookedDay>,
}

impl AllocationReport {
    /// Build a report; students keep their input order.
    ///
    /// Scheduled counts are looked up by name, so two students sharing a
    /// name share a count.
    pub fn new(
        students: &[StudentRequirement],
        capacity: &CapacityMap,
        schedule: &Schedule,
    ) -> Self {
        let tallies = schedule.tallies();

        let students = students
            .iter()
            .map(|student| StudentAllocation {
                name: student.name.clone(),
                requested: student.weekly_count,
                scheduled: tallies.get(student.name.as_str()).copied().unwrap_or(0),
            })
            .collect();

        let overbooked = capacity
            .iter()
            .filter_map(|(day, seats)| {
                let assigned = schedule.assigned(day);
                ((assigned as u64) > u64::from(seats)).then_some(OverbookedDay {
                    day,
                    capacity: seats,
                    assigned,
                })
            })
            .collect();

        Self {
            students,
            overbooked,
        }
    }

    pub fn students(&self) -> &[StudentAllocation] {
        &self.students
    }

    /// Students left with fewer lessons than requested
    pub fn shortfalls(&self) -> impl Iterator<Item = &StudentAllocation> + '_ {
        self.students.iter().filter(|s| s.shortfall() > 0)
    }

    /// Days over capacity, in weekday order
    pub fn overbooked_days(&self) -> &[OverbookedDay] {
        &self.overbooked
    }

    /// Whether every student got every requested lesson
    pub fn is_complete(&self) -> bool {
        self.shortfalls().next().is_none()
    }

    pub fn requested_total(&self) -> u64 {
        self.students.iter().map(|s| u64::from(s.requested)).sum()
    }
}
