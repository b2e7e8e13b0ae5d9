use serde::Serialize;
use tutortrack_core::{
    AvailabilityRecord, CapacityMap, ClassLog, Progress, Schedule, StudentRecord,
    StudentRequirement,
};
use tutortrack_scheduler::{AllocationReport, Scheduler};

/// A stored student together with their attendance progress
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStudent {
    pub record: StudentRecord,
    pub progress: Progress,
}

/// The week's schedule for one tutor, with everything needed to present it
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlan {
    pub capacity: CapacityMap,
    pub schedule: Schedule,
    pub report: AllocationReport,
    pub students: Vec<PlannedStudent>,
}

impl WeeklyPlan {
    /// Normalize stored records and allocate the week.
    ///
    /// `students` must already be in the order that should break ties.
    pub fn build(
        scheduler: &Scheduler,
        students: Vec<StudentRecord>,
        availability: &AvailabilityRecord,
        logs: &[ClassLog],
    ) -> Self {
        let capacity = availability.to_capacity_map();
        let requirements: Vec<StudentRequirement> =
            students.iter().map(StudentRecord::to_requirement).collect();

        let schedule = scheduler.allocate(&requirements, &capacity);
        let report = AllocationReport::new(&requirements, &capacity, &schedule);

        let students = students
            .into_iter()
            .map(|record| {
                let progress = Progress::for_student(&record, logs);
                PlannedStudent { record, progress }
            })
            .collect();

        Self {
            capacity,
            schedule,
            report,
            students,
        }
    }

    /// Resolve a scheduled name back to its record (first match)
    pub fn student_named(&self, name: &str) -> Option<&PlannedStudent> {
        self.students.iter().find(|s| s.record.name == name)
    }

    /// Students exist but nothing could be scheduled
    pub fn is_unscheduled(&self) -> bool {
        !self.students.is_empty() && self.schedule.is_empty()
    }
}
