//! Plain-text rendering of weekly schedules.

use tutortrack_core::{CapacityMap, Schedule, Weekday};
use tutortrack_roster::WeeklyPlan;
use tutortrack_scheduler::AllocationReport;

const NOTHING_SCHEDULED_HINT: &str =
    "No lessons could be scheduled. Check the tutor's working days and each student's blocked days.";

/// Render a stored plan, annotating each entry with attendance progress
pub fn plan_text(plan: &WeeklyPlan, today: Weekday) -> String {
    let mut lines = week_lines(&plan.schedule, &plan.capacity, Some(today), |name| {
        match plan.student_named(name) {
            Some(student) => format!(
                "{} ({}/{})",
                name, student.progress.completed, student.progress.total
            ),
            None => name.to_string(),
        }
    });

    lines.extend(warning_lines(&plan.report));
    if plan.is_unscheduled() {
        lines.push(String::new());
        lines.push(NOTHING_SCHEDULED_HINT.to_string());
    }
    lines.join("\n")
}

/// Render a schedule computed without stored records
pub fn schedule_text(
    schedule: &Schedule,
    capacity: &CapacityMap,
    report: &AllocationReport,
) -> String {
    let mut lines = week_lines(schedule, capacity, None, |name| name.to_string());

    lines.extend(warning_lines(report));
    if !report.students().is_empty() && schedule.is_empty() {
        lines.push(String::new());
        lines.push(NOTHING_SCHEDULED_HINT.to_string());
    }
    lines.join("\n")
}

fn week_lines(
    schedule: &Schedule,
    capacity: &CapacityMap,
    today: Option<Weekday>,
    label: impl Fn(&str) -> String,
) -> Vec<String> {
    let mut lines = Vec::new();

    for (day, names) in schedule.iter() {
        let seats = match capacity.get(day) {
            Some(max) => format!("{}/{}", names.len(), max),
            None => "off".to_string(),
        };
        let marker = if today == Some(day) { " (today)" } else { "" };
        lines.push(format!("{}{} [{}]", day, marker, seats));

        if names.is_empty() {
            lines.push("  -".to_string());
        }
        for name in names {
            lines.push(format!("  {}", label(name.as_str())));
        }
    }
    lines
}

fn warning_lines(report: &AllocationReport) -> Vec<String> {
    let mut lines = Vec::new();

    for student in report.shortfalls() {
        lines.push(format!(
            "warning: {} has {} of {} lessons scheduled",
            student.name, student.scheduled, student.requested
        ));
    }
    for day in report.overbooked_days() {
        lines.push(format!(
            "warning: {} is overbooked ({} students, limit {})",
            day.day, day.assigned, day.capacity
        ));
    }

    if !lines.is_empty() {
        lines.insert(0, String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutortrack_core::StudentRequirement;
    use tutortrack_scheduler::allocate;

    fn render(students: &[StudentRequirement], capacity: &CapacityMap) -> String {
        let schedule = allocate(students, capacity);
        let report = AllocationReport::new(students, capacity, &schedule);
        schedule_text(&schedule, capacity, &report)
    }

    #[test]
    fn test_schedule_text_lists_every_day() {
        let capacity = CapacityMap::new().with_day(Weekday::Wednesday, 2);
        let text = render(&[StudentRequirement::new("Alice", 1)], &capacity);

        let headers: Vec<&str> = text
            .lines()
            .filter(|line| !line.starts_with(' ') && !line.is_empty())
            .collect();
        assert_eq!(headers.len(), 7);
        assert_eq!(headers[0], "Monday [off]");
        assert_eq!(headers[2], "Wednesday [1/2]");
        assert!(text.contains("  Alice"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_schedule_text_warnings() {
        let capacity = CapacityMap::new().with_day(Weekday::Monday, 1);
        let students = vec![
            StudentRequirement::new("A", 1),
            StudentRequirement::new("B", 3),
        ];
        let text = render(&students, &capacity);

        assert!(text.contains("Monday [3/1]"));
        assert!(text.contains("warning: B has 2 of 3 lessons scheduled"));
        assert!(text.contains("warning: Monday is overbooked (3 students, limit 1)"));
        assert!(!text.contains("warning: A "));
    }

    #[test]
    fn test_schedule_text_hint_when_nothing_fits() {
        let students =
            vec![StudentRequirement::new("Alice", 2).with_blocked_days([Weekday::Friday])];
        let capacity = CapacityMap::new().with_day(Weekday::Friday, 3);
        let text = render(&students, &capacity);

        assert!(text.ends_with(NOTHING_SCHEDULED_HINT));
        assert!(text.contains("warning: Alice has 0 of 2 lessons scheduled"));

        let empty = render(&[], &capacity);
        assert!(!empty.contains(NOTHING_SCHEDULED_HINT));
    }
}
