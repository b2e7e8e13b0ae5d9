use crate::plan::WeeklyPlan;
use crate::validation::{
    validate_days_per_week, validate_student_name, validate_tutor_id, validate_working_days,
};
use crate::{Result, RosterError};
use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tutortrack_core::{
    AvailabilityRecord, ClassLog, LessonStatus, Progress, StudentRecord, Weekday,
};
use tutortrack_scheduler::Scheduler;
use tutortrack_storage::{JsonStore, KVStore, KeyEncoder, RecordKind, RedbBackend, StorageError};
use uuid::Uuid;

/// Input for a new student
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub days_per_week: u32,
    pub blocked_days: Vec<Weekday>,
}

/// Records belonging to one tutor
pub struct Roster {
    storage: Arc<RedbBackend>,
    tutor_id: String,
}

impl Roster {
    /// Scope a roster to `tutor_id`
    pub fn new(storage: Arc<RedbBackend>, tutor_id: impl Into<String>) -> Result<Self> {
        let tutor_id = tutor_id.into();
        validate_tutor_id(&tutor_id)?;
        Ok(Self { storage, tutor_id })
    }

    pub fn tutor_id(&self) -> &str {
        &self.tutor_id
    }

    fn key(&self, kind: RecordKind, id: &str) -> String {
        KeyEncoder::encode_record_key(&self.tutor_id, kind, id)
    }

    fn prefix(&self, kind: RecordKind) -> String {
        KeyEncoder::encode_kind_prefix(&self.tutor_id, kind)
    }

    /// Validate and store a new student; names are unique per tutor
    pub fn add_student(&self, new: NewStudent) -> Result<StudentRecord> {
        let name = validate_student_name(&new.name)?;
        validate_days_per_week(new.days_per_week)?;

        let blocked: Vec<&str> = new.blocked_days.iter().map(Weekday::as_str).collect();
        let record = StudentRecord {
            id: Uuid::new_v4().to_string(),
            tutor_id: self.tutor_id.clone(),
            name,
            days_per_week: Some(i64::from(new.days_per_week)),
            blocked_days: Some(Value::String(Value::from(blocked).to_string())),
            created_at: Utc::now(),
        };

        let data = serde_json::to_vec(&record).map_err(StorageError::from)?;

        let mut txn = self.storage.transaction()?;
        for (key, value) in txn.scan(self.prefix(RecordKind::Student).as_bytes())? {
            let existing: StudentRecord = serde_json::from_slice(&value)
                .map_err(|e| StorageError::corrupt_record(&key, e))?;
            if existing.name == record.name {
                return Err(RosterError::duplicate_student(record.name));
            }
        }
        txn.put(self.key(RecordKind::Student, &record.id).as_bytes(), &data)?;
        txn.commit()?;

        info!("Added student {} ({})", record.name, record.id);
        Ok(record)
    }

    /// All students, oldest first
    pub fn list_students(&self) -> Result<Vec<StudentRecord>> {
        let mut students: Vec<StudentRecord> =
            self.storage.scan_json(&self.prefix(RecordKind::Student))?;
        students.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!("Loaded {} students for tutor {}", students.len(), self.tutor_id);
        Ok(students)
    }

    pub fn get_student(&self, student_id: &str) -> Result<StudentRecord> {
        self.storage
            .get_json(&self.key(RecordKind::Student, student_id))?
            .ok_or_else(|| RosterError::student_not_found(student_id))
    }

    /// Delete a student; their class logs are kept
    pub fn remove_student(&self, student_id: &str) -> Result<()> {
        let existed = self
            .storage
            .delete(self.key(RecordKind::Student, student_id).as_bytes())?;
        if !existed {
            return Err(RosterError::student_not_found(student_id));
        }
        info!("Removed student {}", student_id);
        Ok(())
    }

    /// Replace the tutor's availability with `days` (day, max students)
    pub fn set_availability(&self, days: &[(Weekday, u32)]) -> Result<AvailabilityRecord> {
        let days = validate_working_days(days)?;

        let working: Vec<&str> = days.iter().map(|(day, _)| day.as_str()).collect();
        let maxima: Map<String, Value> = days
            .iter()
            .map(|(day, max)| (day.as_str().to_string(), Value::from(*max)))
            .collect();

        let record = AvailabilityRecord {
            id: Uuid::new_v4().to_string(),
            tutor_id: self.tutor_id.clone(),
            working_days: Some(Value::String(Value::from(working).to_string())),
            max_students: Some(Value::String(Value::Object(maxima).to_string())),
            updated_at: Utc::now(),
        };
        let data = serde_json::to_vec(&record).map_err(StorageError::from)?;

        let mut txn = self.storage.transaction()?;
        let previous = txn.scan(self.prefix(RecordKind::Availability).as_bytes())?;
        for (key, _) in &previous {
            txn.delete(key)?;
        }
        txn.put(self.key(RecordKind::Availability, &record.id).as_bytes(), &data)?;
        txn.commit()?;

        info!(
            "Saved availability for tutor {}: {} working days (replaced {})",
            self.tutor_id,
            days.len(),
            previous.len()
        );
        Ok(record)
    }

    /// The tutor's availability, if it has been set
    pub fn availability(&self) -> Result<Option<AvailabilityRecord>> {
        let records: Vec<AvailabilityRecord> =
            self.storage.scan_json(&self.prefix(RecordKind::Availability))?;
        Ok(records.into_iter().max_by_key(|r| r.updated_at))
    }

    /// Record the outcome of one lesson
    pub fn record_lesson(
        &self,
        student_id: &str,
        date: NaiveDate,
        status: LessonStatus,
    ) -> Result<ClassLog> {
        let student = self.get_student(student_id)?;

        let log = ClassLog {
            id: Uuid::new_v4().to_string(),
            tutor_id: self.tutor_id.clone(),
            student_id: student.id,
            date,
            status,
            created_at: Utc::now(),
        };

        self.storage
            .put_json(&self.key(RecordKind::ClassLog, &log.id), &log)?;

        info!(
            "Logged {} lesson for {} on {}",
            log.status, student.name, log.date
        );
        Ok(log)
    }

    /// All class logs, by lesson date
    pub fn class_logs(&self) -> Result<Vec<ClassLog>> {
        let mut logs: Vec<ClassLog> = self.storage.scan_json(&self.prefix(RecordKind::ClassLog))?;
        logs.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));
        Ok(logs)
    }

    pub fn progress(&self, student: &StudentRecord) -> Result<Progress> {
        Ok(Progress::for_student(student, &self.class_logs()?))
    }

    /// Build this week's plan; `None` when availability was never set
    pub fn weekly_plan(&self, scheduler: &Scheduler) -> Result<Option<WeeklyPlan>> {
        let Some(availability) = self.availability()? else {
            warn!(
                "No availability record for tutor {} - set availability first",
                self.tutor_id
            );
            return Ok(None);
        };

        let students = self.list_students()?;
        let logs = self.class_logs()?;

        Ok(Some(WeeklyPlan::build(
            scheduler,
            students,
            &availability,
            &logs,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open() -> (tempfile::TempDir, Arc<RedbBackend>) {
        let dir = tempdir().unwrap();
        let storage = Arc::new(RedbBackend::new(dir.path().join("test.redb")).unwrap());
        (dir, storage)
    }

    fn new_student(name: &str, days_per_week: u32, blocked_days: Vec<Weekday>) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            days_per_week,
            blocked_days,
        }
    }

    #[test]
    fn test_add_and_list_students() {
        let (_dir, storage) = open();
        let roster = Roster::new(storage, "tutor-1").unwrap();

        let alice = roster
            .add_student(new_student(" Alice ", 3, vec![Weekday::Monday]))
            .unwrap();
        let bob = roster.add_student(new_student("Bob", 1, vec![])).unwrap();

        assert_eq!(alice.name, "Alice");
        assert_eq!(
            alice.blocked_days,
            Some(Value::String("[\"Monday\"]".to_string()))
        );

        let students = roster.list_students().unwrap();
        let ids: Vec<_> = students.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![alice.id.as_str(), bob.id.as_str()]);

        assert_eq!(roster.get_student(&bob.id).unwrap(), bob);
    }

    #[test]
    fn test_add_student_validation() {
        let (_dir, storage) = open();
        let roster = Roster::new(storage, "tutor-1").unwrap();

        assert!(roster.add_student(new_student("  ", 2, vec![])).is_err());
        assert!(roster.add_student(new_student("Carol", 0, vec![])).is_err());
        assert!(roster.add_student(new_student("Carol", 8, vec![])).is_err());
        assert!(roster.list_students().unwrap().is_empty());
    }

    #[test]
    fn test_add_student_rejects_duplicate_name() {
        let (_dir, storage) = open();
        let roster = Roster::new(storage.clone(), "tutor-1").unwrap();
        roster.add_student(new_student("Alice", 2, vec![])).unwrap();

        assert!(matches!(
            roster.add_student(new_student(" Alice ", 2, vec![])),
            Err(RosterError::DuplicateStudent { ref name }) if name == "Alice"
        ));
        assert_eq!(roster.list_students().unwrap().len(), 1);

        roster
            .set_availability(&[(Weekday::Monday, 1)])
            .unwrap();
        let plan = roster.weekly_plan(&Scheduler::new()).unwrap().unwrap();
        assert_eq!(plan.schedule.day(Weekday::Monday), ["Alice", "Alice"]);
        assert_eq!(plan.report.requested_total(), 2);

        // Other tutors may reuse the name
        let other = Roster::new(storage, "tutor-2").unwrap();
        assert!(other.add_student(new_student("Alice", 1, vec![])).is_ok());
    }

    #[test]
    fn test_rosters_are_isolated_per_tutor() {
        let (_dir, storage) = open();
        let first = Roster::new(storage.clone(), "tutor-1").unwrap();
        let second = Roster::new(storage, "tutor-10").unwrap();

        first.add_student(new_student("Alice", 2, vec![])).unwrap();

        assert_eq!(first.list_students().unwrap().len(), 1);
        assert!(second.list_students().unwrap().is_empty());
        assert!(Roster::new(Arc::clone(&first.storage), "bad/id").is_err());
    }

    #[test]
    fn test_remove_student() {
        let (_dir, storage) = open();
        let roster = Roster::new(storage, "tutor-1").unwrap();
        let alice = roster.add_student(new_student("Alice", 2, vec![])).unwrap();

        roster.remove_student(&alice.id).unwrap();
        assert!(roster.list_students().unwrap().is_empty());

        assert!(matches!(
            roster.remove_student(&alice.id),
            Err(RosterError::StudentNotFound { .. })
        ));
        assert!(matches!(
            roster.get_student(&alice.id),
            Err(RosterError::StudentNotFound { .. })
        ));
    }

    #[test]
    fn test_set_availability_replaces_previous() {
        let (_dir, storage) = open();
        let roster = Roster::new(storage, "tutor-1").unwrap();

        assert!(roster.availability().unwrap().is_none());
        assert!(roster.set_availability(&[]).is_err());

        roster
            .set_availability(&[(Weekday::Monday, 2), (Weekday::Friday, 1)])
            .unwrap();
        roster
            .set_availability(&[(Weekday::Tuesday, 0)])
            .unwrap();

        let stored: Vec<AvailabilityRecord> = roster
            .storage
            .scan_json(&roster.prefix(RecordKind::Availability))
            .unwrap();
        assert_eq!(stored.len(), 1);

        let capacity = roster.availability().unwrap().unwrap().to_capacity_map();
        assert_eq!(capacity.get(Weekday::Tuesday), Some(1));
        assert_eq!(capacity.get(Weekday::Monday), None);
    }

    #[test]
    fn test_record_lesson_and_progress() {
        let (_dir, storage) = open();
        let roster = Roster::new(storage, "tutor-1").unwrap();
        let alice = roster.add_student(new_student("Alice", 2, vec![])).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();

        roster
            .record_lesson(&alice.id, date, LessonStatus::Completed)
            .unwrap();
        roster
            .record_lesson(&alice.id, date, LessonStatus::Missed)
            .unwrap();

        assert_eq!(roster.class_logs().unwrap().len(), 2);

        let progress = roster.progress(&alice).unwrap();
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.percentage, 50);

        assert!(matches!(
            roster.record_lesson("missing", date, LessonStatus::Completed),
            Err(RosterError::StudentNotFound { .. })
        ));
    }

    #[test]
    fn test_weekly_plan() {
        let (_dir, storage) = open();
        let roster = Roster::new(storage, "tutor-1").unwrap();
        let scheduler = Scheduler::new();

        roster.add_student(new_student("A", 2, vec![])).unwrap();
        assert!(roster.weekly_plan(&scheduler).unwrap().is_none());

        roster.add_student(new_student("B", 1, vec![])).unwrap();
        roster
            .set_availability(&[(Weekday::Monday, 1), (Weekday::Tuesday, 1)])
            .unwrap();

        let plan = roster.weekly_plan(&scheduler).unwrap().unwrap();
        assert_eq!(plan.schedule.day(Weekday::Monday), ["A", "B"]);
        assert_eq!(plan.schedule.day(Weekday::Tuesday), ["A"]);
        assert_eq!(plan.report.overbooked_days().len(), 1);
        assert_eq!(plan.students.len(), 2);
    }
}
