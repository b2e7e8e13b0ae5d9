//! Stored record shapes and their normalization into scheduler inputs.
//!
//! Records keep the loose encodings of the document store they come from
//! (JSON-encoded strings for day lists and capacity maps). Normalization
//! never fails: malformed data degrades to "no constraint" for blocked days
//! and "no capacity" for availability, with a warning logged.

use crate::{CapacityMap, StudentRequirement, TutorError, Weekday};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::{error, warn};

/// Capacity given to a working day without a usable explicit maximum
pub const DEFAULT_DAY_CAPACITY: u32 = 1;

/// A student as stored for one tutor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub tutor_id: String,
    pub name: String,
    #[serde(default)]
    pub days_per_week: Option<i64>,
    /// JSON-encoded string or a plain array of day names
    #[serde(default)]
    pub blocked_days: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl StudentRecord {
    /// Weekly lesson count; missing or negative counts become 0
    pub fn weekly_count(&self) -> u32 {
        self.days_per_week
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// Blocked days decoded from whatever encoding was stored
    pub fn blocked_weekdays(&self) -> BTreeSet<Weekday> {
        match parse_day_list(self.blocked_days.as_ref()) {
            Some(days) => days.into_iter().collect(),
            None => {
                warn!(
                    "Failed to parse blockedDays for student {}: {:?}",
                    self.name, self.blocked_days
                );
                BTreeSet::new()
            }
        }
    }

    /// Normalize into the scheduler's input type
    pub fn to_requirement(&self) -> StudentRequirement {
        StudentRequirement {
            name: self.name.clone(),
            weekly_count: self.weekly_count(),
            blocked_days: self.blocked_weekdays(),
        }
    }
}

/// A tutor's working days and per-day maximum student count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub id: String,
    pub tutor_id: String,
    /// JSON-encoded string or a plain array of day names
    #[serde(default)]
    pub working_days: Option<Value>,
    /// JSON-encoded string or an object of day name to maximum
    #[serde(default)]
    pub max_students: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityRecord {
    /// Working days in the order they were stored
    pub fn working_weekdays(&self) -> Vec<Weekday> {
        let mut days = match self.working_days.as_ref() {
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(value) => parse_day_list(Some(&value)),
                Err(_) => {
                    warn!("Failed to parse workingDays as JSON, falling back to comma splitting");
                    Some(split_loose_list(raw))
                }
            },
            other => parse_day_list(other),
        }
        .unwrap_or_else(|| {
            error!("workingDays is not a list: {:?}", self.working_days);
            Vec::new()
        });

        let mut seen = BTreeSet::new();
        days.retain(|day| seen.insert(*day));
        days
    }

    /// Explicit per-day maxima; unparseable data yields an empty map
    pub fn max_students_by_day(&self) -> BTreeMap<Weekday, u32> {
        let object = match self.max_students.as_ref() {
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                _ => {
                    error!("Failed to parse maxStudents as JSON: {}", raw);
                    return BTreeMap::new();
                }
            },
            Some(Value::Object(map)) => map.clone(),
            _ => return BTreeMap::new(),
        };

        object
            .iter()
            .filter_map(|(key, value)| {
                let day = key.parse::<Weekday>().ok()?;
                let max = positive_count(value)?;
                Some((day, max))
            })
            .collect()
    }

    /// Normalize into the scheduler's capacity map.
    ///
    /// Each working day gets its explicit maximum when that is a positive
    /// integer, otherwise `DEFAULT_DAY_CAPACITY`.
    pub fn to_capacity_map(&self) -> CapacityMap {
        let maxima = self.max_students_by_day();
        self.working_weekdays()
            .into_iter()
            .map(|day| {
                let capacity = maxima.get(&day).copied().unwrap_or(DEFAULT_DAY_CAPACITY);
                (day, capacity)
            })
            .collect()
    }
}

/// Outcome of a scheduled lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Completed,
    Missed,
}

impl LessonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Completed => "completed",
            LessonStatus::Missed => "missed",
        }
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LessonStatus {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(LessonStatus::Completed),
            "missed" => Ok(LessonStatus::Missed),
            _ => Err(TutorError::invalid_status(s)),
        }
    }
}

/// Attendance confirmation for one lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLog {
    pub id: String,
    pub tutor_id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub status: LessonStatus,
    pub created_at: DateTime<Utc>,
}

/// Completed lessons against the weekly target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
    /// Rounded percentage, 0 when `total` is 0
    pub percentage: u32,
}

impl Progress {
    /// Count completed logs for `student` among `logs`
    pub fn for_student(student: &StudentRecord, logs: &[ClassLog]) -> Self {
        let completed = logs
            .iter()
            .filter(|log| log.student_id == student.id && log.status == LessonStatus::Completed)
            .count();
        let completed = u32::try_from(completed).unwrap_or(u32::MAX);
        let total = student.weekly_count();

        let percentage = if total == 0 {
            0
        } else {
            (f64::from(completed) / f64::from(total) * 100.0).round() as u32
        };

        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Decode a day list stored as a JSON array, a JSON-encoded string of one,
/// or nothing. Returns `None` when the value is present but malformed.
/// Unknown day names are skipped.
fn parse_day_list(value: Option<&Value>) -> Option<Vec<Weekday>> {
    let items = match value {
        None | Some(Value::Null) => return Some(Vec::new()),
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(raw)) if raw.trim().is_empty() => return Some(Vec::new()),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw).ok()? {
            Value::Array(items) => items,
            _ => return None,
        },
        Some(_) => return None,
    };

    let days = items
        .iter()
        .filter_map(|item| {
            let name = item.as_str()?;
            match name.parse::<Weekday>() {
                Ok(day) => Some(day),
                Err(_) => {
                    warn!("Ignoring unknown day name: {}", name);
                    None
                }
            }
        })
        .collect();

    Some(days)
}

/// Last-resort decoding of something like `[Monday, "Tuesday"]`
fn split_loose_list(raw: &str) -> Vec<Weekday> {
    raw.replace(['[', ']', '"'], "")
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .filter_map(|part| part.parse::<Weekday>().ok())
        .collect()
}

fn positive_count(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    if n == 0 {
        return None;
    }
    Some(u32::try_from(n).unwrap_or(u32::MAX))
}
