use crate::TutorError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Day of the week used as a scheduling bucket.
///
/// Variant order is the canonical iteration order (Monday first) and is
/// relied upon by `CapacityMap` and `Schedule` for deterministic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in canonical order
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Full English name, as stored in records
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter abbreviation ("Mon")
    pub fn short_name(&self) -> &'static str {
        &self.as_str()[..3]
    }

    /// Weekday of a calendar date
    pub fn of(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        date.weekday().into()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = TutorError;

    /// Case-insensitive; accepts full names and three-letter abbreviations
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let full = day.as_str().to_ascii_lowercase();
                needle == full || needle == full[..3]
            })
            .ok_or_else(|| TutorError::invalid_weekday(s))
    }
}

impl TryFrom<String> for Weekday {
    type Error = TutorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// A student's lesson demand for one scheduling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRequirement {
    /// Display name, used as the key in the resulting schedule
    pub name: String,
    /// Lesson slots required this week
    pub weekly_count: u32,
    /// Days the student cannot attend
    #[serde(default)]
    pub blocked_days: BTreeSet<Weekday>,
}

impl StudentRequirement {
    /// Create a requirement with no blocked days
    pub fn new(name: impl Into<String>, weekly_count: u32) -> Self {
        Self {
            name: name.into(),
            weekly_count,
            blocked_days: BTreeSet::new(),
        }
    }

    /// Add blocked days
    pub fn with_blocked_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.blocked_days.extend(days);
        self
    }

    /// Whether the student cannot attend on `day`
    pub fn is_blocked(&self, day: Weekday) -> bool {
        self.blocked_days.contains(&day)
    }
}

/// Tutor capacity per working day.
///
/// Days absent from the map are not working days. Iteration always follows
/// canonical weekday order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityMap(BTreeMap<Weekday, u32>);

impl CapacityMap {
    /// Create an empty capacity map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_day(mut self, day: Weekday, capacity: u32) -> Self {
        self.insert(day, capacity);
        self
    }

    /// Set the capacity for a day, making it a working day
    pub fn insert(&mut self, day: Weekday, capacity: u32) {
        self.0.insert(day, capacity);
    }

    /// Capacity of a day, `None` if it is not a working day
    pub fn get(&self, day: Weekday) -> Option<u32> {
        self.0.get(&day).copied()
    }

    /// Whether `day` is a working day
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains_key(&day)
    }

    /// Working days in canonical order
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.keys().copied()
    }

    /// (day, capacity) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, u32)> + '_ {
        self.0.iter().map(|(day, cap)| (*day, *cap))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of all day capacities
    pub fn total(&self) -> u64 {
        self.0.values().map(|cap| u64::from(*cap)).sum()
    }
}

impl FromIterator<(Weekday, u32)> for CapacityMap {
    fn from_iter<I: IntoIterator<Item = (Weekday, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Weekly schedule: every weekday mapped to the names assigned that day.
///
/// All seven days are always present. Names appear in assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule(BTreeMap<Weekday, Vec<String>>);

impl Schedule {
    /// Create a schedule with all seven days empty
    pub fn new() -> Self {
        Self(Weekday::ALL.into_iter().map(|day| (day, Vec::new())).collect())
    }

    /// Names assigned to `day`, in assignment order
    pub fn day(&self, day: Weekday) -> &[String] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of assignments on `day`
    pub fn assigned(&self, day: Weekday) -> usize {
        self.day(day).len()
    }

    /// Append `name` to `day`
    pub fn assign(&mut self, day: Weekday, name: impl Into<String>) {
        self.0.entry(day).or_default().push(name.into());
    }

    /// Number of times `name` appears anywhere in the week
    pub fn occurrences(&self, name: &str) -> usize {
        self.0
            .values()
            .map(|names| names.iter().filter(|n| n.as_str() == name).count())
            .sum()
    }

    /// Occurrence count of every scheduled name
    pub fn tallies(&self) -> HashMap<&str, usize> {
        let mut tallies = HashMap::new();
        for name in self.0.values().flatten() {
            *tallies.entry(name.as_str()).or_insert(0) += 1;
        }
        tallies
    }

    /// (day, names) pairs for all seven days in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[String])> + '_ {
        self.0.iter().map(|(day, names)| (*day, names.as_slice()))
    }

    /// Total number of lesson slots assigned
    pub fn total_assignments(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Whether no day has any assignment
    pub fn is_empty(&self) -> bool {
        self.total_assignments() == 0
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
