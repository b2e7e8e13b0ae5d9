use std::fmt;
use std::str::FromStr;

/// Kind of record stored under a tutor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Student,
    Availability,
    ClassLog,
}

impl RecordKind {
    /// Path segment used in storage keys
    pub fn segment(&self) -> &'static str {
        match self {
            RecordKind::Student => "students",
            RecordKind::Availability => "availability",
            RecordKind::ClassLog => "logs",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "students" => Ok(RecordKind::Student),
            "availability" => Ok(RecordKind::Availability),
            "logs" => Ok(RecordKind::ClassLog),
            other => Err(format!("Unknown record kind: {}", other)),
        }
    }
}

/// Decoded storage key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub tutor_id: String,
    pub kind: RecordKind,
    pub id: String,
}

impl RecordKey {
    pub fn new(tutor_id: impl Into<String>, kind: RecordKind, id: impl Into<String>) -> Self {
        Self {
            tutor_id: tutor_id.into(),
            kind,
            id: id.into(),
        }
    }

    /// Encode as `tutors/{tutor_id}/{kind}/{id}`
    pub fn encode(&self) -> String {
        KeyEncoder::encode_record_key(&self.tutor_id, self.kind, &self.id)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Key encoder for storage keys
pub struct KeyEncoder;

impl KeyEncoder {
    const ROOT: &'static str = "tutors";

    /// Encode a record key: tutors/{tutor_id}/{kind}/{id}
    pub fn encode_record_key(tutor_id: &str, kind: RecordKind, id: &str) -> String {
        format!("{}/{}/{}/{}", Self::ROOT, tutor_id, kind.segment(), id)
    }

    /// Encode a prefix for scanning all records of a kind for one tutor
    pub fn encode_kind_prefix(tutor_id: &str, kind: RecordKind) -> String {
        format!("{}/{}/{}/", Self::ROOT, tutor_id, kind.segment())
    }

    /// Encode a prefix for scanning everything stored for one tutor
    pub fn encode_tutor_prefix(tutor_id: &str) -> String {
        format!("{}/{}/", Self::ROOT, tutor_id)
    }

    /// Parse a storage key back to components
    pub fn parse_key(key: &str) -> Option<RecordKey> {
        let parts: Vec<&str> = key.split('/').collect();

        match parts.as_slice() {
            [root, tutor_id, kind, id] if *root == Self::ROOT && !id.is_empty() => {
                let kind = kind.parse().ok()?;
                Some(RecordKey::new(*tutor_id, kind, *id))
            }
            _ => None,
        }
    }

    /// Whether a tutor or record id can be embedded in a key
    pub fn is_valid_segment(segment: &str) -> bool {
        !segment.is_empty() && !segment.contains('/')
    }
}
