// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the record store
#[derive(Error, Debug, Diagnostic)]
pub enum StorageError {
    #[error("Database error: {message}")]
    #[diagnostic(
        code(storage::database_error),
        help("Check that the data file is readable and not held open by another tutortrack process")
    )]
    DatabaseError {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Transaction error: {message}")]
    #[diagnostic(
        code(storage::transaction_error),
        help("A transaction can be committed or rolled back only once")
    )]
    TransactionError { message: String },

    /// A stored value that no longer decodes as the expected record
    #[error("Record at '{key}' is unreadable: {message}")]
    #[diagnostic(
        code(storage::corrupt_record),
        help("Remove the record at this key or restore the data file from a backup")
    )]
    CorruptRecord {
        key: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode record: {message}")]
    #[diagnostic(code(storage::encode_error))]
    EncodeError {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {message}")]
    #[diagnostic(
        code(storage::io_error),
        help("Check permissions on the data directory and available disk space")
    )]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn database_error(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::DatabaseError {
            message: message.into(),
            source,
        }
    }

    pub fn transaction_error(message: impl Into<String>) -> Self {
        Self::TransactionError {
            message: message.into(),
        }
    }

    /// Wrap a decode failure for the value stored at `key`
    pub fn corrupt_record(key: impl AsRef<[u8]>, source: serde_json::Error) -> Self {
        Self::CorruptRecord {
            key: String::from_utf8_lossy(key.as_ref()).into_owned(),
            message: source.to_string(),
            source,
        }
    }
}

macro_rules! database_error_from {
    ($($ty:ty => $what:literal),* $(,)?) => {
        $(
            impl From<$ty> for StorageError {
                fn from(err: $ty) -> Self {
                    StorageError::database_error(format!("{}: {}", $what, err), Some(Box::new(err)))
                }
            }
        )*
    };
}

database_error_from! {
    redb::DatabaseError => "failed to open database",
    redb::StorageError => "storage failure",
    redb::TableError => "table unavailable",
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::transaction_error(format!("could not begin: {}", err))
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::transaction_error(format!("commit failed: {}", err))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::EncodeError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}
