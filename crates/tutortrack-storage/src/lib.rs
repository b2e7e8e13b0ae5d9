//! TutorTrack Storage - Record storage over redb
//!
//! This crate provides:
//! - KVStore trait for storage abstraction
//! - JSON record helpers on top of any KVStore
//! - redb-based implementation
//! - Tutor-scoped key encoding
//! - Transaction support

pub mod encoding;
pub mod error;
pub mod kv;
pub mod redb_backend;

// Re-export commonly used types
pub use encoding::{KeyEncoder, RecordKey, RecordKind};
pub use error::{Result, StorageError};
pub use kv::{JsonStore, KVStore, Transaction};
pub use redb_backend::RedbBackend;
