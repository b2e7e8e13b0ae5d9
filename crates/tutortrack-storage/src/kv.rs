use crate::{Result, StorageError};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key-value store trait
pub trait KVStore: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>>;

    /// Put a key-value pair
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Delete a key, returning whether it existed
    fn delete(&self, key: &[u8]) -> Result<bool>;

    /// Scan keys with a given prefix, in key order
    fn scan(&self, prefix: &[u8]) -> Result<Vec<(Bytes, Bytes)>>;

    /// Check if a key exists
    fn exists(&self, key: &[u8]) -> Result<bool>;

    /// Begin a transaction
    fn transaction(&self) -> Result<Box<dyn Transaction>>;
}

/// Transaction trait for atomic operations
pub trait Transaction: Send {
    /// Get a value by key
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>>;

    /// Put a key-value pair
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Delete a key
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Scan keys with a given prefix, seeing this transaction's own writes
    fn scan(&self, prefix: &[u8]) -> Result<Vec<(Bytes, Bytes)>>;

    /// Commit the transaction
    fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    fn rollback(self: Box<Self>) -> Result<()>;
}

/// JSON record access on top of any [`KVStore`]
pub trait JsonStore: KVStore {
    /// Get and decode a record
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key.as_bytes())?
            .map(|data| serde_json::from_slice(&data).map_err(|e| StorageError::corrupt_record(key, e)))
            .transpose()
    }

    /// Encode and store a record
    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec(value)?;
        self.put(key.as_bytes(), &data)
    }

    /// Decode every record under a prefix, in key order
    fn scan_json<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        self.scan(prefix.as_bytes())?
            .iter()
            .map(|(key, data)| {
                serde_json::from_slice(data).map_err(|e| StorageError::corrupt_record(key, e))
            })
            .collect()
    }
}

impl<S: KVStore + ?Sized> JsonStore for S {}
