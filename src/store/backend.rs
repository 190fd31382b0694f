use crate::error::Result;

/// Abstract interface for the raw key-value medium.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while [`RecordStore`](super::RecordStore) handles the "what"
/// (ids, search, import/export).
///
/// Values are whole UTF-8 documents: the store reads and writes each
/// namespace as one string, never in parts.
pub trait StorageBackend {
    /// Read the value stored under `key`.
    /// Returns `Ok(None)` if the key has never been written.
    /// Returns `Err` only on actual medium errors (permissions, disk failure).
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    /// MUST be atomic for the single value (e.g. write to tmp then rename)
    /// to avoid partial documents.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
