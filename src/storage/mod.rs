//! Durable client state
//!
//! The session store never touches persistence directly; it goes through the
//! [`SessionRepository`] seam so tests can inject [`MemoryRepository`] while
//! the binary uses [`FileRepository`].

pub mod file;
pub mod memory;

pub use file::FileRepository;
pub use memory::MemoryRepository;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ClientResult;

/// Key-value store for session state
///
/// Every mutation is complete when the call returns, so a read issued right
/// after a write always observes it.
pub trait SessionRepository: Send + Sync {
    /// Read a raw value
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Write a raw value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Write `value` only if `key` is absent and return whatever is stored afterwards
    fn set_if_absent(&self, key: &str, value: &str) -> ClientResult<String>;

    /// Remove all `keys` in a single write
    fn remove_many(&self, keys: &[&str]) -> ClientResult<()>;
}

/// Read and decode a JSON value
///
/// Malformed data is logged and discarded, and reads as absent.
pub fn load_json<T: DeserializeOwned>(
    repo: &dyn SessionRepository,
    key: &str,
) -> ClientResult<Option<T>> {
    let Some(raw) = repo.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Discarding malformed persisted state");
            repo.remove_many(&[key])?;
            Ok(None)
        }
    }
}

/// Encode and write a JSON value
pub fn store_json<T: Serialize>(
    repo: &dyn SessionRepository,
    key: &str,
    value: &T,
) -> ClientResult<()> {
    let raw = serde_json::to_string(value)?;
    repo.set(key, &raw)
}
