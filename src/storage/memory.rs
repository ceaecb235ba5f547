//! In-memory session repository

use std::collections::HashMap;
use std::sync::Mutex;

use super::SessionRepository;
use crate::error::{ClientError, ClientResult};

/// Volatile store, used in tests and as a fallback when no state file is wanted
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("state lock poisoned".to_string()))
    }
}

impl SessionRepository for MemoryRepository {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &str) -> ClientResult<String> {
        let mut entries = self.lock()?;
        Ok(entries
            .entry(key.to_string())
            .or_insert_with(|| value.to_string())
            .clone())
    }

    fn remove_many(&self, keys: &[&str]) -> ClientResult<()> {
        let mut entries = self.lock()?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}
