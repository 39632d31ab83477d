//! Volatile in-process store.
//!
//! Used as a test double and wherever durable storage is unavailable. Reads
//! and writes can be switched to fail, and writes can be slowed down to
//! open a window for interleaving.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::KeyValueStore;
use crate::error::StorageError;

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
    write_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate from key/value pairs.
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store
            .values()
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every subsequent write sleeps this long before landing.
    pub fn set_write_delay(&self, delay: Option<Duration>) {
        *self.write_delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Synchronous peek for assertions.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    async fn before_write(&self, key: &str) -> Result<(), StorageError> {
        let delay = *self.write_delay.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                message: "write rejected".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: "read rejected".into(),
            });
        }
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.before_write(key).await?;
        self.values().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        self.before_write("<batch>").await?;
        let mut values = self.values();
        for (key, value) in entries {
            values.insert(key.clone(), value.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failures_can_be_toggled() {
        let store = MemoryStore::with_values([("a", "1")]);
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.set_fail_reads(true);
        assert!(store.get("a").await.is_err());
        store.set_fail_reads(false);

        store.set_fail_writes(true);
        assert!(store.set("a", "2").await.is_err());
        assert_eq!(store.peek("a").as_deref(), Some("1"));
        assert_eq!(store.write_count(), 0);

        store.set_fail_writes(false);
        store.set("a", "2").await.unwrap();
        assert_eq!(store.peek("a").as_deref(), Some("2"));
        assert_eq!(store.write_count(), 1);
    }
}
