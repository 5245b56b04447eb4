//! In-memory retained store with failure injection.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::RetainedStore;
use crate::error::{Error, Result};
use crate::types::RetainedSet;

/// Retained store held in process memory.
///
/// `None` models an absent document, so `clear` and a fresh store behave
/// the same way as a missing file.
#[derive(Default)]
pub struct MemoryRetainedStore {
    document: Mutex<Option<RetainedSet>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
    clears: AtomicUsize,
}

impl MemoryRetainedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document
    pub fn with_document(retained: RetainedSet) -> Self {
        let store = Self::default();
        *store.lock() = Some(retained);
        store
    }

    /// Make subsequent reads fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes and clears fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current document, `None` when absent
    pub fn document(&self) -> Option<RetainedSet> {
        self.lock().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Total store operations attempted
    pub fn op_count(&self) -> usize {
        self.read_count() + self.write_count() + self.clear_count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<RetainedSet>> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Store("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RetainedStore for MemoryRetainedStore {
    async fn read(&self) -> Result<RetainedSet> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Store("read rejected".to_string()));
        }
        Ok(self.lock().clone().unwrap_or_default())
    }

    async fn write(&self, retained: &RetainedSet) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        *self.lock() = Some(retained.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstanceId;

    #[tokio::test]
    async fn test_absent_then_written_then_cleared() {
        let store = MemoryRetainedStore::new();
        assert!(store.read().await.unwrap().is_empty());
        assert!(store.document().is_none());

        let mut retained = RetainedSet::new();
        retained.insert("alice", InstanceId::from("i-0a"));
        store.write(&retained).await.unwrap();
        assert_eq!(store.document(), Some(retained));

        store.clear().await.unwrap();
        assert!(store.document().is_none());
        assert_eq!(store.op_count(), 4);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryRetainedStore::new();
        store.set_fail_reads(true);
        assert!(matches!(store.read().await, Err(Error::Store(_))));

        store.set_fail_writes(true);
        assert!(store.write(&RetainedSet::new()).await.is_err());
        assert!(store.clear().await.is_err());
        assert!(store.document().is_none());
    }
}
