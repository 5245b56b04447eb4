//! Retained-set persistence.
//!
//! The retained set is one document; every operation reads or replaces it
//! wholesale. There is no conditional write, so concurrent read-modify-write
//! cycles resolve as last writer wins.

mod file;
mod memory;

pub use file::FileRetainedStore;
pub use memory::MemoryRetainedStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RetainedSet;

/// Durable storage for the retained set.
#[async_trait]
pub trait RetainedStore: Send + Sync {
    /// Read the current set. A missing document is an empty set.
    async fn read(&self) -> Result<RetainedSet>;

    /// Replace the stored set.
    async fn write(&self, retained: &RetainedSet) -> Result<()>;

    /// Remove the document. Clearing a missing document succeeds.
    async fn clear(&self) -> Result<()>;
}
