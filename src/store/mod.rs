pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::domain::{NewTask, Snapshot, TaskId, TaskPatch};
use std::sync::mpsc;

/// Live feed of full collection snapshots, newest task first.
/// The stream ends (sender dropped) when the subscription is lost.
pub type SnapshotStream = mpsc::Receiver<Result<Snapshot, StoreError>>;

/// Contract of the document store holding the task collection
pub trait RemoteStore: Send + Sync {
    /// Open a live subscription. The first item is the current collection.
    fn subscribe(&self) -> Result<SnapshotStream, StoreError>;

    /// Create a document and return its assigned identifier
    fn create(&self, record: NewTask) -> Result<TaskId, StoreError>;

    /// Apply a partial update to one document
    fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError>;

    /// Delete one document
    fn delete(&self, id: &TaskId) -> Result<(), StoreError>;
}
