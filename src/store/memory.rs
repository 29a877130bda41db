use super::{RemoteStore, SnapshotStream, StoreError};
use crate::domain::{NewTask, Snapshot, Task, TaskId, TaskPatch};
use std::sync::{mpsc, Mutex, MutexGuard};
use tracing::debug;

type Subscriber = mpsc::Sender<Result<Snapshot, StoreError>>;

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    subscribers: Vec<Subscriber>,
    offline: bool,
}

impl Inner {
    /// Push the current collection to every live subscriber, forgetting closed ones
    fn broadcast(&mut self) {
        let snapshot = Snapshot::ordered(self.tasks.clone());
        self.subscribers
            .retain(|tx| tx.send(Ok(snapshot.clone())).is_ok());
        debug!(
            subscribers = self.subscribers.len(),
            tasks = snapshot.len(),
            "broadcast snapshot"
        );
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

/// In-process store; every mutation is pushed to subscribers immediately
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the collection usable
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current contents, newest first
    #[cfg(test)]
    pub fn tasks(&self) -> Vec<Task> {
        Snapshot::ordered(self.lock().tasks.clone()).into_tasks()
    }

    /// Reject every call until switched back online
    #[cfg(test)]
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Drop every open subscription, as a lost connection would
    #[cfg(test)]
    pub fn disconnect_subscribers(&self) {
        self.lock().subscribers.clear();
    }
}

impl RemoteStore for MemoryStore {
    fn subscribe(&self) -> Result<SnapshotStream, StoreError> {
        let mut inner = self.lock();
        inner.check_online()?;

        let (tx, rx) = mpsc::channel();
        // Initial load
        let _ = tx.send(Ok(Snapshot::ordered(inner.tasks.clone())));
        inner.subscribers.push(tx);
        Ok(rx)
    }

    fn create(&self, record: NewTask) -> Result<TaskId, StoreError> {
        let mut inner = self.lock();
        inner.check_online()?;

        let id = TaskId::generate();
        inner.tasks.push(record.into_task(id.clone()));
        inner.broadcast();
        Ok(id)
    }

    fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_online()?;

        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply(task);
        inner.broadcast();
        Ok(())
    }

    fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.check_online()?;

        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != *id);
        if inner.tasks.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        inner.broadcast();
        Ok(())
    }
}
