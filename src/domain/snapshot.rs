use super::task::Task;
use std::collections::HashSet;
use tracing::warn;

/// A complete, ordered copy of the collection at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    tasks: Vec<Task>,
}

impl Snapshot {
    /// Normalize raw store records into a snapshot.
    ///
    /// Records are ordered by creation time, newest first (ties keep store
    /// order). Records with blank text are dropped, and only the first record
    /// for a repeated id is kept, so the local list never shows an empty row
    /// or two rows for one document.
    pub fn ordered(records: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(records.len());

        for task in records {
            if task.text.trim().is_empty() {
                warn!(id = %task.id, "dropping task with blank text from snapshot");
                continue;
            }
            if !seen.insert(task.id.clone()) {
                warn!(id = %task.id, "dropping duplicate task id from snapshot");
                continue;
            }
            tasks.push(task);
        }

        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { tasks }
    }

    #[cfg(test)]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
