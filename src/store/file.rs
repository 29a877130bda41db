use super::{RemoteStore, SnapshotStream, StoreError};
use crate::domain::{NewTask, Snapshot, Task, TaskId, TaskPatch};
use crate::persistence::atomic_write;
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// On-disk shape of the collection
#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionDocument {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Store backed by one JSON document that several processes may share.
///
/// Subscribers poll the document and emit a snapshot whenever its content
/// changes, so writes from any process reach every client. Every
/// read-modify-write holds an exclusive lock on a sibling `.lock` file, so
/// writers never lose each other's changes; two updates to the same task
/// resolve by last-write-wins.
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    poll_interval: Duration,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>, poll_interval: Duration) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        info!(path = %path.display(), ?poll_interval, "opened collection document");
        Ok(Self {
            lock_path: lock_file(&path),
            path,
            poll_interval,
        })
    }

    fn load(&self) -> Result<Vec<Task>, StoreError> {
        let content = read_raw(&self.path)?;
        parse_document(&self.path, &content)
    }

    fn save(&self, tasks: Vec<Task>) -> Result<(), StoreError> {
        let doc = CollectionDocument { tasks };
        let json = serde_json::to_string_pretty(&doc).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, &json).map_err(StoreError::Write)
    }

    /// Load, mutate and save while holding the collection lock.
    /// The document itself is replaced by rename on save, so the lock lives in its own file.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Task>) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| StoreError::io(&self.lock_path, e))?;
        let mut lock = RwLock::new(file);
        let _guard = lock.write().map_err(|e| StoreError::io(&self.lock_path, e))?;

        let mut tasks = self.load()?;
        let out = f(&mut tasks)?;
        self.save(tasks)?;
        Ok(out)
    }
}

/// `todos.json` -> `todos.json.lock`
fn lock_file(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

/// Raw document text; a missing file reads as an empty collection
fn read_raw(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn parse_document(path: &Path, content: &str) -> Result<Vec<Task>, StoreError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: CollectionDocument = serde_json::from_str(content).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(doc.tasks)
}

/// Poll the document until the receiver hangs up or the document becomes unreadable
fn watch(path: PathBuf, poll_interval: Duration, tx: mpsc::Sender<Result<Snapshot, StoreError>>) {
    let mut last: Option<String> = None;

    loop {
        let content = match read_raw(&path) {
            Ok(content) => content,
            Err(e) => {
                let _ = tx.send(Err(e));
                return;
            }
        };

        if last.as_deref() != Some(content.as_str()) {
            let tasks = match parse_document(&path, &content) {
                Ok(tasks) => tasks,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "collection document unreadable");
                    let _ = tx.send(Err(e));
                    return;
                }
            };
            debug!(path = %path.display(), tasks = tasks.len(), "collection changed");
            if tx.send(Ok(Snapshot::ordered(tasks))).is_err() {
                return;
            }
            last = Some(content);
        }

        thread::sleep(poll_interval);
    }
}

impl RemoteStore for FileStore {
    fn subscribe(&self) -> Result<SnapshotStream, StoreError> {
        let (tx, rx) = mpsc::channel();
        let path = self.path.clone();
        let poll_interval = self.poll_interval;

        thread::Builder::new()
            .name("collection-watch".to_string())
            .spawn(move || watch(path, poll_interval, tx))
            .map_err(|e| StoreError::Unavailable(format!("failed to start watcher: {}", e)))?;

        Ok(rx)
    }

    fn create(&self, record: NewTask) -> Result<TaskId, StoreError> {
        self.modify(|tasks| {
            let id = TaskId::generate();
            tasks.push(record.into_task(id.clone()));
            Ok(id)
        })
    }

    fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        self.modify(|tasks| {
            let task = tasks
                .iter_mut()
                .find(|t| t.id == *id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            patch.apply(task);
            Ok(())
        })
    }

    fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        self.modify(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != *id);
            if tasks.len() == before {
                return Err(StoreError::NotFound(id.clone()));
            }
            Ok(())
        })
    }
}
