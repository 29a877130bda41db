use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Category stored when the user leaves the category field blank
pub const DEFAULT_CATEGORY: &str = "General";

/// Opaque document identifier assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier (used by stores when a document is created)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task document as mirrored from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier
    pub id: TaskId,
    /// Task text (never blank once normalized)
    pub text: String,
    /// Category label; older documents may omit it
    #[serde(default)]
    pub category: String,
    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,
    /// Creation time, sort key (newest first)
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task carries a category badge
    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}

/// Record sent with a create mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub text: String,
    pub category: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl NewTask {
    /// Build a create record from raw form input.
    /// Returns None when the text is blank after trimming.
    pub fn from_input(text: &str, category: &str) -> Option<Self> {
        Self::from_input_at(text, category, Utc::now())
    }

    pub fn from_input_at(text: &str, category: &str, created_at: DateTime<Utc>) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };

        Some(Self {
            text: text.to_string(),
            category: category.to_string(),
            completed: false,
            created_at,
        })
    }

    /// Materialize the record under the identifier the store assigned
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            text: self.text,
            category: self.category,
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

/// Partial record sent with an update mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
        }
    }

    /// Apply the set fields onto a stored task
    pub fn apply(&self, task: &mut Task) {
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_trims_input() {
        let record = NewTask::from_input("  Buy milk  ", "  Shopping ").unwrap();
        assert_eq!(record.text, "Buy milk");
        assert_eq!(record.category, "Shopping");
        assert!(!record.completed);
    }

    #[test]
    fn test_new_task_blank_category_defaults() {
        let record = NewTask::from_input("Call mom", "   ").unwrap();
        assert_eq!(record.category, DEFAULT_CATEGORY);

        let record = NewTask::from_input("Call mom", "").unwrap();
        assert_eq!(record.category, "General");
    }

    #[test]
    fn test_new_task_blank_text_rejected() {
        assert!(NewTask::from_input("", "Work").is_none());
        assert!(NewTask::from_input("   \t ", "Work").is_none());
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut task = NewTask::from_input("Write report", "Work")
            .unwrap()
            .into_task(TaskId::new("t1"));

        TaskPatch::default().apply(&mut task);
        assert!(!task.completed);

        TaskPatch::completed(true).apply(&mut task);
        assert!(task.completed);
        assert_eq!(task.text, "Write report");
    }

    #[test]
    fn test_task_document_uses_camel_case() {
        let json = r#"{"id":"abc","text":"Buy milk","createdAt":"2026-10-16T09:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "abc");
        assert_eq!(task.category, "");
        assert!(!task.completed);
        assert!(!task.has_category());

        let out = serde_json::to_string(&task).unwrap();
        assert!(out.contains("\"createdAt\""));
    }

    #[test]
    fn test_created_at_is_send_time() {
        let before = Utc::now();
        let record = NewTask::from_input("x", "").unwrap();
        assert!(record.created_at >= before);
        assert!(record.created_at <= Utc::now());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(TaskId::generate(), TaskId::generate());
    }
}
