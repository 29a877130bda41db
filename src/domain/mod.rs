pub mod enums;
pub mod filter;
pub mod snapshot;
pub mod task;
pub mod views;

pub use enums::{StatusFilter, SyncStatus, UiMode};
pub use filter::{cycle_category, derive_category_options, reconcile_category, CategoryFilter, Filters};
pub use snapshot::Snapshot;
pub use task::{NewTask, Task, TaskId, TaskPatch, DEFAULT_CATEGORY};
pub use views::{checkbox_glyph, render_view, ListView};
