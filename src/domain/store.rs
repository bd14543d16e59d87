use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use super::task::{DueReminder, HistoryEntry, Task, TaskId, TaskInput, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("invalid date/time: {date:?} {time:?} (expected YYYY-MM-DD and HH:MM)")]
    InvalidDateTimeFormat { date: String, time: String },
}

/// Storage seam for users, tasks and completed-task history.
///
/// Every operation reports failure explicitly; callers decide whether to log,
/// retry or surface it.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    /// Create tables if missing and apply the idempotent schema upgrade.
    async fn init(&self) -> Result<(), StoreError>;

    /// Insert a new user row. Usernames are not required to be unique;
    /// duplicates are accepted and login resolves to the first match.
    async fn register_user(&self, username: &str, password: &str) -> Result<UserId, StoreError>;

    /// Exact-match credential check. Returns the first matching user id.
    async fn validate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserId>, StoreError>;

    /// Insert a task with status `Pending` and `notify_at` derived from the
    /// validated date + time pair.
    async fn add_task(&self, user_id: UserId, input: TaskInput) -> Result<Task, StoreError>;

    /// Unordered snapshot of a user's live (non-completed) tasks.
    async fn get_user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, StoreError>;

    /// Overwrite description, date and time. Does not touch `notify_at` or
    /// status.
    async fn edit_task(&self, task_id: TaskId, input: TaskInput) -> Result<(), StoreError>;

    /// Remove a task. No-op if the id does not exist.
    async fn delete_task(&self, task_id: TaskId) -> Result<(), StoreError>;

    /// Move a task to history with today's date as completion date, then
    /// delete it, in one transaction. Succeeds without effect for an unknown
    /// id.
    async fn mark_task_done(&self, task_id: TaskId) -> Result<(), StoreError>;

    /// All `Pending` tasks whose `notify_at` is set and `<= now` (inclusive,
    /// minute resolution).
    async fn fetch_due(&self, now: NaiveDateTime) -> Result<Vec<DueReminder>, StoreError>;

    /// Clear `notify_at` so the reminder never fires again. Idempotent.
    async fn mark_task_as_notified(&self, task_id: TaskId) -> Result<(), StoreError>;

    /// Unordered snapshot of a user's completed tasks.
    async fn get_completed_tasks(&self, user_id: UserId)
        -> Result<Vec<HistoryEntry>, StoreError>;
}
