use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TaskId(pub i64);

/// Lifecycle of a task. Completed tasks are not flipped to a "done" status in
/// place; they move to history and the row is deleted, so `Pending` is the
/// only value that ever appears on a live row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub description: String,
    /// `YYYY-MM-DD`
    pub task_date: String,
    /// `HH:MM`, 24-hour
    pub task_time: String,
    /// `YYYY-MM-DD HH:MM`; set on creation, cleared once the reminder has
    /// fired. A cleared value never fires again.
    pub notify_at: Option<String>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub description: String,
    pub date: String,
    pub time: String,
}

/// One row of the scanner's due-reminder poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub task_id: TaskId,
    pub description: String,
    pub notify_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: UserId,
    pub description: String,
    pub task_date: String,
    pub task_time: String,
    /// `YYYY-MM-DD`, the local date the task was marked done.
    pub completion_date: String,
}
