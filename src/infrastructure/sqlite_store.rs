use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::domain::datetime::{DATE_FORMAT, combine_notify_at, format_minute};
use crate::domain::store::{StoreError, TaskStore};
use crate::domain::task::{DueReminder, HistoryEntry, Task, TaskId, TaskInput, TaskStatus, UserId};

#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTaskStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        // A pooled in-memory database is one database per connection; force a
        // single connection so tests see consistent state.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                password TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                task_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                description TEXT NOT NULL,
                task_date TEXT NOT NULL,
                task_time TEXT NOT NULL,
                notify_date_time TEXT,
                status TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id)
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS history (
                history_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                description TEXT NOT NULL,
                task_date TEXT NOT NULL,
                task_time TEXT NOT NULL,
                completion_date TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id)
            )",
        )
        .execute(&*self.pool)
        .await?;

        // Databases created before reminders existed lack the
        // notify_date_time column; add it in place.
        let columns = sqlx::query("PRAGMA table_info(tasks)")
            .fetch_all(&*self.pool)
            .await?;
        let has_notify = columns.iter().any(|row| {
            let name: String = row.get("name");
            name == "notify_date_time"
        });
        if !has_notify {
            sqlx::query("ALTER TABLE tasks ADD COLUMN notify_date_time TEXT")
                .execute(&*self.pool)
                .await?;
        }
        Ok(())
    }

    async fn register_user(&self, username: &str, password: &str) -> Result<UserId, StoreError> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?1, ?2)")
            .bind(username)
            .bind(password)
            .execute(&*self.pool)
            .await?;
        Ok(UserId(result.last_insert_rowid()))
    }

    async fn validate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserId>, StoreError> {
        let row = sqlx::query("SELECT id FROM users WHERE username = ?1 AND password = ?2")
            .bind(username)
            .bind(password)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(|r| UserId(r.get("id"))))
    }

    async fn add_task(&self, user_id: UserId, input: TaskInput) -> Result<Task, StoreError> {
        let notify_at = combine_notify_at(&input.date, &input.time)?;
        let status = TaskStatus::Pending;
        let result = sqlx::query(
            "INSERT INTO tasks (user_id, description, task_date, task_time, notify_date_time, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(user_id.0)
        .bind(&input.description)
        .bind(&input.date)
        .bind(&input.time)
        .bind(&notify_at)
        .bind(status.as_str())
        .execute(&*self.pool)
        .await?;
        Ok(Task {
            id: TaskId(result.last_insert_rowid()),
            user_id,
            description: input.description,
            task_date: input.date,
            task_time: input.time,
            notify_at: Some(notify_at),
            status,
        })
    }

    async fn get_user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(
            "SELECT task_id, user_id, description, task_date, task_time, notify_date_time
             FROM tasks WHERE user_id = ?1",
        )
        .bind(user_id.0)
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_task).collect())
    }

    async fn edit_task(&self, task_id: TaskId, input: TaskInput) -> Result<(), StoreError> {
        // notify_date_time is deliberately left alone: editing a task's date
        // or time does not reschedule its reminder (longstanding behavior,
        // kept as-is).
        sqlx::query(
            "UPDATE tasks SET description = ?2, task_date = ?3, task_time = ?4 WHERE task_id = ?1",
        )
        .bind(task_id.0)
        .bind(&input.description)
        .bind(&input.date)
        .bind(&input.time)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn delete_task(&self, task_id: TaskId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks WHERE task_id = ?1")
            .bind(task_id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn mark_task_done(&self, task_id: TaskId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            "SELECT user_id, description, task_date, task_time FROM tasks WHERE task_id = ?1",
        )
        .bind(task_id.0)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(row) = row {
            let completion_date = Local::now().date_naive().format(DATE_FORMAT).to_string();
            sqlx::query(
                "INSERT INTO history (user_id, description, task_date, task_time, completion_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(row.get::<i64, _>("user_id"))
            .bind(row.get::<String, _>("description"))
            .bind(row.get::<String, _>("task_date"))
            .bind(row.get::<String, _>("task_time"))
            .bind(&completion_date)
            .execute(&mut *tx)
            .await?;
            sqlx::query("DELETE FROM tasks WHERE task_id = ?1")
                .bind(task_id.0)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn fetch_due(&self, now: NaiveDateTime) -> Result<Vec<DueReminder>, StoreError> {
        // Plain string comparison; the canonical minute format sorts
        // chronologically.
        let cutoff = format_minute(now);
        let rows = sqlx::query(
            "SELECT task_id, description, notify_date_time FROM tasks
             WHERE notify_date_time IS NOT NULL AND notify_date_time <= ?1
               AND status = 'Pending'",
        )
        .bind(&cutoff)
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| DueReminder {
                task_id: TaskId(row.get("task_id")),
                description: row.get("description"),
                notify_at: row.get("notify_date_time"),
            })
            .collect())
    }

    async fn mark_task_as_notified(&self, task_id: TaskId) -> Result<(), StoreError> {
        sqlx::query("UPDATE tasks SET notify_date_time = NULL WHERE task_id = ?1")
            .bind(task_id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn get_completed_tasks(
        &self,
        user_id: UserId,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let rows = sqlx::query(
            "SELECT history_id, user_id, description, task_date, task_time, completion_date
             FROM history WHERE user_id = ?1",
        )
        .bind(user_id.0)
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| HistoryEntry {
                id: row.get("history_id"),
                user_id: UserId(row.get("user_id")),
                description: row.get("description"),
                task_date: row.get("task_date"),
                task_time: row.get("task_time"),
                completion_date: row.get("completion_date"),
            })
            .collect())
    }
}

fn row_to_task(row: SqliteRow) -> Task {
    Task {
        id: TaskId(row.get("task_id")),
        user_id: UserId(row.get("user_id")),
        description: row.get("description"),
        task_date: row.get("task_date"),
        task_time: row.get("task_time"),
        notify_at: row.get("notify_date_time"),
        // Live rows only ever carry Pending; completed tasks move to history.
        status: TaskStatus::Pending,
    }
}
