#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDateTime;

    use super::super::reminder::ReminderScanner;
    use crate::domain::datetime::{combine_notify_at, format_minute};
    use crate::domain::store::{StoreError, TaskStore};
    use crate::domain::task::{
        DueReminder, HistoryEntry, Task, TaskId, TaskInput, TaskStatus, UserId,
    };
    use crate::notify::{Notifier, NotifyError};

    #[derive(Clone, Default)]
    struct InMemoryStore {
        inner: Arc<Mutex<Inner>>,
    }

    #[derive(Default)]
    struct Inner {
        users: Vec<(String, String)>,
        tasks: HashMap<i64, Task>,
        history: Vec<HistoryEntry>,
        next_task_id: i64,
    }

    #[async_trait]
    impl TaskStore for InMemoryStore {
        async fn init(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn register_user(
            &self,
            username: &str,
            password: &str,
        ) -> Result<UserId, StoreError> {
            let mut inner = self.inner.lock().unwrap();
            inner.users.push((username.to_string(), password.to_string()));
            Ok(UserId(inner.users.len() as i64))
        }

        async fn validate_user(
            &self,
            username: &str,
            password: &str,
        ) -> Result<Option<UserId>, StoreError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .users
                .iter()
                .position(|(u, p)| u == username && p == password)
                .map(|i| UserId(i as i64 + 1)))
        }

        async fn add_task(&self, user_id: UserId, input: TaskInput) -> Result<Task, StoreError> {
            let notify_at = combine_notify_at(&input.date, &input.time)?;
            let mut inner = self.inner.lock().unwrap();
            inner.next_task_id += 1;
            let task = Task {
                id: TaskId(inner.next_task_id),
                user_id,
                description: input.description,
                task_date: input.date,
                task_time: input.time,
                notify_at: Some(notify_at),
                status: TaskStatus::Pending,
            };
            inner.tasks.insert(task.id.0, task.clone());
            Ok(task)
        }

        async fn get_user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, StoreError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .tasks
                .values()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn edit_task(&self, task_id: TaskId, input: TaskInput) -> Result<(), StoreError> {
            let mut inner = self.inner.lock().unwrap();
            if let Some(task) = inner.tasks.get_mut(&task_id.0) {
                task.description = input.description;
                task.task_date = input.date;
                task.task_time = input.time;
            }
            Ok(())
        }

        async fn delete_task(&self, task_id: TaskId) -> Result<(), StoreError> {
            self.inner.lock().unwrap().tasks.remove(&task_id.0);
            Ok(())
        }

        async fn mark_task_done(&self, task_id: TaskId) -> Result<(), StoreError> {
            let mut inner = self.inner.lock().unwrap();
            if let Some(task) = inner.tasks.remove(&task_id.0) {
                let entry = HistoryEntry {
                    id: inner.history.len() as i64 + 1,
                    user_id: task.user_id,
                    description: task.description,
                    task_date: task.task_date,
                    task_time: task.task_time,
                    completion_date: chrono::Local::now()
                        .date_naive()
                        .format("%Y-%m-%d")
                        .to_string(),
                };
                inner.history.push(entry);
            }
            Ok(())
        }

        async fn fetch_due(&self, now: NaiveDateTime) -> Result<Vec<DueReminder>, StoreError> {
            let cutoff = format_minute(now);
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .tasks
                .values()
                .filter_map(|t| {
                    let notify_at = t.notify_at.as_ref()?;
                    (notify_at.as_str() <= cutoff.as_str()).then(|| DueReminder {
                        task_id: t.id,
                        description: t.description.clone(),
                        notify_at: notify_at.clone(),
                    })
                })
                .collect())
        }

        async fn mark_task_as_notified(&self, task_id: TaskId) -> Result<(), StoreError> {
            let mut inner = self.inner.lock().unwrap();
            if let Some(task) = inner.tasks.get_mut(&task_id.0) {
                task.notify_at = None;
            }
            Ok(())
        }

        async fn get_completed_tasks(
            &self,
            user_id: UserId,
        ) -> Result<Vec<HistoryEntry>, StoreError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .history
                .iter()
                .filter(|h| h.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
        fail_alert: bool,
        fail_sound: bool,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) -> Result<(), NotifyError> {
            self.alerts.lock().unwrap().push(message.to_string());
            if self.fail_alert {
                return Err(NotifyError::Alert("toast backend down".into()));
            }
            Ok(())
        }

        fn play_sound(&self) -> Result<(), NotifyError> {
            if self.fail_sound {
                return Err(NotifyError::Sound("no audio device".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn due_task_fires_once_then_never_again() {
        let store = InMemoryStore::default();
        let user = store.register_user("alice", "pw1").await.unwrap();
        assert_eq!(store.validate_user("alice", "pw1").await.unwrap(), Some(user));

        // Long past, so it is due on any real clock.
        let task = store
            .add_task(
                user,
                TaskInput {
                    description: "Buy milk".into(),
                    date: "2000-01-01".into(),
                    time: "09:00".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(task.notify_at.as_deref(), Some("2000-01-01 09:00"));
        assert_eq!(task.status, TaskStatus::Pending);

        let notifier = Arc::new(RecordingNotifier::default());
        let scanner = ReminderScanner::new(store.clone(), Arc::clone(&notifier));

        assert_eq!(scanner.check_reminders().await.unwrap(), 1);
        assert_eq!(*notifier.alerts.lock().unwrap(), vec!["Buy milk".to_string()]);
        let tasks = store.get_user_tasks(user).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].notify_at.is_none());

        // Suppressed: a second scan sees nothing.
        assert_eq!(scanner.check_reminders().await.unwrap(), 0);
        assert_eq!(notifier.alerts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn future_task_is_not_fired() {
        let store = InMemoryStore::default();
        let user = store.register_user("bob", "pw").await.unwrap();
        store
            .add_task(
                user,
                TaskInput {
                    description: "later".into(),
                    date: "9999-12-31".into(),
                    time: "23:59".into(),
                },
            )
            .await
            .unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let scanner = ReminderScanner::new(store.clone(), Arc::clone(&notifier));
        assert_eq!(scanner.check_reminders().await.unwrap(), 0);
        assert!(notifier.alerts.lock().unwrap().is_empty());
        assert!(store.get_user_tasks(user).await.unwrap()[0].notify_at.is_some());
    }

    #[tokio::test]
    async fn alert_failure_still_suppresses_the_reminder() {
        let store = InMemoryStore::default();
        let user = store.register_user("carol", "pw").await.unwrap();
        store
            .add_task(
                user,
                TaskInput {
                    description: "water plants".into(),
                    date: "2000-01-01".into(),
                    time: "09:00".into(),
                },
            )
            .await
            .unwrap();

        let notifier = Arc::new(RecordingNotifier { fail_alert: true, ..Default::default() });
        let scanner = ReminderScanner::new(store.clone(), Arc::clone(&notifier));
        assert_eq!(scanner.check_reminders().await.unwrap(), 1);
        assert!(store.get_user_tasks(user).await.unwrap()[0].notify_at.is_none());
    }

    #[tokio::test]
    async fn sound_failure_never_reaches_the_scan() {
        let store = InMemoryStore::default();
        let user = store.register_user("dave", "pw").await.unwrap();
        store
            .add_task(
                user,
                TaskInput {
                    description: "stretch".into(),
                    date: "2000-01-01".into(),
                    time: "09:00".into(),
                },
            )
            .await
            .unwrap();

        let notifier = Arc::new(RecordingNotifier { fail_sound: true, ..Default::default() });
        let scanner = ReminderScanner::new(store, Arc::clone(&notifier));
        assert_eq!(scanner.check_reminders().await.unwrap(), 1);
    }
}
