//! In-memory stores for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::runner::EffectRunner;
use crate::error::{CoreError, DatabaseError, Result};
use crate::notify::{Notification, NotificationSink};
use crate::session::{FocusSession, NewSession, SessionId, Task, TaskStatus};
use crate::storage::{SessionStore, TaskStore};

#[derive(Clone, Default)]
pub struct MemoryStores {
    sessions: Arc<Mutex<Vec<FocusSession>>>,
    tasks: Arc<Mutex<HashMap<String, u32>>>,
    notes: Arc<Mutex<Vec<Notification>>>,
    fail_sessions: Arc<AtomicBool>,
}

impl MemoryStores {
    pub fn runner(&self) -> EffectRunner {
        EffectRunner::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    pub fn add_task(&self, id: &str, actual_minutes: u32) {
        self.tasks.lock().unwrap().insert(id.into(), actual_minutes);
    }

    pub fn task_minutes(&self, id: &str) -> Option<u32> {
        self.tasks.lock().unwrap().get(id).copied()
    }

    pub fn sessions(&self) -> Vec<FocusSession> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notes.lock().unwrap().clone()
    }

    pub fn fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }
}

impl SessionStore for MemoryStores {
    fn append(&self, session: &NewSession) -> Result<SessionId> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(DatabaseError::Locked.into());
        }
        let mut sessions = self.sessions.lock().unwrap();
        let id = format!("s{}", sessions.len() + 1);
        sessions.push(FocusSession {
            id: id.clone(),
            user_id: session.user_id.clone(),
            task_id: session.task_id.clone(),
            cycle_type: session.cycle_type,
            duration_minutes: session.duration_minutes,
            created_at: session.created_at,
        });
        Ok(id)
    }

    fn query_by_user_and_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>> {
        Ok(self
            .sessions()
            .into_iter()
            .filter(|s| s.user_id == user_id && s.created_at >= start && s.created_at < end)
            .collect())
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<FocusSession>> {
        Ok(self
            .sessions()
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect())
    }
}

impl TaskStore for MemoryStores {
    fn increment_actual_minutes(&self, task_id: &str, delta: u32) -> Result<()> {
        let mut tasks = self.tasks.lock().unwrap();
        let minutes = tasks.get_mut(task_id).ok_or_else(|| CoreError::NotFound {
            kind: "task",
            id: task_id.into(),
        })?;
        *minutes += delta;
        Ok(())
    }

    fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        Ok(self.task_minutes(task_id).map(|actual_minutes| Task {
            id: task_id.into(),
            user_id: "u1".into(),
            title: task_id.into(),
            estimated_minutes: 0,
            actual_minutes,
            status: TaskStatus::Todo,
            category_id: None,
            created_at: Utc::now(),
        }))
    }

    fn list_tasks(&self, _user_id: &str) -> Result<Vec<Task>> {
        let ids: Vec<String> = self.tasks.lock().unwrap().keys().cloned().collect();
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            tasks.extend(self.get_task(&id)?);
        }
        Ok(tasks)
    }
}

impl NotificationSink for MemoryStores {
    fn notify(&self, notification: &Notification) {
        self.notes.lock().unwrap().push(notification.clone());
    }
}
