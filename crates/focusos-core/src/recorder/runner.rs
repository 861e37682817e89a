//! Executes completion intents against the stores.
//!
//! Every step is best-effort. A failed session insert does not stop the
//! task update, a failed task update never rolls back the session, and
//! nothing is ever reported back into the timer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::intent::Intent;
use crate::notify::NotificationSink;
use crate::session::SessionId;
use crate::storage::{SessionStore, TaskStore};

/// What actually happened when a batch of intents ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectReport {
    pub session_id: Option<SessionId>,
    pub task_updated: bool,
    pub notified: usize,
    pub failures: Vec<String>,
}

impl EffectReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone)]
pub struct EffectRunner {
    sessions: Arc<dyn SessionStore>,
    tasks: Arc<dyn TaskStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl EffectRunner {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        tasks: Arc<dyn TaskStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            sessions,
            tasks,
            notifier,
        }
    }

    /// Run the intents in order on the current thread.
    pub fn run(&self, intents: &[Intent]) -> EffectReport {
        let mut report = EffectReport::default();
        for intent in intents {
            match intent {
                Intent::PersistSession(session) => match self.sessions.append(session) {
                    Ok(id) => {
                        tracing::debug!(session_id = %id, cycle = %session.cycle_type, "session recorded");
                        report.session_id = Some(id);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, cycle = %session.cycle_type, "failed to record session");
                        report.failures.push(format!("persist session: {e}"));
                    }
                },
                Intent::AddTaskMinutes { task_id, minutes } => {
                    match self.tasks.increment_actual_minutes(task_id, *minutes) {
                        Ok(()) => report.task_updated = true,
                        Err(e) => {
                            tracing::warn!(error = %e, task_id = %task_id, "failed to add task minutes");
                            report.failures.push(format!("task {task_id}: {e}"));
                        }
                    }
                }
                Intent::Notify(notification) => {
                    self.notifier.notify(notification);
                    report.notified += 1;
                }
            }
        }
        report
    }

    /// Run the intents on the blocking pool. The handle may be dropped; the
    /// writes still complete or fail on their own.
    pub fn spawn(&self, intents: Vec<Intent>) -> JoinHandle<EffectReport> {
        let runner = self.clone();
        tokio::task::spawn_blocking(move || runner.run(&intents))
    }
}
