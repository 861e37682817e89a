//! Side effects of a completed cycle, expressed as data.
//!
//! The timer stays effect-free: on expiry it builds an ordered list of
//! intents and hands them to an [`EffectRunner`](super::EffectRunner).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::UserContext;
use crate::notify::Notification;
use crate::session::NewSession;
use crate::timer::CycleType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    PersistSession(NewSession),
    AddTaskMinutes { task_id: String, minutes: u32 },
    Notify(Notification),
}

/// Everything needed to plan the side effects of one expiry.
#[derive(Debug, Clone)]
pub struct CompletedCycle<'a> {
    pub user: &'a UserContext,
    pub cycle_type: CycleType,
    pub duration_minutes: u32,
    pub task_id: Option<&'a str>,
    /// Work-cycle counter after this cycle was counted.
    pub completed_work_cycles: u32,
    pub at: DateTime<Utc>,
}

/// Build the ordered intents for a completed cycle: persist first, then
/// roll task effort, then notify.
pub fn plan_completion(cycle: &CompletedCycle<'_>) -> Vec<Intent> {
    let task_id = if cycle.cycle_type.is_work() {
        cycle.task_id.map(str::to_owned)
    } else {
        None
    };

    let mut intents = vec![Intent::PersistSession(NewSession {
        user_id: cycle.user.user_id.clone(),
        task_id: task_id.clone(),
        cycle_type: cycle.cycle_type,
        duration_minutes: cycle.duration_minutes,
        created_at: cycle.at,
    })];

    if cycle.cycle_type.is_work() {
        if let Some(task_id) = task_id {
            intents.push(Intent::AddTaskMinutes {
                task_id,
                minutes: cycle.duration_minutes,
            });
        }
        intents.push(Intent::Notify(Notification::success(
            "Focus cycle complete!",
            format!(
                "{} sessions today. Great work!",
                cycle.completed_work_cycles
            ),
        )));
    } else {
        intents.push(Intent::Notify(Notification::success(
            "Break finished!",
            "Ready to get back to focus?",
        )));
    }

    intents
}
