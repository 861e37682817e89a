use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{CycleType, TimerState};

/// Every accepted state change on the timer produces an Event.
/// Ignored commands produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        cycle_type: CycleType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        cycle_type: CycleType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        cycle_type: CycleType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CycleSelected {
        cycle_type: CycleType,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TaskSelected {
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycle_type: CycleType,
        duration_minutes: u32,
        task_id: Option<String>,
        completed_work_cycles: u32,
        next_cycle: CycleType,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        /// 0.0 .. 1.0 elapsed fraction of the current cycle.
        progress: f64,
        display: String,
        at: DateTime<Utc>,
    },
}
