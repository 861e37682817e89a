//! Experience points and levels.
//!
//! The scoring constants are fixed; they are not user configuration.

use serde::{Deserialize, Serialize};

use crate::session::{FocusSession, Task};

pub const XP_PER_DONE_TASK: u64 = 100;
pub const XP_PER_SESSION: u64 = 50;
pub const XP_PER_LEVEL: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub xp: u64,
    pub level: u64,
    /// XP at which the next level starts.
    pub next_level_xp: u64,
    /// 0.0 .. 1.0 progress through the current level.
    pub progress_to_next_level: f64,
}

impl Experience {
    pub fn from_counts(done_tasks: u64, sessions: u64) -> Self {
        let xp = XP_PER_DONE_TASK * done_tasks + XP_PER_SESSION * sessions;
        let level = xp / XP_PER_LEVEL + 1;
        Self {
            xp,
            level,
            next_level_xp: level * XP_PER_LEVEL,
            progress_to_next_level: (xp % XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64,
        }
    }
}

/// Every session counts, whatever its cycle type.
pub fn experience(tasks: &[Task], sessions: &[FocusSession]) -> Experience {
    let done = tasks.iter().filter(|t| t.is_done()).count() as u64;
    Experience::from_counts(done, sessions.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_done_tasks_and_four_sessions() {
        let e = Experience::from_counts(3, 4);
        assert_eq!(e.xp, 500);
        assert_eq!(e.level, 1);
        assert_eq!(e.next_level_xp, 1000);
        assert!((e.progress_to_next_level - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_history_is_level_one() {
        let e = experience(&[], &[]);
        assert_eq!(e.xp, 0);
        assert_eq!(e.level, 1);
        assert_eq!(e.progress_to_next_level, 0.0);
    }

    #[test]
    fn level_boundary_resets_progress() {
        let e = Experience::from_counts(10, 0);
        assert_eq!(e.xp, 1000);
        assert_eq!(e.level, 2);
        assert_eq!(e.next_level_xp, 2000);
        assert_eq!(e.progress_to_next_level, 0.0);

        let e = Experience::from_counts(12, 3);
        assert_eq!(e.xp, 1350);
        assert_eq!(e.level, 2);
        assert!((e.progress_to_next_level - 0.35).abs() < 1e-9);
    }
}
