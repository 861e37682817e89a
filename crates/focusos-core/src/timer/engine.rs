//! Focus timer state machine.
//!
//! The engine is tick-driven and owns no threads or timers - the caller
//! delivers one `tick()` per elapsed second while the timer is running
//! (see [`Ticker`](super::Ticker)).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> (expiry) -> Idle (next cycle)
//!   ^        |          |
//!   +--------+----------+  reset()
//! ```
//!
//! Commands that are not allowed in the current state are ignored and
//! return `None`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new(policy, user, clock);
//! timer.start();
//! // once per second:
//! if let Some(done) = timer.tick() {
//!     runner.spawn(done.intents);
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::cycle::{CycleType, RunState};
use super::durations::DurationPolicy;
use super::rotator::next_cycle;
use crate::context::{Clock, UserContext};
use crate::events::Event;
use crate::recorder::{plan_completion, CompletedCycle, Intent};

/// Point-in-time view of the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub cycle_type: CycleType,
    pub run_state: RunState,
    pub remaining_seconds: u64,
    pub selected_task_id: Option<String>,
    pub completed_work_cycles: u32,
}

/// Result of a natural expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub event: Event,
    /// Ordered side effects for the effect runner.
    pub intents: Vec<Intent>,
    pub finished: CycleType,
    pub next: CycleType,
    pub completed_work_cycles: u32,
}

pub struct FocusTimer {
    policy: DurationPolicy,
    user: UserContext,
    clock: Arc<dyn Clock>,
    cycle_type: CycleType,
    run_state: RunState,
    remaining_seconds: u64,
    selected_task_id: Option<String>,
    completed_work_cycles: u32,
}

impl fmt::Debug for FocusTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTimer")
            .field("policy", &self.policy)
            .field("user", &self.user)
            .field("state", &self.state())
            .finish()
    }
}

impl FocusTimer {
    /// Create an idle timer on a work cycle with its full duration loaded.
    pub fn new(policy: DurationPolicy, user: UserContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            remaining_seconds: policy.seconds(CycleType::Work),
            policy,
            user,
            clock,
            cycle_type: CycleType::Work,
            run_state: RunState::Idle,
            selected_task_id: None,
            completed_work_cycles: 0,
        }
    }

    /// Seed the rotation counter, usually with today's persisted work
    /// session count.
    pub fn with_completed_work_cycles(mut self, count: u32) -> Self {
        self.completed_work_cycles = count;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn cycle_type(&self) -> CycleType {
        self.cycle_type
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.selected_task_id.as_deref()
    }

    pub fn completed_work_cycles(&self) -> u32 {
        self.completed_work_cycles
    }

    pub fn policy(&self) -> &DurationPolicy {
        &self.policy
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Full duration of the current cycle in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.policy.seconds(self.cycle_type)
    }

    /// 0.0 .. 1.0 elapsed fraction of the current cycle.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_seconds as f64 / total as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            cycle_type: self.cycle_type,
            run_state: self.run_state,
            remaining_seconds: self.remaining_seconds,
            selected_task_id: self.selected_task_id.clone(),
            completed_work_cycles: self.completed_work_cycles,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            progress: self.progress(),
            display: self.format_remaining(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch to another cycle type. Ignored while running.
    pub fn select_cycle_type(&mut self, cycle_type: CycleType) -> Option<Event> {
        if self.is_running() {
            tracing::debug!(%cycle_type, "cycle change ignored while running");
            return None;
        }
        self.load_cycle(cycle_type);
        Some(Event::CycleSelected {
            cycle_type,
            duration_secs: self.remaining_seconds,
            at: self.clock.now(),
        })
    }

    /// Attach a task to the upcoming work cycle, or clear it with `None`.
    /// Only allowed on a work cycle that is not running.
    pub fn select_task(&mut self, task_id: Option<String>) -> Option<Event> {
        if self.is_running() || !self.cycle_type.is_work() {
            tracing::debug!(?task_id, "task selection ignored");
            return None;
        }
        self.selected_task_id = task_id.clone();
        Some(Event::TaskSelected {
            task_id,
            at: self.clock.now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        match self.run_state {
            RunState::Idle | RunState::Paused => {
                self.run_state = RunState::Running;
                tracing::debug!(cycle = %self.cycle_type, remaining = self.remaining_seconds, "timer started");
                Some(Event::TimerStarted {
                    cycle_type: self.cycle_type,
                    remaining_secs: self.remaining_seconds,
                    at: self.clock.now(),
                })
            }
            RunState::Running => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.run_state {
            RunState::Running => {
                self.run_state = RunState::Paused;
                tracing::debug!(remaining = self.remaining_seconds, "timer paused");
                Some(Event::TimerPaused {
                    cycle_type: self.cycle_type,
                    remaining_secs: self.remaining_seconds,
                    at: self.clock.now(),
                })
            }
            RunState::Idle | RunState::Paused => None,
        }
    }

    /// Back to idle with the full duration. Not a completion; records
    /// nothing.
    pub fn reset(&mut self) -> Option<Event> {
        self.run_state = RunState::Idle;
        self.remaining_seconds = self.total_seconds();
        Some(Event::TimerReset {
            cycle_type: self.cycle_type,
            remaining_secs: self.remaining_seconds,
            at: self.clock.now(),
        })
    }

    /// Advance by one second. Returns the completion when the cycle
    /// expires; ticks outside `Running` have no effect.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.is_running() {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return Some(self.complete());
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn load_cycle(&mut self, cycle_type: CycleType) {
        self.cycle_type = cycle_type;
        self.run_state = RunState::Idle;
        self.remaining_seconds = self.policy.seconds(cycle_type);
    }

    fn complete(&mut self) -> Completion {
        let finished = self.cycle_type;
        let duration_minutes = self.policy.minutes(finished);
        let at = self.clock.now();

        if finished.is_work() {
            self.completed_work_cycles = self.completed_work_cycles.saturating_add(1);
        }
        let task_id = if finished.is_work() {
            self.selected_task_id.clone()
        } else {
            None
        };

        let intents = plan_completion(&CompletedCycle {
            user: &self.user,
            cycle_type: finished,
            duration_minutes,
            task_id: task_id.as_deref(),
            completed_work_cycles: self.completed_work_cycles,
            at,
        });

        let next = next_cycle(finished, self.completed_work_cycles);
        tracing::info!(
            finished = %finished,
            next = %next,
            completed_work_cycles = self.completed_work_cycles,
            "cycle completed"
        );
        self.load_cycle(next);

        Completion {
            event: Event::CycleCompleted {
                cycle_type: finished,
                duration_minutes,
                task_id,
                completed_work_cycles: self.completed_work_cycles,
                next_cycle: next,
                at,
            },
            intents,
            finished,
            next,
            completed_work_cycles: self.completed_work_cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ManualClock;
    use crate::session::NewSession;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn timer() -> FocusTimer {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        FocusTimer::new(
            DurationPolicy::default(),
            UserContext::new("u1"),
            Arc::new(clock),
        )
    }

    fn run_to_completion(timer: &mut FocusTimer) -> Completion {
        timer.start();
        let total = timer.remaining_seconds();
        for _ in 1..total {
            assert!(timer.tick().is_none());
        }
        timer.tick().expect("cycle should complete on the last tick")
    }

    #[test]
    fn starts_idle_on_full_work_cycle() {
        let t = timer();
        assert_eq!(t.cycle_type(), CycleType::Work);
        assert_eq!(t.run_state(), RunState::Idle);
        assert_eq!(t.remaining_seconds(), 1500);
        assert_eq!(t.format_remaining(), "25:00");
        assert_eq!(t.progress(), 0.0);
    }

    #[test]
    fn start_pause_start() {
        let mut t = timer();
        assert!(t.start().is_some());
        assert_eq!(t.run_state(), RunState::Running);
        assert!(t.start().is_none());

        assert!(t.pause().is_some());
        assert_eq!(t.run_state(), RunState::Paused);

        assert!(t.start().is_some());
        assert_eq!(t.run_state(), RunState::Running);
    }

    #[test]
    fn pause_twice_equals_pause_once() {
        let mut t = timer();
        t.start();
        t.tick();
        t.pause();
        let once = t.state();
        assert!(t.pause().is_none());
        assert_eq!(t.state(), once);
    }

    #[test]
    fn ticks_while_not_running_do_nothing() {
        let mut t = timer();
        assert!(t.tick().is_none());
        assert_eq!(t.remaining_seconds(), 1500);

        t.start();
        t.tick();
        t.pause();
        let paused = t.state();
        for _ in 0..10 {
            assert!(t.tick().is_none());
        }
        assert_eq!(t.state(), paused);
    }

    #[test]
    fn select_cycle_while_running_is_ignored() {
        let mut t = timer();
        t.start();
        t.tick();
        let before = t.state();
        assert!(t.select_cycle_type(CycleType::LongBreak).is_none());
        assert_eq!(t.state(), before);
    }

    #[test]
    fn select_cycle_loads_duration_and_idles() {
        let mut t = timer();
        t.start();
        t.tick();
        t.pause();
        assert!(t.select_cycle_type(CycleType::ShortBreak).is_some());
        assert_eq!(t.cycle_type(), CycleType::ShortBreak);
        assert_eq!(t.run_state(), RunState::Idle);
        assert_eq!(t.remaining_seconds(), 300);
    }

    #[test]
    fn task_selection_rules() {
        let mut t = timer();
        assert!(t.select_task(Some("T1".into())).is_some());
        assert_eq!(t.selected_task_id(), Some("T1"));

        t.start();
        assert!(t.select_task(Some("T2".into())).is_none());
        assert_eq!(t.selected_task_id(), Some("T1"));
        t.pause();

        t.select_cycle_type(CycleType::ShortBreak);
        assert!(t.select_task(Some("T3".into())).is_none());
        assert_eq!(t.selected_task_id(), Some("T1"));
    }

    #[test]
    fn reset_restores_full_duration_without_completion() {
        let mut t = timer();
        t.start();
        for _ in 0..100 {
            t.tick();
        }
        assert!(t.reset().is_some());
        assert_eq!(t.run_state(), RunState::Idle);
        assert_eq!(t.remaining_seconds(), 1500);
        assert_eq!(t.completed_work_cycles(), 0);
    }

    #[test]
    fn reset_then_start_matches_fresh_selection() {
        let mut a = timer();
        a.start();
        for _ in 0..42 {
            a.tick();
        }
        a.reset();
        a.start();

        let mut b = timer();
        b.select_cycle_type(CycleType::Work);
        b.start();

        for _ in 0..200 {
            a.tick();
            b.tick();
            assert_eq!(a.remaining_seconds(), b.remaining_seconds());
        }
    }

    #[test]
    fn first_work_cycle_goes_to_short_break() {
        let mut t = timer();
        let done = run_to_completion(&mut t);

        assert_eq!(done.finished, CycleType::Work);
        assert_eq!(done.next, CycleType::ShortBreak);
        assert_eq!(done.completed_work_cycles, 1);
        match &done.intents[0] {
            Intent::PersistSession(NewSession {
                cycle_type,
                duration_minutes,
                ..
            }) => {
                assert_eq!(*cycle_type, CycleType::Work);
                assert_eq!(*duration_minutes, 25);
            }
            other => panic!("expected PersistSession, got {other:?}"),
        }

        assert_eq!(t.cycle_type(), CycleType::ShortBreak);
        assert_eq!(t.run_state(), RunState::Idle);
        assert_eq!(t.remaining_seconds(), 300);
    }

    #[test]
    fn fourth_work_cycle_goes_to_long_break() {
        let mut t = timer().with_completed_work_cycles(3);
        let done = run_to_completion(&mut t);
        assert_eq!(done.completed_work_cycles, 4);
        assert_eq!(done.next, CycleType::LongBreak);
        assert_eq!(t.remaining_seconds(), 900);
    }

    #[test]
    fn break_completion_returns_to_work_without_counting() {
        let mut t = timer().with_completed_work_cycles(2);
        t.select_cycle_type(CycleType::ShortBreak);
        let done = run_to_completion(&mut t);
        assert_eq!(done.next, CycleType::Work);
        assert_eq!(t.completed_work_cycles(), 2);
        assert_eq!(t.remaining_seconds(), 1500);
    }

    #[test]
    fn switching_to_a_break_keeps_the_selection() {
        let mut t = timer();
        t.select_task(Some("T1".into()));
        assert!(t.select_cycle_type(CycleType::ShortBreak).is_some());
        assert_eq!(t.selected_task_id(), Some("T1"));
        assert_eq!(t.state().selected_task_id.as_deref(), Some("T1"));
    }

    #[test]
    fn selected_task_survives_the_break() {
        let mut t = timer();
        t.select_task(Some("T1".into()));
        let done = run_to_completion(&mut t);
        assert!(done.intents.contains(&Intent::AddTaskMinutes {
            task_id: "T1".into(),
            minutes: 25
        }));

        let brk = run_to_completion(&mut t);
        assert!(!brk
            .intents
            .iter()
            .any(|i| matches!(i, Intent::AddTaskMinutes { .. })));
        assert_eq!(t.cycle_type(), CycleType::Work);
        assert_eq!(t.selected_task_id(), Some("T1"));
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut t = timer();
        run_to_completion(&mut t);
        // Timer is idle on the break now; further ticks are inert.
        assert!(t.tick().is_none());
    }

    proptest! {
        #[test]
        fn remaining_stays_within_bounds(ops in proptest::collection::vec(0u8..6, 0..400)) {
            let mut t = timer();
            for op in ops {
                match op {
                    0 => { t.start(); }
                    1 => { t.pause(); }
                    2 => { t.reset(); }
                    3 => { t.select_cycle_type(CycleType::ShortBreak); }
                    4 => { t.select_cycle_type(CycleType::Work); }
                    _ => { t.tick(); }
                }
                prop_assert!(t.remaining_seconds() <= t.total_seconds());
                prop_assert!((0.0..=1.0).contains(&t.progress()));
            }
        }
    }
}
