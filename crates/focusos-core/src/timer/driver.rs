//! Wires a [`FocusTimer`] to a [`Ticker`] and an [`EffectRunner`].
//!
//! The driver is the single owner of the timer: user commands and clock
//! ticks both go through `&mut self`, so they never interleave. Effects of
//! a completion are spawned and never awaited by the timer itself.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::engine::{Completion, FocusTimer};
use super::ticker::{Ticker, TICK_PERIOD};
use super::CycleType;
use crate::events::Event;
use crate::recorder::{EffectReport, EffectRunner};

pub struct FocusDriver {
    timer: FocusTimer,
    runner: EffectRunner,
    ticker: Ticker,
    ticks: Option<mpsc::Receiver<()>>,
    period: Duration,
    pending: Vec<JoinHandle<EffectReport>>,
}

impl FocusDriver {
    pub fn new(timer: FocusTimer, runner: EffectRunner) -> Self {
        Self {
            timer,
            runner,
            ticker: Ticker::new(),
            ticks: None,
            period: TICK_PERIOD,
            pending: Vec::new(),
        }
    }

    /// Override the tick period. Tests use milliseconds.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = self.timer.start()?;
        self.ticks = Some(self.ticker.start(self.period));
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.timer.pause()?;
        self.stop_ticking();
        Some(event)
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.stop_ticking();
        self.timer.reset()
    }

    pub fn select_cycle_type(&mut self, cycle_type: CycleType) -> Option<Event> {
        self.timer.select_cycle_type(cycle_type)
    }

    pub fn select_task(&mut self, task_id: Option<String>) -> Option<Event> {
        self.timer.select_task(task_id)
    }

    /// Wait for the running cycle to expire. Spawns its effects and stops
    /// the clock source, leaving the timer idle on the next cycle.
    ///
    /// Returns `None` if the timer is not running.
    pub async fn run_until_complete(&mut self) -> Option<Completion> {
        loop {
            let ticks = self.ticks.as_mut()?;
            if ticks.recv().await.is_none() {
                self.ticks = None;
                return None;
            }
            if let Some(done) = self.timer.tick() {
                self.stop_ticking();
                self.pending.retain(|h| !h.is_finished());
                self.pending.push(self.runner.spawn(done.intents.clone()));
                return Some(done);
            }
        }
    }

    /// Wait for every spawned effect batch. Call before tearing down a
    /// short-lived process; a live view may simply drop the driver.
    pub async fn flush(&mut self) -> Vec<EffectReport> {
        let mut reports = Vec::with_capacity(self.pending.len());
        for handle in self.pending.drain(..) {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => tracing::warn!(error = %e, "effect task did not finish"),
            }
        }
        reports
    }

    fn stop_ticking(&mut self) {
        self.ticker.stop();
        self.ticks = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{SystemClock, UserContext};
    use crate::recorder::testing::MemoryStores;
    use crate::timer::{DurationPolicy, RunState};
    use std::sync::Arc;

    fn driver(stores: &MemoryStores) -> FocusDriver {
        let policy = DurationPolicy {
            work: 1,
            short_break: 1,
            long_break: 1,
        };
        let timer = FocusTimer::new(policy, UserContext::new("u1"), Arc::new(SystemClock));
        FocusDriver::new(timer, stores.runner()).with_period(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn runs_a_cycle_and_records_it() {
        let stores = MemoryStores::default();
        stores.add_task("T1", 10);
        let mut d = driver(&stores);
        d.select_task(Some("T1".into()));
        d.start();

        let done = d.run_until_complete().await.expect("completion");
        assert_eq!(done.finished, CycleType::Work);
        assert_eq!(d.timer().run_state(), RunState::Idle);
        assert_eq!(d.timer().cycle_type(), CycleType::ShortBreak);

        let reports = d.flush().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(stores.sessions().len(), 1);
        assert_eq!(stores.task_minutes("T1"), Some(11));
    }

    #[tokio::test]
    async fn finished_effects_are_not_retained() {
        let stores = MemoryStores::default();
        let mut d = driver(&stores);

        d.start();
        d.run_until_complete().await.expect("work completion");
        while !d.pending.iter().all(|h| h.is_finished()) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        d.start();
        d.run_until_complete().await.expect("break completion");
        assert_eq!(d.pending.len(), 1);

        assert_eq!(d.flush().await.len(), 1);
        assert_eq!(stores.sessions().len(), 2);
    }

    #[tokio::test]
    async fn idle_driver_has_nothing_to_wait_for() {
        let stores = MemoryStores::default();
        let mut d = driver(&stores);
        assert!(d.run_until_complete().await.is_none());

        d.start();
        d.pause();
        assert!(d.run_until_complete().await.is_none());
        assert_eq!(d.timer().run_state(), RunState::Paused);
        assert!(d.timer().remaining_seconds() <= 60);
        assert!(stores.sessions().is_empty());
    }
}
