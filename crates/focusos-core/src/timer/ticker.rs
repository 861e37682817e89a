//! Recurring clock source for the timer.
//!
//! At most one interval task is alive per `Ticker`. Starting again aborts
//! the previous task and hands out a fresh receiver, so ticks from an old
//! source can never reach the timer. Stopping or dropping the ticker aborts
//! the task as well.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`. The first tick arrives one period
    /// from now. Must be called from within a tokio runtime.
    pub fn start(&mut self, period: Duration) -> mpsc::Receiver<()> {
        self.stop();
        let (tx, rx) = mpsc::channel(1);
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        }));
        rx
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
