//! Foreground focus timer.
//!
//! `timer run` keeps the process alive for the length of each cycle and
//! prints every timer event as JSON on stdout. Notifications go to stderr.

use std::sync::Arc;

use chrono::{Local, Utc};
use clap::Subcommand;
use focusos_core::analytics::load_today;
use focusos_core::recorder::completed_work_cycles_today;
use focusos_core::{
    resolve_policy, CycleType, EffectRunner, Event, FocusDriver, FocusTimer, Notification,
    NotificationSink, SystemClock, TaskStore, TodaySummary, TracingNotifier,
};
use serde::Serialize;

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run cycles in the foreground until they expire
    Run {
        /// Cycle to start with (work, short_break, long_break)
        #[arg(long, default_value = "work")]
        cycle: CycleType,
        /// Task credited with the work minutes
        #[arg(long)]
        task: Option<String>,
        /// Number of consecutive cycles to run
        #[arg(long, default_value = "1")]
        cycles: u32,
    },
    /// Print the timer state a new run would start from, plus today's summary
    Status,
}

/// Prints notifications to stderr.
struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        eprintln!("{} {}", notification.message, notification.description);
    }
}

#[derive(Serialize)]
struct StatusView {
    timer: Event,
    today: TodaySummary,
}

/// A timer with the user's durations, seeded with today's work cycles.
fn build_timer(ws: &Workspace) -> FocusTimer {
    let policy = resolve_policy(ws.db.as_ref(), &ws.config, &ws.user);
    let seed = completed_work_cycles_today(ws.db.as_ref(), &ws.user, Utc::now(), &Local);
    FocusTimer::new(policy, ws.user.clone(), Arc::new(SystemClock)).with_completed_work_cycles(seed)
}

pub fn run(action: TimerAction) -> CliResult {
    let ws = Workspace::open()?;

    match action {
        TimerAction::Run {
            cycle,
            task,
            cycles,
        } => {
            if let Some(id) = task.as_deref() {
                if ws.db.get_task(id)?.is_none() {
                    return Err(format!("task not found: {id}").into());
                }
            }

            let notifier: Arc<dyn NotificationSink> = if ws.config.notifications.enabled {
                Arc::new(ConsoleNotifier)
            } else {
                Arc::new(TracingNotifier)
            };
            let runner = EffectRunner::new(ws.db.clone(), ws.db.clone(), notifier);
            let mut driver = FocusDriver::new(build_timer(&ws), runner);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                if let Some(event) = driver.select_cycle_type(cycle) {
                    print_json(&event)?;
                }
                for _ in 0..cycles {
                    if driver.timer().cycle_type().is_work() && task.is_some() {
                        if let Some(event) = driver.select_task(task.clone()) {
                            print_json(&event)?;
                        }
                    }
                    if let Some(event) = driver.start() {
                        print_json(&event)?;
                    }
                    match driver.run_until_complete().await {
                        Some(done) => print_json(&done.event)?,
                        None => break,
                    }
                }
                for report in driver.flush().await {
                    for failure in &report.failures {
                        tracing::warn!(%failure, "completion effect failed");
                    }
                }
                print_json(&driver.timer().snapshot())
            })?;
        }
        TimerAction::Status => {
            let timer = build_timer(&ws);
            let today = load_today(ws.db.as_ref(), &ws.user, Utc::now(), &Local)?;
            print_json(&StatusView {
                timer: timer.snapshot(),
                today,
            })?;
        }
    }
    Ok(())
}
