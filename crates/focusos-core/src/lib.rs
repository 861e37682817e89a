//! # Focus OS Core Library
//!
//! The focus session engine behind the Focus OS dashboard: a focus/break
//! timer, the protocol that records completed cycles, and the analytics
//! computed from the recorded history. The CLI in `focusos-cli` is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a tick-driven state machine ([`FocusTimer`]) plus a
//!   cancelable one-second clock source ([`Ticker`]) and a driver that
//!   owns both ([`FocusDriver`])
//! - **Recorder**: turns a completed cycle into ordered [`Intent`]s and
//!   executes them best-effort ([`EffectRunner`])
//! - **Analytics**: experience/levels, competency distribution and weekly
//!   consistency, recomputed on every read
//! - **Storage**: store traits, a SQLite implementation ([`Database`]) and
//!   TOML configuration ([`Config`])

pub mod analytics;
pub mod context;
pub mod error;
pub mod events;
pub mod notify;
pub mod recorder;
pub mod session;
pub mod storage;
pub mod timer;

pub use analytics::{Experience, Report, TodaySummary};
pub use context::{Clock, ManualClock, SystemClock, UserContext};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::Event;
pub use notify::{Notification, NotificationSink, Severity, TracingNotifier};
pub use recorder::{EffectReport, EffectRunner, Intent};
pub use session::{Category, FocusSession, NewSession, SessionId, Task, TaskStatus};
pub use storage::{
    resolve_policy, CategoryStore, Config, Database, ProfileSource, SessionStore, TaskStore,
};
pub use timer::{
    Completion, CycleType, DurationPolicy, DurationProfile, FocusDriver, FocusTimer, RunState,
    Ticker, TimerState,
};
