//! Read-only analytics over the session and task history.
//!
//! Nothing here is cached or maintained incrementally. Every figure is
//! recomputed from the records passed in, so edits to history show up on
//! the next read.

mod competency;
mod experience;
mod report;
mod weekly;

pub use competency::{competency_distribution, CompetencyEntry};
pub use experience::{experience, Experience, XP_PER_DONE_TASK, XP_PER_LEVEL, XP_PER_SESSION};
pub use report::{load_report, load_today, Report, TodaySummary};
pub use weekly::{local_day_bounds, week_start, weekly_consistency, DayMinutes};
