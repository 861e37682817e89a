use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::competency::{competency_distribution, CompetencyEntry};
use super::experience::{experience, Experience};
use super::weekly::{local_day_bounds, weekly_consistency, DayMinutes};
use crate::context::UserContext;
use crate::error::Result;
use crate::session::{Category, FocusSession, Task};
use crate::storage::{CategoryStore, SessionStore, TaskStore};
use crate::timer::CycleType;

const RECENT_SESSIONS: usize = 5;

/// Everything the reports page shows, recomputed from history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub completed_tasks: u32,
    pub total_focus_minutes: u64,
    pub experience: Experience,
    pub competency: Vec<CompetencyEntry>,
    pub weekly: Vec<DayMinutes>,
}

impl Report {
    pub fn compute<Tz: TimeZone>(
        tasks: &[Task],
        sessions: &[FocusSession],
        categories: &[Category],
        today: NaiveDate,
        week_starts_on: Weekday,
        tz: &Tz,
    ) -> Self {
        Self {
            completed_tasks: u32::try_from(tasks.iter().filter(|t| t.is_done()).count())
                .unwrap_or(u32::MAX),
            total_focus_minutes: sessions
                .iter()
                .map(|s| u64::from(s.duration_minutes))
                .sum(),
            experience: experience(tasks, sessions),
            competency: competency_distribution(categories, tasks),
            weekly: weekly_consistency(sessions, today, week_starts_on, tz),
        }
    }
}

/// Sidebar figures of the focus view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub work_cycles: u32,
    pub focused_minutes: u32,
    /// Newest first.
    pub recent: Vec<FocusSession>,
}

impl TodaySummary {
    /// `sessions` must already be limited to today.
    pub fn compute(sessions: &[FocusSession]) -> Self {
        let work: Vec<&FocusSession> = sessions
            .iter()
            .filter(|s| s.cycle_type == CycleType::Work)
            .collect();
        let mut recent = sessions.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_SESSIONS);
        Self {
            work_cycles: u32::try_from(work.len()).unwrap_or(u32::MAX),
            focused_minutes: work.iter().map(|s| s.duration_minutes).sum(),
            recent,
        }
    }
}

/// Load the full history of `user` and compute a [`Report`].
pub fn load_report<Tz: TimeZone>(
    sessions: &dyn SessionStore,
    tasks: &dyn TaskStore,
    categories: &dyn CategoryStore,
    user: &UserContext,
    now: DateTime<Utc>,
    week_starts_on: Weekday,
    tz: &Tz,
) -> Result<Report> {
    let history = sessions.list_by_user(&user.user_id)?;
    let task_list = tasks.list_tasks(&user.user_id)?;
    let category_list = categories.list_categories(&user.user_id)?;
    let today = now.with_timezone(tz).date_naive();
    Ok(Report::compute(
        &task_list,
        &history,
        &category_list,
        today,
        week_starts_on,
        tz,
    ))
}

/// Load today's sessions of `user` and summarize them.
pub fn load_today<Tz: TimeZone>(
    sessions: &dyn SessionStore,
    user: &UserContext,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<TodaySummary> {
    let (start, end) = local_day_bounds(now.with_timezone(tz).date_naive(), tz);
    let today = sessions.query_by_user_and_date_range(&user.user_id, start, end)?;
    Ok(TodaySummary::compute(&today))
}
