//! Cycle completion: what gets recorded when a cycle expires, and how.

mod intent;
mod runner;
#[cfg(test)]
pub(crate) mod testing;

pub use intent::{plan_completion, CompletedCycle, Intent};
pub use runner::{EffectReport, EffectRunner};

use chrono::{DateTime, TimeZone, Utc};

use crate::analytics::local_day_bounds;
use crate::context::UserContext;
use crate::storage::SessionStore;
use crate::timer::CycleType;

/// Count of work sessions `user` completed on the local day containing
/// `now`. Used to seed the rotation counter when a timer is created.
///
/// Best-effort: a store failure is logged and counts as zero.
pub fn completed_work_cycles_today<Tz: TimeZone>(
    store: &dyn SessionStore,
    user: &UserContext,
    now: DateTime<Utc>,
    tz: &Tz,
) -> u32 {
    let today = now.with_timezone(tz).date_naive();
    let (start, end) = local_day_bounds(today, tz);
    match store.query_by_user_and_date_range(&user.user_id, start, end) {
        Ok(sessions) => {
            let count = sessions
                .iter()
                .filter(|s| s.cycle_type == CycleType::Work)
                .count();
            u32::try_from(count).unwrap_or(u32::MAX)
        }
        Err(e) => {
            tracing::warn!(error = %e, user = %user.user_id, "could not load today's sessions");
            0
        }
    }
}
