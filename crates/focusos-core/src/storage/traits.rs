use chrono::{DateTime, Utc};

use crate::context::UserContext;
use crate::error::Result;
use crate::session::{Category, FocusSession, NewSession, SessionId, Task};
use crate::timer::DurationProfile;

/// Append-only log of completed cycles.
pub trait SessionStore: Send + Sync {
    fn append(&self, session: &NewSession) -> Result<SessionId>;

    /// Sessions of `user_id` with `start <= created_at < end`, oldest first.
    fn query_by_user_and_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>>;

    /// Full history of `user_id`, oldest first.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<FocusSession>>;
}

/// Tasks are read-only to the engine except for the effort accumulator.
pub trait TaskStore: Send + Sync {
    fn increment_actual_minutes(&self, task_id: &str, delta: u32) -> Result<()>;

    fn get_task(&self, task_id: &str) -> Result<Option<Task>>;

    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>>;
}

pub trait CategoryStore: Send + Sync {
    fn list_categories(&self, user_id: &str) -> Result<Vec<Category>>;
}

/// Where the duration preferences of a user come from.
pub trait ProfileSource: Send + Sync {
    fn duration_profile(&self, user: &UserContext) -> Result<DurationProfile>;
}
