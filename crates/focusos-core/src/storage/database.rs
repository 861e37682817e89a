//! SQLite-backed storage.
//!
//! Provides persistent storage for:
//! - Completed focus sessions (append-only)
//! - Tasks and categories read by the engine and the analytics
//! - Per-user duration preferences

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use super::migrations;
use super::traits::{CategoryStore, ProfileSource, SessionStore, TaskStore};
use crate::context::UserContext;
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::session::{Category, FocusSession, NewSession, SessionId, Task, TaskStatus};
use crate::timer::DurationProfile;

/// SQLite database shared by the timer's effect runner and the analytics.
///
/// The connection sits behind a mutex so one handle can be shared across
/// the blocking pool.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `<data dir>/focusos.db`, creating and migrating
    /// it if needed.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("focusos.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CoreError::Database(DatabaseError::Poisoned))
    }

    // ── Tasks & categories ───────────────────────────────────────────

    pub fn create_task(
        &self,
        user: &UserContext,
        title: &str,
        estimated_minutes: u32,
        category_id: Option<&str>,
    ) -> Result<Task> {
        if title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.user_id.clone(),
            title: title.trim().to_string(),
            estimated_minutes,
            actual_minutes: 0,
            status: TaskStatus::Todo,
            category_id: category_id.map(str::to_owned),
            created_at: Utc::now(),
        };
        self.conn()?.execute(
            "INSERT INTO tasks (id, user_id, title, estimated_minutes, actual_minutes, status, category_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id,
                task.user_id,
                task.title,
                task.estimated_minutes,
                task.actual_minutes,
                task.status.as_str(),
                task.category_id,
                task.created_at.timestamp_millis(),
            ],
        )?;
        Ok(task)
    }

    pub fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let changed = self.conn()?.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![status.as_str(), task_id],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                kind: "task",
                id: task_id.into(),
            });
        }
        Ok(())
    }

    pub fn create_category(&self, user: &UserContext, name: &str, color: &str) -> Result<Category> {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.user_id.clone(),
            name: name.trim().to_string(),
            color: color.to_string(),
        };
        self.conn()?.execute(
            "INSERT INTO categories (id, user_id, name, color) VALUES (?1, ?2, ?3, ?4)",
            params![category.id, category.user_id, category.name, category.color],
        )?;
        Ok(category)
    }

    // ── Profiles ─────────────────────────────────────────────────────

    pub fn set_duration_profile(&self, user: &UserContext, profile: &DurationProfile) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO profiles (user_id, work_minutes, short_break_minutes, long_break_minutes)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                work_minutes = excluded.work_minutes,
                short_break_minutes = excluded.short_break_minutes,
                long_break_minutes = excluded.long_break_minutes",
            params![
                user.user_id,
                profile.work_minutes,
                profile.short_break_minutes,
                profile.long_break_minutes,
            ],
        )?;
        Ok(())
    }

    /// Stored preferences, or `None` if the user has no profile row.
    pub fn stored_duration_profile(&self, user: &UserContext) -> Result<Option<DurationProfile>> {
        let profile = self
            .conn()?
            .query_row(
                "SELECT work_minutes, short_break_minutes, long_break_minutes
                 FROM profiles WHERE user_id = ?1",
                params![user.user_id],
                |row| {
                    Ok(DurationProfile {
                        work_minutes: row.get(0)?,
                        short_break_minutes: row.get(1)?,
                        long_break_minutes: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }
}

impl SessionStore for Database {
    fn append(&self, session: &NewSession) -> Result<SessionId> {
        if session.duration_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration_minutes".into(),
                message: "must be positive".into(),
            }
            .into());
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.conn()?.execute(
            "INSERT INTO sessions (id, user_id, task_id, cycle_type, duration_minutes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                session.user_id,
                session.task_id,
                session.cycle_type.as_str(),
                session.duration_minutes,
                session.created_at.timestamp_millis(),
            ],
        )?;
        Ok(id)
    }

    fn query_by_user_and_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end }.into());
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, task_id, cycle_type, duration_minutes, created_at
             FROM sessions
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
             ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map(
            params![user_id, start.timestamp_millis(), end.timestamp_millis()],
            session_from_row,
        )?;
        collect_rows(rows)
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<FocusSession>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, task_id, cycle_type, duration_minutes, created_at
             FROM sessions
             WHERE user_id = ?1
             ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map(params![user_id], session_from_row)?;
        collect_rows(rows)
    }
}

impl TaskStore for Database {
    fn increment_actual_minutes(&self, task_id: &str, delta: u32) -> Result<()> {
        let changed = self.conn()?.execute(
            "UPDATE tasks SET actual_minutes = actual_minutes + ?1 WHERE id = ?2",
            params![delta, task_id],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                kind: "task",
                id: task_id.into(),
            });
        }
        Ok(())
    }

    fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        let task = self
            .conn()?
            .query_row(
                "SELECT id, user_id, title, estimated_minutes, actual_minutes, status, category_id, created_at
                 FROM tasks WHERE id = ?1",
                params![task_id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, estimated_minutes, actual_minutes, status, category_id, created_at
             FROM tasks WHERE user_id = ?1
             ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map(params![user_id], task_from_row)?;
        collect_rows(rows)
    }
}

impl CategoryStore for Database {
    fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, color FROM categories WHERE user_id = ?1 ORDER BY name ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Category {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                color: row.get(3)?,
            })
        })?;
        collect_rows(rows)
    }
}

impl ProfileSource for Database {
    fn duration_profile(&self, user: &UserContext) -> Result<DurationProfile> {
        Ok(self.stored_duration_profile(user)?.unwrap_or_default())
    }
}

fn collect_rows<T>(rows: impl Iterator<Item = rusqlite::Result<T>>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn parse_column<T: std::str::FromStr<Err = String>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(millis).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<FocusSession> {
    Ok(FocusSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        task_id: row.get(2)?,
        cycle_type: parse_column(row, 3)?,
        duration_minutes: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        estimated_minutes: row.get(3)?,
        actual_minutes: row.get(4)?,
        status: parse_column(row, 5)?,
        category_id: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}
