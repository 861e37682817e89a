mod config;
pub mod database;
pub mod migrations;
mod traits;

pub use config::{Config, ReportsConfig, TimerConfig, UserConfig};
pub use database::Database;
pub use traits::{CategoryStore, ProfileSource, SessionStore, TaskStore};

use std::path::PathBuf;

use crate::context::UserContext;
use crate::error::Result;
use crate::timer::{DurationPolicy, DurationProfile};

/// Resolve the cycle durations of `user`: `primary` wins field by field,
/// `fallback` fills the gaps and the built-in defaults cover the rest.
///
/// A source that fails to load is logged and treated as empty.
pub fn resolve_policy(
    primary: &dyn ProfileSource,
    fallback: &dyn ProfileSource,
    user: &UserContext,
) -> DurationPolicy {
    let load = |source: &dyn ProfileSource| {
        source.duration_profile(user).unwrap_or_else(|e| {
            tracing::warn!(error = %e, user = %user.user_id, "duration preferences unavailable");
            DurationProfile::default()
        })
    };
    DurationPolicy::resolve(&load(primary).or(load(fallback)))
}

/// Returns the data directory, creating it if needed.
///
/// `FOCUSOS_DATA_DIR` overrides the location outright. Otherwise it is
/// `~/.config/focusos/`, or `~/.config/focusos-dev/` when
/// `FOCUSOS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSOS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSOS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusos-dev")
            } else {
                base_dir.join("focusos")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
