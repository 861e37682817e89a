//! Per-user duration preferences stored in the database.
//!
//! A stored value wins over `timer.*` in the config file, field by field.

use clap::Subcommand;
use focusos_core::{resolve_policy, DurationPolicy, DurationProfile};
use serde::Serialize;

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Store duration preferences for the current user
    Set {
        /// Work cycle length in minutes
        #[arg(long)]
        work: Option<i64>,
        /// Short break length in minutes
        #[arg(long)]
        short_break: Option<i64>,
        /// Long break length in minutes
        #[arg(long)]
        long_break: Option<i64>,
    },
    /// Show stored preferences and the durations the timer will use
    Show,
}

#[derive(Serialize)]
struct ProfileView {
    user_id: String,
    stored: Option<DurationProfile>,
    effective: DurationPolicy,
}

pub fn run(action: ProfileAction) -> CliResult {
    let ws = Workspace::open()?;

    match action {
        ProfileAction::Set {
            work,
            short_break,
            long_break,
        } => {
            let current = ws.db.stored_duration_profile(&ws.user)?.unwrap_or_default();
            let profile = DurationProfile {
                work_minutes: work.or(current.work_minutes),
                short_break_minutes: short_break.or(current.short_break_minutes),
                long_break_minutes: long_break.or(current.long_break_minutes),
            };
            ws.db.set_duration_profile(&ws.user, &profile)?;
            print_json(&profile)?;
        }
        ProfileAction::Show => {
            let stored = ws.db.stored_duration_profile(&ws.user)?;
            let effective = resolve_policy(ws.db.as_ref(), &ws.config, &ws.user);
            print_json(&ProfileView {
                user_id: ws.user.user_id.clone(),
                stored,
                effective,
            })?;
        }
    }
    Ok(())
}
