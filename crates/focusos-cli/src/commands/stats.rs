use chrono::{Local, Utc};
use clap::Subcommand;
use focusos_core::analytics::{load_report, load_today};

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's cycles, focused minutes and most recent sessions
    Today,
    /// Experience, competency and weekly consistency
    Report,
}

pub fn run(action: StatsAction) -> CliResult {
    let ws = Workspace::open()?;
    let db = ws.db.as_ref();

    match action {
        StatsAction::Today => {
            let today = load_today(db, &ws.user, Utc::now(), &Local)?;
            print_json(&today)?;
        }
        StatsAction::Report => {
            let week_starts_on = ws.config.week_starts_on()?;
            let report = load_report(db, db, db, &ws.user, Utc::now(), week_starts_on, &Local)?;
            print_json(&report)?;
        }
    }
    Ok(())
}
