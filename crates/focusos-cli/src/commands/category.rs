use clap::Subcommand;
use focusos_core::CategoryStore;

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Display color (e.g. "#6366f1")
        #[arg(long, default_value = "#6366f1")]
        color: String,
    },
    /// List categories of the current user
    List,
}

pub fn run(action: CategoryAction) -> CliResult {
    let ws = Workspace::open()?;

    match action {
        CategoryAction::Add { name, color } => {
            let category = ws.db.create_category(&ws.user, &name, &color)?;
            print_json(&category)?;
        }
        CategoryAction::List => {
            let categories = ws.db.list_categories(&ws.user.user_id)?;
            print_json(&categories)?;
        }
    }
    Ok(())
}
