//! Task management commands.

use clap::Subcommand;
use focusos_core::{TaskStatus, TaskStore};

use super::{print_json, CliResult, Workspace};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Estimated effort in minutes
        #[arg(long, default_value = "25")]
        estimate: u32,
        /// Category ID to file the task under
        #[arg(long)]
        category: Option<String>,
    },
    /// List tasks of the current user
    List {
        /// Only tasks with this status (todo, doing, done)
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Change the status of a task
    Status {
        /// Task ID
        id: String,
        /// New status (todo, doing, done)
        status: TaskStatus,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let ws = Workspace::open()?;

    match action {
        TaskAction::Add {
            title,
            estimate,
            category,
        } => {
            let task = ws
                .db
                .create_task(&ws.user, &title, estimate, category.as_deref())?;
            print_json(&task)?;
        }
        TaskAction::List { status } => {
            let mut tasks = ws.db.list_tasks(&ws.user.user_id)?;
            if let Some(status) = status {
                tasks.retain(|t| t.status == status);
            }
            print_json(&tasks)?;
        }
        TaskAction::Status { id, status } => {
            ws.db.set_task_status(&id, status)?;
            match ws.db.get_task(&id)? {
                Some(task) => print_json(&task)?,
                None => return Err(format!("task not found: {id}").into()),
            }
        }
    }
    Ok(())
}
