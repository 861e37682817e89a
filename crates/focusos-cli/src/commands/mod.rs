pub mod category;
pub mod config;
pub mod profile;
pub mod stats;
pub mod task;
pub mod timer;

use std::sync::Arc;

use focusos_core::{Config, Database, UserContext};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Config, database and acting user, loaded once per command.
pub struct Workspace {
    pub config: Config,
    pub db: Arc<Database>,
    pub user: UserContext,
}

impl Workspace {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = Arc::new(Database::open()?);
        let user = config.user();
        Ok(Self { config, db, user })
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
