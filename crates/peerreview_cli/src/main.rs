//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load configuration from `PEERREVIEW_*` variables.
//! - Open (and migrate) the database, start session pruning, report status.

use peerreview_core::db::migrations::current_user_version;
use peerreview_core::db::open_db;
use peerreview_core::{
    core_version, init_logging, CoreConfig, ReferenceDataService, SessionPruner, SessionStore,
    SqliteCycleRepository, SqliteTeamRepository,
};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("peerreview: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = open_db(&config.sqlite_path)?;
    let sessions = Arc::new(SessionStore::new());
    let pruner = SessionPruner::start(Arc::clone(&sessions), config.prune_interval)?;

    let reference = ReferenceDataService::new(
        SqliteTeamRepository::new(&conn),
        SqliteCycleRepository::new(&conn),
    );

    println!("peerreview_core version={}", core_version());
    println!(
        "database path={} schema_version={}",
        config.sqlite_path.display(),
        current_user_version(&conn)?
    );
    println!(
        "teams={} cycles={}",
        reference.list_teams()?.len(),
        reference.list_cycles()?.len()
    );

    pruner.stop();
    Ok(())
}
