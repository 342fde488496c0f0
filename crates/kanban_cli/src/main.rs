//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `kanban_core` linkage and the configured storage.
//! - Print a per-column summary of the configured board, with D-day labels
//!   for cards that have a due date.

use kanban_core::{
    core_version, dday_label, init_logging, load_snapshot, open_db, BoardConfig, FileBlobStorage,
    ProjectStore, SqliteProjectRepository, DEFAULT_BLOB_NAME,
};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("kanban_core version={}", core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = BoardConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(config.log_level, &config.log_dir)?;

    let store = match &config.user_id {
        Some(user_id) => load_remote(&config, user_id)?,
        None => load_local(&config)?,
    };

    let board = store.board();
    for (status, projects) in board.columns() {
        println!("{:<12} {}", status.label(), projects.len());
        for project in projects {
            if let Some(label) = dday_label(project.due_date) {
                println!("  {label:<8} {}", project.title);
            }
        }
    }
    println!("{:<12} {}", "tags", store.all_tags().len());
    info!(
        "event=cli_run module=cli status=ok projects={}",
        store.projects().len()
    );
    Ok(())
}

fn load_remote(config: &BoardConfig, user_id: &str) -> Result<ProjectStore, String> {
    let conn = open_db(&config.db_path).map_err(|err| format!("db open failed: {err}"))?;
    let repo = SqliteProjectRepository::new(conn);
    let mut store = ProjectStore::new();
    store.set_user_id(Some(user_id.to_string()));
    store
        .fetch_projects(&repo)
        .map_err(|err| format!("project fetch failed: {err}"))?;
    println!("source=sqlite path={}", config.db_path.display());
    Ok(store)
}

fn load_local(config: &BoardConfig) -> Result<ProjectStore, String> {
    let storage = FileBlobStorage::new(config.snapshot_dir.clone());
    let snapshot = load_snapshot(&storage, DEFAULT_BLOB_NAME)
        .map_err(|err| format!("snapshot load failed: {err}"))?
        .unwrap_or_default();
    println!("source=snapshot dir={}", storage.dir().display());
    Ok(ProjectStore::from_snapshot(snapshot))
}
