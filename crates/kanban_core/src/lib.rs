//! Core domain logic for the personal kanban board.
//! This crate owns project records, board views and their persistence.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use board::drag::{resolve_drop, DropAction, DropTarget};
pub use board::filter::{FilterPatch, FilterState};
pub use board::view::BoardView;
pub use config::{BoardConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::checklist::{calculate_progress, ChecklistItem, ChecklistItemId};
pub use model::dday::{dday_label, format_dday};
pub use model::project::{
    parse_tags, ColumnStatus, NewProject, Priority, Project, ProjectId, ProjectPatch,
    ProjectValidationError,
};
pub use repo::project_repo::{ProjectTable, RepoError, RepoResult, SqliteProjectRepository};
pub use repo::row_mapping::{ProjectRow, RowChanges};
pub use snapshot::{
    load_snapshot, save_snapshot, BlobStorage, BoardSnapshot, FileBlobStorage,
    MemoryBlobStorage, SnapshotError, SnapshotResult, DEFAULT_BLOB_NAME,
};
pub use store::project_store::ProjectStore;
pub use sync::mirror::{MirrorSender, MirrorStats, RemoteMirror, RemoteWrite};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
