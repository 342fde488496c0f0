//! Local persisted board variant.
//!
//! # Responsibility
//! - Serialize the whole project collection plus filter state into one named
//!   JSON blob and restore it verbatim.
//!
//! # Invariants
//! - A missing blob is not an error; it loads as `None`.
//! - Restored projects must pass `Project::validate()`.
//! - No schema version is written; the blob is the camelCase record shape.

use crate::board::filter::FilterState;
use crate::model::project::{Project, ProjectValidationError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Blob name used when callers do not pick one.
pub const DEFAULT_BLOB_NAME: &str = "kanban-board";

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    Io(io::Error),
    Serde(serde_json::Error),
    Invalid(ProjectValidationError),
    InvalidBlobName(String),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "snapshot io failed: {err}"),
            Self::Serde(err) => write!(f, "snapshot encoding failed: {err}"),
            Self::Invalid(err) => write!(f, "snapshot contains invalid project: {err}"),
            Self::InvalidBlobName(name) => write!(f, "invalid snapshot blob name `{name}`"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::InvalidBlobName(_) => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Everything the local variant persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub projects: Vec<Project>,
    #[serde(default)]
    pub filter: FilterState,
}

/// Client-local key/value blob storage.
pub trait BlobStorage {
    fn read(&self, name: &str) -> SnapshotResult<Option<Vec<u8>>>;
    fn write(&self, name: &str, bytes: &[u8]) -> SnapshotResult<()>;
}

/// One `<name>.json` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStorage {
    dir: PathBuf,
}

impl FileBlobStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, name: &str) -> SnapshotResult<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SnapshotError::InvalidBlobName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl BlobStorage for FileBlobStorage {
    fn read(&self, name: &str) -> SnapshotResult<Option<Vec<u8>>> {
        let path = self.blob_path(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> SnapshotResult<()> {
        let path = self.blob_path(name)?;
        fs::create_dir_all(&self.dir)?;
        // Write-then-rename keeps the previous blob intact if the write fails.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

/// In-process blob storage for tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryBlobStorage {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStorage for MemoryBlobStorage {
    fn read(&self, name: &str) -> SnapshotResult<Option<Vec<u8>>> {
        Ok(self.blobs.borrow().get(name).cloned())
    }

    fn write(&self, name: &str, bytes: &[u8]) -> SnapshotResult<()> {
        self.blobs
            .borrow_mut()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Serializes `snapshot` into the blob `name`.
pub fn save_snapshot(
    storage: &dyn BlobStorage,
    name: &str,
    snapshot: &BoardSnapshot,
) -> SnapshotResult<()> {
    let bytes = serde_json::to_vec(snapshot)?;
    storage.write(name, &bytes)?;
    debug!(
        "event=snapshot_save module=snapshot status=ok blob={name} projects={} bytes={}",
        snapshot.projects.len(),
        bytes.len()
    );
    Ok(())
}

/// Restores the blob `name`; `None` when it was never written.
pub fn load_snapshot(storage: &dyn BlobStorage, name: &str) -> SnapshotResult<Option<BoardSnapshot>> {
    let Some(bytes) = storage.read(name)? else {
        return Ok(None);
    };
    let snapshot: BoardSnapshot = serde_json::from_slice(&bytes)?;
    for project in &snapshot.projects {
        project.validate().map_err(SnapshotError::Invalid)?;
    }
    debug!(
        "event=snapshot_load module=snapshot status=ok blob={name} projects={}",
        snapshot.projects.len()
    );
    Ok(Some(snapshot))
}
