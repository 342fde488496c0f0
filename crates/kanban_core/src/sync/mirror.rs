//! Fire-and-forget mirroring of store mutations into a `ProjectTable`.
//!
//! # Responsibility
//! - Carry remote writes from the store to a worker over a one-way channel.
//! - Apply each write once and swallow failures after logging them.
//!
//! # Invariants
//! - Enqueueing never blocks and never reports failure to the caller.
//! - No acknowledgment, retry, timeout or cancellation exists.
//! - The worker applies writes in enqueue order.

use crate::model::project::ProjectId;
use crate::repo::project_repo::{ProjectTable, RepoResult};
use crate::repo::row_mapping::{ProjectRow, RowChanges};
use log::{debug, error, warn};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WORKER_THREAD_NAME: &str = "kanban-remote-mirror";

/// One outbound write against the remote table.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteWrite {
    /// New row scoped by its `user_id`.
    Insert(ProjectRow),
    /// Column assignments scoped by primary id.
    Update { id: ProjectId, changes: RowChanges },
    Delete(ProjectId),
}

impl RemoteWrite {
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::Insert(row) => row.id,
            Self::Update { id, .. } => *id,
            Self::Delete(id) => *id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
        }
    }

    fn apply(&self, table: &dyn ProjectTable) -> RepoResult<()> {
        match self {
            Self::Insert(row) => table.insert(row),
            Self::Update { id, changes } => table.update(*id, changes),
            Self::Delete(id) => table.delete(*id),
        }
    }
}

/// Outbound end held by the store.
#[derive(Debug, Clone)]
pub struct MirrorSender {
    tx: Sender<RemoteWrite>,
}

impl MirrorSender {
    /// Enqueues `write` without waiting for it.
    ///
    /// A closed channel is logged and otherwise ignored.
    pub fn send(&self, write: RemoteWrite) {
        let kind = write.kind();
        if self.tx.send(write).is_err() {
            warn!(
                "event=remote_enqueue module=sync status=error kind={kind} error_code=mirror_closed"
            );
        }
    }
}

/// Worker counters returned by `RemoteMirror::shutdown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub applied: u64,
    pub failed: u64,
}

/// Background worker mirroring writes into a remote table.
pub struct RemoteMirror {
    sender: MirrorSender,
    worker: JoinHandle<MirrorStats>,
}

impl RemoteMirror {
    /// Starts the worker thread owning `table`.
    pub fn spawn<T>(table: T) -> io::Result<Self>
    where
        T: ProjectTable + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(&table, rx))?;
        Ok(Self {
            sender: MirrorSender { tx },
            worker,
        })
    }

    /// Returns a new outbound handle for a store.
    pub fn sender(&self) -> MirrorSender {
        self.sender.clone()
    }

    /// Closes this handle's end of the channel and waits for the worker.
    ///
    /// The worker drains pending writes and exits once every `MirrorSender`
    /// (including those held by stores) is dropped.
    pub fn shutdown(self) -> MirrorStats {
        drop(self.sender);
        match self.worker.join() {
            Ok(stats) => stats,
            Err(_) => {
                error!("event=remote_mirror_stop module=sync status=error error_code=worker_panicked");
                MirrorStats::default()
            }
        }
    }
}

fn run_worker(table: &dyn ProjectTable, rx: Receiver<RemoteWrite>) -> MirrorStats {
    debug!("event=remote_mirror_start module=sync status=ok");
    let mut stats = MirrorStats::default();

    for write in rx {
        let started_at = Instant::now();
        match write.apply(table) {
            Ok(()) => {
                stats.applied += 1;
                debug!(
                    "event=remote_write module=sync status=ok kind={} project_id={} duration_ms={}",
                    write.kind(),
                    write.project_id(),
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => {
                stats.failed += 1;
                warn!(
                    "event=remote_write module=sync status=error kind={} project_id={} duration_ms={} error={}",
                    write.kind(),
                    write.project_id(),
                    started_at.elapsed().as_millis(),
                    err
                );
            }
        }
    }

    debug!(
        "event=remote_mirror_stop module=sync status=ok applied={} failed={}",
        stats.applied, stats.failed
    );
    stats
}
