//! Coalescing write-back for editor state.
//!
//! Many rapid edits collapse into one persisted write. Continuous edits
//! (typing into a field) restart a quiet-period timer and only the latest
//! snapshot is written once the timer expires; structural edits (adding or
//! removing a row) cancel the timer and write straight away.
//!
//! A failed write keeps the snapshot pending. It is written again with the
//! next edit, flush or shutdown; there is no retry loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{TimelineError, TimelineResult};

/// Quiet period used when the configuration does not set one.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

/// Destination of persisted snapshots.
#[async_trait]
pub trait SnapshotSink<T: Send + 'static>: Send + Sync {
    async fn persist(&self, snapshot: T) -> anyhow::Result<()>;
}

/// Writes each snapshot as pretty JSON, replacing the previous file.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl<T> SnapshotSink<T> for JsonFileSink
where
    T: Serialize + Send + 'static,
{
    async fn persist(&self, snapshot: T) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(&snapshot)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// An edit reported by the editor.
#[derive(Debug, Clone)]
pub enum Edit<T> {
    /// Continuous edit, debounced
    Field(T),
    /// Add/remove, written immediately
    Structural(T),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSaveStats {
    pub edits: u64,
    pub writes: u64,
    pub failures: u64,
}

enum Command<T> {
    Edit(Edit<T>),
    Flush(oneshot::Sender<bool>),
    Shutdown(oneshot::Sender<bool>),
}

/// Handle to a background write-back task.
pub struct AutoSaver<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
    stats: Arc<Mutex<AutoSaveStats>>,
    worker: JoinHandle<()>,
}

impl<T> AutoSaver<T>
where
    T: Clone + Send + 'static,
{
    /// Start the worker on the current tokio runtime.
    pub fn spawn<S>(sink: Arc<S>, debounce: Duration) -> Self
    where
        S: SnapshotSink<T> + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(Mutex::new(AutoSaveStats::default()));
        let worker = tokio::spawn(run_worker(rx, sink, debounce, Arc::clone(&stats)));

        Self { tx, stats, worker }
    }

    pub fn record(&self, edit: Edit<T>) -> TimelineResult<()> {
        self.tx
            .send(Command::Edit(edit))
            .map_err(|_| TimelineError::AutoSaveClosed)
    }

    pub fn field_edit(&self, snapshot: T) -> TimelineResult<()> {
        self.record(Edit::Field(snapshot))
    }

    pub fn structural_edit(&self, snapshot: T) -> TimelineResult<()> {
        self.record(Edit::Structural(snapshot))
    }

    /// Write any pending snapshot now.
    ///
    /// Resolves to `true` when nothing is left pending.
    pub async fn flush(&self) -> TimelineResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(reply))
            .map_err(|_| TimelineError::AutoSaveClosed)?;
        rx.await.map_err(|_| TimelineError::AutoSaveClosed)
    }

    /// Flush and stop the worker.
    pub async fn shutdown(self) -> TimelineResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Shutdown(reply))
            .map_err(|_| TimelineError::AutoSaveClosed)?;
        let clean = rx.await.map_err(|_| TimelineError::AutoSaveClosed)?;
        let _ = self.worker.await;
        Ok(clean)
    }

    pub fn stats(&self) -> AutoSaveStats {
        *self.stats.lock()
    }
}

async fn run_worker<T, S>(
    mut rx: mpsc::UnboundedReceiver<Command<T>>,
    sink: Arc<S>,
    debounce: Duration,
    stats: Arc<Mutex<AutoSaveStats>>,
) where
    T: Clone + Send + 'static,
    S: SnapshotSink<T> + 'static,
{
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Edit(Edit::Field(snapshot))) => {
                    stats.lock().edits += 1;
                    pending = Some(snapshot);
                    deadline = Some(Instant::now() + debounce);
                }
                Some(Command::Edit(Edit::Structural(snapshot))) => {
                    stats.lock().edits += 1;
                    pending = Some(snapshot);
                    deadline = None;
                    write_pending(&mut pending, sink.as_ref(), &stats).await;
                }
                Some(Command::Flush(reply)) => {
                    deadline = None;
                    let clean = write_pending(&mut pending, sink.as_ref(), &stats).await;
                    let _ = reply.send(clean);
                }
                Some(Command::Shutdown(reply)) => {
                    let clean = write_pending(&mut pending, sink.as_ref(), &stats).await;
                    let _ = reply.send(clean);
                    break;
                }
                None => {
                    // every handle dropped
                    write_pending(&mut pending, sink.as_ref(), &stats).await;
                    break;
                }
            },
            _ = wait_until(deadline) => {
                deadline = None;
                write_pending(&mut pending, sink.as_ref(), &stats).await;
            }
        }
    }

    debug!("Auto-save worker stopped");
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

async fn write_pending<T, S>(pending: &mut Option<T>, sink: &S, stats: &Mutex<AutoSaveStats>) -> bool
where
    T: Clone + Send + 'static,
    S: SnapshotSink<T> + ?Sized,
{
    let Some(snapshot) = pending.clone() else {
        return true;
    };

    match sink.persist(snapshot).await {
        Ok(()) => {
            *pending = None;
            stats.lock().writes += 1;
            debug!("Auto-save snapshot written");
            true
        }
        Err(e) => {
            stats.lock().failures += 1;
            warn!(error = %e, "Auto-save write failed; snapshot kept pending");
            false
        }
    }
}
