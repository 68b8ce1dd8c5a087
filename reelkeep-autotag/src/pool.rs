//! Concurrent auto-tag runner.
//!
//! Spawns N worker tasks that pull [`AutoTagTask`]s from a bounded
//! async-channel. Each task runs on tokio's blocking thread pool with its
//! own SQLite connection; outcomes flow back over an unbounded channel.
//! Every submitted task reports exactly one [`AutoTagOutcome`], including
//! tasks skipped because the pool was cancelled.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::progress::{AutoTagProgress, LogProgress};
use crate::task::{AutoTagError, AutoTagStats, AutoTagTask};

/// The result of one task.
#[derive(Debug)]
pub struct AutoTagOutcome {
    pub task: AutoTagTask,
    pub result: Result<AutoTagStats, AutoTagError>,
}

/// A pool of workers running auto-tag tasks against one database file.
///
/// Must be started from within a tokio runtime.
///
/// # Example
///
/// ```ignore
/// let pool = AutoTagPool::start(&db_path, tasks, 4, CancellationToken::new());
/// for outcome in pool.wait_all().await {
///     report(outcome);
/// }
/// ```
pub struct AutoTagPool {
    result_rx: mpsc::UnboundedReceiver<AutoTagOutcome>,
    handles: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
    submitted: usize,
}

impl AutoTagPool {
    /// Start `workers` workers and submit every task, reporting progress
    /// through the `log` crate.
    pub fn start(
        db_path: impl AsRef<Path>,
        tasks: Vec<AutoTagTask>,
        workers: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self::start_with_progress(db_path, tasks, workers, cancel, Arc::new(LogProgress))
    }

    pub fn start_with_progress(
        db_path: impl AsRef<Path>,
        tasks: Vec<AutoTagTask>,
        workers: usize,
        cancel: CancellationToken,
        progress: Arc<dyn AutoTagProgress>,
    ) -> Self {
        let n = workers.max(1);
        let submitted = tasks.len();
        let db_path: Arc<PathBuf> = Arc::new(db_path.as_ref().to_path_buf());

        let (work_tx, work_rx) = async_channel::bounded::<AutoTagTask>(n);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<AutoTagOutcome>();

        let handles: Vec<JoinHandle<()>> = (0..n)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let db_path = db_path.clone();
                let cancel = cancel.clone();
                let progress = progress.clone();
                tokio::spawn(async move {
                    while let Ok(task) = work_rx.recv().await {
                        let result =
                            run_blocking(db_path.clone(), task, cancel.clone(), progress.clone())
                                .await;
                        if let Err(e) = &result {
                            log::error!("Auto-tag for {} failed: {e}", task.target);
                        }
                        if result_tx.send(AutoTagOutcome { task, result }).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        // The result channel closes once every worker has exited.
        drop(result_tx);

        tokio::spawn(async move {
            for task in tasks {
                if work_tx.send(task).await.is_err() {
                    break;
                }
            }
        });

        Self {
            result_rx,
            handles,
            cancel,
            submitted,
        }
    }

    /// Number of tasks submitted to the pool.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Ask every running task to stop. Tasks not yet started report
    /// [`AutoTagError::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Receive the next outcome, or `None` once every task has reported.
    pub async fn recv(&mut self) -> Option<AutoTagOutcome> {
        self.result_rx.recv().await
    }

    /// Wait until every submitted task has reported and all workers have
    /// exited. Outcomes are in completion order.
    pub async fn wait_all(mut self) -> Vec<AutoTagOutcome> {
        let mut outcomes = Vec::with_capacity(self.submitted);
        while let Some(outcome) = self.result_rx.recv().await {
            outcomes.push(outcome);
        }
        for joined in futures::future::join_all(self.handles).await {
            if let Err(e) = joined {
                log::error!("Auto-tag worker panicked: {e}");
            }
        }
        outcomes
    }
}

async fn run_blocking(
    db_path: Arc<PathBuf>,
    task: AutoTagTask,
    cancel: CancellationToken,
    progress: Arc<dyn AutoTagProgress>,
) -> Result<AutoTagStats, AutoTagError> {
    if cancel.is_cancelled() {
        return Err(AutoTagError::Cancelled);
    }
    tokio::task::spawn_blocking(move || {
        let mut conn = reelkeep_db::open_database(&db_path)?;
        task.run(&mut conn, &cancel, progress.as_ref())
    })
    .await?
}
