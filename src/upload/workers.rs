use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use indicatif::{MultiProgress, ProgressBar};

use super::enumeration::UploadTask;
use super::progress::ProgressCounter;
use crate::error::UploadError;
use crate::remote::{RemoteStore, UploadReceipt};

/// Outcome of a single task, reported by the worker that ran it. Failures
/// are collected here rather than aborting sibling tasks.
#[derive(Debug)]
pub struct TaskResult {
    pub destination_filename: String,
    pub destination_folder: String,
    pub outcome: Result<UploadReceipt, UploadError>,
}

pub(crate) struct UploadWorkersCtx {
    pub(crate) workers: usize,
    pub(crate) store: Arc<dyn RemoteStore>,
    pub(crate) counter: Arc<ProgressCounter>,
    pub(crate) mp: Arc<MultiProgress>,
    pub(crate) total_pb: ProgressBar,
    pub(crate) rx: Receiver<UploadTask>,
    pub(crate) result_tx: Sender<TaskResult>,
    pub(crate) quiet: bool,
}

// Start the upload worker threads and block until the task channel drains.
// Each worker pulls tasks, invokes the remote capability, bumps the shared
// counter exactly once per task (success or failure) and reports the result.
// Tasks complete in arbitrary order; the only cross-worker state is the
// counter and the progress bars.
pub(crate) fn run_upload_workers(ctx: UploadWorkersCtx) {
    let UploadWorkersCtx { workers, store, counter, mp, total_pb, rx, result_tx, quiet } = ctx;
    let mut handles = Vec::new();
    for worker_id in 0..workers {
        let rx = rx.clone();
        let result_tx = result_tx.clone();
        let store = store.clone();
        let counter = counter.clone();
        let mp = mp.clone();
        let total_pb = total_pb.clone();
        let handle = std::thread::spawn(move || {
            while let Ok(task) = rx.recv() {
                let outcome = store.upload(
                    &task.source_path,
                    &task.destination_folder,
                    &task.destination_filename,
                    &task.options,
                );
                let completed = counter.increment();
                total_pb.inc(1);
                if !quiet {
                    let _ = mp.println(format!(
                        "{}/{} - {}",
                        completed,
                        counter.total(),
                        task.destination_filename
                    ));
                }
                if let Err(ref e) = outcome {
                    tracing::debug!(
                        "[upload] worker_id={} task {} failed: {}",
                        worker_id,
                        task.destination_filename,
                        e
                    );
                }
                let _ = result_tx.send(TaskResult {
                    destination_filename: task.destination_filename,
                    destination_folder: task.destination_folder,
                    outcome,
                });
            }
        });
        handles.push(handle);
    }
    for h in handles {
        let _ = h.join();
    }
}
