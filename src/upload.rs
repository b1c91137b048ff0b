// upload module: tree enumeration and concurrent dispatch
pub mod enumeration;
pub mod progress;
pub mod workers;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use cli_table::{Cell, Style, Table, format::Justify, print_stdout};
use crossbeam_channel::{bounded, unbounded};
use indicatif::ProgressStyle;

use self::enumeration::{TreePlan, UploadTask, enumerate_tree};
use self::progress::ProgressCounter;
use self::workers::{TaskResult, UploadWorkersCtx, run_upload_workers};
use crate::error::UploadError;
use crate::exclude::ExcludeSet;
use crate::remote::{RemoteStore, UploadOptions};
use crate::util::{init_progress_and_mp, print_summary, set_startup_header, write_failures_jsonl};

/// Workers are bounded to a sensible upper limit regardless of the flag.
const MAX_WORKERS: usize = 32;

/// Arguments for `handle_upload` grouped to avoid too-many-arguments lint.
#[derive(Clone)]
pub struct HandleUploadArgs {
    pub base_folder: PathBuf,
    pub destination_folder: String,
    pub excludes: ExcludeSet,
    pub options: UploadOptions,
    pub workers: usize,
    pub verbose: bool,
    pub json: bool,
    pub quiet: bool,
}

/// Aggregated result of one run.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub total: u64,
    pub completed: u64,
    pub succeeded: u64,
    pub bytes: u64,
    pub failed: Vec<(String, UploadError)>,
}

// Module-private context used to reduce arg count for finalize_run
struct FinalizeCtx {
    mp: Arc<indicatif::MultiProgress>,
    header: indicatif::ProgressBar,
    total_pb: indicatif::ProgressBar,
    json_mode: bool,
    quiet_mode: bool,
}

fn calc_workers(requested: usize, total_tasks: usize) -> usize {
    let mut workers = if requested == 0 { 1 } else { requested };
    workers = std::cmp::min(workers, MAX_WORKERS);
    workers = std::cmp::min(workers, std::cmp::max(1, total_tasks));
    workers
}

/// Render the enumerated plan as a table without dispatching anything.
pub fn print_plan(tasks: &[UploadTask]) {
    let rows: Vec<Vec<cli_table::CellStruct>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.source_path.display().to_string().cell(),
                t.destination_folder.clone().cell(),
                t.destination_filename.clone().cell().justify(Justify::Right),
            ]
        })
        .collect();
    let title = vec![
        "Source".cell().bold(true),
        "Destination Folder".cell().bold(true),
        "Filename".cell().bold(true),
    ];
    let _ = print_stdout(rows.table().title(title));
    println!("{} file(s) would be uploaded", tasks.len());
}

/// Upload command main entry: enumerate the tree fully, then dispatch every
/// task onto a bounded pool of workers against the remote store.
///
/// Overview:
/// - Two-phase contract: the walk completes (fixing the task total) before
///   any upload is dispatched.
/// - Folder signals: planned remote folders are reported to the collaborator
///   up front; the reference service creates them implicitly on upload.
/// - Failure isolation: a task's failure lands in the collected results and
///   the run continues; configuration and walk errors remain fatal.
/// - Progress: a `completed/total - filename` line per finished task plus an
///   overall bar; a summary and a failures JSONL artifact at the end.
pub fn handle_upload(args: HandleUploadArgs, store: Arc<dyn RemoteStore>) -> Result<UploadReport> {
    let HandleUploadArgs {
        base_folder,
        destination_folder,
        excludes,
        options,
        workers,
        verbose,
        json,
        quiet,
    } = args;

    if !base_folder.is_dir() {
        return Err(UploadError::SourceNotDir(base_folder).into());
    }

    // Phase one: enumerate fully before anything is dispatched.
    let plan = enumerate_tree(&base_folder, &excludes, &destination_folder, &options)?;
    let TreePlan { tasks, folders } = plan;
    let total_tasks = tasks.len();
    tracing::info!(
        "enumerated {} task(s), {} folder(s) under {}",
        total_tasks,
        folders.len(),
        base_folder.display()
    );

    // Folder signals go out before any upload. The remote side creates
    // folders implicitly on first upload, so a failing signal is not fatal.
    for folder in &folders {
        if let Err(e) = store.create_folder(folder) {
            tracing::warn!("create_folder {} failed: {}", folder, e);
        }
    }

    let counter = Arc::new(ProgressCounter::new(total_tasks as u64));

    let total_style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )
    .with_context(|| "invalid progress template")?
    .progress_chars("=> ");

    let workers = calc_workers(workers, total_tasks);
    let (mp, total_pb, header) = init_progress_and_mp(verbose, total_tasks as u64, &total_style);
    set_startup_header(
        &header,
        "Upload",
        workers,
        &destination_folder,
        options.resource_type.as_str(),
    );

    // Keep the producer queue capacity strictly greater than the task count
    // when small, so the produce-then-join flow cannot wedge on a full
    // channel boundary.
    let cap = {
        let base_plus = std::cmp::max(4, workers * 4 + 1);
        std::cmp::min(base_plus, std::cmp::max(1, total_tasks + 1))
    };
    let (tx, rx) = bounded::<UploadTask>(cap);
    let (result_tx, result_rx) = unbounded::<TaskResult>();

    // Start workers before producing, so the producer never blocks on a
    // full queue with nobody draining it.
    let ctx_for_workers = UploadWorkersCtx {
        workers,
        store: store.clone(),
        counter: counter.clone(),
        mp: mp.clone(),
        total_pb: total_pb.clone(),
        rx,
        result_tx: result_tx.clone(),
        quiet,
    };
    let worker_thread = std::thread::spawn(move || {
        run_upload_workers(ctx_for_workers);
    });

    let start = Instant::now();
    for task in tasks {
        // Blocking send to apply backpressure on the producer
        let _ = tx.send(task);
    }
    drop(tx);
    let _ = worker_thread.join();
    drop(result_tx);

    let finalize_ctx = FinalizeCtx {
        mp: mp.clone(),
        header: header.clone(),
        total_pb: total_pb.clone(),
        json_mode: json,
        quiet_mode: quiet,
    };
    Ok(finalize_run(finalize_ctx, start, result_rx, counter))
}

// Consume the results receiver, clear the progress UI, print/write the
// summary and failure artifacts, and build the report.
fn finalize_run(
    ctx: FinalizeCtx,
    start: Instant,
    result_rx: crossbeam_channel::Receiver<TaskResult>,
    counter: Arc<ProgressCounter>,
) -> UploadReport {
    let mut report = UploadReport::default();
    for res in result_rx.into_iter() {
        match res.outcome {
            Ok(receipt) => {
                report.succeeded += 1;
                report.bytes += receipt.bytes;
            }
            Err(e) => report.failed.push((res.destination_filename, e)),
        }
    }
    let (completed, total) = counter.snapshot();
    report.completed = completed;
    report.total = total;

    let _ = ctx.mp.clear();
    ctx.header.finish_and_clear();
    ctx.total_pb.finish_and_clear();
    let elapsed = start.elapsed().as_secs_f64();

    if !ctx.quiet_mode {
        print_summary(report.succeeded, report.failed.len() as u64, report.bytes, elapsed);
    }

    let mut failures_path: Option<std::path::PathBuf> = None;
    if !report.failed.is_empty() {
        failures_path = write_failures_jsonl(None, &report.failed);
        if !ctx.quiet_mode
            && let Some(ref p) = failures_path
        {
            println!("failure list written to: {}", p.display());
        }
    }

    if ctx.json_mode {
        let summary_obj = serde_json::json!({
            "total": report.total,
            "completed": report.completed,
            "succeeded": report.succeeded,
            "failed": report.failed.len(),
            "bytes": report.bytes,
            "elapsed_secs": elapsed,
            "failures_path": failures_path.as_ref().map(|p| p.to_string_lossy().to_string()),
        });
        if let Ok(line) = serde_json::to_string(&summary_obj) {
            println!("{}", line);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_is_bounded() {
        assert_eq!(calc_workers(0, 10), 1);
        assert_eq!(calc_workers(10, 3), 3);
        assert_eq!(calc_workers(100, 1000), MAX_WORKERS);
        assert_eq!(calc_workers(10, 0), 1);
        assert_eq!(calc_workers(4, 10), 4);
    }
}
