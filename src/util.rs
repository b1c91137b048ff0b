use chrono::Utc;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::UploadError;

/// Convert a byte count into a human readable string using IEC units (KiB/MiB/GiB).
pub fn human_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GiB", b / GB)
    } else if b >= MB {
        format!("{:.2} MiB", b / MB)
    } else if b >= KB {
        format!("{:.2} KiB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Per-user directory for verbose logs and failure artifacts.
pub fn app_logs_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cloudlift").join("logs"))
}

/// Initialize a MultiProgress with the total task bar and a header spinner.
/// The header bar displays a single-line startup summary above the total
/// progress.
pub fn init_progress_and_mp(
    verbose: bool,
    total_tasks: u64,
    total_style: &ProgressStyle,
) -> (Arc<MultiProgress>, ProgressBar, ProgressBar) {
    let mp = Arc::new(if verbose {
        MultiProgress::with_draw_target(ProgressDrawTarget::stdout())
    } else {
        MultiProgress::new()
    });
    let header = mp.add(ProgressBar::new_spinner());
    header.set_style(ProgressStyle::with_template("{msg}").expect("valid header template"));
    let total_pb = mp.add(ProgressBar::new(total_tasks));
    total_pb.set_style(total_style.clone());
    (mp, total_pb, header)
}

/// Populate the startup header message above the total progress bar.
/// Fields are: Action, Worker, Dest, Type — each aligned and separated by 4 spaces.
pub fn set_startup_header(
    header: &ProgressBar,
    action: &str,
    worker_count: usize,
    destination: &str,
    resource_type: &str,
) {
    let dest = if destination.is_empty() { "/" } else { destination };
    let action_field = format!("{:<14}", format!("Action:{}", action));
    let conc_field = format!("{:<12}", format!("Worker:{}", worker_count));
    let dest_field = format!("{:<24}", format!("Dest:{}", dest));
    let type_field = format!("{:<12}", format!("Type:{}", resource_type));
    let header_msg = format!(
        "{}    {}    {}    {}",
        action_field.green(),
        conc_field.cyan(),
        dest_field.yellow(),
        type_field.magenta()
    );
    header.set_message(header_msg);
}

/// Print a concise summary line for a completed run.
pub fn print_summary(files_ok: u64, files_failed: u64, total_bytes: u64, elapsed_secs: f64) {
    let rate = if elapsed_secs > 0.0 { files_ok as f64 / elapsed_secs } else { 0.0 };
    println!(
        "uploaded {} file(s) ({}) in {:.2}s ({:.1} files/s) | failed: {}",
        files_ok,
        human_bytes(total_bytes),
        elapsed_secs,
        rate,
        files_failed
    );
}

/// Write per-task failures as JSON Lines. When no path is given the canonical
/// logs directory is used. Returns the path actually written, if any.
pub fn write_failures_jsonl(
    path: Option<PathBuf>,
    failures: &[(String, UploadError)],
) -> Option<PathBuf> {
    let target = match path {
        Some(p) => p,
        None => app_logs_dir()?.join("failures.jsonl"),
    };
    if let Some(parent) = target.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    // Append mode so previous runs are not clobbered
    let mut f = OpenOptions::new().create(true).append(true).open(&target).ok()?;
    let ts = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    for (name, err) in failures {
        let obj = serde_json::json!({
            "ts": ts,
            "file": name,
            "variant": err.variant(),
            "message": err.to_string(),
        });
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(f, "{}", line);
        }
    }
    Some(target)
}
