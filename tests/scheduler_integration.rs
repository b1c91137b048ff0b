use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cloudlift::error::UploadError;
use cloudlift::exclude::ExcludeSet;
use cloudlift::remote::{RemoteStore, UploadOptions, UploadReceipt};
use cloudlift::upload::{HandleUploadArgs, handle_upload};

// In-memory store that tracks the concurrent-upload high-water mark and can
// fail a single named file to exercise failure isolation.
struct MockStore {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    folders: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl MockStore {
    fn new(fail_on: Option<&str>) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            folders: Mutex::new(Vec::new()),
            fail_on: fail_on.map(|s| s.to_string()),
        }
    }
}

impl RemoteStore for MockStore {
    fn upload(
        &self,
        source: &Path,
        folder: &str,
        filename: &str,
        _options: &UploadOptions,
    ) -> Result<UploadReceipt, UploadError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // hold the slot long enough for siblings to pile up
        std::thread::sleep(Duration::from_millis(25));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.as_deref() == Some(filename) {
            return Err(UploadError::UploadFailed(
                filename.to_string(),
                "simulated upload failure".to_string(),
            ));
        }
        let bytes = std::fs::metadata(source).map(|m| m.len()).unwrap_or(0);
        let public_id = if folder.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", folder, filename)
        };
        Ok(UploadReceipt {
            url: format!("https://res.example.com/{}", public_id),
            public_id,
            bytes,
        })
    }

    fn create_folder(&self, path: &str) -> Result<(), UploadError> {
        self.folders.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

fn scratch_tree(label: &str, files: &[&str]) -> PathBuf {
    let mut root = std::env::temp_dir();
    root.push(format!("cloudlift_sched_{}_{}", label, std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).expect("create scratch tree");
    for f in files {
        let path = root.join(f);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, f.as_bytes()).expect("write scratch file");
    }
    root
}

fn args_for(root: &Path, workers: usize) -> HandleUploadArgs {
    HandleUploadArgs {
        base_folder: root.to_path_buf(),
        destination_folder: "mirror".to_string(),
        excludes: ExcludeSet::default(),
        options: UploadOptions::default(),
        workers,
        verbose: false,
        json: false,
        quiet: true,
    }
}

#[test]
fn pool_bounds_inflight_uploads_and_counter_completes() {
    let files: Vec<String> = (0..10).map(|i| format!("f{:02}.bin", i)).collect();
    let file_refs: Vec<&str> = files.iter().map(|s| s.as_str()).collect();
    let root = scratch_tree("bound", &file_refs);

    let store = Arc::new(MockStore::new(None));
    let report = handle_upload(args_for(&root, 3), store.clone()).expect("run");

    assert_eq!(report.total, 10);
    assert_eq!(report.completed, 10);
    assert_eq!(report.succeeded, 10);
    assert!(report.failed.is_empty());
    let peak = store.max_in_flight.load(Ordering::SeqCst);
    assert!(peak <= 3, "at most 3 uploads may be in flight, saw {}", peak);
    assert!(peak >= 2, "expected genuine concurrency, saw peak {}", peak);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn one_failing_task_does_not_halt_the_pool() {
    let root = scratch_tree("isolate", &["a.txt", "b.txt", "bad.txt", "c.txt", "d.txt"]);

    let store = Arc::new(MockStore::new(Some("bad.txt")));
    let report = handle_upload(args_for(&root, 2), store).expect("run returns Ok");

    assert_eq!(report.total, 5);
    assert_eq!(report.completed, 5, "counter reaches total even with a failure");
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "bad.txt");
    assert!(matches!(report.failed[0].1, UploadError::UploadFailed(_, _)));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn folder_signals_precede_dispatch_and_cover_subdirs() {
    let root = scratch_tree("folders", &["top.txt", "sub/one.txt", "sub/deep/two.txt"]);

    let store = Arc::new(MockStore::new(None));
    let report = handle_upload(args_for(&root, 2), store.clone()).expect("run");

    assert_eq!(report.succeeded, 3);
    let mut folders = store.folders.lock().unwrap().clone();
    folders.sort();
    assert_eq!(folders, vec!["mirror/sub".to_string(), "mirror/sub/deep".to_string()]);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn empty_tree_yields_an_empty_report() {
    let root = scratch_tree("empty", &[]);

    let store = Arc::new(MockStore::new(None));
    let report = handle_upload(args_for(&root, 4), store).expect("run");

    assert_eq!(report.total, 0);
    assert_eq!(report.completed, 0);
    assert!(report.failed.is_empty());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn missing_source_root_is_fatal() {
    let mut root = std::env::temp_dir();
    root.push(format!("cloudlift_sched_missing_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);

    let store = Arc::new(MockStore::new(None));
    let err = handle_upload(args_for(&root, 2), store).expect_err("missing root");
    assert!(matches!(err.downcast_ref::<UploadError>(), Some(UploadError::SourceNotDir(_))));
}
