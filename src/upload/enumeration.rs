use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::error::UploadError;
use crate::exclude::ExcludeSet;
use crate::remote::UploadOptions;

/// One file's upload instruction. Created during enumeration, consumed
/// exactly once by a worker, never mutated after creation.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub source_path: PathBuf,
    pub destination_filename: String,
    pub destination_folder: String,
    pub options: UploadOptions,
}

/// The fully-enumerated plan for one run: the ordered task list plus the
/// remote folders to signal ahead of dispatch.
#[derive(Debug, Clone, Default)]
pub struct TreePlan {
    pub tasks: Vec<UploadTask>,
    pub folders: Vec<String>,
}

/// Join a destination base folder with a walk-relative sub-path.
/// `.` (and the empty string) are the "at the root" sentinels: the base is
/// returned as-is, never `base/.`.
pub fn join_destination(base: &str, rel: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = rel.replace('\\', "/");
    let rel = rel.trim_matches('/');
    if rel.is_empty() || rel == "." {
        return base.to_string();
    }
    if base.is_empty() { rel.to_string() } else { format!("{}/{}", base, rel) }
}

/// Walk `source_root` and produce the upload plan. Single-threaded and
/// fully synchronous; the caller dispatches nothing until this returns.
///
/// An excluded directory basename prunes its whole subtree; an excluded
/// filename suppresses only that task. Within a directory, files are ordered
/// before subdirectories so a folder's tasks are emitted before any of its
/// subtrees are entered. Files land flat in their directory's destination
/// folder under their bare filename.
pub fn enumerate_tree(
    source_root: &Path,
    excludes: &ExcludeSet,
    destination_base: &str,
    options: &UploadOptions,
) -> Result<TreePlan> {
    if !source_root.is_dir() {
        return Err(UploadError::SourceNotDir(source_root.to_path_buf()).into());
    }
    let mut plan = TreePlan::default();
    let excludes = excludes.clone();
    let walker = WalkDir::new(source_root)
        .sort_by(|a, b| {
            let a_dir = a.file_type().is_dir();
            let b_dir = b.file_type().is_dir();
            a_dir.cmp(&b_dir).then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        // the root itself is always processed; exclusion applies to entries below it
        .filter_entry(move |e| {
            e.depth() == 0 || !excludes.excludes(&e.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(source_root).to_path_buf();
            UploadError::Walk(at, e.to_string())
        })?;
        let rel = entry.path().strip_prefix(source_root).unwrap_or(entry.path());
        if entry.file_type().is_dir() {
            if entry.depth() == 0 {
                continue;
            }
            let rel_str = rel.to_string_lossy();
            plan.folders.push(join_destination(destination_base, &rel_str));
        } else if entry.file_type().is_file() {
            let parent_rel =
                rel.parent().map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();
            plan.tasks.push(UploadTask {
                source_path: entry.path().to_path_buf(),
                destination_filename: entry.file_name().to_string_lossy().into_owned(),
                destination_folder: join_destination(destination_base, &parent_rel),
                options: options.clone(),
            });
        }
    }
    Ok(plan)
}
