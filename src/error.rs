/// Repository-wide structured errors for configuration resolution and
/// upload execution, useful to represent programmatically instead of
/// ad-hoc formatted strings.
#[derive(Debug, Clone)]
pub enum UploadError {
    /// Configuration source was named (or defaulted) but does not exist
    ConfigNotFound(std::path::PathBuf),
    /// Configuration source exists but is not a valid profile mapping
    ConfigParse(std::path::PathBuf, String),
    /// The requested profile key is absent from the profile mapping
    ProfileNotFound(String),
    /// No profile resolved and the explicit credential flags are incomplete
    MissingCredentials(String),
    /// The source root is missing or not a directory
    SourceNotDir(std::path::PathBuf),
    /// Filesystem walk failed (unreadable directory etc.); fatal
    Walk(std::path::PathBuf, String),
    /// Remote-service client could not be constructed
    RemoteInit(String),
    /// One task's upload failed: destination filename plus the cause
    UploadFailed(String, String),
    // generic
    OperationFailed(String),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use UploadError::*;
        match self {
            ConfigNotFound(p) => write!(f, "configuration file not found: {}", p.display()),
            ConfigParse(p, msg) => {
                write!(f, "failed to parse configuration {}: {}", p.display(), msg)
            }
            ProfileNotFound(name) => write!(f, "profile '{}' not found in configuration", name),
            MissingCredentials(what) => write!(f, "missing credentials: {}", what),
            SourceNotDir(p) => write!(f, "source must exist and be a directory: {}", p.display()),
            Walk(p, msg) => write!(f, "failed to walk {}: {}", p.display(), msg),
            RemoteInit(msg) => write!(f, "failed to initialize remote client: {}", msg),
            UploadFailed(name, msg) => write!(f, "upload failed: {} — {}", name, msg),
            OperationFailed(msg) => write!(f, "operation failed: {}", msg),
        }
    }
}

impl std::error::Error for UploadError {}

impl UploadError {
    /// Short stable variant tag used by the JSONL failure writer.
    pub fn variant(&self) -> &'static str {
        use UploadError::*;
        match self {
            ConfigNotFound(_) => "ConfigNotFound",
            ConfigParse(_, _) => "ConfigParse",
            ProfileNotFound(_) => "ProfileNotFound",
            MissingCredentials(_) => "MissingCredentials",
            SourceNotDir(_) => "SourceNotDir",
            Walk(_, _) => "Walk",
            RemoteInit(_) => "RemoteInit",
            UploadFailed(_, _) => "UploadFailed",
            OperationFailed(_) => "OperationFailed",
        }
    }

    /// Whether this error terminates the run. Configuration and walk
    /// problems are fatal before dispatch; a single task's upload failure
    /// is isolated into the collected results and never halts the pool.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, UploadError::UploadFailed(_, _))
    }
}
