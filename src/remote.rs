use std::collections::BTreeMap;
use std::path::Path;

use crate::error::UploadError;

/// Tags applied to every upload when the caller supplies none.
pub const DEFAULT_TAGS: &[&str] = &["gis"];

/// Classification controlling whether the remote service transforms the
/// uploaded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResourceType {
    Image,
    Raw,
    Video,
    Auto,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Raw => "raw",
            ResourceType::Video => "video",
            ResourceType::Auto => "auto",
        }
    }
}

impl Default for ResourceType {
    fn default() -> Self {
        ResourceType::Auto
    }
}

/// Run-wide upload options forwarded verbatim to the remote capability.
/// `extra` carries free-form pass-through keys; the scheduler performs no
/// validation of option values beyond what the remote service enforces.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    pub use_filename: bool,
    pub unique_filename: bool,
    pub tags: Vec<String>,
    pub resource_type: ResourceType,
    pub extra: BTreeMap<String, String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            use_filename: true,
            unique_filename: false,
            tags: DEFAULT_TAGS.iter().map(|s| s.to_string()).collect(),
            resource_type: ResourceType::Auto,
            extra: BTreeMap::new(),
        }
    }
}

/// Success descriptor returned by the remote capability for one file.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub public_id: String,
    pub url: String,
    pub bytes: u64,
}

/// The opaque remote object-storage capability. One implementation talks to
/// Cloudinary over HTTP; tests substitute in-memory stores.
pub trait RemoteStore: Send + Sync {
    /// Upload `source` into `folder` under `filename`. Blocking network
    /// call; invoked concurrently from worker threads.
    fn upload(
        &self,
        source: &Path,
        folder: &str,
        filename: &str,
        options: &UploadOptions,
    ) -> Result<UploadReceipt, UploadError>;

    /// Signal that `path` should exist remotely. The reference service
    /// creates folders implicitly on first upload, so implementations may
    /// treat this as a no-op.
    fn create_folder(&self, path: &str) -> Result<(), UploadError>;
}
