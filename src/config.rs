use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::UploadError;

/// Configuration source looked up when `--config` is omitted.
pub const DEFAULT_CONFIG_NAME: &str = "cloudinary.yaml";
pub const DEFAULT_PROFILE: &str = "default";

/// One named credential triple inside the configuration source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Credential fields passed explicitly on the command line. Only consulted
/// when no configuration source resolves.
#[derive(Debug, Clone, Default)]
pub struct ExplicitCredentials {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

type ProfileMap = BTreeMap<String, Credentials>;

/// Load the profile mapping from a YAML source. A missing file is a fatal
/// structured error, not a fallback.
pub fn load_profiles(path: &Path) -> Result<ProfileMap> {
    if !path.exists() {
        return Err(UploadError::ConfigNotFound(path.to_path_buf()).into());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    let profiles: ProfileMap = serde_yaml::from_str(&text)
        .map_err(|e| UploadError::ConfigParse(path.to_path_buf(), e.to_string()))?;
    Ok(profiles)
}

// Default source lookup: ./cloudinary.yaml first, then the per-user config
// directory. Returns None when neither exists.
fn default_config_path() -> Option<PathBuf> {
    let cwd = PathBuf::from(DEFAULT_CONFIG_NAME);
    if cwd.exists() {
        return Some(cwd);
    }
    if let Some(home) = dirs::home_dir() {
        let p = home.join(".cloudlift").join(DEFAULT_CONFIG_NAME);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

/// Resolve the single credential triple for this run.
///
/// When a configuration source is supplied (or the default source name
/// resolves), the named profile must exist in it; a resolved profile wins
/// wholesale over the explicit flags. Only when no source resolves are the
/// explicit flags used, and then all three fields are required.
pub fn resolve_credentials(
    config: Option<&Path>,
    profile: Option<&str>,
    explicit: ExplicitCredentials,
) -> Result<Credentials> {
    let source = match config {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };
    resolve_from_source(source, profile, explicit)
}

fn resolve_from_source(
    source: Option<PathBuf>,
    profile: Option<&str>,
    explicit: ExplicitCredentials,
) -> Result<Credentials> {
    if let Some(path) = source {
        let profiles = load_profiles(&path)?;
        let name = profile.unwrap_or(DEFAULT_PROFILE);
        tracing::debug!("resolving profile '{}' from {}", name, path.display());
        return profiles
            .get(name)
            .cloned()
            .ok_or_else(|| UploadError::ProfileNotFound(name.to_string()).into());
    }

    match (explicit.cloud_name, explicit.api_key, explicit.api_secret) {
        (Some(cloud_name), Some(api_key), Some(api_secret)) => {
            Ok(Credentials { cloud_name, api_key, api_secret })
        }
        _ => Err(UploadError::MissingCredentials(
            "cloud_name, api_key and api_secret are all required when no profile resolves"
                .to_string(),
        )
        .into()),
    }
}
