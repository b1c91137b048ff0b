use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::config::Credentials;
use crate::error::UploadError;
use crate::remote::{RemoteStore, UploadOptions, UploadReceipt};

/// Cloudinary implementation of the remote store: signed multipart uploads
/// against the v1_1 upload endpoint. The client is configured once, before
/// any worker starts, and shared read-only across threads.
pub struct CloudinaryClient {
    creds: Credentials,
    http: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    bytes: u64,
}

impl CloudinaryClient {
    pub fn new(creds: Credentials) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UploadError::RemoteInit(e.to_string()))?;
        Ok(Self { creds, http })
    }

    fn endpoint(&self, resource_type: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/upload",
            self.creds.cloud_name, resource_type
        )
    }

    // Request signing: the key=value pairs sorted by key and joined with '&',
    // the API secret appended, hashed with SHA-1 and hex-encoded. `file`,
    // `api_key` and the resource type are never part of the signed string.
    fn sign(params: &[(String, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(String, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let joined =
            sorted.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join("&");
        let mut hasher = Sha1::new();
        hasher.update(joined.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn signed_params(
        &self,
        folder: &str,
        options: &UploadOptions,
    ) -> Result<Vec<(String, String)>, UploadError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| UploadError::OperationFailed(format!("system clock: {}", e)))?
            .as_secs();
        let mut params: Vec<(String, String)> = vec![
            ("timestamp".to_string(), timestamp.to_string()),
            ("use_filename".to_string(), options.use_filename.to_string()),
            ("unique_filename".to_string(), options.unique_filename.to_string()),
        ];
        // empty folder means the remote root; the field is omitted entirely
        if !folder.is_empty() {
            params.push(("folder".to_string(), folder.to_string()));
        }
        if !options.tags.is_empty() {
            params.push(("tags".to_string(), options.tags.join(",")));
        }
        for (k, v) in &options.extra {
            params.push((k.clone(), v.clone()));
        }
        Ok(params)
    }
}

impl RemoteStore for CloudinaryClient {
    fn upload(
        &self,
        source: &Path,
        folder: &str,
        filename: &str,
        options: &UploadOptions,
    ) -> Result<UploadReceipt, UploadError> {
        let params = self.signed_params(folder, options)?;
        let signature = Self::sign(&params, &self.creds.api_secret);

        let mut form = reqwest::blocking::multipart::Form::new();
        for (k, v) in &params {
            form = form.text(k.clone(), v.clone());
        }
        let form = form
            .text("api_key", self.creds.api_key.clone())
            .text("signature", signature)
            .file("file", source)
            .map_err(|e| {
                UploadError::UploadFailed(
                    filename.to_string(),
                    format!("failed to open {}: {}", source.display(), e),
                )
            })?;

        let resp = self
            .http
            .post(self.endpoint(options.resource_type.as_str()))
            .multipart(form)
            .send()
            .map_err(|e| UploadError::UploadFailed(filename.to_string(), e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(UploadError::UploadFailed(
                filename.to_string(),
                format!("HTTP {}: {}", status, body),
            ));
        }
        let parsed: UploadResponse = resp
            .json()
            .map_err(|e| UploadError::UploadFailed(filename.to_string(), e.to_string()))?;
        tracing::debug!("uploaded {} as {}", filename, parsed.public_id);
        Ok(UploadReceipt {
            public_id: parsed.public_id,
            url: parsed.secure_url,
            bytes: parsed.bytes,
        })
    }

    fn create_folder(&self, path: &str) -> Result<(), UploadError> {
        // Cloudinary creates folders implicitly on the first upload into them.
        tracing::debug!("create_folder (implicit on upload): {}", path);
        Ok(())
    }
}
