//! Mirroring of remote images to deterministic local paths

use crate::error::{MirrorError, Result};
use crate::types::ImageKind;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use sha1::{Digest, Sha1};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

/// Per-download timeout, matching the API client's timeout discipline.
const DOWNLOAD_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);

/// Mirrors remote images into a local directory.
///
/// The local path for a URL is `<filedir>/<sha1(url)><ext>`, recomputed
/// deterministically on every call. A mirrored file counts as fresh while
/// its creation time falls inside the TTL window measured from `runtime`,
/// which is fixed at construction so a single render pass sees a
/// consistent notion of "now".
pub struct FileMirror {
    /// Root directory the public file tree is served from.
    files_root: PathBuf,
    /// Subdirectory for mirrored files, also the prefix of returned paths.
    filedir: String,
    /// Freshness window in seconds.
    ttl_secs: u64,
    /// Reference time for freshness checks.
    runtime: DateTime<Utc>,
    client: Client,
}

impl FileMirror {
    pub fn new(
        files_root: PathBuf,
        filedir: impl Into<String>,
        ttl_secs: u64,
        runtime: DateTime<Utc>,
    ) -> Self {
        Self {
            files_root,
            filedir: filedir.into(),
            ttl_secs,
            runtime,
            client: Client::new(),
        }
    }

    /// Mirror a remote image, returning the local relative path.
    ///
    /// Never fails: on any error (unrecognized format, unwritable
    /// directory, download failure) the original URL is returned
    /// unchanged so downstream rendering always has a usable value.
    pub async fn mirror(&self, url: &str) -> String {
        let stem = hex::encode(Sha1::digest(url.as_bytes()));

        if let Some(local) = self.fresh_local(&stem).await {
            debug!(url, local = %local, "mirror hit, local copy is fresh");
            return local;
        }

        match self.download_and_store(url, &stem).await {
            Ok(local) => {
                info!(url, local = %local, "mirrored remote file");
                local
            }
            Err(MirrorError::UnsupportedFormat) => {
                warn!(url, "remote file has an invalid format");
                url.to_string()
            }
            Err(e) => {
                warn!(url, error = %e, "could not mirror remote file");
                url.to_string()
            }
        }
    }

    /// Look for an existing local copy inside the freshness window.
    async fn fresh_local(&self, stem: &str) -> Option<String> {
        let deadline = self.runtime - Duration::seconds(self.ttl_secs as i64);

        for kind in ImageKind::ALL {
            let path = self.local_path(stem, kind);
            let Ok(meta) = fs::metadata(&path).await else {
                continue;
            };
            // Creation time where the platform reports it, else mtime.
            let created = meta
                .created()
                .or_else(|_| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            if created.is_some_and(|t| t > deadline) {
                return Some(self.rel_path(stem, kind));
            }
        }
        None
    }

    async fn download_and_store(&self, url: &str, stem: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MirrorError::Status(response.status()));
        }

        let bytes = response.bytes().await?;
        let kind = ImageKind::sniff(&bytes).ok_or(MirrorError::UnsupportedFormat)?;

        let dir = self.files_root.join(&self.filedir);
        fs::create_dir_all(&dir).await?;

        // Publish atomically: a partial write must never be visible under
        // the final name.
        let path = self.local_path(stem, kind);
        let tmp = dir.join(format!("{}{}.part", stem, kind.ext()));
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;

        Ok(self.rel_path(stem, kind))
    }

    fn local_path(&self, stem: &str, kind: ImageKind) -> PathBuf {
        self.files_root
            .join(&self.filedir)
            .join(format!("{}{}", stem, kind.ext()))
    }

    fn rel_path(&self, stem: &str, kind: ImageKind) -> String {
        format!("/{}/{}{}", self.filedir, stem, kind.ext())
    }
}
