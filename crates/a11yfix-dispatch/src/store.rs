//! Object-storage side of delivery: ensure a source snapshot exists in
//! the bucket and hand back its key.

use std::path::Path;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::DispatchError;
use crate::snapshot::{create_archive, SNAPSHOT_PREFIX};

/// How the snapshot for a run is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotPolicy {
    /// Reuse the most recent snapshot for this repo, building a fresh one
    /// only when none exists.
    Auto,
    /// Always build and upload a fresh snapshot.
    ForceUpload,
    /// Use the named archive already in the bucket; fatal when absent.
    Named(String),
}

/// Thin wrapper over the S3 client scoped to one bucket.
pub struct SnapshotStore {
    s3: aws_sdk_s3::Client,
    bucket: String,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(s3: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            s3,
            bucket: bucket.into(),
        }
    }

    /// Builds the S3 client from the shared SDK configuration.
    #[must_use]
    pub fn from_sdk_config(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self::new(aws_sdk_s3::Client::new(config), bucket)
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Checks whether `key` exists in the bucket.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] on any failure other than a
    /// plain 404.
    pub async fn exists(&self, key: &str) -> Result<bool, DispatchError> {
        match self
            .s3
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(DispatchError::Store(
                        DisplayErrorContext(&service_err).to_string(),
                    ))
                }
            }
        }
    }

    /// Returns the most recently modified key under `prefix`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] when the listing fails.
    pub async fn latest_with_prefix(&self, prefix: &str) -> Result<Option<String>, DispatchError> {
        let output = self
            .s3
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| DispatchError::Store(DisplayErrorContext(&e).to_string()))?;

        let latest = output
            .contents()
            .iter()
            .max_by(|a, b| {
                a.last_modified()
                    .partial_cmp(&b.last_modified())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .and_then(|object| object.key())
            .map(str::to_owned);
        Ok(latest)
    }

    /// Lists up to `limit` keys under `prefix`, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] when the listing fails.
    pub async fn list_keys(&self, prefix: &str, limit: usize) -> Result<Vec<String>, DispatchError> {
        let output = self
            .s3
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| DispatchError::Store(DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .take(limit)
            .map(str::to_owned)
            .collect())
    }

    /// Uploads the file at `path` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] when the read or upload fails.
    pub async fn upload(&self, key: &str, path: &Path) -> Result<(), DispatchError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| DispatchError::Store(e.to_string()))?;
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| DispatchError::Store(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

/// Ensures a snapshot of `repo_path` exists per `policy` and returns its
/// key. May reuse a previously produced snapshot.
///
/// # Errors
///
/// - [`DispatchError::MissingRepoPath`] when `repo_path` does not exist.
/// - [`DispatchError::ArchiveNotFound`] when a named archive is absent.
/// - [`DispatchError::Store`] / [`DispatchError::Io`] on upload or
///   packaging failures.
pub async fn ensure_snapshot(
    store: &SnapshotStore,
    repo_path: &Path,
    policy: &SnapshotPolicy,
) -> Result<String, DispatchError> {
    if !repo_path.is_dir() {
        return Err(DispatchError::MissingRepoPath(repo_path.to_path_buf()));
    }
    let repo_name = repo_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| DispatchError::MissingRepoPath(repo_path.to_path_buf()))?;

    match policy {
        SnapshotPolicy::Named(name) => {
            let key = format!("{SNAPSHOT_PREFIX}{name}");
            if store.exists(&key).await? {
                tracing::info!(key = %key, "using named snapshot");
                return Ok(key);
            }
            let available = store.list_keys(SNAPSHOT_PREFIX, 10).await.unwrap_or_default();
            tracing::warn!(
                key = %key,
                available = ?available,
                "named snapshot not found in bucket"
            );
            Err(DispatchError::ArchiveNotFound {
                bucket: store.bucket().to_owned(),
                key,
            })
        }
        SnapshotPolicy::Auto => {
            let prefix = format!("{SNAPSHOT_PREFIX}{repo_name}-");
            if let Some(key) = store.latest_with_prefix(&prefix).await? {
                tracing::info!(key = %key, "reusing existing snapshot, skipping upload");
                return Ok(key);
            }
            build_and_upload(store, repo_path, &repo_name).await
        }
        SnapshotPolicy::ForceUpload => build_and_upload(store, repo_path, &repo_name).await,
    }
}

/// Packs the repo into a temp file and uploads it under a timestamped key.
async fn build_and_upload(
    store: &SnapshotStore,
    repo_path: &Path,
    repo_name: &str,
) -> Result<String, DispatchError> {
    let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let key = format!("{SNAPSHOT_PREFIX}{repo_name}-{timestamp}.tar.gz");

    let workdir = tempfile::tempdir()?;
    let archive_path = workdir.path().join(format!("{repo_name}.tar.gz"));
    tracing::info!(repo = %repo_path.display(), "packing source snapshot");
    create_archive(repo_path, &archive_path)?;

    tracing::info!(bucket = %store.bucket(), key = %key, "uploading snapshot");
    store.upload(&key, &archive_path).await?;
    Ok(key)
}
