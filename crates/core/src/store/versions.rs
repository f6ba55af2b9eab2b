use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::files::{ensure_dir, remove_if_exists};
use crate::document::validate::{validate_file_component, ValidationError};
use crate::error::{StoreError, StoreResult};

/// Number of snapshots kept when no retention is configured.
pub const DEFAULT_MAX_VERSIONS: usize = 10;

const VERSION_PREFIX: &str = "content-";
const VERSION_SUFFIX: &str = "Z.json";
/// Fixed-width UTC timestamp: lexicographic order is chronological order.
const VERSION_TS_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.9f";

/// Listing entry for one snapshot. Built from the file name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a retention pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneReport {
    pub deleted_count: usize,
    pub kept_count: usize,
}

/// Snapshot file name for a point in time.
pub fn version_filename(at: DateTime<Utc>) -> String {
    format!(
        "{VERSION_PREFIX}{}{VERSION_SUFFIX}",
        at.format(VERSION_TS_FORMAT)
    )
}

/// Timestamp embedded in a snapshot file name, or `None` for foreign files.
pub fn parse_version_filename(name: &str) -> Option<DateTime<Utc>> {
    let ts = name
        .strip_prefix(VERSION_PREFIX)?
        .strip_suffix(VERSION_SUFFIX)?;
    NaiveDateTime::parse_from_str(ts, VERSION_TS_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Owns the snapshot directory: creates, lists, resolves and prunes versions.
#[derive(Debug, Clone)]
pub struct VersionPruner {
    dir: PathBuf,
}

impl VersionPruner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a caller-supplied file name to a path inside the snapshot
    /// directory. Rejects anything that is not a snapshot name before
    /// touching the filesystem.
    pub fn resolve(&self, filename: &str) -> StoreResult<PathBuf> {
        let name = validate_file_component(filename)?;
        if parse_version_filename(name).is_none() {
            return Err(ValidationError::NotAVersion(name.to_string()).into());
        }
        Ok(self.dir.join(name))
    }

    /// All snapshots, newest first.
    pub async fn list(&self) -> StoreResult<Vec<VersionInfo>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut versions = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            if let Some(created_at) = parse_version_filename(&filename) {
                versions.push(VersionInfo {
                    filename,
                    created_at,
                });
            }
        }

        versions.sort_by(|a, b| b.filename.cmp(&a.filename));
        Ok(versions)
    }

    /// Write `bytes` as a new snapshot stamped `at`.
    ///
    /// Names are claimed with `create_new`; on collision the timestamp moves
    /// forward one nanosecond, so every call adds exactly one file.
    pub async fn create_snapshot(&self, bytes: &[u8], at: DateTime<Utc>) -> StoreResult<String> {
        ensure_dir(&self.dir).await?;

        let mut at = at;
        loop {
            let filename = version_filename(at);
            let path = self.dir.join(&filename);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes)
                        .await
                        .map_err(|e| StoreError::io(&path, e))?;
                    file.flush().await.map_err(|e| StoreError::io(&path, e))?;
                    return Ok(filename);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    at += Duration::nanoseconds(1);
                }
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        }
    }

    /// Delete every snapshot beyond the `max_kept` newest.
    pub async fn prune(&self, max_kept: usize) -> StoreResult<PruneReport> {
        let versions = self.list().await?;
        let mut deleted_count = 0;
        for version in versions.iter().skip(max_kept) {
            if remove_if_exists(&self.dir.join(&version.filename)).await? {
                deleted_count += 1;
            }
        }
        let kept_count = versions.len().min(max_kept);

        if deleted_count > 0 {
            tracing::info!(deleted_count, kept_count, "pruned content versions");
        }
        Ok(PruneReport {
            deleted_count,
            kept_count,
        })
    }
}
