use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Read a file, mapping "not found" to `None`.
pub(crate) async fn read_bytes(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Read and deserialize a JSON file, mapping "not found" to `None`.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    match read_bytes(path).await? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::parse(path, e)),
        None => Ok(None),
    }
}

pub(crate) async fn ensure_dir(path: &Path) -> StoreResult<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

/// Serialize `value` and write it in place.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body)
        .await
        .map_err(|e| StoreError::io(path, e))
}

/// Sibling temp path unique to one write, so concurrent writers never share it.
fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()))
}

/// Serialize `value` to a sibling temp file, then rename it over `path`.
/// Concurrent writers each rename their own file; the last rename wins.
pub(crate) async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let body = serde_json::to_vec_pretty(value)?;
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, body)
        .await
        .map_err(|e| StoreError::io(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

/// Remove a file. Returns `false` if it was already gone.
pub(crate) async fn remove_if_exists(path: &Path) -> StoreResult<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
