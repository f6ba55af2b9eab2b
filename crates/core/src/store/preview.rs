use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::files::{ensure_dir, read_json, remove_if_exists, write_json};
use super::PREVIEWS_DIR;
use crate::document::validate::{require_str, validate_file_component, ValidationError};
use crate::error::{StoreError, StoreResult};

/// Lifetime of a preview snapshot.
pub const PREVIEW_TTL_HOURS: i64 = 24;

/// Page used when the caller does not name one.
pub const DEFAULT_PREVIEW_PAGE: &str = "home";

/// Unpublished content an admin shares by id for review.
///
/// `content` is either a whole document or the fragment for one page, so it
/// stays an untyped value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSnapshot {
    pub content: Value,
    pub page: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PreviewSnapshot {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Preview files keyed by caller-supplied id. Independent of the canonical
/// document; expiry is only checked when a preview is read.
#[derive(Debug, Clone)]
pub struct PreviewStore {
    dir: PathBuf,
}

impl PreviewStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(PREVIEWS_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, preview_id: &str) -> StoreResult<PathBuf> {
        let id = require_str(Some(preview_id), "previewId")?;
        let id = validate_file_component(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }

    pub async fn create(
        &self,
        preview_id: &str,
        content: Value,
        page: Option<&str>,
    ) -> StoreResult<PreviewSnapshot> {
        self.create_at(preview_id, content, page, Utc::now()).await
    }

    /// Store a preview stamped with `now`. Re-using an id replaces the old
    /// preview.
    pub async fn create_at(
        &self,
        preview_id: &str,
        content: Value,
        page: Option<&str>,
        now: DateTime<Utc>,
    ) -> StoreResult<PreviewSnapshot> {
        let path = self.path_for(preview_id)?;
        if content.is_null() {
            return Err(ValidationError::MissingField("content").into());
        }

        ensure_dir(&self.dir).await?;
        let snapshot = PreviewSnapshot {
            content,
            page: page
                .filter(|p| !p.is_empty())
                .unwrap_or(DEFAULT_PREVIEW_PAGE)
                .to_string(),
            created_at: now,
            expires_at: now + Duration::hours(PREVIEW_TTL_HOURS),
        };
        write_json(&path, &snapshot).await?;

        tracing::info!(
            preview_id,
            page = %snapshot.page,
            expires_at = %snapshot.expires_at,
            "preview created"
        );
        Ok(snapshot)
    }

    pub async fn read(&self, preview_id: &str) -> StoreResult<PreviewSnapshot> {
        self.read_at(preview_id, Utc::now()).await
    }

    /// Load a preview as seen at `now`. An expired preview is deleted and
    /// reported as [`StoreError::Expired`].
    pub async fn read_at(&self, preview_id: &str, now: DateTime<Utc>) -> StoreResult<PreviewSnapshot> {
        let path = self.path_for(preview_id)?;
        let snapshot = read_json::<PreviewSnapshot>(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("preview {preview_id}")))?;

        if snapshot.is_expired_at(now) {
            if let Err(err) = remove_if_exists(&path).await {
                tracing::debug!(preview_id, error = %err, "failed to remove expired preview");
            }
            tracing::info!(preview_id, "preview expired");
            return Err(StoreError::Expired(preview_id.to_string()));
        }
        Ok(snapshot)
    }

    /// Remove a preview. Missing previews are not an error.
    pub async fn delete(&self, preview_id: &str) -> StoreResult<()> {
        let path = self.path_for(preview_id)?;
        if remove_if_exists(&path).await? {
            tracing::info!(preview_id, "preview deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_sets_24h_expiry() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(tmp.path());
        let now = Utc::now();

        let snap = store
            .create_at("p1", json!({"ok": true}), Some("home"), now)
            .await
            .unwrap();
        assert_eq!(snap.created_at, now);
        assert_eq!(snap.expires_at - snap.created_at, Duration::hours(24));
        assert!(store.dir().join("p1.json").exists());
    }

    #[tokio::test]
    async fn create_requires_id_and_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(tmp.path());

        assert!(matches!(
            store.create("", json!({"ok": true}), None).await,
            Err(StoreError::Validation(ValidationError::MissingField("previewId")))
        ));
        assert!(matches!(
            store.create("p1", Value::Null, None).await,
            Err(StoreError::Validation(ValidationError::MissingField("content")))
        ));
        assert!(matches!(
            store.create("../escape", json!({}), None).await,
            Err(StoreError::Validation(ValidationError::UnsafeName(_)))
        ));
        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn page_defaults_to_home() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(tmp.path());
        let snap = store.create("p1", json!({}), None).await.unwrap();
        assert_eq!(snap.page, DEFAULT_PREVIEW_PAGE);
    }

    #[tokio::test]
    async fn read_before_expiry_returns_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(tmp.path());
        let now = Utc::now();
        let content = json!({"hero": {"title": "Draft"}});
        store
            .create_at("p1", content.clone(), Some("about"), now)
            .await
            .unwrap();

        let snap = store
            .read_at("p1", now + Duration::hours(23))
            .await
            .unwrap();
        assert_eq!(snap.content, content);
        assert_eq!(snap.page, "about");
    }

    #[tokio::test]
    async fn expired_preview_is_removed_on_read() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(tmp.path());
        let now = Utc::now();
        store
            .create_at("p1", json!({"ok": true}), None, now)
            .await
            .unwrap();

        let later = now + Duration::hours(24) + Duration::seconds(1);
        assert!(matches!(
            store.read_at("p1", later).await,
            Err(StoreError::Expired(_))
        ));
        assert!(!store.dir().join("p1.json").exists());
        assert!(matches!(
            store.read_at("p1", later).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn read_and_delete_reject_unsafe_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(tmp.path());
        std::fs::write(tmp.path().join("secret.json"), "{}").unwrap();

        assert!(matches!(
            store.read("../secret").await,
            Err(StoreError::Validation(ValidationError::UnsafeName(_)))
        ));
        assert!(matches!(
            store.delete("../secret").await,
            Err(StoreError::Validation(ValidationError::UnsafeName(_)))
        ));
        assert!(tmp.path().join("secret.json").exists());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(tmp.path());
        store.create("p1", json!({}), None).await.unwrap();

        store.delete("p1").await.unwrap();
        store.delete("p1").await.unwrap();
        store.delete("never-existed").await.unwrap();
        assert!(matches!(store.read("p1").await, Err(StoreError::NotFound(_))));
    }
}
