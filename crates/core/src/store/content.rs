use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;

use super::diff::{diff_documents, VersionDiff};
use super::files::{read_bytes, read_json, write_json_atomic};
use super::versions::{PruneReport, VersionInfo, VersionPruner};
use super::{CANONICAL_FILE, TEMPLATES_DIR, VERSIONS_DIR};
use crate::document::model::ContentDocument;
use crate::document::seed::seed_document;
use crate::document::validate::validate_file_component;
use crate::error::{StoreError, StoreResult};

/// Owner of the canonical content document and its version history.
///
/// Writes within one process are serialized so a snapshot always captures
/// the document the following overwrite replaces.
#[derive(Debug)]
pub struct ContentStore {
    canonical: PathBuf,
    templates_dir: PathBuf,
    versions: VersionPruner,
    write_lock: Mutex<()>,
}

impl ContentStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            canonical: root.join(CANONICAL_FILE),
            templates_dir: root.join(TEMPLATES_DIR),
            versions: VersionPruner::new(root.join(VERSIONS_DIR)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn canonical_path(&self) -> &Path {
        &self.canonical
    }

    pub fn versions(&self) -> &VersionPruner {
        &self.versions
    }

    /// Load the canonical document, seeding it on first use.
    ///
    /// Seeding takes the write lock and re-checks the file, so a concurrent
    /// save is never replaced by the seed.
    pub async fn read(&self) -> StoreResult<ContentDocument> {
        if let Some(doc) = read_json::<ContentDocument>(&self.canonical).await? {
            return Ok(doc);
        }

        let _guard = self.write_lock.lock().await;
        if let Some(doc) = read_json::<ContentDocument>(&self.canonical).await? {
            return Ok(doc);
        }

        let seed = seed_document();
        write_json_atomic(&self.canonical, &seed).await?;
        tracing::info!(path = %self.canonical.display(), "seeded default content");
        Ok(seed)
    }

    /// Snapshot the current on-disk document, then replace it with `doc`.
    ///
    /// A failed snapshot is logged and does not block the write.
    pub async fn write(&self, doc: &ContentDocument) -> StoreResult<ContentDocument> {
        let _guard = self.write_lock.lock().await;

        match self.snapshot_current().await {
            Ok(Some(filename)) => tracing::debug!(%filename, "snapshotted content"),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "failed to snapshot content before write"),
        }

        let missing = doc.missing_shell_fields();
        if !missing.is_empty() {
            tracing::warn!(?missing, "content document lacks default shell sections");
        }

        write_json_atomic(&self.canonical, doc).await?;
        tracing::info!(template = ?doc.template(), "content saved");
        Ok(doc.clone())
    }

    /// Copy the canonical file byte-for-byte into the version directory.
    async fn snapshot_current(&self) -> StoreResult<Option<String>> {
        match read_bytes(&self.canonical).await? {
            Some(bytes) => self
                .versions
                .create_snapshot(&bytes, Utc::now())
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    /// Snapshot names and times, newest first.
    pub async fn list_versions(&self) -> StoreResult<Vec<VersionInfo>> {
        self.versions.list().await
    }

    /// Contents of one snapshot.
    pub async fn read_version(&self, filename: &str) -> StoreResult<ContentDocument> {
        let path = self.versions.resolve(filename)?;
        read_json::<ContentDocument>(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("version {filename}")))
    }

    /// Make a snapshot the canonical document again.
    ///
    /// Goes through [`ContentStore::write`], so the pre-revert state is
    /// itself snapshotted.
    pub async fn revert_to(&self, filename: &str) -> StoreResult<ContentDocument> {
        let doc = self.read_version(filename).await?;
        let reverted = self.write(&doc).await?;
        tracing::info!(%filename, "reverted content to version");
        Ok(reverted)
    }

    /// Line diff between a snapshot and the current document.
    pub async fn diff_version(&self, filename: &str) -> StoreResult<VersionDiff> {
        let old = self.read_version(filename).await?;
        let current = self.read().await?;
        diff_documents(filename, &old, &current)
    }

    pub async fn prune_versions(&self, max_kept: usize) -> StoreResult<PruneReport> {
        self.versions.prune(max_kept).await
    }

    fn template_path(&self, key: &str) -> StoreResult<PathBuf> {
        let key = validate_file_component(key)?;
        Ok(self.templates_dir.join(format!("{key}.json")))
    }

    /// Content file owned by one template, if it has one.
    pub async fn read_template_content(&self, key: &str) -> StoreResult<Option<ContentDocument>> {
        let path = self.template_path(key)?;
        read_json::<ContentDocument>(&path).await
    }

    /// Replace a template's content file. Not versioned; serialized with
    /// canonical writes.
    pub async fn write_template_content(
        &self,
        key: &str,
        doc: &ContentDocument,
    ) -> StoreResult<ContentDocument> {
        let path = self.template_path(key)?;
        let _guard = self.write_lock.lock().await;
        write_json_atomic(&path, doc).await?;
        tracing::info!(template = %key, "template content saved");
        Ok(doc.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::validate::ValidationError;
    use serde_json::json;
    use std::sync::Arc;

    fn doc(value: serde_json::Value) -> ContentDocument {
        ContentDocument::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn read_seeds_missing_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());

        let seeded = store.read().await.unwrap();
        assert_eq!(seeded, seed_document());
        assert!(store.canonical_path().exists());
        assert!(store.list_versions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_surfaces_corrupt_json() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        std::fs::write(store.canonical_path(), "{ not json").unwrap();

        assert!(matches!(store.read().await, Err(StoreError::Parse { .. })));
    }

    #[tokio::test]
    async fn write_then_read_returns_same_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        let d = doc(json!({
            "metadata": {"title": "Acme"},
            "nav": {"links": []},
            "hero": {"title": "Hello", "nested": [1, {"deep": true}]},
        }));

        store.write(&d).await.unwrap();
        assert_eq!(store.read().await.unwrap(), d);
    }

    #[tokio::test]
    async fn each_write_adds_one_version() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        store.read().await.unwrap();

        store.write(&doc(json!({"n": 1}))).await.unwrap();
        assert_eq!(store.list_versions().await.unwrap().len(), 1);

        store.write(&doc(json!({"n": 2}))).await.unwrap();
        assert_eq!(store.list_versions().await.unwrap().len(), 2);

        let newest = &store.list_versions().await.unwrap()[0];
        assert_eq!(
            store.read_version(&newest.filename).await.unwrap(),
            doc(json!({"n": 1}))
        );
    }

    #[tokio::test]
    async fn first_write_without_canonical_makes_no_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        store.write(&doc(json!({"n": 1}))).await.unwrap();
        assert!(store.list_versions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn snapshot_failure_does_not_block_write() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        store.write(&doc(json!({"n": 1}))).await.unwrap();
        // A plain file where the version directory should be.
        std::fs::write(store.versions().dir(), "blocked").unwrap();

        store.write(&doc(json!({"n": 2}))).await.unwrap();
        assert_eq!(store.read().await.unwrap(), doc(json!({"n": 2})));
    }

    #[tokio::test]
    async fn revert_restores_version_and_snapshots_current() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        let v1 = doc(json!({"hero": {"title": "one"}}));
        let v2 = doc(json!({"hero": {"title": "two"}}));
        store.write(&v1).await.unwrap();
        store.write(&v2).await.unwrap();

        let versions = store.list_versions().await.unwrap();
        assert_eq!(versions.len(), 1);
        let target = versions[0].filename.clone();

        let reverted = store.revert_to(&target).await.unwrap();
        assert_eq!(reverted, v1);
        assert_eq!(store.read().await.unwrap(), v1);

        let versions = store.list_versions().await.unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(store.read_version(&versions[0].filename).await.unwrap(), v2);
    }

    #[tokio::test]
    async fn revert_validates_before_touching_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());

        assert!(matches!(
            store.revert_to("../content.json").await,
            Err(StoreError::Validation(ValidationError::UnsafeName(_)))
        ));
        assert!(matches!(
            store
                .revert_to("content-2026-01-01T00-00-00.000000000Z.json")
                .await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn diff_against_current() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        store.write(&doc(json!({"hero": "old"}))).await.unwrap();
        store.write(&doc(json!({"hero": "new"}))).await.unwrap();

        let filename = store.list_versions().await.unwrap()[0].filename.clone();
        let diff = store.diff_version(&filename).await.unwrap();
        assert!(diff.changes.iter().any(|c| c.tag == "delete" && c.text.contains("old")));
        assert!(diff.changes.iter().any(|c| c.tag == "insert" && c.text.contains("new")));
    }

    #[tokio::test]
    async fn template_content_is_separate_and_unversioned() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path());
        assert_eq!(store.read_template_content("editorial").await.unwrap(), None);

        let scoped = doc(json!({"hero": {"title": "Editorial"}}));
        store.write_template_content("editorial", &scoped).await.unwrap();
        assert_eq!(
            store.read_template_content("editorial").await.unwrap(),
            Some(scoped)
        );
        assert!(store.list_versions().await.unwrap().is_empty());
        assert!(store.read_template_content("../content").await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_reads_never_clobber_a_write() {
        for _ in 0..50 {
            let tmp = tempfile::tempdir().unwrap();
            let store = Arc::new(ContentStore::new(tmp.path()));
            let mine = doc(json!({"mine": true}));

            let mut readers = Vec::new();
            for _ in 0..8 {
                let store = Arc::clone(&store);
                readers.push(tokio::spawn(async move { store.read().await }));
            }
            let writer = {
                let store = Arc::clone(&store);
                let mine = mine.clone();
                tokio::spawn(async move { store.write(&mine).await })
            };

            for reader in readers {
                reader.await.unwrap().unwrap();
            }
            writer.await.unwrap().unwrap();
            assert_eq!(store.read().await.unwrap(), mine);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_template_writes_last_one_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(ContentStore::new(tmp.path()));

        let mut writers = Vec::new();
        for n in 0..6 {
            let store = Arc::clone(&store);
            writers.push(tokio::spawn(async move {
                store
                    .write_template_content("launch", &doc(json!({ "n": n })))
                    .await
            }));
        }
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let stored = store.read_template_content("launch").await.unwrap().unwrap();
        assert!(serde_json::to_value(&stored).unwrap()["n"].is_number());
    }
}
