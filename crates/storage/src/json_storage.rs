//! JSON file snapshot store.
//!
//! Stores each snapshot as a pretty-printed JSON file under
//! `<root>/snapshots/<id>.json`. Ids are ULIDs, so file names sort by
//! creation time.

use std::path::{Path, PathBuf};
use autotune_core::SnapshotId;
use autotune_tuner::TunerSnapshot;
use super::{Result, SnapshotMeta, SnapshotStore, StorageError, StoredSnapshot};
use tokio::fs;
use tracing::{debug, info, warn};

/// File-based JSON snapshot store.
pub struct JsonSnapshotStore {
    root: PathBuf,
}

impl JsonSnapshotStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("snapshots")).await?;
        Ok(Self { root })
    }

    /// Open a store at `root` without creating anything on disk.
    ///
    /// A missing directory reads as an empty store; the first `save`
    /// creates it.
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn snapshot_path(&self, id: SnapshotId) -> PathBuf {
        self.root.join("snapshots").join(format!("{}.json", id))
    }

    async fn read_all(&self) -> Result<Vec<StoredSnapshot>> {
        let mut items: Vec<StoredSnapshot> = Vec::new();
        let mut rd = match fs::read_dir(self.root.join("snapshots")).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(items),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = rd.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match read_json(&path).await {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(StorageError::Json(e)) => {
                    warn!("Skipping unreadable snapshot {}: {}", path.display(), e);
                }
                Err(e) => return Err(e),
            }
        }
        items.sort_by_key(|s| s.meta.id);
        Ok(items)
    }
}

#[async_trait::async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn save(&mut self, snapshot: &TunerSnapshot, label: &str) -> Result<SnapshotId> {
        let stored = StoredSnapshot {
            meta: SnapshotMeta {
                id: SnapshotId::new(),
                saved_at: chrono::Utc::now(),
                label: label.to_string(),
                generation: snapshot.engine.generation,
            },
            snapshot: snapshot.clone(),
        };

        let path = self.snapshot_path(stored.meta.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&stored)?;
        fs::create_dir_all(self.root.join("snapshots")).await?;
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        info!("Saved snapshot {} (generation {})", stored.meta.id, stored.meta.generation);
        Ok(stored.meta.id)
    }

    async fn load(&self, id: SnapshotId) -> Result<Option<StoredSnapshot>> {
        read_json(&self.snapshot_path(id)).await
    }

    async fn load_latest(&self) -> Result<Option<StoredSnapshot>> {
        Ok(self.read_all().await?.pop())
    }

    async fn list(&self) -> Result<Vec<SnapshotMeta>> {
        Ok(self.read_all().await?.into_iter().map(|s| s.meta).collect())
    }

    async fn delete(&mut self, id: SnapshotId) -> Result<()> {
        match fs::remove_file(self.snapshot_path(id)).await {
            Ok(()) => {
                debug!("Deleted snapshot {}", id);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotune_tuner::{AdaptiveTuner, TaskCategory, TaskId, TaskResult, TunerConfig};

    async fn evolved_snapshot(generations: usize) -> TunerSnapshot {
        let mut config = TunerConfig::default();
        config.evolution.population_size = 6;
        config.evolution.seed = Some(21);
        let tuner = AdaptiveTuner::new(config).unwrap();

        for i in 0..8 {
            let sample = TaskResult::new(TaskId::new(), i % 2 == 0, 150.0, 64.0, 4.0);
            tuner.record_completion(sample, TaskCategory::General).await;
        }
        for _ in 0..generations {
            tuner.evolve_population().await;
        }
        tuner.snapshot().await
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSnapshotStore::new(dir.path()).await.unwrap();
        let snapshot = evolved_snapshot(2).await;

        let id = store.save(&snapshot, "nightly").await.unwrap();
        let loaded = store.load(id).await.unwrap().unwrap();

        assert_eq!(loaded.meta.id, id);
        assert_eq!(loaded.meta.label, "nightly");
        assert_eq!(loaded.meta.generation, 2);
        assert_eq!(loaded.snapshot.feedback.len(), snapshot.feedback.len());
        assert_eq!(loaded.snapshot.metrics.snapshot().total_tasks, 8);
        assert_eq!(loaded.snapshot.engine.population.len(), 6);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSnapshotStore::new(dir.path()).await.unwrap();

        assert!(store.load(SnapshotId::new()).await.unwrap().is_none());
        assert!(store.load_latest().await.unwrap().is_none());
        assert!(matches!(
            store.delete(SnapshotId::new()).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_latest_and_prune() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSnapshotStore::new(dir.path()).await.unwrap();

        let mut ids = Vec::new();
        for generations in 1..=3 {
            ids.push(store.save(&evolved_snapshot(generations).await, "run").await.unwrap());
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let latest = store.load_latest().await.unwrap().unwrap();
        assert_eq!(latest.meta.id, ids[2]);
        assert_eq!(latest.meta.generation, 3);

        assert_eq!(store.prune(1).await.unwrap(), 2);
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, ids[2]);
    }

    #[tokio::test]
    async fn test_torn_file_does_not_hide_other_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSnapshotStore::new(dir.path()).await.unwrap();
        let id = store.save(&evolved_snapshot(1).await, "good").await.unwrap();

        let torn = dir
            .path()
            .join("snapshots")
            .join(format!("{}.json", SnapshotId::new()));
        tokio::fs::write(&torn, "{\"id\": \"01H").await.unwrap();

        let latest = store.load_latest().await.unwrap().unwrap();
        assert_eq!(latest.meta.id, id);
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
    }

    #[tokio::test]
    async fn test_save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSnapshotStore::new(dir.path()).await.unwrap();
        let id = store.save(&evolved_snapshot(1).await, "run").await.unwrap();

        let mut names = Vec::new();
        let mut rd = tokio::fs::read_dir(dir.path().join("snapshots")).await.unwrap();
        while let Some(entry) = rd.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec![format!("{}.json", id)]);
    }

    #[tokio::test]
    async fn test_open_does_not_create_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("state");
        let mut store = JsonSnapshotStore::open(&root);

        assert!(store.list().await.unwrap().is_empty());
        assert!(store.load_latest().await.unwrap().is_none());
        assert!(!root.exists());

        store.save(&evolved_snapshot(1).await, "first").await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restored_tuner_continues_from_stored_generation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSnapshotStore::new(dir.path()).await.unwrap();
        store.save(&evolved_snapshot(4).await, "checkpoint").await.unwrap();

        let mut config = TunerConfig::default();
        config.evolution.population_size = 6;
        let tuner = AdaptiveTuner::new(config).unwrap();
        let stored = store.load_latest().await.unwrap().unwrap();
        tuner.restore(stored.snapshot).await.unwrap();

        assert_eq!(tuner.evolve_population().await.generation, 5);
    }
}
