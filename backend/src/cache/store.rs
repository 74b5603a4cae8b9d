//! Artifact byte and metadata storage.
//!
//! The cache layer only reads and writes [`CacheEntry`] metadata and opaque
//! artifact bytes. Writes must look atomic to readers: a reader sees either
//! the previous artifact or the new one, never a partial file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::key::{ArtifactKey, CacheEntry};
use super::{CacheError, CacheResult};

/// Storage backend for rendered artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Metadata for `key`, or `None` if the metadata or the bytes are missing.
    async fn lookup(&self, key: &ArtifactKey) -> CacheResult<Option<CacheEntry>>;

    /// Artifact bytes for `key`, or `None` if missing.
    async fn read(&self, key: &ArtifactKey) -> CacheResult<Option<Vec<u8>>>;

    /// Store bytes and metadata, replacing any previous artifact.
    async fn write(&self, entry: &CacheEntry, bytes: &[u8]) -> CacheResult<()>;
}

/// Filesystem store: `<name>.bin` holds the bytes, `<name>.json` the metadata.
///
/// Each file is written under a unique temporary name and renamed into place.
/// Bytes are published before metadata, so metadata never points at a
/// missing or half-written artifact.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact_path(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(format!("{}.bin", key.storage_name()))
    }

    pub fn metadata_path(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(format!("{}.json", key.storage_name()))
    }

    async fn write_atomic(&self, target: &Path, contents: &[u8]) -> CacheResult<()> {
        let file_name = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CacheError::Io(std::io::Error::new(ErrorKind::InvalidInput, "artifact path has no file name")))?;
        let tmp = self.root.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp, contents).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

async fn read_optional(path: &Path) -> CacheResult<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn lookup(&self, key: &ArtifactKey) -> CacheResult<Option<CacheEntry>> {
        let Some(raw) = read_optional(&self.metadata_path(key)).await? else {
            return Ok(None);
        };
        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(artifact = %key, error = %e, "unreadable cache metadata, treating as missing");
                return Ok(None);
            }
        };
        if !tokio::fs::try_exists(self.artifact_path(key)).await? {
            debug!(artifact = %key, "cache metadata present but artifact missing");
            return Ok(None);
        }
        Ok(Some(entry))
    }

    async fn read(&self, key: &ArtifactKey) -> CacheResult<Option<Vec<u8>>> {
        read_optional(&self.artifact_path(key)).await
    }

    async fn write(&self, entry: &CacheEntry, bytes: &[u8]) -> CacheResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let metadata = serde_json::to_vec_pretty(entry)?;

        self.write_atomic(&self.artifact_path(&entry.key), bytes).await?;
        self.write_atomic(&self.metadata_path(&entry.key), &metadata).await?;
        debug!(artifact = %entry.key, bytes = bytes.len(), "artifact written");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<ArtifactKey, (CacheEntry, Vec<u8>)>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn lookup(&self, key: &ArtifactKey) -> CacheResult<Option<CacheEntry>> {
        Ok(self.artifacts.read().get(key).map(|(entry, _)| entry.clone()))
    }

    async fn read(&self, key: &ArtifactKey) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.artifacts.read().get(key).map(|(_, bytes)| bytes.clone()))
    }

    async fn write(&self, entry: &CacheEntry, bytes: &[u8]) -> CacheResult<()> {
        self.artifacts
            .write()
            .insert(entry.key.clone(), (entry.clone(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeasonId;
    use chrono::Utc;

    fn entry(key: ArtifactKey, bytes: &[u8]) -> CacheEntry {
        CacheEntry::new(key, "classic", Utc::now(), Utc::now(), bytes)
    }

    #[tokio::test]
    async fn test_fs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("cache"));
        let key = ArtifactKey::week(SeasonId::new(7), 2);

        assert!(store.lookup(&key).await.unwrap().is_none());

        let e = entry(key.clone(), b"artifact");
        store.write(&e, b"artifact").await.unwrap();

        assert_eq!(store.lookup(&key).await.unwrap(), Some(e));
        assert_eq!(store.read(&key).await.unwrap().as_deref(), Some(&b"artifact"[..]));
    }

    #[tokio::test]
    async fn test_fs_missing_bytes_hide_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let key = ArtifactKey::season_average(SeasonId::new(7));

        store.write(&entry(key.clone(), b"x"), b"x").await.unwrap();
        std::fs::remove_file(store.artifact_path(&key)).unwrap();

        assert!(store.lookup(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fs_corrupt_metadata_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let key = ArtifactKey::week(SeasonId::new(1), 0);

        store.write(&entry(key.clone(), b"x"), b"x").await.unwrap();
        std::fs::write(store.metadata_path(&key), b"{not json").unwrap();

        assert!(store.lookup(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fs_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let key = ArtifactKey::week(SeasonId::new(1), 0);

        store.write(&entry(key.clone(), b"one"), b"one").await.unwrap();
        store.write(&entry(key.clone(), b"two"), b"two").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2, "unexpected files: {:?}", names);
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
        assert_eq!(store.read(&key).await.unwrap().as_deref(), Some(&b"two"[..]));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryArtifactStore::new();
        let key = ArtifactKey::week(SeasonId::new(1), 0);
        assert!(store.is_empty());

        store.write(&entry(key.clone(), b"x"), b"x").await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.lookup(&key).await.unwrap().is_some());
        assert_eq!(store.read(&key).await.unwrap(), Some(b"x".to_vec()));
    }
}
