//! Artifact cache: staleness policy, regeneration locks and storage.
//!
//! Serving an artifact follows check, lock, recheck:
//!
//! ```text
//!  lookup ──valid──► serve
//!    │
//!  invalid
//!    ▼
//!  acquire lock ──► lookup again ──valid──► serve (someone else rendered it)
//!                        │
//!                      invalid
//!                        ▼
//!                  render ──► write bytes + metadata ──► release lock
//! ```
//!
//! The first check runs without the lock so readers of a fresh artifact never
//! block. The lock is held across the write so no two callers render the same
//! artifact and no reader sees a half-written one.

pub mod key;
pub mod locks;
pub mod policy;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub use key::{checksum, ArtifactKey, ArtifactKind, CacheEntry};
pub use locks::{LockRegistry, LockScope};
pub use policy::CachePolicy;
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors raised by artifact storage or rendering.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Render failed for {key}: {message}")]
    Render { key: String, message: String },
}

/// An artifact ready to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub entry: CacheEntry,
    pub bytes: Vec<u8>,
    /// Whether this call rendered the artifact.
    pub regenerated: bool,
}

/// Cache front combining a store, a lock registry and a validity policy.
pub struct ArtifactCache {
    store: Arc<dyn ArtifactStore>,
    locks: LockRegistry,
    policy: CachePolicy,
}

impl ArtifactCache {
    pub fn new(store: Arc<dyn ArtifactStore>, locks: LockRegistry, policy: CachePolicy) -> Self {
        Self {
            store,
            locks,
            policy,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Serve the cached artifact for `key` if still valid.
    pub async fn cached(
        &self,
        key: &ArtifactKey,
        style: &str,
        window_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> CacheResult<Option<Artifact>> {
        let entry = self.store.lookup(key).await?;
        if !self.policy.is_valid(entry.as_ref(), style, window_start, now) {
            return Ok(None);
        }
        let Some(entry) = entry else {
            return Ok(None);
        };
        // The bytes can vanish or be replaced between lookup and read; either
        // way the pair no longer agrees and this is a miss.
        let Some(bytes) = self.store.read(key).await? else {
            return Ok(None);
        };
        if !entry.matches_bytes(&bytes) {
            debug!(artifact = %key, "artifact bytes do not match metadata");
            return Ok(None);
        }
        Ok(Some(Artifact {
            entry,
            bytes,
            regenerated: false,
        }))
    }

    /// Serve `key`, rendering and storing it first if the cached copy is stale.
    ///
    /// `render` runs at most once per call, only while holding the lock for
    /// `key`, and only if the artifact is still invalid after the lock is taken.
    pub async fn get_or_regenerate<F, Fut>(
        &self,
        key: &ArtifactKey,
        style: &str,
        window_start: DateTime<Utc>,
        render: F,
    ) -> CacheResult<Artifact>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<u8>>>,
    {
        if let Some(artifact) = self.cached(key, style, window_start, Utc::now()).await? {
            debug!(artifact = %key, "cache hit");
            return Ok(artifact);
        }

        debug!(artifact = %key, lock = %self.locks.lock_name(key), "cache miss, waiting for lock");
        let _guard = self.locks.acquire(key).await;

        if let Some(artifact) = self.cached(key, style, window_start, Utc::now()).await? {
            debug!(artifact = %key, "regenerated by another caller while waiting");
            return Ok(artifact);
        }

        let bytes = render().await.map_err(|e| CacheError::Render {
            key: key.storage_name(),
            message: format!("{:#}", e),
        })?;
        let entry = CacheEntry::new(key.clone(), style, window_start, Utc::now(), &bytes);
        self.store.write(&entry, &bytes).await?;
        info!(artifact = %key, style, bytes = bytes.len(), "artifact regenerated");

        Ok(Artifact {
            entry,
            bytes,
            regenerated: true,
        })
    }
}
